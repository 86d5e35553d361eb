// Storage side of the relay: the capabilities the bot needs from a remote
// file store, and the paginated folder traversal built on top of them.

use crate::error::{ClientError, Error, Result};
use std::io::Read;

/// One remote file, as returned by a folder listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub id: String,
}

impl FileRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A single page of a folder listing. An empty or missing
/// `next_page_token` marks the last page.
#[derive(Debug, Clone, Default)]
pub struct ChildPage {
    pub items: Vec<FileRef>,
    pub next_page_token: Option<String>,
}

/// List one page of a folder's children.
pub trait ListChildren {
    fn list_children(&self, folder: &str, page_token: Option<&str>)
        -> std::result::Result<ChildPage, ClientError>;
}

/// Open a byte stream for a remote file.
pub trait DownloadFile {
    type Stream: MediaStream;

    fn download(&self, file: &FileRef) -> std::result::Result<Self::Stream, ClientError>;
}

/// Bytes of a downloaded file plus what the store told us about them.
pub trait MediaStream: Read {
    /// File extension reported by the store, without the leading dot.
    fn extension(&self) -> Option<&str>;

    /// Release the underlying connection. Called once by `StreamGuard`.
    fn close(&mut self);
}

/// Owns an open stream and closes it exactly once, on whichever path the
/// caller leaves by.
pub struct StreamGuard<S: MediaStream> {
    stream: S,
}

impl<S: MediaStream> StreamGuard<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    pub fn extension(&self) -> Option<&str> {
        self.stream.extension()
    }
}

impl<S: MediaStream> Read for StreamGuard<S> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.stream.read(buf)
    }
}

impl<S: MediaStream> Drop for StreamGuard<S> {
    fn drop(&mut self) {
        self.stream.close();
    }
}

/// Walk every page of `folder` and return all children in the order the
/// store returned them. Any failing page fails the whole listing.
#[tracing::instrument(skip(client))]
pub fn list_all_children<C: ListChildren + ?Sized>(client: &C, folder: &str) -> Result<Vec<FileRef>> {
    let mut files = Vec::new();
    let mut page_token: Option<String> = None;
    let mut page = 0;

    loop {
        page += 1;
        let response = client
            .list_children(folder, page_token.as_deref())
            .map_err(|e| Error::Transport {
                folder: folder.to_string(),
                page,
                message: e.to_string(),
            })?;

        tracing::debug!(page, items = response.items.len(), "Fetched listing page");
        files.extend(response.items);

        match response.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    tracing::info!(pages = page, files = files.len(), "Listed folder");
    Ok(files)
}
