// Google Drive v2 adapter: folder listing and file download over the REST
// API, authenticated with a stored bearer token.

use crate::config::{Config, GoogleToken, GOOGLE_TOKEN_FILE};
use crate::error::{ClientError, Error, Result};
use crate::http::{self, HttpError, RetryPolicy};
use crate::storage::{ChildPage, DownloadFile, FileRef, ListChildren, MediaStream};
use reqwest::blocking::{Client, Response};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::io::{self, Read};
use url::Url;

pub struct DriveClient {
    client: Client,
    base_url: String,
    authorization: String,
    retry: RetryPolicy,
}

#[derive(Deserialize, Debug)]
struct ChildList {
    #[serde(default)]
    items: Vec<ChildItem>,
    #[serde(rename = "nextPageToken", default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ChildItem {
    id: String,
}

#[derive(Deserialize, Debug)]
struct FileMeta {
    #[serde(rename = "fileExtension", default)]
    file_extension: Option<String>,
    #[serde(rename = "mimeType", default)]
    mime_type: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl DriveClient {
    /// Build a client from the loaded configuration. Fails with an auth
    /// error if the stored token is unusable.
    pub fn from_config(config: &Config) -> Result<Self> {
        config
            .google_token
            .ensure_fresh(&config.config_dir.join(GOOGLE_TOKEN_FILE), chrono::Utc::now())?;
        tracing::debug!(client_id = %config.google_client.client_id, "Using Google OAuth client");
        Self::new(
            &config.google_token,
            &config.endpoints.drive,
            config.timeout,
            RetryPolicy::with_retries(config.retries),
        )
    }

    pub fn new(
        token: &GoogleToken,
        base_url: &str,
        timeout: std::time::Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let client = http::build_client(timeout)
            .map_err(|e| Error::Auth(format!("Unable to build Drive client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: token.authorization(),
            retry,
        })
    }

    /// `{base}/files/{segments...}` with each segment escaped.
    fn files_url(&self, segments: &[&str]) -> std::result::Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| format!("{} cannot be used as a base URL", self.base_url))?
            .push("files")
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: Url) -> std::result::Result<Response, HttpError> {
        let res = self
            .client
            .get(url)
            .header(AUTHORIZATION, &self.authorization)
            .send()?;
        http::check(res)
    }
}

impl ListChildren for DriveClient {
    fn list_children(
        &self,
        folder: &str,
        page_token: Option<&str>,
    ) -> std::result::Result<ChildPage, ClientError> {
        let mut url = self.files_url(&[folder, "children"])?;
        if let Some(token) = page_token {
            url.query_pairs_mut().append_pair("pageToken", token);
        }

        let list: ChildList = self.retry.run("list children", || {
            let res = self.get(url.clone())?;
            Ok(res.json()?)
        })?;

        Ok(ChildPage {
            items: list.items.into_iter().map(|item| FileRef::new(item.id)).collect(),
            next_page_token: list.next_page_token,
        })
    }
}

impl DownloadFile for DriveClient {
    type Stream = DriveStream;

    fn download(&self, file: &FileRef) -> std::result::Result<DriveStream, ClientError> {
        let mut meta_url = self.files_url(&[&file.id])?;
        meta_url
            .query_pairs_mut()
            .append_pair("fields", "fileExtension,mimeType,title");
        let meta: FileMeta = self.get(meta_url)?.json()?;
        tracing::debug!(
            title = meta.title.as_deref().unwrap_or_default(),
            mime_type = meta.mime_type.as_deref().unwrap_or_default(),
            "Fetched file metadata"
        );

        let mut media_url = self.files_url(&[&file.id])?;
        media_url.query_pairs_mut().append_pair("alt", "media");
        let body = self.get(media_url)?;

        Ok(DriveStream {
            body: Some(body),
            extension: meta.file_extension,
        })
    }
}

/// Body of a Drive media download. Closing drops the response, which hands
/// the connection back to the pool.
pub struct DriveStream {
    body: Option<Response>,
    extension: Option<String>,
}

impl Read for DriveStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.body.as_mut() {
            Some(body) => body.read(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "download stream already closed")),
        }
    }
}

impl MediaStream for DriveStream {
    fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    fn close(&mut self) {
        self.body.take();
    }
}
