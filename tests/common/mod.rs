//! In-memory stand-ins for the Drive and Twitter clients.

#![allow(dead_code)]

use peeweebot::error::ClientError;
use peeweebot::posting::{CreatePost, MediaHandle, PostId, UploadMedia};
use peeweebot::select::RandomSource;
use peeweebot::storage::{ChildPage, DownloadFile, FileRef, ListChildren, MediaStream};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::rc::Rc;

/// Folder listing served page by page. Page `n` (0-based) is requested with
/// token `page-n`; the last page carries `last_token`.
pub struct FakeStore {
    pub pages: Vec<Vec<&'static str>>,
    pub last_token: Option<String>,
    pub fail_on_page: Option<usize>,
    pub files: HashMap<String, (Vec<u8>, Option<String>)>,
    pub fail_download: bool,
    pub fail_read: bool,
    pub tokens_seen: RefCell<Vec<Option<String>>>,
    pub downloads: RefCell<Vec<String>>,
    pub closes: Rc<Cell<usize>>,
}

impl FakeStore {
    pub fn with_pages(pages: Vec<Vec<&'static str>>) -> Self {
        Self {
            pages,
            last_token: None,
            fail_on_page: None,
            files: HashMap::new(),
            fail_download: false,
            fail_read: false,
            tokens_seen: RefCell::new(Vec::new()),
            downloads: RefCell::new(Vec::new()),
            closes: Rc::new(Cell::new(0)),
        }
    }

    pub fn with_file(mut self, id: &str, bytes: Vec<u8>, ext: Option<&str>) -> Self {
        self.files.insert(id.to_string(), (bytes, ext.map(str::to_string)));
        self
    }
}

impl ListChildren for FakeStore {
    fn list_children(&self, _folder: &str, page_token: Option<&str>) -> Result<ChildPage, ClientError> {
        self.tokens_seen.borrow_mut().push(page_token.map(str::to_string));
        let index = match page_token {
            None => 0,
            Some(t) => t.trim_start_matches("page-").parse::<usize>()?,
        };
        if self.fail_on_page == Some(index) {
            return Err("503 Service Unavailable".into());
        }
        let items = self.pages.get(index).cloned().unwrap_or_default();
        let next_page_token = if index + 1 < self.pages.len() {
            Some(format!("page-{}", index + 1))
        } else {
            self.last_token.clone()
        };
        Ok(ChildPage {
            items: items.into_iter().map(FileRef::new).collect(),
            next_page_token,
        })
    }
}

impl DownloadFile for FakeStore {
    type Stream = FakeStream;

    fn download(&self, file: &FileRef) -> Result<FakeStream, ClientError> {
        self.downloads.borrow_mut().push(file.id.clone());
        if self.fail_download {
            return Err("404 Not Found".into());
        }
        let (bytes, ext) = self.files.get(&file.id).cloned().unwrap_or_default();
        Ok(FakeStream {
            data: Cursor::new(bytes),
            extension: ext,
            fail_read: self.fail_read,
            closes: Rc::clone(&self.closes),
        })
    }
}

pub struct FakeStream {
    data: Cursor<Vec<u8>>,
    extension: Option<String>,
    fail_read: bool,
    closes: Rc<Cell<usize>>,
}

impl Read for FakeStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail_read {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"));
        }
        self.data.read(buf)
    }
}

impl MediaStream for FakeStream {
    fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    fn close(&mut self) {
        self.closes.set(self.closes.get() + 1);
    }
}

/// Records every upload and post it is asked to make.
#[derive(Default)]
pub struct FakePoster {
    pub media_id: String,
    pub fail_upload: bool,
    pub fail_post: bool,
    pub uploads: RefCell<Vec<String>>,
    pub posts: RefCell<Vec<(String, Option<String>)>>,
}

impl FakePoster {
    pub fn returning(media_id: &str) -> Self {
        Self {
            media_id: media_id.to_string(),
            ..Self::default()
        }
    }
}

impl UploadMedia for FakePoster {
    fn upload_media(&self, media_data: &str) -> Result<MediaHandle, ClientError> {
        self.uploads.borrow_mut().push(media_data.to_string());
        if self.fail_upload {
            return Err("413 Payload Too Large".into());
        }
        Ok(MediaHandle(self.media_id.clone()))
    }
}

impl CreatePost for FakePoster {
    fn create_post(&self, text: &str, media: Option<&MediaHandle>) -> Result<PostId, ClientError> {
        self.posts
            .borrow_mut()
            .push((text.to_string(), media.map(|m| m.0.clone())));
        if self.fail_post {
            return Err("403 Forbidden".into());
        }
        Ok(PostId("post-1".to_string()))
    }
}

/// Always picks the same index.
pub struct FixedPick(pub usize);

impl RandomSource for FixedPick {
    fn pick(&mut self, _len: usize) -> usize {
        self.0
    }
}
