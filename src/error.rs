// Error module: one enum for every way a run can fail. Each variant names
// the stage that failed and the identifier it was working on, so the single
// line printed by `main` is enough to tell what went wrong.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Listing folder {folder} failed on page {page}: {message}")]
    Transport {
        folder: String,
        page: usize,
        message: String,
    },

    #[error("Folder {folder} has no files to choose from")]
    EmptyCollection { folder: String },

    #[error("Unable to fetch file {file_id}: {message}")]
    Download { file_id: String, message: String },

    #[error("Unable to encode file {file_id} as base64: {message}")]
    Encode { file_id: String, message: String },

    #[error("Unable to upload media for file {file_id}: {message}")]
    Upload { file_id: String, message: String },

    #[error("Unable to create post: {message}")]
    Post {
        media_id: Option<String>,
        message: String,
    },

    #[error("Unable to write {}: {source}", .path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a storage or posting client. The relay and lister
/// wrap it into the `Error` variant of the stage that called the client.
pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

impl Error {
    pub fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn download(file_id: &str, message: impl ToString) -> Self {
        Self::Download {
            file_id: file_id.to_string(),
            message: message.to_string(),
        }
    }

    pub fn encode(file_id: &str, message: impl ToString) -> Self {
        Self::Encode {
            file_id: file_id.to_string(),
            message: message.to_string(),
        }
    }

    pub fn upload(file_id: &str, message: impl ToString) -> Self {
        Self::Upload {
            file_id: file_id.to_string(),
            message: message.to_string(),
        }
    }

    pub fn post(media_id: Option<&str>, message: impl ToString) -> Self {
        Self::Post {
            media_id: media_id.map(str::to_string),
            message: message.to_string(),
        }
    }

    pub fn local_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LocalIo {
            path: path.into(),
            source,
        }
    }

    /// Short stage name, used as a structured field when the error is logged.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Auth(_) => "auth",
            Self::Transport { .. } => "list",
            Self::EmptyCollection { .. } => "select",
            Self::Download { .. } => "download",
            Self::Encode { .. } => "encode",
            Self::Upload { .. } => "upload",
            Self::Post { .. } => "post",
            Self::LocalIo { .. } => "save",
        }
    }
}
