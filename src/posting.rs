// Posting side of the relay: what the bot needs from a social feed.

use crate::error::ClientError;
use std::fmt;

/// Identifier the posting service hands back for an uploaded media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle(pub String);

/// Identifier of a created post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostId(pub String);

impl fmt::Display for MediaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upload base64-encoded media and get back a handle for it.
pub trait UploadMedia {
    fn upload_media(&self, media_data: &str) -> Result<MediaHandle, ClientError>;
}

/// Publish a post. `text` may be empty when the post carries media.
pub trait CreatePost {
    fn create_post(&self, text: &str, media: Option<&MediaHandle>) -> Result<PostId, ClientError>;
}
