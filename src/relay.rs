// Media relay: move the bytes of one remote file into a post.
//
// Every stage maps its failure to its own error variant and nothing is
// retried or rolled back. Upload and post are not idempotent; running the
// relay twice posts twice.

use crate::error::{Error, Result};
use crate::posting::{CreatePost, PostId, UploadMedia};
use crate::storage::{DownloadFile, FileRef, StreamGuard};
use base64::engine::general_purpose::STANDARD;
use base64::write::EncoderStringWriter;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const CHUNK_SIZE: usize = 64 * 1024;

/// Download `file`, upload it as media and publish a post with no text
/// that carries it.
#[tracing::instrument(skip(storage, poster), fields(file_id = %file.id))]
pub fn relay<S, P>(storage: &S, poster: &P, file: &FileRef) -> Result<PostId>
where
    S: DownloadFile + ?Sized,
    P: UploadMedia + CreatePost + ?Sized,
{
    let stream = storage
        .download(file)
        .map_err(|e| Error::download(&file.id, e))?;
    let encoded = {
        let mut stream = StreamGuard::new(stream);
        encode_base64(&mut stream, &file.id)?
    };
    tracing::debug!(encoded_len = encoded.len(), "Encoded media");

    let media = poster
        .upload_media(&encoded)
        .map_err(|e| Error::upload(&file.id, e))?;
    tracing::info!(media_id = %media, "Uploaded media");

    let post = poster
        .create_post("", Some(&media))
        .map_err(|e| Error::post(Some(&media.0), e))?;
    tracing::info!(post_id = %post, "Posted");
    Ok(post)
}

/// Download `file` into `out_dir/image.<ext>` and post `text` without
/// media. Returns the post and the path written.
#[tracing::instrument(skip(storage, poster, text), fields(file_id = %file.id))]
pub fn save_to_disk<S, P>(
    storage: &S,
    poster: &P,
    file: &FileRef,
    out_dir: &Path,
    text: &str,
) -> Result<(PostId, PathBuf)>
where
    S: DownloadFile + ?Sized,
    P: CreatePost + ?Sized,
{
    let stream = storage
        .download(file)
        .map_err(|e| Error::download(&file.id, e))?;
    let path = {
        let mut stream = StreamGuard::new(stream);
        let path = out_dir.join(format!("image.{}", file_extension(stream.extension())));
        let mut out = File::create(&path).map_err(|e| Error::local_io(&path, e))?;
        copy_chunks(&mut stream, &file.id, |chunk| {
            out.write_all(chunk).map_err(|e| Error::local_io(&path, e))
        })?;
        out.flush().map_err(|e| Error::local_io(&path, e))?;
        path
    };
    tracing::info!(path = %path.display(), "Saved file");

    let post = poster
        .create_post(text, None)
        .map_err(|e| Error::post(None, e))?;
    tracing::info!(post_id = %post, "Posted");
    Ok((post, path))
}

/// Read the whole stream through a base64 encoder.
fn encode_base64<R: Read>(stream: &mut R, file_id: &str) -> Result<String> {
    let mut encoder = EncoderStringWriter::new(&STANDARD);
    copy_chunks(stream, file_id, |chunk| {
        encoder
            .write_all(chunk)
            .map_err(|e| Error::encode(file_id, e))
    })?;
    Ok(encoder.into_inner())
}

/// Copy `stream` chunk by chunk into `sink`. Read failures are download
/// errors; `sink` reports its own failures.
fn copy_chunks<R, F>(stream: &mut R, file_id: &str, mut sink: F) -> Result<u64>
where
    R: Read,
    F: FnMut(&[u8]) -> Result<()>,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::download(file_id, e)),
        };
        sink(&buf[..n])?;
        total += n as u64;
    }
    tracing::debug!(bytes = total, "Read file");
    Ok(total)
}

/// Extension to save under. Anything but ASCII alphanumerics is dropped so
/// a reported extension can't point outside the output directory.
fn file_extension(reported: Option<&str>) -> String {
    let ext: String = reported
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if ext.is_empty() {
        "bin".to_string()
    } else {
        ext.to_ascii_lowercase()
    }
}
