// One run of the bot: list the folder, pick a file, do something with it.
// Nothing here touches the process; `main` decides what an error means.

use crate::error::Result;
use crate::posting::{CreatePost, PostId, UploadMedia};
use crate::relay;
use crate::select::{choose_uniform, RandomSource};
use crate::storage::{list_all_children, DownloadFile, FileRef, ListChildren};
use std::path::{Path, PathBuf};

/// The whole folder listing and the file picked from it.
#[derive(Debug, Clone)]
pub struct Pick {
    pub files: Vec<FileRef>,
    pub selected: FileRef,
}

/// List `folder` and pick one of its files at random.
pub fn pick_file<S, R>(storage: &S, rng: &mut R, folder: &str) -> Result<Pick>
where
    S: ListChildren + ?Sized,
    R: RandomSource + ?Sized,
{
    let files = list_all_children(storage, folder)?;
    let index = choose_uniform(rng, files.len(), folder)?;
    let selected = files[index].clone();
    tracing::info!(index, of = files.len(), file_id = %selected.id, "Picked file");
    Ok(Pick { files, selected })
}

/// Post a random picture from `folder`.
pub fn post_random_picture<S, P, R>(storage: &S, poster: &P, rng: &mut R, folder: &str) -> Result<PostId>
where
    S: ListChildren + DownloadFile + ?Sized,
    P: UploadMedia + CreatePost + ?Sized,
    R: RandomSource + ?Sized,
{
    let pick = pick_file(storage, rng, folder)?;
    relay::relay(storage, poster, &pick.selected)
}

/// Save a random picture from `folder` into `out_dir` and post `text`.
pub fn save_random_picture<S, P, R>(
    storage: &S,
    poster: &P,
    rng: &mut R,
    folder: &str,
    out_dir: &Path,
    text: &str,
) -> Result<(PostId, PathBuf)>
where
    S: ListChildren + DownloadFile + ?Sized,
    P: CreatePost + ?Sized,
    R: RandomSource + ?Sized,
{
    let pick = pick_file(storage, rng, folder)?;
    relay::save_to_disk(storage, poster, &pick.selected, out_dir, text)
}
