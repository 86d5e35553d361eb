use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Folder the pictures are picked from unless `--folder` says otherwise.
pub const DEFAULT_FOLDER_ID: &str = "0B1SaB_OdyoZrVEhQR01WWXoxbjA";

/// Post a random picture from a Google Drive folder to Twitter.
#[derive(Parser, Debug)]
#[command(name = "peeweebot", version, long_about = None)]
pub struct Cli {
    /// Location of the config directory holding the credential files
    #[arg(long, env = "PEEWEEBOT_CONFIG", default_value = "~/.peeweebot/")]
    pub config: String,

    /// Drive folder to pick a picture from
    #[arg(long, env = "PEEWEEBOT_FOLDER", default_value = DEFAULT_FOLDER_ID)]
    pub folder: String,

    /// What to do with the picked file
    #[arg(long, value_enum, default_value_t = Mode::Post)]
    pub mode: Mode,

    /// Directory the picked file is written to in `save` mode
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Text posted in `save` mode
    #[arg(long, default_value = "test")]
    pub text: String,

    /// Timeout for every HTTP request, in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Extra attempts for a folder listing page that fails transiently
    #[arg(long, default_value_t = 2)]
    pub retries: u32,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Upload the picture and tweet it
    Post,
    /// Save the picture to disk and tweet the placeholder text
    Save,
    /// Print the folder listing and the picked file, nothing else
    List,
}

impl Mode {
    pub fn needs_poster(self) -> bool {
        !matches!(self, Mode::List)
    }
}
