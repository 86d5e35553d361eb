// Configuration: everything a run needs, read once at startup and then
// passed down by reference. The config directory holds three JSON files
// written by earlier manual OAuth setup; this module only reads them.

use crate::cli::Cli;
use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, Duration as ChronoDuration, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const GOOGLE_CLIENT_SECRETS_FILE: &str = "google_client_secrets.json";
pub const GOOGLE_TOKEN_FILE: &str = "google_drive_oauth_token.json";
pub const TWITTER_CREDENTIALS_FILE: &str = "twitter_stuff.json";

/// A token this close to expiry is treated as expired.
const EXPIRY_SKEW_SECS: i64 = 10;

/// OAuth client descriptor from the Google developer console.
#[derive(Deserialize, Debug, Clone)]
pub struct GoogleClient {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    installed: Option<GoogleClient>,
    web: Option<GoogleClient>,
}

/// Previously obtained Drive access token.
#[derive(Deserialize, Clone)]
pub struct GoogleToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expiry: Option<String>,
}

/// Twitter app and user keys. Field names follow the file on disk.
#[derive(Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct TwitterCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

/// Base URLs of the remote APIs.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub drive: String,
    pub twitter_api: String,
    pub twitter_upload: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            drive: "https://www.googleapis.com/drive/v2".into(),
            twitter_api: "https://api.twitter.com/1.1".into(),
            twitter_upload: "https://upload.twitter.com/1.1".into(),
        }
    }
}

pub struct Config {
    pub config_dir: PathBuf,
    pub folder_id: String,
    pub google_client: GoogleClient,
    pub google_token: GoogleToken,
    /// Only loaded when the run posts something.
    pub twitter: Option<TwitterCredentials>,
    pub endpoints: Endpoints,
    pub timeout: Duration,
    pub retries: u32,
}

impl Config {
    /// Resolve the config directory named on the command line and load the
    /// credential files the selected mode needs.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_dir = resolve_config_dir(&cli.config)?;
        tracing::debug!(dir = %config_dir.display(), "Loading configuration");

        let google_client = load_google_client(&config_dir.join(GOOGLE_CLIENT_SECRETS_FILE))?;
        let token_path = config_dir.join(GOOGLE_TOKEN_FILE);
        let google_token: GoogleToken = read_json(&token_path)?;
        google_token.expires_at(&token_path)?;

        let twitter = if cli.mode.needs_poster() {
            Some(read_json(&config_dir.join(TWITTER_CREDENTIALS_FILE))?)
        } else {
            None
        };

        Ok(Self {
            config_dir,
            folder_id: cli.folder.clone(),
            google_client,
            google_token,
            twitter,
            endpoints: Endpoints::default(),
            timeout: Duration::from_secs(cli.timeout_secs),
            retries: cli.retries,
        })
    }

    pub fn twitter(&self) -> Result<&TwitterCredentials> {
        self.twitter.as_ref().ok_or_else(|| {
            Error::config(
                self.config_dir.join(TWITTER_CREDENTIALS_FILE),
                "Twitter credentials were not loaded",
            )
        })
    }
}

impl GoogleToken {
    /// Expiry time, or `None` for a token without one. Go's zero time
    /// (`0001-01-01T00:00:00Z`) also means "none".
    pub fn expires_at(&self, path: &Path) -> Result<Option<DateTime<Utc>>> {
        let raw = match self.expiry.as_deref() {
            None | Some("") => return Ok(None),
            Some(raw) => raw,
        };
        let at = DateTime::parse_from_rfc3339(raw)
            .map_err(|e| Error::config(path, format!("Invalid token expiry {:?}: {}", raw, e)))?
            .with_timezone(&Utc);
        if at.year() <= 1 {
            return Ok(None);
        }
        Ok(Some(at))
    }

    /// Fail with an auth error when the token is empty or has expired.
    /// Refreshing is left to whatever wrote the token file.
    pub fn ensure_fresh(&self, path: &Path, now: DateTime<Utc>) -> Result<()> {
        if self.access_token.is_empty() {
            return Err(Error::Auth(format!(
                "{} holds no access token",
                path.display()
            )));
        }
        if let Some(at) = self.expires_at(path)? {
            if at - ChronoDuration::seconds(EXPIRY_SKEW_SECS) <= now {
                return Err(Error::Auth(format!(
                    "Drive token in {} expired at {}; authorize again",
                    path.display(),
                    at.to_rfc3339()
                )));
            }
        }
        Ok(())
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        let kind = if self.token_type.is_empty() || self.token_type.eq_ignore_ascii_case("bearer") {
            "Bearer"
        } else {
            self.token_type.as_str()
        };
        format!("{} {}", kind, self.access_token)
    }
}

/// Expand a leading `~/` to the invoking user's home directory.
pub fn resolve_config_dir(raw: &str) -> Result<PathBuf> {
    let path = match raw.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir()
                .ok_or_else(|| Error::config(raw, "Unable to find the current user's home directory"))?;
            home.join(rest)
        }
        None if raw == "~" => {
            dirs::home_dir()
                .ok_or_else(|| Error::config(raw, "Unable to find the current user's home directory"))?
        }
        None => PathBuf::from(raw),
    };
    Ok(path.components().collect())
}

fn load_google_client(path: &Path) -> Result<GoogleClient> {
    let file: ClientSecretsFile = read_json(path)?;
    file.installed
        .or(file.web)
        .ok_or_else(|| Error::config(path, "Expected an \"installed\" or \"web\" client entry"))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|e| Error::config(path, format!("Unable to read: {}", e)))?;
    serde_json::from_slice(&bytes).map_err(|e| Error::config(path, format!("Unable to decode: {}", e)))
}
