//! Tests for loading the credential files.

use clap::Parser;
use peeweebot::cli::Cli;
use peeweebot::config::{
    Config, GOOGLE_CLIENT_SECRETS_FILE, GOOGLE_TOKEN_FILE, TWITTER_CREDENTIALS_FILE,
};
use peeweebot::Error;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CLIENT_SECRETS: &str = r#"{"installed":{"client_id":"123.apps.googleusercontent.com","client_secret":"s3cret","auth_uri":"https://accounts.google.com/o/oauth2/auth","token_uri":"https://accounts.google.com/o/oauth2/token","redirect_uris":["urn:ietf:wg:oauth:2.0:oob"]}}"#;
const TOKEN: &str = r#"{"access_token":"ya29.tok","token_type":"Bearer","refresh_token":"1/r","expiry":"0001-01-01T00:00:00Z"}"#;
const TWITTER: &str = r#"{"ConsumerKey":"ck","ConsumerSecret":"cs","AccessToken":"at","AccessTokenSecret":"ats"}"#;

fn write_all(dir: &Path) {
    fs::write(dir.join(GOOGLE_CLIENT_SECRETS_FILE), CLIENT_SECRETS).unwrap();
    fs::write(dir.join(GOOGLE_TOKEN_FILE), TOKEN).unwrap();
    fs::write(dir.join(TWITTER_CREDENTIALS_FILE), TWITTER).unwrap();
}

fn cli(dir: &Path, mode: &str) -> Cli {
    Cli::try_parse_from([
        "peeweebot",
        "--config",
        dir.to_str().unwrap(),
        "--mode",
        mode,
        "--folder",
        "folder-1",
    ])
    .unwrap()
}

#[test]
fn test_loads_all_files() {
    let dir = TempDir::new().unwrap();
    write_all(dir.path());

    let config = Config::load(&cli(dir.path(), "post")).unwrap();

    assert_eq!(config.folder_id, "folder-1");
    assert_eq!(config.google_client.client_id, "123.apps.googleusercontent.com");
    assert_eq!(config.google_token.access_token, "ya29.tok");
    let twitter = config.twitter().unwrap();
    assert_eq!(twitter.consumer_key, "ck");
    assert_eq!(twitter.access_token_secret, "ats");
}

#[test]
fn test_web_client_entry_is_accepted() {
    let dir = TempDir::new().unwrap();
    write_all(dir.path());
    fs::write(
        dir.path().join(GOOGLE_CLIENT_SECRETS_FILE),
        r#"{"web":{"client_id":"web-id","client_secret":"x"}}"#,
    )
    .unwrap();

    let config = Config::load(&cli(dir.path(), "post")).unwrap();
    assert_eq!(config.google_client.client_id, "web-id");
}

#[test]
fn test_list_mode_does_not_need_twitter() {
    let dir = TempDir::new().unwrap();
    write_all(dir.path());
    fs::remove_file(dir.path().join(TWITTER_CREDENTIALS_FILE)).unwrap();

    let config = Config::load(&cli(dir.path(), "list")).unwrap();
    assert!(config.twitter.is_none());
    assert!(matches!(config.twitter(), Err(Error::Config { .. })));
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    write_all(dir.path());
    fs::remove_file(dir.path().join(GOOGLE_TOKEN_FILE)).unwrap();

    let err = Config::load(&cli(dir.path(), "post")).err().unwrap();
    match err {
        Error::Config { path, .. } => assert!(path.ends_with(GOOGLE_TOKEN_FILE)),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_malformed_json_is_config_error() {
    let dir = TempDir::new().unwrap();
    write_all(dir.path());
    fs::write(dir.path().join(TWITTER_CREDENTIALS_FILE), "{not json").unwrap();

    let err = Config::load(&cli(dir.path(), "save")).err().unwrap();
    assert!(matches!(err, Error::Config { .. }));
    assert!(err.to_string().contains("Unable to decode"));
}

#[test]
fn test_secrets_without_client_entry_is_config_error() {
    let dir = TempDir::new().unwrap();
    write_all(dir.path());
    fs::write(dir.path().join(GOOGLE_CLIENT_SECRETS_FILE), "{}").unwrap();

    let err = Config::load(&cli(dir.path(), "post")).err().unwrap();
    assert!(matches!(err, Error::Config { .. }));
}
