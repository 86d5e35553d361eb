// Library root
// -----------
// The binary (`main.rs`) parses flags, loads configuration and hands the
// two remote clients to `bot`. Everything below is usable without a
// network: the core only sees the capability traits.
//
// Module responsibilities:
// - `storage`, `posting`: capability traits for the two remote services,
//   plus the paginated folder listing.
// - `select`: random pick of one file.
// - `relay`: download, encode, upload and post one file.
// - `bot`: one run, wiring the above together.
// - `drive`, `twitter`, `oauth`, `http`: the real HTTP clients.
// - `cli`, `config`, `error`: flags, credential files and the error type.
pub mod bot;
pub mod cli;
pub mod config;
pub mod drive;
pub mod error;
pub mod http;
pub mod oauth;
pub mod posting;
pub mod relay;
pub mod select;
pub mod storage;
pub mod twitter;

pub use error::{Error, Result};
