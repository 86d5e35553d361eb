// OAuth 1.0a request signing (HMAC-SHA1), as required by the Twitter v1.1
// endpoints. Only the parts needed to sign a request with an existing access
// token are here; the three-legged token dance is out of scope.

use crate::config::TwitterCredentials;
use crate::error::ClientError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

/// RFC 3986 unreserved characters stay as they are, everything else is
/// percent-encoded.
const OAUTH_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE).to_string()
}

/// Build the `Authorization` header for a request. `params` holds every
/// query and form-body parameter of the request, unencoded.
pub fn authorization_header(
    creds: &TwitterCredentials,
    method: &str,
    base_url: &str,
    params: &[(&str, &str)],
) -> Result<String, ClientError> {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    let timestamp = chrono::Utc::now().timestamp().to_string();
    header_with(creds, method, base_url, params, &nonce, &timestamp)
}

fn header_with(
    creds: &TwitterCredentials,
    method: &str,
    base_url: &str,
    params: &[(&str, &str)],
    nonce: &str,
    timestamp: &str,
) -> Result<String, ClientError> {
    let mut oauth_params = vec![
        ("oauth_consumer_key", creds.consumer_key.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp),
        ("oauth_token", creds.access_token.as_str()),
        ("oauth_version", "1.0"),
    ];

    let mut all: Vec<(&str, &str)> = params.to_vec();
    all.extend(oauth_params.iter().copied());
    let sig = signature(creds, method, base_url, &all)?;
    oauth_params.push(("oauth_signature", sig.as_str()));
    oauth_params.sort();

    let fields: Vec<String> = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect();
    Ok(format!("OAuth {}", fields.join(", ")))
}

/// Base64 HMAC-SHA1 over the signature base string.
fn signature(
    creds: &TwitterCredentials,
    method: &str,
    base_url: &str,
    params: &[(&str, &str)],
) -> Result<String, ClientError> {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();
    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(base_url),
        encode(&param_string)
    );
    let key = format!(
        "{}&{}",
        encode(&creds.consumer_secret),
        encode(&creds.access_token_secret)
    );

    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| format!("invalid signing key: {:?}", e))?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
