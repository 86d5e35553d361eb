// Shared pieces of the blocking HTTP clients: client construction, response
// status checks and the retry loop used for idempotent requests.

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::cmp::min;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("{status} - {body}")]
    Status { status: StatusCode, body: String },
}

impl HttpError {
    /// Worth another attempt: connection trouble, timeouts, 429 and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout() || e.is_connect() || e.status().map_or(false, is_transient_status),
            Self::Status { status, .. } => is_transient_status(*status),
        }
    }
}

pub fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Turn a non-2xx response into an error carrying the response body.
pub fn check(res: Response) -> Result<Response, HttpError> {
    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().unwrap_or_else(|_| "".into());
        return Err(HttpError::Status { status, body });
    }
    Ok(res)
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (1-based), doubling each time.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        min(self.base_delay.saturating_mul(factor), self.max_delay)
    }

    /// Run `op` until it succeeds, fails with a non-transient error, or the
    /// retries run out.
    pub fn run<T, F>(&self, what: &str, mut op: F) -> Result<T, HttpError>
    where
        F: FnMut() -> Result<T, HttpError>,
    {
        let mut attempt = 0;
        loop {
            match op() {
                Ok(v) => return Ok(v),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.backoff(attempt);
                    tracing::warn!(what, attempt, ?delay, error = %e, "Request failed, retrying");
                    std::thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
