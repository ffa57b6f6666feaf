//! Download error type.

use std::path::PathBuf;
use thiserror::Error;

/// Error returned by a single archive download (bad URL, curl failure, HTTP error, or disk write).
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL could not be parsed (including a malformed redirect `Location`).
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// Only `https` is fetched; checked before any request is issued.
    #[error("refusing to fetch {url}: scheme {scheme:?} is not https")]
    InsecureScheme { url: String, scheme: String },
    /// Curl reported an error (DNS, connect, TLS, etc.).
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// HTTP response was neither 2xx nor a followable redirect.
    #[error("GET {url} returned HTTP {code}")]
    Status { url: String, code: u32 },
    /// Redirect status without a `Location` header.
    #[error("GET {url} returned HTTP {code} without a Location header")]
    MissingLocation { url: String, code: u32 },
    /// Redirect chain longer than the hop limit (or looping).
    #[error("too many redirects (more than {limit}) starting at {url}")]
    TooManyRedirects { url: String, limit: usize },
    /// Writing the downloaded body failed.
    #[error("write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// HTTP status code, when the failure was a bad status.
    pub fn status_code(&self) -> Option<u32> {
        match self {
            FetchError::Status { code, .. } | FetchError::MissingLocation { code, .. } => {
                Some(*code)
            }
            _ => None,
        }
    }
}
