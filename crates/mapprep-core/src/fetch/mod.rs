//! Blocking HTTPS download of a single archive to disk.
//!
//! Uses the curl crate (libcurl) with redirects handled here rather than by
//! curl, so every hop is scheme-checked and the chain length is bounded.
//! The SHA-256 of each body is reported for provenance; nothing verifies it.

mod error;
mod parse;

pub use error::FetchError;

use parse::{is_redirect, parse_headers, ResponseHeaders};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use std::str;
use std::time::Duration;
use url::Url;

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 5;

/// What [`Fetcher::download`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Destination already existed; no request was issued.
    AlreadyPresent,
    /// Body written to the destination.
    Downloaded {
        /// URL the body was finally served from (after redirects).
        final_url: String,
        bytes: u64,
        redirects: usize,
        /// Lowercase hex SHA-256 of the written body.
        sha256: String,
    },
}

/// Final (non-followed) response of one GET.
struct Response {
    code: u32,
    headers: ResponseHeaders,
    body: Vec<u8>,
}

/// HTTP GET client for archive downloads.
#[derive(Debug, Clone)]
pub struct Fetcher {
    user_agent: String,
    allow_plain_http: bool,
    max_redirects: usize,
    connect_timeout: Duration,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    /// HTTPS-only fetcher with the mapprep User-Agent.
    pub fn new() -> Self {
        Self {
            user_agent: format!(
                "Mozilla/5.0 (compatible; mapprep/{})",
                env!("CARGO_PKG_VERSION")
            ),
            allow_plain_http: false,
            max_redirects: MAX_REDIRECTS,
            connect_timeout: Duration::from_secs(30),
        }
    }

    /// Also accept `http` URLs. Meant for loopback test servers only.
    pub fn allow_plain_http(mut self, allow: bool) -> Self {
        self.allow_plain_http = allow;
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Downloads `url` to `dest` unless `dest` already exists.
    ///
    /// Follows up to [`MAX_REDIRECTS`] redirects, each target keeping the same
    /// destination. Any other non-2xx status is an error carrying the code.
    /// The body is only written once the final status is known to be 2xx.
    pub fn download(&self, url: &str, dest: &Path) -> Result<FetchOutcome, FetchError> {
        if dest.exists() {
            tracing::debug!("{} already present, not downloading", dest.display());
            return Ok(FetchOutcome::AlreadyPresent);
        }

        tracing::info!("Downloading {} to {}...", url, dest.display());
        let mut current = self.checked_url(url)?;

        for redirects in 0..=self.max_redirects {
            let response = self.get(&current)?;
            tracing::debug!(
                "GET {} -> HTTP {} ({} bytes)",
                current,
                response.code,
                response.body.len()
            );

            if is_redirect(response.code) {
                let code = response.code;
                let location = response.headers.location.ok_or_else(|| {
                    FetchError::MissingLocation {
                        url: current.to_string(),
                        code,
                    }
                })?;
                tracing::info!("Redirect found, following it...");
                let next = current
                    .join(&location)
                    .map_err(|source| FetchError::InvalidUrl {
                        url: location.clone(),
                        source,
                    })?;
                self.check_scheme(&next)?;
                current = next;
                continue;
            }

            if !(200..300).contains(&response.code) {
                return Err(FetchError::Status {
                    url: current.to_string(),
                    code: response.code,
                });
            }

            if let Some(expected) = response.headers.content_length {
                if expected != response.body.len() as u64 {
                    tracing::warn!(
                        "{} advertised {} bytes but sent {}",
                        current,
                        expected,
                        response.body.len()
                    );
                }
            }

            fs::write(dest, &response.body).map_err(|source| FetchError::Write {
                path: dest.to_path_buf(),
                source,
            })?;
            return Ok(FetchOutcome::Downloaded {
                final_url: current.to_string(),
                bytes: response.body.len() as u64,
                redirects,
                sha256: hex::encode(Sha256::digest(&response.body)),
            });
        }

        Err(FetchError::TooManyRedirects {
            url: url.to_string(),
            limit: self.max_redirects,
        })
    }

    fn checked_url(&self, url: &str) -> Result<Url, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        self.check_scheme(&parsed)?;
        Ok(parsed)
    }

    fn check_scheme(&self, url: &Url) -> Result<(), FetchError> {
        match url.scheme() {
            "https" => Ok(()),
            "http" if self.allow_plain_http => Ok(()),
            other => Err(FetchError::InsecureScheme {
                url: url.to_string(),
                scheme: other.to_string(),
            }),
        }
    }

    /// One GET without following redirects; buffers the whole body.
    fn get(&self, url: &Url) -> Result<Response, FetchError> {
        let transport = |source: curl::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str()).map_err(transport)?;
        easy.get(true).map_err(transport)?;
        easy.follow_location(false).map_err(transport)?;
        easy.useragent(&self.user_agent).map_err(transport)?;
        easy.connect_timeout(self.connect_timeout).map_err(transport)?;

        {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    if let Ok(s) = str::from_utf8(data) {
                        header_lines.push(s.trim_end().to_string());
                    }
                    true
                })
                .map_err(transport)?;
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(transport)?;
            transfer.perform().map_err(transport)?;
        }

        let code = easy.response_code().map_err(transport)?;
        Ok(Response {
            code,
            headers: parse_headers(&header_lines),
            body,
        })
    }
}
