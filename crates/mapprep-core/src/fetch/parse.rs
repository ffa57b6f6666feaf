//! Parse HTTP response header lines into the fields the downloader acts on.

/// Headers relevant to a GET: redirect target and advertised body size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResponseHeaders {
    /// `Location` value, if present.
    pub location: Option<String>,
    /// `Content-Length`, if present and numeric.
    pub content_length: Option<u64>,
}

/// Statuses whose `Location` is followed.
pub(crate) fn is_redirect(code: u32) -> bool {
    matches!(code, 301 | 302 | 303 | 307 | 308)
}

/// Parse collected header lines of the final response.
///
/// Curl hands over every header block it sees (including `100 Continue`); a new
/// status line resets what was collected so only the last response counts.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHeaders {
    let mut parsed = ResponseHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            parsed = ResponseHeaders::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("location") && !value.is_empty() {
                parsed.location = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    parsed.content_length = Some(n);
                }
            }
        }
    }

    parsed
}
