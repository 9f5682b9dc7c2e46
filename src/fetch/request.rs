//! Request headers and response header helpers.

use reqwest::header::{HeaderMap, ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING};
use reqwest::RequestBuilder;

use crate::config::{ACCEPT_ENCODING as ACCEPT_ENCODING_VALUE, ACCEPT_FEED};

/// Adds the feed request headers (the User-Agent is set on the client).
pub(crate) fn apply_feed_headers(builder: RequestBuilder) -> RequestBuilder {
    builder
        .header(ACCEPT, ACCEPT_FEED)
        .header(ACCEPT_ENCODING, ACCEPT_ENCODING_VALUE)
}

/// Returns the response's Content-Encoding, lowercased, if present and non-empty.
pub(crate) fn content_encoding(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_content_encoding_normalized() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static(" GZIP "));
        assert_eq!(content_encoding(&headers), Some("gzip".to_string()));
    }

    #[test]
    fn test_content_encoding_missing_or_blank() {
        let mut headers = HeaderMap::new();
        assert_eq!(content_encoding(&headers), None);
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static(""));
        assert_eq!(content_encoding(&headers), None);
    }
}
