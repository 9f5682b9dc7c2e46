//! Content-Encoding decoding.
//!
//! Supports `gzip` / `x-gzip`, `deflate` (zlib-wrapped, with a raw deflate
//! fallback for servers that send it unwrapped), `br` and `identity`. Stacked
//! codings (`Content-Encoding: gzip, br`) are undone in reverse order.

use std::io::Read;

use flate2::read::{DeflateDecoder, MultiGzDecoder, ZlibDecoder};
use log::warn;

use crate::error_handling::FetchError;

/// Decodes a raw body according to `encoding` and converts it to text.
///
/// # Arguments
///
/// * `raw` - Body bytes as received
/// * `encoding` - Content-Encoding header value, if any
/// * `limit` - Maximum decoded size in bytes
///
/// # Errors
///
/// - `FetchError::DecodeFailure` for corrupt payloads or unsupported codings
/// - `FetchError::TooLarge` if the decoded output exceeds `limit`
pub(crate) fn decode_body(
    raw: Vec<u8>,
    encoding: Option<&str>,
    limit: usize,
) -> Result<String, FetchError> {
    let mut bytes = raw;
    if let Some(encoding) = encoding {
        for coding in encoding.rsplit(',').map(str::trim) {
            bytes = decode_one(&bytes, coding, limit)?;
        }
    }
    Ok(bytes_to_text(bytes))
}

fn decode_one(bytes: &[u8], coding: &str, limit: usize) -> Result<Vec<u8>, FetchError> {
    match coding.to_ascii_lowercase().as_str() {
        "" | "identity" => Ok(bytes.to_vec()),
        "gzip" | "x-gzip" => read_limited(MultiGzDecoder::new(bytes), limit),
        "deflate" => match read_limited(ZlibDecoder::new(bytes), limit) {
            Err(FetchError::DecodeFailure(_)) => read_limited(DeflateDecoder::new(bytes), limit),
            other => other,
        },
        "br" => read_limited(brotli::Decompressor::new(bytes, 4096), limit),
        other => Err(FetchError::DecodeFailure(format!(
            "unsupported content-encoding '{other}'"
        ))),
    }
}

fn read_limited(reader: impl Read, limit: usize) -> Result<Vec<u8>, FetchError> {
    let mut out = Vec::new();
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| FetchError::DecodeFailure(e.to_string()))?;
    if out.len() > limit {
        return Err(FetchError::TooLarge {
            limit,
            received: out.len(),
        });
    }
    Ok(out)
}

/// Converts decoded bytes to text, stripping a UTF-8 BOM.
///
/// Invalid UTF-8 sequences are replaced rather than failing the whole feed.
fn bytes_to_text(bytes: Vec<u8>) -> String {
    let bytes = match bytes.strip_prefix(b"\xEF\xBB\xBF") {
        Some(rest) => rest.to_vec(),
        None => bytes,
    };
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                "Feed body is not valid UTF-8 (first error at byte {}), replacing invalid sequences",
                e.utf8_error().valid_up_to()
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::{GzEncoder, ZlibEncoder};
    use flate2::Compression;
    use std::io::Write;

    const FEED: &str = "<rss><channel><title>Café</title></channel></rss>";

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn raw_deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder =
            flate2::write::DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn brotli_compress(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut writer = brotli::CompressorWriter::new(&mut out, 4096, 5, 22);
            writer.write_all(data).unwrap();
        }
        out
    }

    #[test]
    fn test_identity() {
        let text = decode_body(FEED.as_bytes().to_vec(), None, 1024).unwrap();
        assert_eq!(text, FEED);
        let text = decode_body(FEED.as_bytes().to_vec(), Some("identity"), 1024).unwrap();
        assert_eq!(text, FEED);
    }

    #[test]
    fn test_gzip() {
        let text = decode_body(gzip(FEED.as_bytes()), Some("gzip"), 1024).unwrap();
        assert_eq!(text, FEED);
        let text = decode_body(gzip(FEED.as_bytes()), Some("x-gzip"), 1024).unwrap();
        assert_eq!(text, FEED);
    }

    #[test]
    fn test_deflate_zlib_and_raw() {
        assert_eq!(
            decode_body(zlib(FEED.as_bytes()), Some("deflate"), 1024).unwrap(),
            FEED
        );
        assert_eq!(
            decode_body(raw_deflate(FEED.as_bytes()), Some("deflate"), 1024).unwrap(),
            FEED
        );
    }

    #[test]
    fn test_brotli() {
        let text = decode_body(brotli_compress(FEED.as_bytes()), Some("br"), 1024).unwrap();
        assert_eq!(text, FEED);
    }

    #[test]
    fn test_stacked_codings_undone_in_reverse() {
        let body = brotli_compress(&gzip(FEED.as_bytes()));
        let text = decode_body(body, Some("gzip, br"), 1024).unwrap();
        assert_eq!(text, FEED);
    }

    #[test]
    fn test_corrupt_gzip_is_decode_failure() {
        let result = decode_body(b"definitely not gzip".to_vec(), Some("gzip"), 1024);
        assert!(matches!(result, Err(FetchError::DecodeFailure(_))));
    }

    #[test]
    fn test_unknown_coding_is_decode_failure() {
        let result = decode_body(FEED.as_bytes().to_vec(), Some("compress"), 1024);
        assert!(matches!(result, Err(FetchError::DecodeFailure(_))));
    }

    #[test]
    fn test_decompression_bomb_is_capped() {
        let bomb = gzip(&vec![b'a'; 1024 * 1024]);
        assert!(bomb.len() < 16 * 1024);
        let result = decode_body(bomb, Some("gzip"), 64 * 1024);
        match result {
            Err(FetchError::TooLarge { limit, received }) => {
                assert_eq!(limit, 64 * 1024);
                assert_eq!(received, 64 * 1024 + 1);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_bom_stripped_and_invalid_utf8_replaced() {
        let mut body = b"\xEF\xBB\xBF<rss>".to_vec();
        body.extend_from_slice(b"\xFF</rss>");
        let text = decode_body(body, None, 1024).unwrap();
        assert_eq!(text, "<rss>\u{FFFD}</rss>");
    }
}
