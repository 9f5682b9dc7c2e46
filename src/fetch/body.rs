//! Streaming body reads with a byte cap.

use futures::StreamExt;
use log::debug;

use crate::error_handling::FetchError;

/// Streams a response body into memory, aborting as soon as it crosses `limit`.
///
/// A declared `Content-Length` above the limit fails before any byte is read.
/// Otherwise a running byte counter is checked after every chunk; the first
/// chunk that pushes it over the limit aborts the read. Returning drops the
/// response, which closes the connection.
///
/// # Errors
///
/// - `FetchError::TooLarge` when the cap is exceeded
/// - `FetchError::Network` when the stream fails
pub(crate) async fn read_body_with_limit(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    if let Some(declared) = response.content_length() {
        let declared = usize::try_from(declared).unwrap_or(usize::MAX);
        if declared > limit {
            debug!("Declared Content-Length {declared} exceeds {limit} bytes");
            return Err(FetchError::TooLarge {
                limit,
                received: declared,
            });
        }
    }

    let mut stream = response.bytes_stream();
    let mut buf = Vec::with_capacity(limit.min(64 * 1024));
    let mut received = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        received += chunk.len();
        if received > limit {
            debug!("Aborting body read at {received} bytes (limit {limit})");
            return Err(FetchError::TooLarge { limit, received });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf)
}

/// Reads and discards a response body, up to `limit` bytes.
///
/// Used for non-success responses so the body is consumed without being
/// buffered; anything past the limit is abandoned with the connection.
pub(crate) async fn drain_body(response: reqwest::Response, limit: usize) {
    let mut stream = response.bytes_stream();
    let mut drained = 0usize;
    while let Some(Ok(chunk)) = stream.next().await {
        drained += chunk.len();
        if drained > limit {
            break;
        }
    }
    debug!("Drained {drained} bytes of error response body");
}
