//! Response body decoding
//!
//! Normalizes a raw response body into text, reversing gzip compression
//! when the `Content-Encoding` header signals it.

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use std::io::Read;

/// Decode a response body into text.
///
/// Gzip-encoded bodies are decompressed first, then decoded as UTF-8.
/// A corrupt stream or non-UTF-8 body is an error - "content unreadable"
/// must never be conflated with "marker absent" downstream.
pub fn decode_body(body: &[u8], content_encoding: Option<&str>) -> Result<String> {
    let bytes = if is_gzip(content_encoding) {
        let mut decoder = GzDecoder::new(body);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(Error::Gzip)?;
        decompressed
    } else {
        body.to_vec()
    };

    Ok(String::from_utf8(bytes)?)
}

/// Whether a `Content-Encoding` value signals gzip compression.
///
/// Handles comma-separated encoding lists and the legacy `x-gzip` token.
fn is_gzip(content_encoding: Option<&str>) -> bool {
    content_encoding.is_some_and(|value| {
        value
            .split(',')
            .any(|token| matches!(token.trim().to_ascii_lowercase().as_str(), "gzip" | "x-gzip"))
    })
}
