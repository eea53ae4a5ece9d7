//! Validated base64 transform applied before any file bytes leave the engine.
//!
//! Steps, in order:
//! 1. strip an optional `data:<mime>;base64,` prefix,
//! 2. reject characters outside `[A-Za-z0-9+/=]`,
//! 3. reject lengths that are not a multiple of 4,
//! 4. strip embedded line breaks,
//! 5. decode.
//!
//! Line breaks count as invalid characters in step 2, so wrapped base64 is
//! rejected rather than repaired.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::PayloadError;

const DATA_URL_MARKER: &str = ";base64,";

/// Mime types whose content is stored as raw text rather than base64.
const TEXT_TYPES: [&str; 5] = [
    "application/json",
    "text/plain",
    "text/csv",
    "application/xml",
    "text/xml",
];

/// Validate and decode a base64 payload.
///
/// # Errors
/// - [`PayloadError::InvalidCharacter`] for anything outside the alphabet.
/// - [`PayloadError::InvalidLength`] when the length is not a multiple of 4.
/// - [`PayloadError::Decode`] when padding is misplaced.
pub fn decode_payload(content: &str) -> Result<Vec<u8>, PayloadError> {
    let body = strip_data_url(content);

    if let Some((position, ch)) = body.char_indices().find(|&(_, c)| !is_base64_char(c)) {
        return Err(PayloadError::InvalidCharacter { position, ch });
    }
    if body.len() % 4 != 0 {
        return Err(PayloadError::InvalidLength(body.len()));
    }
    let body: String = body.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();

    STANDARD
        .decode(body)
        .map_err(|e| PayloadError::Decode(e.to_string()))
}

/// Encode raw bytes into the form [`decode_payload`] accepts.
pub fn encode_payload(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Resolve a node's file `content` into the bytes to transfer.
///
/// Text file types hold raw text, which is encoded first so that every
/// transfer still goes through the validated transform.
pub fn file_bytes(content: &str, filetype: &str) -> Result<Vec<u8>, PayloadError> {
    if is_text_type(filetype) && !content.starts_with("data:") {
        decode_payload(&encode_payload(content.as_bytes()))
    } else {
        decode_payload(content)
    }
}

fn strip_data_url(content: &str) -> &str {
    if content.starts_with("data:") {
        if let Some(idx) = content.find(DATA_URL_MARKER) {
            return &content[idx + DATA_URL_MARKER.len()..];
        }
    }
    content
}

fn is_base64_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')
}

fn is_text_type(filetype: &str) -> bool {
    let mime = filetype.split(';').next().unwrap_or("").trim();
    TEXT_TYPES.iter().any(|t| t.eq_ignore_ascii_case(mime))
}
