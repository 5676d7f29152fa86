//! Continuation cursors wrapped as URL-safe tokens.
//!
//! The catalog's cursors are opaque; they are never inspected, only
//! carried across a request/response cycle and handed back verbatim.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

pub fn encode(cursor: &str) -> String {
    URL_SAFE_NO_PAD.encode(cursor.as_bytes())
}

/// The cursor inside `token`, or `None` when the token is malformed.
pub fn decode(token: &str) -> Option<String> {
    let token = token.trim().trim_end_matches('=');
    if token.is_empty() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
    let cursor = String::from_utf8(bytes).ok()?;
    if cursor.is_empty() || !cursor.chars().all(|c| c.is_ascii_graphic()) {
        return None;
    }
    Some(cursor)
}
