//! Transaction codec: opaque payload bytes to [`Transaction`].
//!
//! Payloads arrive from the consensus engine as raw bytes. Two encodings
//! are accepted:
//!
//! - a JSON object (first non-whitespace byte is `{`)
//! - standard base64 of a JSON object
//!
//! Anything that is not `{`-prefixed is first tried as base64. If that
//! yields non-empty output the decoded bytes are parsed; otherwise the
//! original bytes are parsed as-is (and will normally fail).
//!
//! Only a JSON object is a transaction. Arrays and scalars are malformed
//! even though a derived struct would accept a positional array. A repeated
//! key keeps its last value. Surrounding Unicode whitespace is ignored.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::transaction::{Transaction, TxPayload};

/// Decode a raw transaction payload.
pub fn decode_transaction(raw: &[u8]) -> Result<Transaction, DecodeError> {
    let trimmed = trim_space(raw);
    if trimmed.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }

    let unwrapped;
    let source = if trimmed[0] == b'{' {
        trimmed
    } else {
        match STANDARD.decode(trimmed) {
            Ok(decoded) if !decoded.is_empty() => {
                unwrapped = decoded;
                trim_space(&unwrapped)
            }
            _ => trimmed,
        }
    };

    let malformed = |e: serde_json::Error| DecodeError::MalformedTransaction(e.to_string());
    // Parsing into a map first makes later duplicates overwrite earlier ones.
    let value: Value = serde_json::from_slice(source).map_err(malformed)?;
    if !value.is_object() {
        return Err(DecodeError::MalformedTransaction(
            "expected a JSON object".to_string(),
        ));
    }
    let payload = TxPayload::deserialize(value).map_err(malformed)?;
    Ok(payload.into())
}

/// Strip leading and trailing Unicode whitespace.
///
/// Invalid UTF-8 stops trimming at the first undecodable character.
fn trim_space(mut bytes: &[u8]) -> &[u8] {
    while let Some(c) = leading_char(bytes).filter(|c| c.is_whitespace()) {
        bytes = &bytes[c.len_utf8()..];
    }
    while let Some(c) = trailing_char(bytes).filter(|c| c.is_whitespace()) {
        bytes = &bytes[..bytes.len() - c.len_utf8()];
    }
    bytes
}

fn leading_char(bytes: &[u8]) -> Option<char> {
    (1..=bytes.len().min(4)).find_map(|n| single_char(&bytes[..n]))
}

fn trailing_char(bytes: &[u8]) -> Option<char> {
    (1..=bytes.len().min(4)).find_map(|n| single_char(&bytes[bytes.len() - n..]))
}

fn single_char(bytes: &[u8]) -> Option<char> {
    let mut chars = std::str::from_utf8(bytes).ok()?.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

/// Encode a transaction as its canonical JSON payload.
pub fn encode_transaction(tx: &Transaction) -> Vec<u8> {
    // TxPayload holds only strings and integers; serialization cannot fail.
    serde_json::to_vec(&TxPayload::from(tx)).unwrap_or_default()
}

/// Encode a transaction as base64 of its canonical JSON payload.
pub fn encode_transaction_base64(tx: &Transaction) -> Vec<u8> {
    STANDARD.encode(encode_transaction(tx)).into_bytes()
}
