//! Strict `application/x-www-form-urlencoded` parsing for provider callbacks.
//!
//! axum's `Form` decodes leniently (a stray `%zz` survives as literal text),
//! which would let a corrupted payload through as "digits". Here a bad escape,
//! a `;` separator, an unparseable Content-Type or bytes that do not decode
//! to UTF-8 are errors. A body that is not declared as a form (including one
//! with no Content-Type at all) carries no fields.

use axum::http::{header::CONTENT_TYPE, HeaderMap};

const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("invalid Content-Type header")]
    ContentType,

    #[error("invalid percent escape in {0:?}")]
    Escape(String),

    #[error("invalid semicolon separator in {0:?}")]
    Semicolon(String),

    #[error("form value is not valid UTF-8")]
    Utf8,
}

/// Fields of a callback body, in order, duplicates kept.
pub fn form_fields(headers: &HeaderMap, body: &[u8]) -> Result<Vec<(String, String)>, FormError> {
    let Some(raw) = headers.get(CONTENT_TYPE) else {
        return Ok(Vec::new());
    };
    let value = raw.to_str().map_err(|_| FormError::ContentType)?;
    let media = value.split(';').next().unwrap_or_default().trim();

    let Some((kind, sub)) = media.split_once('/') else {
        return Err(FormError::ContentType);
    };
    if kind.trim().is_empty() || sub.trim().is_empty() {
        return Err(FormError::ContentType);
    }

    if media.eq_ignore_ascii_case(FORM_MEDIA_TYPE) {
        parse_urlencoded(body)
    } else {
        Ok(Vec::new())
    }
}

pub fn parse_urlencoded(body: &[u8]) -> Result<Vec<(String, String)>, FormError> {
    let mut out = Vec::new();
    for pair in body.split(|b| *b == b'&') {
        if pair.contains(&b';') {
            return Err(FormError::Semicolon(lossy(pair)));
        }
        if pair.is_empty() {
            continue;
        }

        let (key, value) = match pair.iter().position(|b| *b == b'=') {
            Some(i) => (&pair[..i], &pair[i + 1..]),
            None => (pair, &pair[pair.len()..]),
        };
        out.push((decode_component(key)?, decode_component(value)?));
    }
    Ok(out)
}

fn decode_component(raw: &[u8]) -> Result<String, FormError> {
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            b'+' => {
                bytes.push(b' ');
                i += 1;
            }
            b'%' => {
                let hi = raw.get(i + 1).copied().and_then(hex_value);
                let lo = raw.get(i + 2).copied().and_then(hex_value);
                let (Some(hi), Some(lo)) = (hi, lo) else {
                    let end = (i + 3).min(raw.len());
                    return Err(FormError::Escape(lossy(&raw[i..end])));
                };
                bytes.push(hi << 4 | lo);
                i += 3;
            }
            b => {
                bytes.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(bytes).map_err(|_| FormError::Utf8)
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
