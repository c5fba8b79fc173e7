//! Forgiving field decoders for backend rows.
//!
//! The backend serves rows built from spreadsheets, so every column may
//! arrive as a string, a bare number, `null`, or an empty string. These
//! helpers collapse all of those into `Option` values: anything that does
//! not carry a usable value becomes `None` instead of a decode error.

use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Text(String),
    Number(f64),
    Flag(bool),
    /// Lists, objects and anything else a scalar cell should not hold.
    Other(IgnoredAny),
}

impl Raw {
    fn into_text(self) -> Option<String> {
        let text = match self {
            Raw::Text(s) => s.trim().to_string(),
            Raw::Number(n) => n.to_string(),
            Raw::Flag(b) => b.to_string(),
            Raw::Other(_) => return None,
        };
        Some(text).filter(|s| !s.is_empty())
    }
}

/// A list cell, or a single value standing in for a one-item list.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawList {
    Many(Vec<Raw>),
    One(Raw),
}

fn raw_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(raw.and_then(Raw::into_text))
}

/// Parse a numeric cell. Returns `None` for empty, unparsable or non-finite input.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Trimmed text; empty becomes `None`.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    raw_text(deserializer)
}

/// Any finite number, sign allowed (coordinates).
pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(raw_text(deserializer)?.as_deref().and_then(parse_number))
}

/// A finite, non-negative number (prices, minutes, counts).
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(raw_text(deserializer)?
        .as_deref()
        .and_then(parse_number)
        .filter(|v| *v >= 0.0))
}

/// A value parsed through `FromStr`; parse failures become `None`.
pub(crate) fn parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    Ok(raw_text(deserializer)?.and_then(|s| s.parse::<T>().ok()))
}

/// A list of strings; `null` becomes an empty list and a lone scalar a
/// one-item list.
pub(crate) fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<RawList>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawList::Many(items)) => items,
        Some(RawList::One(item)) => vec![item],
    };
    Ok(items.into_iter().filter_map(Raw::into_text).collect())
}
