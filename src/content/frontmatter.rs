//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;

use crate::error::MalformedContent;

lazy_static! {
    /// A line made of exactly three hyphens (CRLF tolerated)
    static ref DELIMITER_RE: Regex = Regex::new(r"(?m)^---\r?$").unwrap();
}

/// Split raw file text into `(metadata, body)` around the first delimiter line.
///
/// A file whose first line is a delimiter has empty metadata, unless the text
/// up to the second delimiter is a YAML mapping: then that text is fenced
/// metadata and the body follows the second delimiter.
pub fn split_front_matter(text: &str) -> Result<(&str, &str), MalformedContent> {
    let mut delimiters = DELIMITER_RE.find_iter(text);
    let first = delimiters.next().ok_or(MalformedContent::MissingDelimiter)?;

    let (meta_start, end) = match delimiters.next() {
        Some(second) if first.start() == 0 && is_mapping(&text[first.end()..second.start()]) => {
            (first.end(), second)
        }
        _ => (0, first),
    };

    let metadata = &text[meta_start..end.start()];
    let body = &text[end.end()..];
    let body = body.strip_prefix('\n').unwrap_or(body);
    Ok((metadata, body))
}

fn is_mapping(text: &str) -> bool {
    matches!(serde_yaml::from_str::<Value>(text), Ok(Value::Mapping(_)))
}

/// Front-matter data from a post or page, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter {
    fields: IndexMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    pub fn parse(text: &str) -> Result<(Self, &str), MalformedContent> {
        let (metadata, body) = split_front_matter(text)?;
        Ok((Self::decode(metadata)?, body))
    }

    /// Decode a metadata block. Empty and comment-only blocks are an empty mapping.
    pub fn decode(metadata: &str) -> Result<Self, MalformedContent> {
        if metadata.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(metadata)?;
        let fields = match value {
            Value::Null => IndexMap::new(),
            Value::Mapping(_) => {
                serde_yaml::from_value(value).map_err(|_| MalformedContent::NotAMapping)?
            }
            _ => return Err(MalformedContent::NotAMapping),
        };
        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// A scalar value rendered as a string
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn require_str(&self, key: &'static str) -> Result<String, MalformedContent> {
        self.get_str(key).ok_or(MalformedContent::MissingKey(key))
    }

    /// A required calendar date; any time of day is dropped
    pub fn require_date(&self, key: &'static str) -> Result<NaiveDate, MalformedContent> {
        let raw = self.require_str(key)?;
        parse_date(&raw).ok_or(MalformedContent::InvalidDate { key, value: raw })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Parse a date string in various formats
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}
