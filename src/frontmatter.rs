//! Frontmatter extraction.
//!
//! A document may open with a block of `key: value` lines between two lines
//! of exactly `---`:
//!
//! ```text
//! ---
//! title: "Hello World"
//! date: 2024-12-19
//! ---
//!
//! First sentence here.
//! ```
//!
//! Parsing is lenient: lines without a colon or with an empty key are
//! skipped, and a document without a well-formed block is returned whole as
//! the body.

use serde::ser::{Serialize, SerializeMap, Serializer};

const DELIMITER: &str = "---\n";
const CLOSING: &str = "\n---\n";

/// Ordered `key -> value` pairs from a frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, overwriting an earlier value in its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `key` if present and not blank.
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (k, v) in iter {
            metadata.insert(k, v);
        }
        metadata
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A document split into its metadata and body.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Frontmatter {
    pub metadata: Metadata,
    pub body: String,
    /// Whether the `---` boundary was found at all.
    #[serde(skip)]
    pub matched: bool,
}

impl Frontmatter {
    /// Serializes back into a document that parses to the same metadata and body.
    pub fn to_document(&self) -> String {
        let mut out = String::from(DELIMITER);
        let lines: Vec<String> = self
            .metadata
            .iter()
            .map(|(k, v)| format!("{}: {}", k, quote_if_needed(v)))
            .collect();
        out.push_str(&lines.join("\n"));
        out.push_str(CLOSING);
        out.push('\n');
        out.push_str(&self.body);
        out
    }
}

/// Splits `raw` into metadata and body in one pass.
///
/// Without an exact `---\n ... \n---\n` block at offset zero the metadata is
/// empty and the body is `raw` untouched.
pub fn parse_frontmatter(raw: &str) -> Frontmatter {
    let Some((block, rest)) = split_block(raw) else {
        return Frontmatter {
            metadata: Metadata::new(),
            body: raw.to_string(),
            matched: false,
        };
    };

    Frontmatter {
        metadata: parse_metadata(block),
        body: rest.trim().to_string(),
        matched: true,
    }
}

fn split_block(raw: &str) -> Option<(&str, &str)> {
    let after_open = raw.strip_prefix(DELIMITER)?;
    let end_idx = after_open.find(CLOSING)?;
    Some((&after_open[..end_idx], &after_open[end_idx + CLOSING.len()..]))
}

fn parse_metadata(block: &str) -> Metadata {
    let mut metadata = Metadata::new();
    for line in block.split('\n') {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        metadata.insert(key, strip_quotes(value.trim()));
    }
    metadata
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn quote_if_needed(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.trim() != value
        || value.starts_with(['"', '\''])
        || value.ends_with(['"', '\'']);
    if needs_quotes {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}
