//! Frontmatter parser.
//!
//! Parses the optional `---` delimited header of skill and memory documents
//! with a hand-written YAML subset (no external YAML dependency):
//!
//! - Simple key-value pairs: `name: value`
//! - Quoted strings: `name: "My Skill"`
//! - Inline arrays: `tracks: [src/**, lib/*.rs]`
//! - Multi-line arrays: `tracks:\n  - src/**\n  - lib/*.rs`
//! - Comments and blank lines
//!
//! Indented `key: value` lines under an empty key (nested mappings) are
//! accepted and ignored. Anything else is a [`FrontmatterError`].

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.-]*$").unwrap());

/// A parsed frontmatter value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// A single (unquoted) string.
    Scalar(String),
    /// An inline or block array.
    List(Vec<String>),
}

/// Parsed frontmatter plus the body after it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frontmatter {
    /// Whether the document opened with a `---` fence.
    pub present: bool,
    /// Keys in document order.
    pub fields: IndexMap<String, FieldValue>,
    /// Content after the closing fence (or the whole document).
    pub body: String,
}

impl Frontmatter {
    /// A scalar field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.fields.get(key)? {
            FieldValue::Scalar(s) => Some(s.as_str()),
            FieldValue::List(_) => None,
        }
    }

    /// A list field. A scalar is read as a one-element list.
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        match self.fields.get(key)? {
            FieldValue::Scalar(s) if s.is_empty() => Some(Vec::new()),
            FieldValue::Scalar(s) => Some(vec![s.clone()]),
            FieldValue::List(items) => Some(items.clone()),
        }
    }

    /// The `name` field.
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    /// The `description` field.
    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }
}

/// Frontmatter syntax errors. Line numbers are 1-based within the document.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FrontmatterError {
    /// An opening `---` with no closing fence.
    #[error("frontmatter opened with --- but never closed")]
    Unterminated,

    /// A line that is neither `key: value` nor a list item under a key.
    #[error("malformed frontmatter line {line}: {content:?}")]
    MalformedLine {
        /// Line number.
        line: usize,
        /// Offending text.
        content: String,
    },

    /// A key containing characters outside `[A-Za-z0-9_.-]`.
    #[error("invalid frontmatter key on line {line}: {key:?}")]
    InvalidKey {
        /// Line number.
        line: usize,
        /// Offending key.
        key: String,
    },
}

/// Parse a document's frontmatter.
///
/// A document that does not start with `---` has no frontmatter; the whole
/// text is the body.
pub fn parse(content: &str) -> Result<Frontmatter, FrontmatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return Ok(Frontmatter::default());
    };
    if first.trim_end() != "---" {
        return Ok(Frontmatter {
            body: content.to_string(),
            ..Frontmatter::default()
        });
    }

    let mut header = Vec::new();
    let mut consumed = first.len();
    let mut closed = false;
    for line in lines {
        consumed += line.len();
        if line.trim_end() == "---" {
            closed = true;
            break;
        }
        header.push(line.trim_end_matches(['\n', '\r']));
    }
    if !closed {
        return Err(FrontmatterError::Unterminated);
    }

    Ok(Frontmatter {
        present: true,
        fields: parse_fields(&header)?,
        body: content[consumed..].to_string(),
    })
}

fn parse_fields(lines: &[&str]) -> Result<IndexMap<String, FieldValue>, FrontmatterError> {
    let mut fields = IndexMap::new();
    // key awaiting block items, plus the items so far
    let mut open: Option<(String, Vec<String>)> = None;
    let mut nested = false;

    for (idx, raw) in lines.iter().enumerate() {
        // +2: 1-based, plus the opening fence
        let line_no = idx + 2;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indented = raw.starts_with([' ', '\t']);

        if let Some(item) = trimmed.strip_prefix('-') {
            let Some((_, items)) = open.as_mut() else {
                return Err(malformed(line_no, raw));
            };
            items.push(unquote(item));
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            return Err(malformed(line_no, raw));
        };
        let key = key.trim();
        let value = value.trim();

        if indented && nested {
            continue;
        }
        if indented {
            return Err(malformed(line_no, raw));
        }
        if !KEY_RE.is_match(key) {
            return Err(FrontmatterError::InvalidKey {
                line: line_no,
                key: key.to_string(),
            });
        }

        flush(&mut fields, open.take());
        nested = false;

        if value.is_empty() {
            open = Some((key.to_string(), Vec::new()));
            nested = true;
        } else if value.starts_with('[') {
            if !value.ends_with(']') {
                return Err(malformed(line_no, raw));
            }
            let _ = fields.insert(key.to_string(), FieldValue::List(parse_inline_array(value)));
        } else {
            let _ = fields.insert(key.to_string(), FieldValue::Scalar(unquote(value)));
        }
    }
    flush(&mut fields, open);
    Ok(fields)
}

/// Close a key that had an empty value: block items make a list, none a blank scalar.
fn flush(fields: &mut IndexMap<String, FieldValue>, open: Option<(String, Vec<String>)>) {
    if let Some((key, items)) = open {
        let value = if items.is_empty() {
            FieldValue::Scalar(String::new())
        } else {
            FieldValue::List(items)
        };
        let _ = fields.insert(key, value);
    }
}

fn malformed(line: usize, raw: &str) -> FrontmatterError {
    FrontmatterError::MalformedLine {
        line,
        content: raw.to_string(),
    }
}

/// Parse an inline array like `[item1, item2, item3]`.
fn parse_inline_array(value: &str) -> Vec<String> {
    let inner = value
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();
    if inner.is_empty() {
        return Vec::new();
    }
    inner.split(',').map(unquote).filter(|s| !s.is_empty()).collect()
}

/// Remove surrounding quotes from a string value.
fn unquote(s: &str) -> String {
    let trimmed = s.trim();
    let quoted = trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')));
    if quoted {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}
