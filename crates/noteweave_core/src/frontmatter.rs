//! Front matter splitting and loosely-typed metadata access.
//!
//! Two document shapes carry metadata:
//!
//! - **Delimited** (canonical): a `---` line, a YAML block, a closing `---`
//!   line, then the body.
//! - **Legacy type key**: the document starts directly with `task:`,
//!   `event:`, `mail:` or `note:` followed by an indented block, a blank
//!   line, then the body. Only read, never written.
//!
//! Documents matching neither shape are returned whole as the body with
//! empty metadata. Malformed YAML inside a block degrades to empty
//! metadata and is reported through [`ParsedDocument::diagnostic`].

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_yaml::Value;

use crate::config::Config;
use crate::error::Result;

static DELIMITED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)??---[ \t]*(?:\r?\n(.*))?\z")
        .expect("front matter pattern is valid")
});

static LEGACY_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:task|event|mail|note):[ \t]*$").expect("legacy key pattern is valid")
});

/// Which document shape the metadata was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterShape {
    /// `---` delimited block
    Delimited,
    /// Bare `task:`/`event:`/`mail:`/`note:` block followed by a blank line
    LegacyTypeKey,
    /// No metadata block
    Absent,
}

/// A document split into metadata and body.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// The parsed metadata as an ordered map.
    pub metadata: IndexMap<String, Value>,
    /// The body content after the metadata block.
    pub body: String,
    /// Shape of the metadata block.
    pub shape: FrontMatterShape,
    /// Set when a block was found but its YAML could not be parsed.
    pub diagnostic: Option<String>,
}

impl ParsedDocument {
    fn absent(doc: &str) -> Self {
        Self {
            metadata: IndexMap::new(),
            body: doc.to_string(),
            shape: FrontMatterShape::Absent,
            diagnostic: None,
        }
    }

    /// Whether a metadata block was present in the document.
    pub fn has_front_matter(&self) -> bool {
        self.shape != FrontMatterShape::Absent
    }
}

/// Split a document with the default configuration.
pub fn split_front_matter(doc: &str) -> ParsedDocument {
    split_front_matter_with(doc, &Config::default())
}

/// Split a document into metadata and body.
///
/// Never fails: see the module docs for the degradation rules.
///
/// # Examples
///
/// ```
/// use noteweave_core::frontmatter::{split_front_matter, FrontMatterShape};
///
/// let parsed = split_front_matter("---\ntitle: Groceries\n---\n\n- milk");
/// assert_eq!(parsed.shape, FrontMatterShape::Delimited);
/// assert_eq!(parsed.metadata["title"].as_str(), Some("Groceries"));
/// assert_eq!(parsed.body, "\n- milk");
///
/// let bare = split_front_matter("Just a thought");
/// assert_eq!(bare.shape, FrontMatterShape::Absent);
/// assert_eq!(bare.body, "Just a thought");
/// ```
pub fn split_front_matter_with(doc: &str, config: &Config) -> ParsedDocument {
    if let Some(caps) = DELIMITED_RE.captures(doc) {
        let block = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());
        return build(block, body, FrontMatterShape::Delimited);
    }

    if config.accept_legacy_front_matter
        && let Some((block, body)) = split_legacy(doc)
    {
        let parsed = build(block, body, FrontMatterShape::LegacyTypeKey);
        if parsed.diagnostic.is_some() || parsed.metadata.values().all(is_block_value) {
            return parsed;
        }
        log::debug!("Leading type key is not followed by a block, reading as plain text");
    }

    ParsedDocument::absent(doc)
}

fn build(block: &str, body: &str, shape: FrontMatterShape) -> ParsedDocument {
    let (metadata, diagnostic) = match parse_metadata(block) {
        Ok(metadata) => (metadata, None),
        Err(e) => {
            log::warn!("Ignoring malformed front matter: {}", e);
            (IndexMap::new(), Some(e.to_string()))
        }
    };

    ParsedDocument {
        metadata,
        body: body.to_string(),
        shape,
        diagnostic,
    }
}

/// Parse a YAML block into an ordered map.
///
/// A blank block is an empty map rather than an error.
pub fn parse_metadata(block: &str) -> Result<IndexMap<String, Value>> {
    if block.trim().is_empty() {
        return Ok(IndexMap::new());
    }
    Ok(serde_yaml::from_str(block)?)
}

/// Find the legacy metadata block: header lines plus indented lines, up to
/// the first blank line.
fn split_legacy(doc: &str) -> Option<(&str, &str)> {
    let first = doc.lines().next()?.trim_end_matches('\r');
    if !LEGACY_KEY_RE.is_match(first) {
        return None;
    }

    let mut offset = 0;
    for line in doc.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if content.trim().is_empty() {
            let block = &doc[..offset];
            let body = &doc[offset + line.len()..];
            return Some((block, body));
        }
        let indented = content.starts_with(' ') || content.starts_with('\t');
        if !indented && !LEGACY_KEY_RE.is_match(content) {
            return None;
        }
        offset += line.len();
    }

    // Metadata only, no body
    Some((doc, ""))
}

/// Legacy type keys hold a nested block or nothing at all.
fn is_block_value(value: &Value) -> bool {
    matches!(value, Value::Mapping(_) | Value::Null)
}

/// Join an emitted YAML block and a body into a delimited document.
///
/// `yaml` is expected to end with a newline.
pub fn compose(yaml: &str, body: &str) -> String {
    format!("---\n{}---\n\n{}", yaml, body)
}

/// Read a scalar as a trimmed string.
///
/// Numbers and booleans are stringified; sequences, mappings and null are
/// not strings.
pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => value_as_string(&tagged.value),
        _ => None,
    }
}

/// Read a scalar-or-sequence as a list of trimmed strings.
///
/// A single scalar becomes a one-element list. Empty strings are dropped.
pub fn value_as_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(seq) => seq
            .iter()
            .filter_map(value_as_string)
            .filter(|s| !s.is_empty())
            .collect(),
        other => value_as_string(other)
            .filter(|s| !s.is_empty())
            .into_iter()
            .collect(),
    }
}

/// Read a boolean, accepting `true`/`false` and their string spellings.
pub fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Get a top-level string property.
pub fn get_string(metadata: &IndexMap<String, Value>, key: &str) -> Option<String> {
    metadata.get(key).and_then(value_as_string)
}

/// Get a field of a nested attribute block, e.g. `task.done`.
pub fn get_nested<'a>(
    metadata: &'a IndexMap<String, Value>,
    key: &str,
    field: &str,
) -> Option<&'a Value> {
    metadata.get(key).and_then(|block| block.get(field))
}
