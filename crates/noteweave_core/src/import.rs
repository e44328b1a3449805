//! Import reconciliation: turning Markdown documents into items.
//!
//! Import always requires a metadata block. Historical field spellings are
//! reconciled here:
//!
//! | Field | Accepted keys (first wins) |
//! |-------|----------------------------|
//! | task state | `task.done`, top-level `done` |
//! | created | `createdAt`, `created` |
//! | updated | `updatedAt`, `updated` |
//! | tags | top-level `tags` plus every attribute block's `tags` |
//!
//! Each document is processed on its own; a failure is reported for that
//! document only.

use std::collections::HashSet;

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde_yaml::Value;

use crate::attributes::primary_type;
use crate::config::Config;
use crate::date::{ParsedDate, parse_date_value};
use crate::error::{NoteweaveError, Result};
use crate::frontmatter::{
    FrontMatterShape, get_nested, get_string, split_front_matter_with, value_as_bool,
    value_as_string, value_as_string_list,
};
use crate::item::{
    AttributeKind, EventAttributes, Item, MailAttributes, TaskAttributes, generate_id,
};

/// Title used when neither metadata nor body provide one.
pub const UNTITLED: &str = "Untitled";

/// Name used in diagnostics for documents imported without a name.
const UNNAMED: &str = "<document>";

/// Longest title derived from a body line.
const MAX_DERIVED_TITLE: usize = 80;

/// A named raw document awaiting import.
#[derive(Debug, Clone)]
pub struct ImportSource {
    /// Name used in diagnostics, typically the file name
    pub name: String,
    /// Full document text
    pub raw: String,
}

impl ImportSource {
    /// Pair a document with the name it is reported under.
    pub fn new(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
        }
    }
}

/// A document that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    /// Name of the source document
    pub name: String,
    /// Why it was skipped
    pub reason: String,
}

/// Result of importing a batch of documents.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Successfully imported items, in input order
    pub items: Vec<Item>,
    /// Documents that were excluded, in input order
    pub skipped: Vec<SkippedDocument>,
}

/// Parse a document into an item, or `None` when it cannot be imported.
///
/// Failures are logged, never propagated.
///
/// ```
/// use noteweave_core::import::parse_content;
///
/// let item = parse_content("---\ntitle: Call mom\ndone: 'true'\n---\n\nSunday").unwrap();
/// assert_eq!(item.title, "Call mom");
/// assert_eq!(item.task.map(|t| t.done), Some(true));
/// assert_eq!(item.content, "Sunday");
///
/// assert!(parse_content("No metadata here").is_none());
/// ```
pub fn parse_content(raw: &str) -> Option<Item> {
    match try_parse_content(raw) {
        Ok(item) => Some(item),
        Err(e) => {
            log::warn!("Skipping import: {}", e);
            None
        }
    }
}

/// Parse a document into an item, reporting why it was rejected.
pub fn try_parse_content(raw: &str) -> Result<Item> {
    try_parse_named(UNNAMED, raw, &Config::default())
}

/// Parse a named document with an explicit configuration.
pub fn try_parse_named(name: &str, raw: &str, config: &Config) -> Result<Item> {
    let parsed = split_front_matter_with(raw, config);

    if !parsed.has_front_matter() {
        return Err(NoteweaveError::NoFrontmatter(name.to_string()));
    }
    if let Some(reason) = parsed.diagnostic {
        return Err(NoteweaveError::InvalidFrontmatter {
            name: name.to_string(),
            reason,
        });
    }

    let body = match parsed.shape {
        FrontMatterShape::Delimited => strip_separator(&parsed.body),
        _ => parsed.body.as_str(),
    };

    Ok(build_item(&parsed.metadata, body))
}

/// Import every document independently.
pub fn import_batch(sources: &[ImportSource]) -> ImportReport {
    import_batch_with(sources, &Config::default())
}

/// Import every document independently with an explicit configuration.
pub fn import_batch_with(sources: &[ImportSource], config: &Config) -> ImportReport {
    let mut report = ImportReport::default();
    let mut seen_ids = HashSet::new();

    for source in sources {
        match try_parse_named(&source.name, &source.raw, config) {
            Ok(item) => {
                if !seen_ids.insert(item.id.clone()) {
                    log::warn!("Duplicate id '{}' in '{}'", item.id, source.name);
                }
                report.items.push(item);
            }
            Err(e) => {
                log::warn!("Skipping '{}': {}", source.name, e);
                report.skipped.push(SkippedDocument {
                    name: source.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    log::debug!(
        "Imported {} documents, skipped {}",
        report.items.len(),
        report.skipped.len()
    );
    report
}

/// Drop the single blank line written between the closing delimiter and
/// the body.
fn strip_separator(body: &str) -> &str {
    body.strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body)
}

fn build_item(metadata: &IndexMap<String, Value>, body: &str) -> Item {
    let title = get_string(metadata, "title")
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| derive_title(body));

    let now = Local::now();
    let created_at = timestamp(metadata, &["createdAt", "created"]).unwrap_or(now);
    let updated_at = timestamp(metadata, &["updatedAt", "updated"]).unwrap_or(now);

    let mut item = Item {
        id: String::new(),
        title,
        content: body.to_string(),
        created_at,
        updated_at,
        tags: collect_tags(metadata),
        task: read_task(metadata),
        event: read_event(metadata),
        mail: read_mail(metadata),
    };

    item.id = get_string(metadata, "id")
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| generate_id(primary_type(&item), &item.title));
    item
}

fn timestamp(metadata: &IndexMap<String, Value>, keys: &[&str]) -> Option<DateTime<Local>> {
    let value = keys.iter().find_map(|key| metadata.get(*key))?;
    match parse_date_value(value) {
        ParsedDate::Exact(dt) => Some(dt),
        ParsedDate::Defaulted { value, reason } => {
            log::debug!("Unreadable timestamp '{}', using import time", reason);
            Some(value)
        }
    }
}

fn read_task(metadata: &IndexMap<String, Value>) -> Option<TaskAttributes> {
    let done = get_nested(metadata, "task", "done").or_else(|| metadata.get("done"));
    if !metadata.contains_key("task") && done.is_none() {
        return None;
    }
    Some(TaskAttributes {
        done: done.and_then(value_as_bool).unwrap_or(false),
    })
}

fn read_event(metadata: &IndexMap<String, Value>) -> Option<EventAttributes> {
    let Some(date) = get_nested(metadata, "event", "date") else {
        if metadata.contains_key("event") {
            log::debug!("Ignoring event block without a date");
        }
        return None;
    };

    Some(EventAttributes {
        date: parse_date_value(date).value(),
        end_date: get_nested(metadata, "event", "endDate").map(|v| parse_date_value(v).value()),
        location: get_nested(metadata, "event", "location").and_then(value_as_string),
    })
}

fn read_mail(metadata: &IndexMap<String, Value>) -> Option<MailAttributes> {
    match metadata.get("mail")? {
        Value::Mapping(_) | Value::Null => {}
        other => {
            log::debug!("Ignoring mail value that is not a block: {:?}", other);
            return None;
        }
    }

    Some(MailAttributes {
        from: get_nested(metadata, "mail", "from").and_then(value_as_string),
        to: get_nested(metadata, "mail", "to")
            .map(value_as_string_list)
            .unwrap_or_default(),
        subject: get_nested(metadata, "mail", "subject").and_then(value_as_string),
        attachments: get_nested(metadata, "mail", "attachments")
            .map(value_as_string_list)
            .unwrap_or_default(),
    })
}

/// Union of top-level and per-block tags, first occurrence wins.
fn collect_tags(metadata: &IndexMap<String, Value>) -> Vec<String> {
    let top = metadata.get("tags");
    let blocks = AttributeKind::ALL
        .iter()
        .map(|kind| get_nested(metadata, kind.as_str(), "tags"));

    let mut seen = HashSet::new();
    std::iter::once(top)
        .chain(blocks)
        .flatten()
        .flat_map(value_as_string_list)
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// First heading, else first non-empty line, else [`UNTITLED`].
fn derive_title(body: &str) -> String {
    let lines = || body.lines().map(str::trim).filter(|l| !l.is_empty());

    let heading = lines()
        .find(|l| l.starts_with('#'))
        .map(|l| l.trim_start_matches('#').trim())
        .filter(|l| !l.is_empty());

    match heading.or_else(|| lines().next()) {
        Some(line) => line.chars().take(MAX_DERIVED_TITLE).collect(),
        None => UNTITLED.to_string(),
    }
}
