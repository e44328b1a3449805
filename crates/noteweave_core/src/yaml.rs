//! Item-to-front-matter serialization.
//!
//! Output is canonical and deterministic: an identity header (`id`,
//! `title`, `createdAt`, `updatedAt`) followed by one nested block per
//! present attribute set in the order `task`, `event`, `mail`, `note`.
//! Unset fields and empty lists are omitted. An attached set with no fields
//! left is written as `{}` so it survives a round trip, while an untagged
//! note produces no front matter at all.

use crate::attributes::primary_type;
use crate::date::format_date;
use crate::frontmatter;
use crate::item::{AttributeKind, Item};

use serde_yaml::Value;

/// A single field inside an attribute block.
enum Field {
    Scalar(&'static str, String),
    List(&'static str, Vec<String>),
}

struct Block {
    key: AttributeKind,
    fields: Vec<Field>,
}

/// Build the YAML metadata block for an item, without delimiters.
///
/// Returns an empty string when no attribute block survives omission.
///
/// ```
/// use noteweave_core::item::Item;
/// use noteweave_core::yaml::generate_yaml;
///
/// assert_eq!(generate_yaml(&Item::new("Untagged", "body")), "");
///
/// let yaml = generate_yaml(&Item::new("Chore", "").with_done(true));
/// assert!(yaml.contains("task:\n  done: true\n"));
/// ```
pub fn generate_yaml(item: &Item) -> String {
    let blocks = attribute_blocks(item);
    if blocks.is_empty() {
        return String::new();
    }

    let mut lines: Vec<String> = vec![
        format!("id: {}", yaml_string(&item.id)),
        format!("title: {}", yaml_string(&item.title)),
        format!("createdAt: {}", yaml_string(&format_date(&item.created_at))),
        format!("updatedAt: {}", yaml_string(&format_date(&item.updated_at))),
    ];

    for block in blocks {
        if block.fields.is_empty() {
            lines.push(format!("{}: {{}}", block.key));
            continue;
        }
        lines.push(format!("{}:", block.key));
        for field in block.fields {
            match field {
                Field::Scalar(name, value) => lines.push(format!("  {}: {}", name, value)),
                Field::List(name, items) => {
                    lines.push(format!("  {}:", name));
                    for item in items {
                        lines.push(format!("    - {}", yaml_string(&item)));
                    }
                }
            }
        }
    }

    let mut yaml = lines.join("\n");
    yaml.push('\n');
    yaml
}

/// Render a full document: front matter, a blank line, then the body.
///
/// Items without front matter render as their body alone.
pub fn format_with_yaml(item: &Item) -> String {
    let yaml = generate_yaml(item);
    if yaml.is_empty() {
        item.content.clone()
    } else {
        frontmatter::compose(&yaml, &item.content)
    }
}

fn attribute_blocks(item: &Item) -> Vec<Block> {
    // Tags live under the primary type's block
    let tag_owner = primary_type(item);
    let tags_for = |kind: AttributeKind| -> Option<Field> {
        (kind == tag_owner && !item.tags.is_empty()).then(|| Field::List("tags", item.tags.clone()))
    };

    let mut blocks = Vec::new();

    if let Some(task) = &item.task {
        let mut fields = vec![Field::Scalar("done", task.done.to_string())];
        fields.extend(tags_for(AttributeKind::Task));
        blocks.push(Block {
            key: AttributeKind::Task,
            fields,
        });
    }

    if let Some(event) = &item.event {
        let mut fields = vec![Field::Scalar("date", yaml_string(&format_date(&event.date)))];
        if let Some(end) = &event.end_date {
            fields.push(Field::Scalar("endDate", yaml_string(&format_date(end))));
        }
        if let Some(location) = &event.location {
            fields.push(Field::Scalar("location", yaml_string(location)));
        }
        fields.extend(tags_for(AttributeKind::Event));
        blocks.push(Block {
            key: AttributeKind::Event,
            fields,
        });
    }

    if let Some(mail) = &item.mail {
        let mut fields = Vec::new();
        if let Some(from) = &mail.from {
            fields.push(Field::Scalar("from", yaml_string(from)));
        }
        if !mail.to.is_empty() {
            fields.push(Field::List("to", mail.to.clone()));
        }
        if let Some(subject) = &mail.subject {
            fields.push(Field::Scalar("subject", yaml_string(subject)));
        }
        if !mail.attachments.is_empty() {
            fields.push(Field::List("attachments", mail.attachments.clone()));
        }
        fields.extend(tags_for(AttributeKind::Mail));
        blocks.push(Block {
            key: AttributeKind::Mail,
            fields,
        });
    }

    if item.has_note_attributes() {
        blocks.push(Block {
            key: AttributeKind::Note,
            fields: tags_for(AttributeKind::Note).into_iter().collect(),
        });
    }

    // An attached set is written even when empty; only a bare note has nothing to say
    blocks.retain(|block| block.key != AttributeKind::Note || !block.fields.is_empty());
    blocks
}

/// Format a string for YAML (quote if necessary).
fn yaml_string(value: &str) -> String {
    if needs_quoting(value) {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t");
        format!("\"{}\"", escaped)
    } else {
        value.to_string()
    }
}

fn needs_quoting(value: &str) -> bool {
    const SPECIAL: &[char] = &[
        ':', '#', '[', ']', '{', '}', '|', '>', '&', '*', '!', '?', '\'', '"', '%', '@', '`', '\n',
        '\r', '\t', '\\',
    ];

    value.is_empty()
        || value.contains(SPECIAL)
        || value.starts_with([' ', '-', ',', '.'])
        || value.ends_with(' ')
        || value.starts_with('+')
        || value.starts_with("0x")
        || value.starts_with("0o")
        || value.starts_with("0b")
        || is_yaml_keyword(value)
        || !reads_back_unchanged(value)
}

/// Check that a plain scalar parses back as the same string.
fn reads_back_unchanged(s: &str) -> bool {
    matches!(serde_yaml::from_str::<Value>(s), Ok(Value::String(parsed)) if parsed == s)
}

/// Check if a string is a YAML keyword.
fn is_yaml_keyword(s: &str) -> bool {
    matches!(
        s.to_lowercase().as_str(),
        "true" | "false" | "null" | "~" | "yes" | "no" | "on" | "off" | "y" | "n"
    )
}
