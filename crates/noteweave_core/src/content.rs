//! Editor-facing item shape with explicit classification flags.
//!
//! The editor layer works on [`Content`], a flat record that stores the
//! `has_*_attributes` flags the core otherwise derives. It is only an
//! adapter: the core never reads the flags except when converting back,
//! and `content_to_item(item_to_content(item)) == item` for every item.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::attributes::toggle_attribute;
use crate::error::Result;
use crate::item::{AttributeKind, EventAttributes, Item, MailAttributes, TaskAttributes};

/// Flat, flag-laden item representation exchanged with the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Item id
    pub id: String,
    /// Item title
    pub title: String,
    /// Markdown body
    pub content: String,
    /// Creation time
    #[ts(type = "string")]
    pub created_at: DateTime<Local>,
    /// Last modification time
    #[ts(type = "string")]
    pub updated_at: DateTime<Local>,
    /// Tags, deduplicated
    #[serde(default)]
    pub tags: Vec<String>,

    /// Set when no other attribute flag is
    pub has_note_attributes: bool,
    /// A task set is attached
    #[serde(default)]
    pub has_task_attributes: bool,
    /// An event set is attached
    #[serde(default)]
    pub has_event_attributes: bool,
    /// A mail set is attached
    #[serde(default)]
    pub has_mail_attributes: bool,

    // Task
    /// Completion state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,

    // Event
    /// Event start day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub date: Option<DateTime<Local>>,
    /// Event end day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub end_date: Option<DateTime<Local>>,
    /// Event location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    // Mail
    /// Sender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Recipients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Vec<String>>,
    /// Subject line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Attachment names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
}

impl Content {
    /// Whether the stored note flag agrees with the other flags.
    pub fn flags_consistent(&self) -> bool {
        self.has_note_attributes
            == !(self.has_task_attributes || self.has_event_attributes || self.has_mail_attributes)
    }

    /// Parse from the editor's JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to the editor's JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Flatten an item, materializing the derived flags.
pub fn item_to_content(item: &Item) -> Content {
    let task = item.task.as_ref();
    let event = item.event.as_ref();
    let mail = item.mail.as_ref();

    Content {
        id: item.id.clone(),
        title: item.title.clone(),
        content: item.content.clone(),
        created_at: item.created_at,
        updated_at: item.updated_at,
        tags: item.tags.clone(),
        has_note_attributes: item.has_note_attributes(),
        has_task_attributes: item.has_task_attributes(),
        has_event_attributes: item.has_event_attributes(),
        has_mail_attributes: item.has_mail_attributes(),
        done: task.map(|t| t.done),
        date: event.map(|e| e.date),
        end_date: event.and_then(|e| e.end_date),
        location: event.and_then(|e| e.location.clone()),
        from: mail.and_then(|m| m.from.clone()),
        to: mail.map(|m| m.to.clone()),
        subject: mail.and_then(|m| m.subject.clone()),
        attachments: mail.map(|m| m.attachments.clone()),
    }
}

/// Rebuild an item from the flat shape.
///
/// A set is attached only when its flag is set; fields of unflagged sets
/// are dropped. An event flag without a date cannot be represented and is
/// dropped as well. `has_note_attributes` is ignored: note-ness follows
/// from the other sets.
pub fn content_to_item(content: &Content) -> Item {
    let task = content.has_task_attributes.then(|| TaskAttributes {
        done: content.done.unwrap_or(false),
    });

    let event = if content.has_event_attributes {
        match content.date {
            Some(date) => Some(EventAttributes {
                date,
                end_date: content.end_date,
                location: content.location.clone(),
            }),
            None => {
                log::debug!("Dropping dateless event attributes on '{}'", content.id);
                None
            }
        }
    } else {
        None
    };

    let mail = content.has_mail_attributes.then(|| MailAttributes {
        from: content.from.clone(),
        to: content.to.clone().unwrap_or_default(),
        subject: content.subject.clone(),
        attachments: content.attachments.clone().unwrap_or_default(),
    });

    Item {
        id: content.id.clone(),
        title: content.title.clone(),
        content: content.content.clone(),
        created_at: content.created_at,
        updated_at: content.updated_at,
        tags: content.tags.clone(),
        task,
        event,
        mail,
    }
}

/// Toggle an attribute set on the editor shape, recomputing every flag.
pub fn toggle_content_attribute(content: &Content, kind: AttributeKind) -> Content {
    item_to_content(&toggle_attribute(content_to_item(content), kind))
}
