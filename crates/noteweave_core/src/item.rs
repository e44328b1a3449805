//! The canonical item record and its attribute sets.
//!
//! An [`Item`] is a base record (id, title, body, timestamps, tags) plus up
//! to three independently attachable attribute sets: [`TaskAttributes`],
//! [`EventAttributes`] and [`MailAttributes`]. Presence of a set is its
//! classification; note-ness is derived and never stored.
//!
//! Mutations return a new `Item` with `updated_at` refreshed.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::NoteweaveError;

/// Maximum slug length used in generated ids and filenames.
pub const MAX_SLUG_LEN: usize = 50;

/// Length of the random suffix in generated ids.
const ID_SUFFIX_LEN: usize = 8;

/// One of the four item classifications.
///
/// `Note` is never attached; it describes an item with no other set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    /// Plain note, derived when nothing else is attached
    Note,
    /// Something to get done
    Task,
    /// Something happening on a date
    Event,
    /// A message with sender and recipients
    Mail,
}

impl AttributeKind {
    /// All kinds, in front matter emission order.
    pub const ALL: [AttributeKind; 4] = [
        AttributeKind::Task,
        AttributeKind::Event,
        AttributeKind::Mail,
        AttributeKind::Note,
    ];

    /// The YAML key for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Note => "note",
            AttributeKind::Task => "task",
            AttributeKind::Event => "event",
            AttributeKind::Mail => "mail",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeKind {
    type Err = NoteweaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "note" => Ok(AttributeKind::Note),
            "task" => Ok(AttributeKind::Task),
            "event" => Ok(AttributeKind::Event),
            "mail" => Ok(AttributeKind::Mail),
            _ => Err(NoteweaveError::UnknownAttribute(s.to_string())),
        }
    }
}

/// Task attribute set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskAttributes {
    /// Whether the task is complete
    pub done: bool,
}

/// Event attribute set. Events are date-granular.
#[derive(Debug, Clone, PartialEq)]
pub struct EventAttributes {
    /// Day the event starts
    pub date: DateTime<Local>,
    /// Day the event ends, for multi-day events
    pub end_date: Option<DateTime<Local>>,
    /// Where it happens
    pub location: Option<String>,
}

impl EventAttributes {
    /// An event on the given date with no end date or location.
    pub fn on(date: DateTime<Local>) -> Self {
        Self {
            date,
            end_date: None,
            location: None,
        }
    }
}

/// Mail attribute set.
///
/// `from: None` and an empty `to` are both "unset"; the set is still
/// present as long as the struct is attached to an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailAttributes {
    /// Sender address
    pub from: Option<String>,
    /// Recipient addresses
    pub to: Vec<String>,
    /// Subject line
    pub subject: Option<String>,
    /// Attachment names or paths
    pub attachments: Vec<String>,
}

/// A single user-authored unit of content.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Stable identifier, see [`generate_id`]
    pub id: String,
    /// Display title, also matched by `[[Title]]` links
    pub title: String,
    /// Markdown body, possibly containing `[[target]]` links
    pub content: String,
    /// When the item was created
    pub created_at: DateTime<Local>,
    /// Refreshed by every mutation
    pub updated_at: DateTime<Local>,
    /// Semantically a set; insertion order is kept for display
    pub tags: Vec<String>,
    /// Task attributes, if attached
    pub task: Option<TaskAttributes>,
    /// Event attributes, if attached
    pub event: Option<EventAttributes>,
    /// Mail attributes, if attached
    pub mail: Option<MailAttributes>,
}

impl Item {
    /// Create a note with a freshly generated id.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let title = title.into();
        let now = Local::now();
        Self {
            id: generate_id(AttributeKind::Note, &title),
            title,
            content: content.into(),
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
            task: None,
            event: None,
            mail: None,
        }
    }

    /// Whether a task set is attached.
    pub fn has_task_attributes(&self) -> bool {
        self.task.is_some()
    }

    /// Whether an event set is attached.
    pub fn has_event_attributes(&self) -> bool {
        self.event.is_some()
    }

    /// Whether a mail set is attached, with or without addresses.
    pub fn has_mail_attributes(&self) -> bool {
        self.mail.is_some()
    }

    /// True exactly when no other attribute set is attached.
    pub fn has_note_attributes(&self) -> bool {
        !self.has_task_attributes() && !self.has_event_attributes() && !self.has_mail_attributes()
    }

    /// Whether the item is classified as `kind`.
    pub fn has_attributes(&self, kind: AttributeKind) -> bool {
        match kind {
            AttributeKind::Note => self.has_note_attributes(),
            AttributeKind::Task => self.has_task_attributes(),
            AttributeKind::Event => self.has_event_attributes(),
            AttributeKind::Mail => self.has_mail_attributes(),
        }
    }

    /// Whether the item carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    fn touched(mut self) -> Self {
        self.updated_at = Local::now();
        self
    }

    /// Replace the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self.touched()
    }

    /// Replace the body.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self.touched()
    }

    /// Add a tag unless it is already present.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into().trim().to_string();
        if !tag.is_empty() && !self.has_tag(&tag) {
            self.tags.push(tag);
        }
        self.touched()
    }

    /// Remove a tag if present.
    pub fn without_tag(mut self, tag: &str) -> Self {
        self.tags.retain(|t| t != tag);
        self.touched()
    }

    /// Set the checkbox state, attaching task attributes if needed.
    pub fn with_done(mut self, done: bool) -> Self {
        self.task = Some(TaskAttributes { done });
        self.touched()
    }

    /// Set the event date, attaching event attributes if needed.
    pub fn with_event_date(mut self, date: DateTime<Local>) -> Self {
        match self.event.as_mut() {
            Some(event) => event.date = date,
            None => self.event = Some(EventAttributes::on(date)),
        }
        self.touched()
    }

    /// Set or clear the location of an existing event.
    ///
    /// Has no effect on items without event attributes beyond the
    /// timestamp refresh.
    pub fn with_location(mut self, location: Option<String>) -> Self {
        if let Some(event) = self.event.as_mut() {
            event.location = location.map(|l| l.trim().to_string()).filter(|l| !l.is_empty());
        }
        self.touched()
    }

    /// Set the sender, attaching mail attributes if needed.
    pub fn with_mail_from(mut self, from: impl Into<String>) -> Self {
        let from = from.into().trim().to_string();
        self.mail.get_or_insert_with(MailAttributes::default).from = Some(from);
        self.touched()
    }

    /// Replace the recipients, attaching mail attributes if needed.
    pub fn with_mail_to(mut self, to: Vec<String>) -> Self {
        self.mail.get_or_insert_with(MailAttributes::default).to = to
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        self.touched()
    }
}

/// Lowercase URL-safe slug of a title.
///
/// Runs of non-alphanumeric characters become a single `-`; the result is
/// capped at [`MAX_SLUG_LEN`] characters and is `untitled` when empty.
///
/// ```
/// use noteweave_core::item::slugify;
///
/// assert_eq!(slugify("Buy milk & eggs!"), "buy-milk-eggs");
/// assert_eq!(slugify("  "), "untitled");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// Generate a unique id of the form `<kind>-<slug>-<random8>`.
pub fn generate_id(kind: AttributeKind, title: &str) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", kind, slugify(title), &random[..ID_SUFFIX_LEN])
}
