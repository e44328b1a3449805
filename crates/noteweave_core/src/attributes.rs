//! Attribute classification and toggling.
//!
//! Task, event and mail attribute sets attach independently and may
//! coexist. An item with none of them is a note; that classification is
//! recomputed from the sets on every read, so removing the last set turns
//! the item back into a note without any bookkeeping.

use chrono::Local;

use crate::item::{AttributeKind, EventAttributes, Item, MailAttributes, TaskAttributes};

/// Display precedence when several sets are active.
const PRECEDENCE: [AttributeKind; 3] = [
    AttributeKind::Task,
    AttributeKind::Event,
    AttributeKind::Mail,
];

/// The single classification used for icons and colors.
///
/// Precedence is task, then event, then mail, then note.
///
/// ```
/// use noteweave_core::attributes::{primary_type, toggle_attribute};
/// use noteweave_core::item::{AttributeKind, Item};
///
/// let item = Item::new("Standup", "");
/// assert_eq!(primary_type(&item), AttributeKind::Note);
///
/// let item = toggle_attribute(toggle_attribute(item, AttributeKind::Event), AttributeKind::Task);
/// assert_eq!(primary_type(&item), AttributeKind::Task);
/// ```
pub fn primary_type(item: &Item) -> AttributeKind {
    PRECEDENCE
        .into_iter()
        .find(|kind| item.has_attributes(*kind))
        .unwrap_or(AttributeKind::Note)
}

/// Every active classification, in precedence order.
///
/// Contains exactly `[Note]` when no attribute set is attached.
pub fn active_attributes(item: &Item) -> Vec<AttributeKind> {
    let active: Vec<_> = PRECEDENCE
        .into_iter()
        .filter(|kind| item.has_attributes(*kind))
        .collect();
    if active.is_empty() {
        vec![AttributeKind::Note]
    } else {
        active
    }
}

/// Attach or detach an attribute set.
///
/// Attaching uses defaults: `done = false` for tasks, today for events,
/// unset sender and recipients for mail. Detaching removes every field of
/// the set. Toggling `Note` returns the item unchanged.
pub fn toggle_attribute(mut item: Item, kind: AttributeKind) -> Item {
    match kind {
        AttributeKind::Note => {
            log::debug!("Ignoring note toggle on '{}'", item.id);
            return item;
        }
        AttributeKind::Task => {
            item.task = match item.task {
                Some(_) => None,
                None => Some(TaskAttributes::default()),
            };
        }
        AttributeKind::Event => {
            item.event = match item.event {
                Some(_) => None,
                None => Some(EventAttributes::on(Local::now())),
            };
        }
        AttributeKind::Mail => {
            item.mail = match item.mail {
                Some(_) => None,
                None => Some(MailAttributes {
                    from: Some(String::new()),
                    ..MailAttributes::default()
                }),
            };
        }
    }
    item.updated_at = Local::now();
    item
}
