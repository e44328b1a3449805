//! Export module - render items as Markdown files
//!
//! Produces `(filename, contents)` pairs for the caller to write wherever
//! it keeps documents (a download, a directory, a sync target).

use std::collections::HashSet;

use serde::Serialize;

use crate::item::{Item, slugify};
use crate::yaml::format_with_yaml;

/// A rendered document ready to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedFile {
    /// `<slug>.md`, unique within one export
    pub filename: String,
    /// Front matter and body
    pub contents: String,
    /// Id of the exported item
    pub id: String,
}

/// Render every item, giving each a distinct filename.
///
/// Filename collisions get `-2`, `-3`, ... suffixes in input order.
pub fn export_items(items: &[Item]) -> Vec<ExportedFile> {
    let mut used = HashSet::new();

    items
        .iter()
        .map(|item| {
            let base = slugify(&item.title);
            let mut filename = format!("{}.md", base);
            let mut n = 2;
            while !used.insert(filename.clone()) {
                filename = format!("{}-{}.md", base, n);
                n += 1;
            }

            ExportedFile {
                filename,
                contents: format_with_yaml(item),
                id: item.id.clone(),
            }
        })
        .collect()
}

/// Remove an item from a caller-owned collection.
///
/// Returns the removed item, or `None` if no item has that id.
pub fn remove_item(items: &mut Vec<Item>, id: &str) -> Option<Item> {
    let index = items.iter().position(|item| item.id == id)?;
    log::debug!("Removing item '{}'", id);
    Some(items.remove(index))
}
