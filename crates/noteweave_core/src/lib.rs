#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Attribute classification and toggling
pub mod attributes;

/// Editor-facing item shape with explicit flags
pub mod content;

/// Configuration options
pub mod config;

/// Date parsing
pub mod date;

/// Error (common error types)
pub mod error;

/// Export (render items as Markdown files)
pub mod export;

/// Front matter splitting and metadata access
pub mod frontmatter;

/// Import (documents to items)
pub mod import;

/// Item data model
pub mod item;

/// Wikilink resolution and back-references
pub mod links;

/// Search (filter items by text, type or tag)
pub mod search;

/// YAML front matter serialization
pub mod yaml;

pub use attributes::{primary_type, toggle_attribute};
pub use content::{Content, content_to_item, item_to_content};
pub use error::{NoteweaveError, Result};
pub use import::parse_content;
pub use item::{AttributeKind, Item};
pub use links::{process_content_links, resolve_links};
pub use yaml::{format_with_yaml, generate_yaml};
