//! Configuration types for noteweave.
//!
//! [`Config`] holds the knobs the content core consults while parsing
//! documents and resolving links. The surrounding application owns where
//! the configuration lives; this module only converts it to and from TOML.
//!
//! # Key Configuration Fields
//!
//! - `accept_legacy_front_matter`: read documents that start with a bare
//!   `task:`/`event:`/`mail:`/`note:` block
//! - `match_titles`: resolve `[[target]]` by item title as well as by id
//! - `link_scheme` / `broken_link_scheme`: link prefixes emitted by
//!   [`crate::links::process_content_links_with`]
//!
//! # Example
//!
//! ```
//! use noteweave_core::config::Config;
//!
//! let config = Config::from_toml_str("match_titles = false").unwrap();
//! assert!(!config.match_titles);
//! assert!(config.accept_legacy_front_matter);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default prefix for links to existing items
pub const DEFAULT_LINK_SCHEME: &str = "item:";

/// Default prefix for links whose target does not exist
pub const DEFAULT_BROKEN_LINK_SCHEME: &str = "broken:";

/// `Config` represents the parts of the content core the user can configure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Read documents written before the `---` delimited convention
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub accept_legacy_front_matter: bool,

    /// Match wikilink targets against item titles after ids
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub match_titles: bool,

    /// Prefix for resolved links, followed by the item id
    #[serde(
        default = "default_link_scheme",
        skip_serializing_if = "is_default_link_scheme"
    )]
    pub link_scheme: String,

    /// Prefix for unresolved links, followed by the raw target
    #[serde(
        default = "default_broken_link_scheme",
        skip_serializing_if = "is_default_broken_link_scheme"
    )]
    pub broken_link_scheme: String,
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn default_link_scheme() -> String {
    DEFAULT_LINK_SCHEME.to_string()
}

fn is_default_link_scheme(value: &String) -> bool {
    value == DEFAULT_LINK_SCHEME
}

fn default_broken_link_scheme() -> String {
    DEFAULT_BROKEN_LINK_SCHEME.to_string()
}

fn is_default_broken_link_scheme(value: &String) -> bool {
    value == DEFAULT_BROKEN_LINK_SCHEME
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accept_legacy_front_matter: true,
            match_titles: true,
            link_scheme: default_link_scheme(),
            broken_link_scheme: default_broken_link_scheme(),
        }
    }
}

impl Config {
    /// Parse a config from TOML; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML, omitting values equal to the defaults.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
