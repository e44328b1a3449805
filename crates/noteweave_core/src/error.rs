use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

/// Unified error type for noteweave operations
#[derive(Debug, Error)]
pub enum NoteweaveError {
    // Front matter errors
    /// Metadata block is not valid YAML
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Document has no metadata block at all
    #[error("No front matter found in '{0}'")]
    NoFrontmatter(String),

    /// Metadata block was found but could not be read
    #[error("Invalid front matter in '{name}': {reason}")]
    InvalidFrontmatter {
        /// Document name
        name: String,
        /// Parser message
        reason: String,
    },

    // Date errors
    /// Date text is none of the accepted encodings
    #[error("Invalid date format: '{0}'. Expected 'YYYY-MM-DD' or epoch milliseconds")]
    InvalidDateFormat(String),

    // Attribute errors
    /// Attribute name is not note, task, event or mail
    #[error("Unknown attribute type '{0}'. Expected one of: note, task, event, mail")]
    UnknownAttribute(String),

    // Config errors
    /// Config TOML could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config could not be written as TOML
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    // Boundary (editor) errors
    /// Editor payload is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for noteweave operations
pub type Result<T> = std::result::Result<T, NoteweaveError>;

/// A serializable representation of NoteweaveError for the UI layer
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SerializableError {
    /// Error kind/variant name
    pub kind: String,
    /// Human-readable error message
    pub message: String,
    /// Name of the document involved (if applicable)
    pub document: Option<String>,
}

impl From<&NoteweaveError> for SerializableError {
    fn from(err: &NoteweaveError) -> Self {
        let kind = match err {
            NoteweaveError::Yaml(_) => "Yaml",
            NoteweaveError::NoFrontmatter(_) => "NoFrontmatter",
            NoteweaveError::InvalidFrontmatter { .. } => "InvalidFrontmatter",
            NoteweaveError::InvalidDateFormat(_) => "InvalidDateFormat",
            NoteweaveError::UnknownAttribute(_) => "UnknownAttribute",
            NoteweaveError::ConfigParse(_) => "ConfigParse",
            NoteweaveError::ConfigSerialize(_) => "ConfigSerialize",
            NoteweaveError::Json(_) => "Json",
        }
        .to_string();

        let document = match err {
            NoteweaveError::NoFrontmatter(name) => Some(name.clone()),
            NoteweaveError::InvalidFrontmatter { name, .. } => Some(name.clone()),
            _ => None,
        };

        Self {
            kind,
            message: err.to_string(),
            document,
        }
    }
}

impl From<NoteweaveError> for SerializableError {
    fn from(err: NoteweaveError) -> Self {
        SerializableError::from(&err)
    }
}

impl NoteweaveError {
    /// Convert to a serializable representation for the UI layer
    pub fn to_serializable(&self) -> SerializableError {
        SerializableError::from(self)
    }
}
