//! Custom-field payload decoding.
//!
//! Jira custom fields arrive in a handful of shapes: an object with a
//! `value`, an object with a `name`, a list of either, or a bare scalar.
//! Rather than sniffing properties at each use site, the payload is
//! decoded once at the boundary into a closed variant.

use serde::Deserialize;

/// A decoded custom-field payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// An option-style object carrying a `value`.
    Valued {
        /// The selected option's value.
        value: String,
    },
    /// A named object (users, versions, components).
    Named {
        /// The object's display name.
        name: String,
    },
    /// A multi-select: a list of further payloads.
    Many(Vec<FieldValue>),
    /// A bare string.
    Text(String),
    /// A bare number.
    Number(f64),
    /// A bare boolean.
    Bool(bool),
    /// Anything else, kept verbatim (including null).
    Other(serde_json::Value),
}

impl FieldValue {
    /// Render the payload as display text.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Valued { value } => value.clone(),
            Self::Named { name } => name.clone(),
            Self::Many(values) => values
                .iter()
                .map(Self::as_text)
                .collect::<Vec<_>>()
                .join(", "),
            Self::Text(text) => text.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Other(value) => value.to_string(),
        }
    }

    /// Whether the payload is a JSON null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Other(serde_json::Value::Null))
    }
}
