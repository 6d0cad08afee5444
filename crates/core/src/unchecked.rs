//! Field values taken from a document without coercion.
//!
//! Imported documents may carry anything in fields the validator does not
//! check. Such values are kept verbatim and written back unchanged; readers
//! only see the ones of the expected shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A field value as it appeared in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Unchecked<T> {
    /// Value of the expected shape
    Known(T),

    /// Anything else, kept exactly as read
    Raw(Value),
}

impl<T> Unchecked<T> {
    /// The value, if it has the expected shape.
    pub fn known(&self) -> Option<&T> {
        match self {
            Unchecked::Known(value) => Some(value),
            Unchecked::Raw(_) => None,
        }
    }

    /// Whether the value has the expected shape.
    pub fn is_known(&self) -> bool {
        matches!(self, Unchecked::Known(_))
    }
}

impl<T: Copy> Unchecked<T> {
    /// Copy of the value, if it has the expected shape.
    pub fn get(&self) -> Option<T> {
        self.known().copied()
    }
}

impl<T> From<T> for Unchecked<T> {
    fn from(value: T) -> Self {
        Unchecked::Known(value)
    }
}

impl<T: Default> Default for Unchecked<T> {
    fn default() -> Self {
        Unchecked::Known(T::default())
    }
}

/// Deserialize an optional field so that an explicit `null` is kept rather
/// than read as absent.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Unchecked<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Unchecked::deserialize(deserializer).map(Some)
}
