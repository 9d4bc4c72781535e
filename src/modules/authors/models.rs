use quill_db::Record;
use serde::{Deserialize, Serialize};

use crate::utils::present;

/// Candidate field values for a new author, as received from a caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAuthor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// An admitted author's fields. Identity and timestamps live on the
/// storage row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Unique across all authors; never blank.
    pub name: String,
    /// Exactly ten ASCII digits when set.
    pub phone_number: Option<String>,
}

impl Record for Author {
    const TABLE: &'static str = "authors";
    const UNIQUE: &'static [&'static str] = &["name"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "phone_number" => self.phone_number.as_deref(),
            _ => None,
        }
    }
}

/// A field-level mutation. An absent key leaves the field alone; an
/// explicit `null` sets it to null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub phone_number: Option<Option<String>>,
}
