//! Field rules for authors.
//!
//! Each rule is a pure function over one field. Creation runs all of them
//! plus the uniqueness read; a patch runs only the rules of the fields it
//! touches.

use once_cell::sync::Lazy;
use quill_db::Table;
use regex::Regex;

use super::models::{Author, AuthorPatch, NewAuthor};
use crate::validation::{required, ValidationError};

static PHONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone number pattern compiles"));

/// Read access to existing author names, used for the creation-time
/// uniqueness check.
///
/// The check is a point-in-time read and is not atomic with the insert that
/// follows; two concurrent creations may both pass it. The storage unique
/// index on `name` remains the authoritative guard.
pub trait NameLookup {
    fn name_exists(&self, name: &str) -> bool;
}

impl NameLookup for Table<Author> {
    fn name_exists(&self, name: &str) -> bool {
        self.exists("name", name)
    }
}

pub fn validate_name(name: Option<String>) -> Result<String, ValidationError> {
    required(name, ValidationError::NameRequired)
}

/// `None` is always valid.
pub fn validate_phone_number(
    phone_number: Option<String>,
) -> Result<Option<String>, ValidationError> {
    match phone_number {
        Some(number) if !PHONE_NUMBER.is_match(&number) => {
            Err(ValidationError::InvalidPhoneNumber)
        }
        other => Ok(other),
    }
}

/// Admit a new author: name presence, phone format, then name uniqueness.
pub fn validate_new(
    candidate: NewAuthor,
    names: &impl NameLookup,
) -> Result<Author, ValidationError> {
    let name = validate_name(candidate.name)?;
    let phone_number = validate_phone_number(candidate.phone_number)?;

    if names.name_exists(&name) {
        return Err(ValidationError::DuplicateName);
    }

    Ok(Author { name, phone_number })
}

/// Produce the author that results from `patch`, or the first violated rule.
/// `current` is never modified, so a rejected patch commits nothing.
///
/// Renames are not checked for uniqueness here; the storage index rejects
/// collisions on write.
pub fn apply_patch(current: &Author, patch: AuthorPatch) -> Result<Author, ValidationError> {
    let mut next = current.clone();
    if let Some(name) = patch.name {
        next.name = validate_name(name)?;
    }
    if let Some(phone_number) = patch.phone_number {
        next.phone_number = validate_phone_number(phone_number)?;
    }
    Ok(next)
}
