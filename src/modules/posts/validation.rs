//! Field rules for posts, and the one cross-field rule tying a short body to
//! a clickbait title.

use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{Category, NewPost, Post, PostPatch};
use crate::validation::{char_len, required, ValidationError};

pub const MIN_CONTENT_CHARS: usize = 250;
pub const MAX_SUMMARY_CHARS: usize = 250;

static CLICKBAIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:why|top|secret)").expect("clickbait pattern compiles"));

/// Case-insensitive prefix match against "Why", "Top" and "Secret".
pub fn is_clickbait(title: &str) -> bool {
    CLICKBAIT.is_match(title)
}

/// Presence, then clickbait.
pub fn validate_title(title: Option<String>) -> Result<String, ValidationError> {
    let title = required(title, ValidationError::TitleRequired)?;
    if is_clickbait(&title) {
        return Err(ValidationError::ClickbaitTitle);
    }
    Ok(title)
}

pub fn validate_content(content: Option<String>) -> Result<Option<String>, ValidationError> {
    match content {
        Some(body) if char_len(&body) < MIN_CONTENT_CHARS => Err(ValidationError::ContentTooShort),
        other => Ok(other),
    }
}

/// Creation-time rule: when content is present but short, a clickbait title
/// is reported instead of the length. Absent or long enough content passes.
pub fn validate_content_for_title(title: &str, content: Option<&str>) -> Result<(), ValidationError> {
    match content {
        Some(body) if char_len(body) < MIN_CONTENT_CHARS => {
            if is_clickbait(title) {
                Err(ValidationError::ClickbaitTitle)
            } else {
                Err(ValidationError::ContentTooShort)
            }
        }
        _ => Ok(()),
    }
}

/// Absent and empty categories are invalid like any other unknown value.
pub fn validate_category(category: Option<String>) -> Result<Category, ValidationError> {
    category
        .as_deref()
        .ok_or(ValidationError::InvalidCategory)?
        .parse()
}

pub fn validate_summary(summary: Option<String>) -> Result<Option<String>, ValidationError> {
    match summary {
        Some(text) if char_len(&text) > MAX_SUMMARY_CHARS => Err(ValidationError::SummaryTooLong),
        other => Ok(other),
    }
}

/// Admit a new post, reporting the first violated rule in this order: title
/// presence, content length (with the clickbait preference), category,
/// summary, and finally the title's own clickbait rule.
pub fn validate_new(candidate: NewPost) -> Result<Post, ValidationError> {
    let title = required(candidate.title, ValidationError::TitleRequired)?;
    validate_content_for_title(&title, candidate.content.as_deref())?;
    let category = validate_category(candidate.category)?;
    let summary = validate_summary(candidate.summary)?;

    let title = validate_title(Some(title))?;
    let content = validate_content(candidate.content)?;

    Ok(Post {
        title,
        content,
        category,
        summary,
    })
}

/// Produce the post that results from `patch`. Only the rules of present
/// fields run, in field order; there is no cross-field rule on this path.
pub fn apply_patch(current: &Post, patch: PostPatch) -> Result<Post, ValidationError> {
    let mut next = current.clone();
    if let Some(title) = patch.title {
        next.title = validate_title(title)?;
    }
    if let Some(content) = patch.content {
        next.content = validate_content(content)?;
    }
    if let Some(category) = patch.category {
        next.category = validate_category(category)?;
    }
    if let Some(summary) = patch.summary {
        next.summary = validate_summary(summary)?;
    }
    Ok(next)
}
