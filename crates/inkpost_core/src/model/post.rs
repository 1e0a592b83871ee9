//! Post domain record.
//!
//! # Responsibility
//! - Define the canonical shape of a persisted post.
//! - Enforce the post invariants: length limits, timestamp ordering,
//!   required author identity, duplicate-free tag set.
//!
//! # Invariants
//! - `id` is stable and never reused for another post.
//! - `created_at` is set once at creation and immutable afterwards.
//! - `updated_at >= created_at` at all times.
//! - `tags` is sorted ascending and holds no duplicates.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::CategoryId;
use super::tag::TagId;
use super::{Labeled, ValidationError};

/// Stable system-assigned post identifier.
pub type PostId = i64;

/// Opaque identity of the external user credited with a post.
///
/// The identity subsystem owns the user record; this crate only stores and
/// compares the id.
pub type AuthorId = Uuid;

/// Maximum post title length in characters.
pub const POST_TITLE_MAX_CHARS: usize = 70;

/// Maximum post excerpt length in characters. The excerpt may be empty.
pub const POST_EXCERPT_MAX_CHARS: usize = 200;

/// Canonical persisted post.
///
/// Wire field names follow the external schema: timestamps serialize as
/// `created_time` / `modified_time`, references as `category` / `author`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPost")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    /// Unbounded body text, stored verbatim.
    pub body: String,
    /// May be empty; never longer than [`POST_EXCERPT_MAX_CHARS`].
    pub excerpt: String,
    #[serde(rename = "category")]
    pub category_id: CategoryId,
    #[serde(rename = "author")]
    pub author_id: AuthorId,
    /// Unix epoch milliseconds, assigned at creation.
    #[serde(rename = "created_time")]
    pub created_at: i64,
    /// Unix epoch milliseconds, bumped on every content edit.
    #[serde(rename = "modified_time")]
    pub updated_at: i64,
    /// Tag references, sorted ascending, duplicate-free, possibly empty.
    pub tags: Vec<TagId>,
}

impl Post {
    /// Checks every post invariant that is expressible on the record alone.
    ///
    /// Reference resolution (does the category/tag row exist) is a
    /// persistence concern and lives in the repository layer.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_excerpt(&self.excerpt)?;
        validate_author(self.author_id)?;
        validate_tag_refs(&self.tags)?;
        if self.updated_at < self.created_at {
            return Err(ValidationError::TimestampOrder {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }
}

impl Labeled for Post {
    fn label(&self) -> &str {
        &self.title
    }
}

/// Checks a title against the post title length limit.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let chars = title.chars().count();
    if chars > POST_TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong { chars });
    }
    Ok(())
}

/// Checks an excerpt against the excerpt length limit. Empty is valid.
pub fn validate_excerpt(excerpt: &str) -> Result<(), ValidationError> {
    let chars = excerpt.chars().count();
    if chars > POST_EXCERPT_MAX_CHARS {
        return Err(ValidationError::ExcerptTooLong { chars });
    }
    Ok(())
}

/// Rejects the nil UUID as an author identity.
pub fn validate_author(author_id: AuthorId) -> Result<(), ValidationError> {
    if author_id.is_nil() {
        return Err(ValidationError::NilAuthor);
    }
    Ok(())
}

/// Rejects tag lists that reference the same tag more than once.
pub fn validate_tag_refs(tags: &[TagId]) -> Result<(), ValidationError> {
    let mut seen = BTreeSet::new();
    for tag_id in tags {
        if !seen.insert(*tag_id) {
            return Err(ValidationError::DuplicateTag(*tag_id));
        }
    }
    Ok(())
}

/// Wire shape used to validate posts on deserialization.
#[derive(Deserialize)]
struct RawPost {
    id: PostId,
    title: String,
    body: String,
    excerpt: String,
    category: CategoryId,
    author: AuthorId,
    created_time: i64,
    modified_time: i64,
    tags: Vec<TagId>,
}

impl TryFrom<RawPost> for Post {
    type Error = ValidationError;

    fn try_from(raw: RawPost) -> Result<Self, Self::Error> {
        let post = Post {
            id: raw.id,
            title: raw.title,
            body: raw.body,
            excerpt: raw.excerpt,
            category_id: raw.category,
            author_id: raw.author,
            created_at: raw.created_time,
            updated_at: raw.modified_time,
            tags: raw.tags,
        };
        post.validate()?;
        Ok(post)
    }
}
