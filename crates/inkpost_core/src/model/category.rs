//! Category domain record.
//!
//! A category is a single-valued classification: every post belongs to
//! exactly one. Categories are created by editorial actors and referenced,
//! not owned, by posts.

use serde::{Deserialize, Serialize};

use super::{Labeled, ValidationError};

/// Stable system-assigned category identifier.
pub type CategoryId = i64;

/// Maximum category name length in characters.
pub const CATEGORY_NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    /// Checks a name against the category length limit.
    ///
    /// Length is the only constraint; any content up to the limit is valid.
    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        let chars = name.chars().count();
        if chars > CATEGORY_NAME_MAX_CHARS {
            return Err(ValidationError::CategoryNameTooLong { chars });
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        Self::validate_name(&self.name)
    }
}

impl Labeled for Category {
    fn label(&self) -> &str {
        &self.name
    }
}
