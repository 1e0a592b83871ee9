//! Tag domain record.
//!
//! Tags are free-form multi-valued labels. A tag may exist without being
//! attached to any post, and attachment order is irrelevant.

use serde::{Deserialize, Serialize};

use super::{Labeled, ValidationError};

/// Stable system-assigned tag identifier.
pub type TagId = i64;

/// Maximum tag name length in characters.
pub const TAG_NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

impl Tag {
    /// Checks a name against the tag length limit.
    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        let chars = name.chars().count();
        if chars > TAG_NAME_MAX_CHARS {
            return Err(ValidationError::TagNameTooLong { chars });
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        Self::validate_name(&self.name)
    }
}

impl Labeled for Tag {
    fn label(&self) -> &str {
        &self.name
    }
}
