//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for blog content.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce model validation before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Repository APIs return semantic errors (`PostNotFound`,
//!   `CategoryInUse`) in addition to DB transport errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::db::DbError;
use crate::model::category::CategoryId;
use crate::model::post::PostId;
use crate::model::tag::TagId;
use crate::model::ValidationError;

pub mod post_repo;
pub mod taxonomy_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence and query error for blog content repositories.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// A category reference did not resolve to a persisted row.
    CategoryNotFound(CategoryId),
    /// A tag reference did not resolve to a persisted row.
    TagNotFound(TagId),
    /// A post reference did not resolve to a persisted row.
    PostNotFound(PostId),
    /// The category is still referenced by at least one post.
    CategoryInUse(CategoryId),
    /// Persisted state violates a model invariant.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::CategoryInUse(id) => {
                write!(f, "category {id} is still referenced by posts")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
