//! Category/tag use-case service.
//!
//! # Responsibility
//! - Provide create/rename/get/list/delete APIs for the taxonomy entities.
//! - Surface the restrict-delete policy for categories still in use.
//!
//! # Invariants
//! - The only write constraint is the name length limit; any name content
//!   up to the limit is accepted.
//! - Writes return the persisted record read back from storage.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::category::{Category, CategoryId};
use crate::model::tag::{Tag, TagId};
use crate::model::ValidationError;
use crate::repo::taxonomy_repo::TaxonomyRepository;
use crate::repo::{RepoError, RepoResult};

/// Service error for taxonomy use-cases.
#[derive(Debug)]
pub enum TaxonomyServiceError {
    /// A name violates its length constraint.
    Validation(ValidationError),
    /// Target category does not exist.
    CategoryNotFound(CategoryId),
    /// Target tag does not exist.
    TagNotFound(TagId),
    /// The category is still referenced by posts and cannot be deleted.
    CategoryInUse(CategoryId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TaxonomyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::CategoryInUse(id) => {
                write!(f, "category {id} is still referenced by posts")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent taxonomy state: {details}")
            }
        }
    }
}

impl Error for TaxonomyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaxonomyServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            RepoError::TagNotFound(id) => Self::TagNotFound(id),
            RepoError::CategoryInUse(id) => Self::CategoryInUse(id),
            other => Self::Repo(other),
        }
    }
}

/// Taxonomy service facade over repository implementations.
pub struct TaxonomyService<R: TaxonomyRepository> {
    repo: R,
}

impl<R: TaxonomyRepository> TaxonomyService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a category from a name string.
    pub fn create_category(
        &self,
        name: impl Into<String>,
    ) -> Result<Category, TaxonomyServiceError> {
        let name = name.into();
        let id = self.repo.create_category(&name)?;
        self.repo
            .get_category(id)?
            .ok_or(TaxonomyServiceError::InconsistentState(
                "created category not found in read-back",
            ))
    }

    /// Replaces a category's name.
    pub fn rename_category(
        &self,
        id: CategoryId,
        name: impl Into<String>,
    ) -> Result<Category, TaxonomyServiceError> {
        self.repo.rename_category(id, &name.into())?;
        self.repo
            .get_category(id)?
            .ok_or(TaxonomyServiceError::InconsistentState(
                "renamed category not found in read-back",
            ))
    }

    pub fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.repo.get_category(id)
    }

    pub fn list_categories(&self) -> RepoResult<Vec<Category>> {
        self.repo.list_categories()
    }

    /// Deletes a category no post references.
    pub fn delete_category(&mut self, id: CategoryId) -> Result<(), TaxonomyServiceError> {
        self.repo.delete_category(id)?;
        Ok(())
    }

    /// Creates a tag from a name string.
    pub fn create_tag(&self, name: impl Into<String>) -> Result<Tag, TaxonomyServiceError> {
        let name = name.into();
        let id = self.repo.create_tag(&name)?;
        self.repo
            .get_tag(id)?
            .ok_or(TaxonomyServiceError::InconsistentState(
                "created tag not found in read-back",
            ))
    }

    /// Replaces a tag's name.
    pub fn rename_tag(
        &self,
        id: TagId,
        name: impl Into<String>,
    ) -> Result<Tag, TaxonomyServiceError> {
        self.repo.rename_tag(id, &name.into())?;
        self.repo
            .get_tag(id)?
            .ok_or(TaxonomyServiceError::InconsistentState(
                "renamed tag not found in read-back",
            ))
    }

    pub fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>> {
        self.repo.get_tag(id)
    }

    pub fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        self.repo.list_tags()
    }

    /// Deletes a tag, detaching it from every post that carries it.
    pub fn delete_tag(&self, id: TagId) -> Result<(), TaxonomyServiceError> {
        self.repo.delete_tag(id)?;
        Ok(())
    }
}
