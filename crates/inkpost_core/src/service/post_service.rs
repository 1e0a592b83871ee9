//! Post use-case service.
//!
//! # Responsibility
//! - Provide post create/update/get/list/delete APIs over draft inputs.
//! - Enforce the required-reference contract before persistence.
//! - Derive excerpts from markdown bodies when the draft omits one.
//! - Resolve the canonical address of a persisted post.
//!
//! # Invariants
//! - A draft without exactly one category and one author never reaches
//!   the repository.
//! - Updates use full content replacement semantics.
//! - Post list is always sorted by `updated_at DESC, id ASC`.

use std::error::Error;
use std::fmt::{Display, Formatter};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::category::CategoryId;
use crate::model::post::{AuthorId, Post, PostId, POST_EXCERPT_MAX_CHARS};
use crate::model::tag::TagId;
use crate::model::ValidationError;
use crate::repo::post_repo::{
    normalize_post_limit, NewPost, PostListQuery, PostPatch, PostRepository,
};
use crate::repo::{RepoError, RepoResult};
use crate::routes::{post_detail_path, RouteConfig};

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Service error for post use-cases.
#[derive(Debug)]
pub enum PostServiceError {
    /// A field violates its length/required/uniqueness constraint.
    Validation(ValidationError),
    /// Target post does not exist.
    PostNotFound(PostId),
    /// The referenced category does not resolve to a persisted record.
    UnknownCategory(CategoryId),
    /// A referenced tag does not resolve to a persisted record.
    UnknownTag(TagId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for PostServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::UnknownCategory(id) => write!(f, "unknown category reference: {id}"),
            Self::UnknownTag(id) => write!(f, "unknown tag reference: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent post state: {details}"),
        }
    }
}

impl Error for PostServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PostServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::PostNotFound(id) => Self::PostNotFound(id),
            RepoError::CategoryNotFound(id) => Self::UnknownCategory(id),
            RepoError::TagNotFound(id) => Self::UnknownTag(id),
            other => Self::Repo(other),
        }
    }
}

/// Input for creating a post.
///
/// `category` and `author` are optional only so that their absence can be
/// rejected with a semantic validation error; a persisted post always has
/// both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    /// Stored verbatim when present; derived from `body` when `None`.
    pub excerpt: Option<String>,
    pub category: Option<CategoryId>,
    pub author: Option<AuthorId>,
    /// Tag references; duplicates are rejected, empty is fine.
    pub tags: Vec<TagId>,
}

/// Input for updating a post. Full replacement; authorship is immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRevision {
    pub title: String,
    pub body: String,
    /// Stored verbatim when present; re-derived from `body` when `None`.
    pub excerpt: Option<String>,
    pub category: Option<CategoryId>,
}

/// List result envelope used by service callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostsListResult {
    /// List items sorted by `updated_at DESC, id ASC`.
    pub items: Vec<Post>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
}

/// Post service facade over repository implementations.
pub struct PostService<R: PostRepository> {
    repo: R,
    routes: RouteConfig,
}

impl<R: PostRepository> PostService<R> {
    /// Creates a service using the provided repository and default routes.
    pub fn new(repo: R) -> Self {
        Self::with_routes(repo, RouteConfig::default())
    }

    /// Creates a service with an explicit routing configuration.
    pub fn with_routes(repo: R, routes: RouteConfig) -> Self {
        Self { repo, routes }
    }

    /// Creates one post from a draft.
    pub fn create_post(&mut self, draft: PostDraft) -> Result<Post, PostServiceError> {
        let category_id = draft
            .category
            .ok_or(PostServiceError::Validation(ValidationError::MissingCategory))?;
        let author_id = draft
            .author
            .ok_or(PostServiceError::Validation(ValidationError::MissingAuthor))?;
        let excerpt = resolve_excerpt(draft.excerpt, &draft.body);

        let new_post = NewPost {
            title: draft.title,
            body: draft.body,
            excerpt,
            category_id,
            author_id,
            tags: draft.tags,
        };
        let id = self.repo.create_post(&new_post)?;
        self.repo
            .get_post(id)?
            .ok_or(PostServiceError::InconsistentState(
                "created post not found in read-back",
            ))
    }

    /// Replaces post content fully; `created_at` and authorship stay fixed.
    pub fn update_post(
        &mut self,
        id: PostId,
        revision: PostRevision,
    ) -> Result<Post, PostServiceError> {
        let category_id = revision
            .category
            .ok_or(PostServiceError::Validation(ValidationError::MissingCategory))?;
        let excerpt = resolve_excerpt(revision.excerpt, &revision.body);

        let patch = PostPatch {
            title: revision.title,
            body: revision.body,
            excerpt,
            category_id,
        };
        self.repo.update_post(id, &patch)?;
        self.repo
            .get_post(id)?
            .ok_or(PostServiceError::InconsistentState(
                "updated post not found in read-back",
            ))
    }

    /// Gets one post by stable id.
    pub fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        self.repo.get_post(id)
    }

    /// Lists posts using optional category/tag filters and pagination.
    pub fn list_posts(
        &self,
        category: Option<CategoryId>,
        tag: Option<TagId>,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<PostsListResult, PostServiceError> {
        let applied_limit = normalize_post_limit(limit);
        let query = PostListQuery {
            category,
            tag,
            limit: Some(applied_limit),
            offset,
        };
        let items = self.repo.list_posts(&query)?;
        Ok(PostsListResult {
            items,
            applied_limit,
        })
    }

    /// Atomically replaces the full tag set for one post.
    pub fn set_post_tags(
        &mut self,
        id: PostId,
        tags: Vec<TagId>,
    ) -> Result<Post, PostServiceError> {
        self.repo.set_post_tags(id, &tags)?;
        self.repo
            .get_post(id)?
            .ok_or(PostServiceError::InconsistentState(
                "post missing after tag replacement",
            ))
    }

    /// Attaches one tag to a post. Idempotent: attaching a tag the post
    /// already carries leaves the set unchanged.
    pub fn add_post_tag(&mut self, id: PostId, tag_id: TagId) -> Result<Post, PostServiceError> {
        self.repo.add_post_tag(id, tag_id)?;
        self.repo
            .get_post(id)?
            .ok_or(PostServiceError::InconsistentState(
                "post missing after tag attach",
            ))
    }

    /// Detaches one tag from a post. Idempotent.
    pub fn remove_post_tag(
        &mut self,
        id: PostId,
        tag_id: TagId,
    ) -> Result<Post, PostServiceError> {
        self.repo.remove_post_tag(id, tag_id)?;
        self.repo
            .get_post(id)?
            .ok_or(PostServiceError::InconsistentState(
                "post missing after tag detach",
            ))
    }

    /// Hard-deletes one post.
    pub fn delete_post(&self, id: PostId) -> Result<(), PostServiceError> {
        self.repo.delete_post(id)?;
        Ok(())
    }

    /// Resolves the canonical routable address of a persisted post.
    ///
    /// Pure function of the post's identity; fails with `PostNotFound` when
    /// the id does not correspond to a persisted post.
    pub fn canonical_path(&self, id: PostId) -> Result<String, PostServiceError> {
        if self.repo.get_post(id)?.is_none() {
            return Err(PostServiceError::PostNotFound(id));
        }
        Ok(post_detail_path(&self.routes, id))
    }
}

fn resolve_excerpt(explicit: Option<String>, body: &str) -> String {
    match explicit {
        Some(excerpt) => excerpt,
        None => derive_excerpt(body),
    }
}

/// Derives an excerpt from a markdown body.
///
/// Rules:
/// - markdown images dropped, links reduced to their text;
/// - markdown symbols removed, whitespace normalized;
/// - first [`POST_EXCERPT_MAX_CHARS`] chars retained.
pub fn derive_excerpt(body: &str) -> String {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(body, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    normalized.trim().chars().take(POST_EXCERPT_MAX_CHARS).collect()
}
