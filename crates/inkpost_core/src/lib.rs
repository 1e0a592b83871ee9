//! Content core for the inkpost blogging engine.
//! This crate is the single source of truth for content invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod routes;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId, CATEGORY_NAME_MAX_CHARS};
pub use model::post::{
    AuthorId, Post, PostId, POST_EXCERPT_MAX_CHARS, POST_TITLE_MAX_CHARS,
};
pub use model::tag::{Tag, TagId, TAG_NAME_MAX_CHARS};
pub use model::{Labeled, ValidationError};
pub use repo::post_repo::{
    NewPost, PostListQuery, PostPatch, PostRepository, SqlitePostRepository,
};
pub use repo::taxonomy_repo::{SqliteTaxonomyRepository, TaxonomyRepository};
pub use repo::{RepoError, RepoResult};
pub use routes::{post_detail_path, RouteConfig};
pub use service::post_service::{
    derive_excerpt, PostDraft, PostRevision, PostService, PostServiceError, PostsListResult,
};
pub use service::taxonomy_service::{TaxonomyService, TaxonomyServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
