//! Canonical address resolution for posts.
//!
//! # Responsibility
//! - Turn a post identity into the routable path of its detail view.
//!
//! # Invariants
//! - The path shape is `<blog-prefix>/<post-id>/`.
//! - The prefix is explicit configuration; the external router owns its
//!   actual value.

use crate::model::post::PostId;

/// Routing configuration supplied by the embedding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    /// Path prefix under which post detail views are mounted.
    pub blog_prefix: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            blog_prefix: "/posts".to_string(),
        }
    }
}

/// Builds the detail-view path for a post id.
///
/// Pure; existence of the post is the caller's concern.
pub fn post_detail_path(routes: &RouteConfig, id: PostId) -> String {
    let prefix = routes.blog_prefix.trim_end_matches('/');
    format!("{prefix}/{id}/")
}

#[cfg(test)]
mod tests {
    use super::{post_detail_path, RouteConfig};

    #[test]
    fn detail_path_embeds_id_under_default_prefix() {
        let routes = RouteConfig::default();
        assert_eq!(post_detail_path(&routes, 42), "/posts/42/");
    }

    #[test]
    fn detail_path_tolerates_trailing_slash_in_prefix() {
        let routes = RouteConfig {
            blog_prefix: "/blog/".to_string(),
        };
        assert_eq!(post_detail_path(&routes, 7), "/blog/7/");
    }
}
