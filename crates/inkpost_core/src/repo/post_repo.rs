//! Post repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide post persistence over the `posts` and `post_tags` tables.
//! - Resolve category/tag references inside the writing transaction.
//! - Own tag-link replacement logic with atomic semantics.
//!
//! # Invariants
//! - Write paths validate field constraints before SQL mutations.
//! - `created_at` is written once at insert and never updated.
//! - Every content mutation bumps `updated_at` in the same statement.
//! - Tag links are unique per (post, tag) pair; attach is idempotent.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use uuid::Uuid;

use crate::model::category::CategoryId;
use crate::model::post::{
    validate_author, validate_excerpt, validate_tag_refs, validate_title, AuthorId, Post, PostId,
};
use crate::model::tag::TagId;
use crate::repo::{RepoError, RepoResult};

const POST_SELECT_SQL: &str = "SELECT
    id,
    title,
    body,
    excerpt,
    category_id,
    author_uuid,
    created_at,
    updated_at
FROM posts";

const POSTS_DEFAULT_LIMIT: u32 = 10;
const POSTS_LIMIT_MAX: u32 = 50;

/// Input for creating a post. Timestamps and id are storage-assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub excerpt: String,
    pub category_id: CategoryId,
    pub author_id: AuthorId,
    /// Tag references, duplicate-free. Order is irrelevant.
    pub tags: Vec<TagId>,
}

/// Full-replacement content update. Author and timestamps are not part of
/// the patch: authorship is fixed at creation, timestamps are
/// storage-managed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPatch {
    pub title: String,
    pub body: String,
    pub excerpt: String,
    pub category_id: CategoryId,
}

/// Query options for listing posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListQuery {
    /// Optional exact category filter.
    pub category: Option<CategoryId>,
    /// Optional exact tag filter.
    pub tag: Option<TagId>,
    /// Maximum rows to return. Defaults to 10 and clamps to 50.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for post operations.
pub trait PostRepository {
    /// Creates one post with its tag links and returns the assigned id.
    ///
    /// Fails with `CategoryNotFound`/`TagNotFound` when a reference does not
    /// resolve; nothing is written in that case.
    fn create_post(&mut self, new_post: &NewPost) -> RepoResult<PostId>;
    /// Replaces post content fully and bumps `updated_at`.
    fn update_post(&mut self, id: PostId, patch: &PostPatch) -> RepoResult<()>;
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    /// Lists posts using optional category/tag filters and pagination.
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>>;
    /// Replaces the whole tag set for one post in a single transaction.
    fn set_post_tags(&mut self, id: PostId, tags: &[TagId]) -> RepoResult<()>;
    /// Attaches one tag; attaching an already-attached tag is a no-op.
    fn add_post_tag(&mut self, id: PostId, tag_id: TagId) -> RepoResult<()>;
    /// Detaches one tag; detaching an absent tag is a no-op.
    fn remove_post_tag(&mut self, id: PostId, tag_id: TagId) -> RepoResult<()>;
    /// Hard-deletes a post; its tag links are dropped with it.
    fn delete_post(&self, id: PostId) -> RepoResult<()>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&mut self, new_post: &NewPost) -> RepoResult<PostId> {
        validate_title(&new_post.title)?;
        validate_excerpt(&new_post.excerpt)?;
        validate_author(new_post.author_id)?;
        validate_tag_refs(&new_post.tags)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !category_exists(&tx, new_post.category_id)? {
            return Err(RepoError::CategoryNotFound(new_post.category_id));
        }
        for &tag_id in &new_post.tags {
            if !tag_exists(&tx, tag_id)? {
                return Err(RepoError::TagNotFound(tag_id));
            }
        }

        tx.execute(
            "INSERT INTO posts (title, body, excerpt, category_id, author_uuid)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                new_post.title.as_str(),
                new_post.body.as_str(),
                new_post.excerpt.as_str(),
                new_post.category_id,
                new_post.author_id.to_string(),
            ],
        )?;
        let post_id = tx.last_insert_rowid();

        for &tag_id in &new_post.tags {
            tx.execute(
                "INSERT INTO post_tags (post_id, tag_id) VALUES (?1, ?2);",
                params![post_id, tag_id],
            )?;
        }

        tx.commit()?;
        Ok(post_id)
    }

    fn update_post(&mut self, id: PostId, patch: &PostPatch) -> RepoResult<()> {
        validate_title(&patch.title)?;
        validate_excerpt(&patch.excerpt)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !category_exists(&tx, patch.category_id)? {
            return Err(RepoError::CategoryNotFound(patch.category_id));
        }

        let changed = tx.execute(
            "UPDATE posts
             SET
                title = ?2,
                body = ?3,
                excerpt = ?4,
                category_id = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                id,
                patch.title.as_str(),
                patch.body.as_str(),
                patch.excerpt.as_str(),
                patch.category_id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::PostNotFound(id));
        }

        tx.commit()?;
        Ok(())
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(post_from_row(&*self.conn, row)?));
        }
        Ok(None)
    }

    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        let mut sql = format!("{POST_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category_id) = query.category {
            sql.push_str(" AND category_id = ?");
            bind_values.push(Value::Integer(category_id));
        }

        if let Some(tag_id) = query.tag {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM post_tags pt
                    WHERE pt.post_id = posts.id
                      AND pt.tag_id = ?
                )",
            );
            bind_values.push(Value::Integer(tag_id));
        }

        sql.push_str(" ORDER BY updated_at DESC, id ASC");
        let limit = normalize_post_limit(query.limit);
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(post_from_row(&*self.conn, row)?);
        }
        Ok(posts)
    }

    fn set_post_tags(&mut self, id: PostId, tags: &[TagId]) -> RepoResult<()> {
        validate_tag_refs(tags)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !post_exists(&tx, id)? {
            return Err(RepoError::PostNotFound(id));
        }
        for &tag_id in tags {
            if !tag_exists(&tx, tag_id)? {
                return Err(RepoError::TagNotFound(tag_id));
            }
        }

        tx.execute("DELETE FROM post_tags WHERE post_id = ?1;", [id])?;
        for &tag_id in tags {
            tx.execute(
                "INSERT INTO post_tags (post_id, tag_id) VALUES (?1, ?2);",
                params![id, tag_id],
            )?;
        }
        touch_post(&tx, id)?;

        tx.commit()?;
        Ok(())
    }

    fn add_post_tag(&mut self, id: PostId, tag_id: TagId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !post_exists(&tx, id)? {
            return Err(RepoError::PostNotFound(id));
        }
        if !tag_exists(&tx, tag_id)? {
            return Err(RepoError::TagNotFound(tag_id));
        }

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?1, ?2);",
            params![id, tag_id],
        )?;
        if inserted > 0 {
            touch_post(&tx, id)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn remove_post_tag(&mut self, id: PostId, tag_id: TagId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !post_exists(&tx, id)? {
            return Err(RepoError::PostNotFound(id));
        }

        let removed = tx.execute(
            "DELETE FROM post_tags WHERE post_id = ?1 AND tag_id = ?2;",
            params![id, tag_id],
        )?;
        if removed > 0 {
            touch_post(&tx, id)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn delete_post(&self, id: PostId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM posts WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::PostNotFound(id));
        }
        Ok(())
    }
}

/// Normalizes a list limit according to the posts contract.
pub fn normalize_post_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) => POSTS_DEFAULT_LIMIT,
        Some(value) if value > POSTS_LIMIT_MAX => POSTS_LIMIT_MAX,
        Some(value) => value,
        None => POSTS_DEFAULT_LIMIT,
    }
}

fn post_from_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Post> {
    let id: PostId = row.get("id")?;
    let author_text: String = row.get("author_uuid")?;
    let author_id = Uuid::parse_str(&author_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{author_text}` in posts.author_uuid"
        ))
    })?;

    let post = Post {
        id,
        title: row.get("title")?,
        body: row.get("body")?,
        excerpt: row.get("excerpt")?,
        category_id: row.get("category_id")?,
        author_id,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        tags: load_tags_for_post(conn, id)?,
    };
    post.validate()?;
    Ok(post)
}

fn load_tags_for_post(conn: &Connection, post_id: PostId) -> RepoResult<Vec<TagId>> {
    let mut stmt = conn.prepare(
        "SELECT tag_id FROM post_tags WHERE post_id = ?1 ORDER BY tag_id ASC;",
    )?;
    let mut rows = stmt.query([post_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get(0)?);
    }
    Ok(tags)
}

fn touch_post(conn: &Connection, id: PostId) -> RepoResult<()> {
    conn.execute(
        "UPDATE posts
         SET updated_at = (strftime('%s', 'now') * 1000)
         WHERE id = ?1;",
        [id],
    )?;
    Ok(())
}

fn post_exists(conn: &Connection, id: PostId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn category_exists(conn: &Connection, id: CategoryId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn tag_exists(conn: &Connection, id: TagId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM tags WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
