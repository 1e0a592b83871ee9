//! Category/tag repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD persistence for the taxonomy entities posts reference.
//! - Own the restrict-delete policy for categories still in use.
//!
//! # Invariants
//! - Name validation runs before every SQL mutation.
//! - Deleting a category referenced by any post fails with
//!   `RepoError::CategoryInUse`; the posts are never touched.
//! - Deleting a tag detaches it from all posts (join rows cascade).

use rusqlite::{params, Connection, Row, TransactionBehavior};

use crate::model::category::{Category, CategoryId};
use crate::model::tag::{Tag, TagId};
use crate::repo::{RepoError, RepoResult};

/// Repository interface for category and tag operations.
pub trait TaxonomyRepository {
    /// Creates a category from a name and returns its assigned id.
    fn create_category(&self, name: &str) -> RepoResult<CategoryId>;
    /// Replaces a category's name.
    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<()>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Lists categories sorted by name, then id.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// Deletes a category that no post references.
    fn delete_category(&mut self, id: CategoryId) -> RepoResult<()>;

    /// Creates a tag from a name and returns its assigned id.
    fn create_tag(&self, name: &str) -> RepoResult<TagId>;
    /// Replaces a tag's name.
    fn rename_tag(&self, id: TagId, name: &str) -> RepoResult<()>;
    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>>;
    /// Lists tags sorted by name, then id.
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
    /// Deletes a tag, detaching it from every post that carries it.
    fn delete_tag(&self, id: TagId) -> RepoResult<()>;
}

/// SQLite-backed taxonomy repository.
pub struct SqliteTaxonomyRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTaxonomyRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl TaxonomyRepository for SqliteTaxonomyRepository<'_> {
    fn create_category(&self, name: &str) -> RepoResult<CategoryId> {
        Category::validate_name(name)?;
        self.conn
            .execute("INSERT INTO categories (name) VALUES (?1);", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<()> {
        Category::validate_name(name)?;
        let changed = self.conn.execute(
            "UPDATE categories SET name = ?2 WHERE id = ?1;",
            params![id, name],
        )?;
        if changed == 0 {
            return Err(RepoError::CategoryNotFound(id));
        }
        Ok(())
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name FROM categories ORDER BY name COLLATE NOCASE ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn delete_category(&mut self, id: CategoryId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let referenced: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM posts WHERE category_id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        if referenced == 1 {
            return Err(RepoError::CategoryInUse(id));
        }

        let changed = tx.execute("DELETE FROM categories WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::CategoryNotFound(id));
        }

        tx.commit()?;
        Ok(())
    }

    fn create_tag(&self, name: &str) -> RepoResult<TagId> {
        Tag::validate_name(name)?;
        self.conn
            .execute("INSERT INTO tags (name) VALUES (?1);", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn rename_tag(&self, id: TagId, name: &str) -> RepoResult<()> {
        Tag::validate_name(name)?;
        let changed = self.conn.execute(
            "UPDATE tags SET name = ?2 WHERE id = ?1;",
            params![id, name],
        )?;
        if changed == 0 {
            return Err(RepoError::TagNotFound(id));
        }
        Ok(())
    }

    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM tags WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_tag_row(row)?));
        }
        Ok(None)
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM tags ORDER BY name COLLATE NOCASE ASC, id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(parse_tag_row(row)?);
        }
        Ok(tags)
    }

    fn delete_tag(&self, id: TagId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tags WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::TagNotFound(id));
        }
        Ok(())
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let category = Category {
        id: row.get("id")?,
        name: row.get("name")?,
    };
    category.validate()?;
    Ok(category)
}

fn parse_tag_row(row: &Row<'_>) -> RepoResult<Tag> {
    let tag = Tag {
        id: row.get("id")?,
        name: row.get("name")?,
    };
    tag.validate()?;
    Ok(tag)
}
