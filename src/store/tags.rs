//! Tag registry: case-insensitive unique names, category and color hints,
//! and the prompt associations that follow a tag through rename/delete.

use super::{Store, decode_time, encode_time};
use crate::models::Tag;
use crate::utils::error::{AppError, AppResult};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

fn row_to_tag(row: &rusqlite::Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        color: row.get(3)?,
        created_at: decode_time(&row.get::<_, String>(4)?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?,
    })
}

/// Case-insensitive lookup; the `name` column is COLLATE NOCASE.
fn find_tag(conn: &Connection, name: &str) -> AppResult<Option<Tag>> {
    let tag = conn
        .prepare("SELECT id, name, category, color, created_at FROM tags WHERE name = ?1")?
        .query_row([name], row_to_tag)
        .optional()?;
    Ok(tag)
}

/// A UNIQUE violation on `tags.name` is a duplicate, not a storage fault.
/// Covers writers in other processes that committed the name between our
/// transaction start and the insert.
fn classify_tag_insert_error(name: &str, e: rusqlite::Error) -> AppError {
    if let rusqlite::Error::SqliteFailure(err, msg) = &e
        && err.code == rusqlite::ErrorCode::ConstraintViolation
        && msg.as_deref().is_some_and(|m| m.contains("tags.name"))
    {
        return AppError::DuplicateTag(format!("'{}' already exists", name));
    }
    e.into()
}

impl Store {
    pub fn create_tag(
        &mut self,
        name: &str,
        category: Option<&str>,
        color: Option<&str>,
    ) -> AppResult<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidArgument("tag name cannot be empty".into()));
        }

        let now = encode_time(Utc::now());
        let tx = self
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(existing) = find_tag(&tx, name)? {
            return Err(AppError::DuplicateTag(format!(
                "'{}' already exists as '{}'",
                name, existing.name
            )));
        }

        tx.execute(
            "INSERT INTO tags (name, category, color, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, category, color, now],
        )
        .map_err(|e| classify_tag_insert_error(name, e))?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Tag {
            id,
            name: name.to_string(),
            category: category.map(str::to_string),
            color: color.map(str::to_string),
            created_at: decode_time(&now)?,
        })
    }

    /// Updates a tag in place. A rename keeps the tag id, so every prompt
    /// association follows it within the same transaction.
    pub fn update_tag(
        &mut self,
        name: &str,
        new_name: Option<&str>,
        category: Option<&str>,
        color: Option<&str>,
    ) -> AppResult<Tag> {
        let tx = self
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut tag = find_tag(&tx, name)?
            .ok_or_else(|| AppError::not_found("tag", name))?;

        if let Some(new_name) = new_name {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                return Err(AppError::InvalidArgument("tag name cannot be empty".into()));
            }
            if let Some(other) = find_tag(&tx, new_name)?
                && other.id != tag.id
            {
                return Err(AppError::DuplicateTag(format!(
                    "'{}' already exists as '{}'",
                    new_name, other.name
                )));
            }
            tag.name = new_name.to_string();
        }
        if let Some(category) = category {
            tag.category = Some(category.to_string());
        }
        if let Some(color) = color {
            tag.color = Some(color.to_string());
        }

        tx.execute(
            "UPDATE tags SET name = ?1, category = ?2, color = ?3 WHERE id = ?4",
            params![tag.name, tag.category, tag.color, tag.id],
        )?;
        tx.commit()?;
        Ok(tag)
    }

    /// Removes a tag and strips it from every prompt; prompts survive.
    pub fn delete_tag(&mut self, name: &str) -> AppResult<()> {
        let tx = self
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let tag = find_tag(&tx, name)?
            .ok_or_else(|| AppError::not_found("tag", name))?;

        // prompt_tags rows go with it via ON DELETE CASCADE
        tx.execute("DELETE FROM tags WHERE id = ?1", [tag.id])?;
        tx.commit()?;
        Ok(())
    }

    pub fn get_tag(&self, name: &str) -> AppResult<Tag> {
        find_tag(self.conn(), name)?.ok_or_else(|| AppError::not_found("tag", name))
    }

    /// Lists tags by name, optionally only those in one category.
    pub fn list_tags(&self, category: Option<&str>) -> AppResult<Vec<Tag>> {
        let tags = match category {
            Some(category) => {
                let mut stmt = self.conn().prepare(
                    "SELECT id, name, category, color, created_at FROM tags
                     WHERE category = ?1
                     ORDER BY name COLLATE NOCASE",
                )?;
                let rows = stmt.query_map([category], row_to_tag)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            },
            None => {
                let mut stmt = self.conn().prepare(
                    "SELECT id, name, category, color, created_at FROM tags
                     ORDER BY name COLLATE NOCASE",
                )?;
                let rows = stmt.query_map([], row_to_tag)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            },
        };
        Ok(tags)
    }

    /// Resolves tag names to ids, creating unknown names with category
    /// "custom". Duplicate names in the input, including case variants,
    /// collapse to one association.
    pub(crate) fn resolve_tag_ids(tx: &Connection, names: &[String]) -> AppResult<Vec<i64>> {
        let mut ids = Vec::new();
        for name in names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let existing: Option<i64> = tx
                .prepare("SELECT id FROM tags WHERE name = ?1")?
                .query_row([name], |row| row.get(0))
                .optional()?;
            let id = match existing {
                Some(id) => id,
                None => {
                    tx.execute(
                        "INSERT INTO tags (name, category, created_at) VALUES (?1, 'custom', ?2)",
                        params![name, encode_time(Utc::now())],
                    )?;
                    tx.last_insert_rowid()
                },
            };
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}
