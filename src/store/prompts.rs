//! Prompt records: CRUD plus search over title/content/description, tag
//! intersection filtering and exact folder matching.

use super::{Store, encode_time, escape_like, row_to_prompt, tags_for_prompt};
use crate::models::{Prompt, PromptPatch, SearchQuery};
use crate::path::FolderPath;
use crate::utils::error::{AppError, AppResult};
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params, params_from_iter};

/// Default number of search results when the caller names no limit.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Hard ceiling on search results; limits above it are rejected.
pub const MAX_SEARCH_LIMIT: u32 = 1000;

fn fetch_prompt(conn: &Connection, id: i64) -> AppResult<Option<Prompt>> {
    let prompt = conn
        .prepare(
            "SELECT id, title, content, description, folder_path, created_at, updated_at
             FROM prompts WHERE id = ?1",
        )?
        .query_row([id], row_to_prompt)
        .optional()?;

    match prompt {
        Some(mut prompt) => {
            prompt.tags = tags_for_prompt(conn, id)?;
            Ok(Some(prompt))
        },
        None => Ok(None),
    }
}

fn replace_associations(tx: &Connection, prompt_id: i64, tag_names: &[String]) -> AppResult<()> {
    tx.execute("DELETE FROM prompt_tags WHERE prompt_id = ?1", [prompt_id])?;
    for tag_id in Store::resolve_tag_ids(tx, tag_names)? {
        tx.execute(
            "INSERT OR IGNORE INTO prompt_tags (prompt_id, tag_id) VALUES (?1, ?2)",
            params![prompt_id, tag_id],
        )?;
    }
    Ok(())
}

impl Store {
    /// Creates a prompt. The folder comes into existence implicitly
    /// through the prompt's path; unknown tag names are auto-created.
    pub fn create_prompt(
        &mut self,
        title: &str,
        content: &str,
        description: Option<&str>,
        folder: &FolderPath,
        tags: &[String],
    ) -> AppResult<Prompt> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidArgument("title cannot be empty".into()));
        }
        if content.is_empty() {
            return Err(AppError::InvalidArgument("content cannot be empty".into()));
        }

        let now = encode_time(Utc::now());
        let tx = self
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO prompts (title, content, description, folder_path, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![title, content, description, folder.as_str(), now],
        )?;
        let id = tx.last_insert_rowid();
        replace_associations(&tx, id, tags)?;

        let prompt = fetch_prompt(&tx, id)?
            .ok_or_else(|| AppError::Storage("created prompt vanished".into()))?;
        tx.commit()?;
        Ok(prompt)
    }

    pub fn get_prompt(&self, id: i64) -> AppResult<Prompt> {
        fetch_prompt(self.conn(), id)?
            .ok_or_else(|| AppError::not_found("prompt", id.to_string()))
    }

    /// Partial update; only supplied fields change. A supplied tag list
    /// replaces all associations; an empty description string clears the
    /// description. Refreshes `updated_at`.
    pub fn update_prompt(&mut self, id: i64, patch: &PromptPatch) -> AppResult<Prompt> {
        if let Some(title) = &patch.title
            && title.trim().is_empty()
        {
            return Err(AppError::InvalidArgument("title cannot be empty".into()));
        }
        if let Some(content) = &patch.content
            && content.is_empty()
        {
            return Err(AppError::InvalidArgument("content cannot be empty".into()));
        }
        let folder = patch
            .folder_path
            .as_deref()
            .map(FolderPath::parse)
            .transpose()?;

        let tx = self
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = fetch_prompt(&tx, id)?
            .ok_or_else(|| AppError::not_found("prompt", id.to_string()))?;

        let title = patch.title.as_deref().map_or(current.title, |t| t.trim().to_string());
        let content = patch.content.clone().unwrap_or(current.content);
        let description = match &patch.description {
            Some(d) if d.is_empty() => None,
            Some(d) => Some(d.clone()),
            None => current.description,
        };
        let folder_path = folder.map_or(current.folder_path, |f| f.as_str());
        let now = encode_time(Utc::now());

        tx.execute(
            "UPDATE prompts
             SET title = ?1, content = ?2, description = ?3, folder_path = ?4, updated_at = ?5
             WHERE id = ?6",
            params![title, content, description, folder_path, now, id],
        )?;
        if let Some(tags) = &patch.tags {
            replace_associations(&tx, id, tags)?;
        }

        let prompt = fetch_prompt(&tx, id)?
            .ok_or_else(|| AppError::Storage("updated prompt vanished".into()))?;
        tx.commit()?;
        Ok(prompt)
    }

    /// Deletes a prompt and its tag associations. Fails without side
    /// effects when the id is unknown.
    pub fn delete_prompt(&mut self, id: i64) -> AppResult<Prompt> {
        let tx = self
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let prompt = fetch_prompt(&tx, id)?
            .ok_or_else(|| AppError::not_found("prompt", id.to_string()))?;
        tx.execute("DELETE FROM prompts WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(prompt)
    }

    /// Searches prompts, most recently updated first.
    ///
    /// `query` matches as a substring of title, content or description,
    /// case-insensitively for ASCII (SQLite LIKE semantics; non-ASCII
    /// matches exactly); `tags` requires ALL listed names; `folder_path`
    /// matches exactly (no prefix mode). Limits below 1 clamp to 1; limits
    /// above [`MAX_SEARCH_LIMIT`] are rejected.
    pub fn search_prompts(&self, query: &SearchQuery) -> AppResult<Vec<Prompt>> {
        let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        if limit > MAX_SEARCH_LIMIT {
            return Err(AppError::InvalidArgument(format!(
                "limit {} exceeds maximum of {}",
                limit, MAX_SEARCH_LIMIT
            )));
        }
        let limit = limit.max(1);

        let mut sql = String::from(
            "SELECT id, title, content, description, folder_path, created_at, updated_at
             FROM prompts",
        );
        let mut clauses: Vec<String> = Vec::new();
        let mut args: Vec<Value> = Vec::new();

        if let Some(text) = query.query.as_deref().map(str::trim)
            && !text.is_empty()
        {
            // LIKE folds ASCII case by itself; folding again in Rust would
            // disagree with it on non-ASCII text.
            let pattern = format!("%{}%", escape_like(text));
            let i = args.len();
            clauses.push(format!(
                "(title LIKE ?{0} ESCAPE '\\'
                  OR content LIKE ?{0} ESCAPE '\\'
                  OR IFNULL(description, '') LIKE ?{0} ESCAPE '\\')",
                i + 1
            ));
            args.push(Value::Text(pattern));
        }

        // Case-insensitive dedup so "Rust, rust" does not inflate the
        // required match count.
        let mut tag_names: Vec<String> = Vec::new();
        for name in &query.tags {
            let name = name.trim();
            if !name.is_empty()
                && !tag_names.iter().any(|t| t.eq_ignore_ascii_case(name))
            {
                tag_names.push(name.to_string());
            }
        }
        if !tag_names.is_empty() {
            let placeholders: Vec<String> = tag_names
                .iter()
                .enumerate()
                .map(|(n, _)| format!("?{}", args.len() + n + 1))
                .collect();
            clauses.push(format!(
                "id IN (SELECT pt.prompt_id FROM prompt_tags pt
                        JOIN tags t ON t.id = pt.tag_id
                        WHERE t.name IN ({})
                        GROUP BY pt.prompt_id
                        HAVING COUNT(DISTINCT t.id) = {})",
                placeholders.join(", "),
                tag_names.len()
            ));
            for name in tag_names {
                args.push(Value::Text(name));
            }
        }

        if let Some(folder) = &query.folder_path {
            let folder = FolderPath::parse(folder)?;
            clauses.push(format!("folder_path = ?{}", args.len() + 1));
            args.push(Value::Text(folder.as_str()));
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(&format!(
            " ORDER BY updated_at DESC, id DESC LIMIT {limit}"
        ));

        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args), row_to_prompt)?;
        let mut prompts = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        for prompt in &mut prompts {
            prompt.tags = tags_for_prompt(self.conn(), prompt.id)?;
        }
        Ok(prompts)
    }
}
