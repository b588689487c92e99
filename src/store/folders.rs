//! Folder tree over the prompt namespace.
//!
//! Folders have no row of their own unless explicitly created: a folder
//! exists when it was registered in `folders`, or when it is the folder
//! path of some prompt, or an ancestor of either. Rename and delete
//! cascade over that derived set in one transaction.

use super::{Store, escape_like};
use crate::models::Folder;
use crate::path::FolderPath;
use crate::utils::error::{AppError, AppResult};
use rusqlite::{Connection, TransactionBehavior, params};
use std::collections::{BTreeSet, HashMap};

/// `path = ?` or `path LIKE ?/%` match parameters for a subtree.
fn subtree_params(path: &FolderPath) -> (String, String) {
    let exact = path.as_str();
    let descendants = format!("{}/%", escape_like(&exact));
    (exact, descendants)
}

fn folder_exists(conn: &Connection, path: &FolderPath) -> AppResult<bool> {
    if path.is_root() {
        return Ok(true);
    }
    let (exact, descendants) = subtree_params(path);
    let found: i64 = conn.query_row(
        "SELECT EXISTS (
            SELECT 1 FROM folders
            WHERE path = ?1 OR path LIKE ?2 ESCAPE '\\'
         ) OR EXISTS (
            SELECT 1 FROM prompts
            WHERE folder_path = ?1 OR folder_path LIKE ?2 ESCAPE '\\'
         )",
        params![exact, descendants],
        |row| row.get(0),
    )?;
    Ok(found != 0)
}

impl Store {
    /// All folders: explicit registrations ∪ prompt folder paths, each
    /// expanded with its ancestors, sorted by path. The count is of
    /// prompts directly in the folder, not in descendants.
    pub fn list_folders(&self) -> AppResult<Vec<Folder>> {
        let mut paths: BTreeSet<String> = BTreeSet::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        let mut stmt = self.conn().prepare("SELECT path FROM folders")?;
        let explicit = stmt.query_map([], |row| row.get::<_, String>(0))?;
        for path in explicit {
            paths.insert(path?);
        }

        let mut stmt = self.conn().prepare(
            "SELECT folder_path, COUNT(*) FROM prompts
             WHERE folder_path <> '' GROUP BY folder_path",
        )?;
        let used = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for entry in used {
            let (path, count) = entry?;
            counts.insert(path.clone(), count as usize);
            paths.insert(path);
        }

        for path in paths.clone() {
            for ancestor in FolderPath::parse(&path)?.ancestors() {
                paths.insert(ancestor.as_str());
            }
        }

        Ok(paths
            .into_iter()
            .map(|path| {
                let prompt_count = counts.get(&path).copied().unwrap_or(0);
                Folder { path, prompt_count }
            })
            .collect())
    }

    pub fn folder_exists(&self, path: &FolderPath) -> AppResult<bool> {
        folder_exists(self.conn(), path)
    }

    /// Registers an explicit folder so it survives even when emptied of
    /// prompts. Idempotent; creating an already-implied folder simply
    /// makes it explicit.
    pub fn create_folder(&self, path: &FolderPath) -> AppResult<()> {
        if path.is_root() {
            return Ok(());
        }
        self.conn().execute(
            "INSERT OR IGNORE INTO folders (path) VALUES (?1)",
            [path.as_str()],
        )?;
        Ok(())
    }

    /// Rewrites the `old` prefix to `new` on every folder and prompt at or
    /// below `old`, in one transaction. Merging into an existing `new`
    /// folder is allowed (last write wins); moving a folder into its own
    /// subtree is not.
    pub fn rename_folder(&mut self, old: &FolderPath, new: &FolderPath) -> AppResult<()> {
        if old.is_root() {
            return Err(AppError::InvalidArgument(
                "the root folder cannot be renamed".into(),
            ));
        }
        if new.is_root() {
            return Err(AppError::InvalidArgument(
                "cannot rename a folder to the root path".into(),
            ));
        }
        if old.is_ancestor_of(new) {
            return Err(AppError::Conflict(format!(
                "cannot move '{}' into its own subtree '{}'",
                old, new
            )));
        }

        let tx = self
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !folder_exists(&tx, old)? {
            return Err(AppError::not_found("folder", old.as_str()));
        }
        if old == new {
            return Ok(());
        }

        let (exact, descendants) = subtree_params(old);
        let new_str = new.as_str();
        // substr() is 1-based: position len(old)+1 keeps the suffix
        // starting at the '/' after the old prefix (empty for an exact
        // match).
        let suffix_start = exact.chars().count() as i64 + 1;

        let affected: Vec<String> = {
            let mut stmt = tx.prepare(
                "SELECT path FROM folders
                 WHERE path = ?1 OR path LIKE ?2 ESCAPE '\\'",
            )?;
            let rows = stmt.query_map(params![exact, descendants], |row| row.get(0))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        for path in affected {
            let rewritten = format!("{}{}", new_str, &path[exact.len()..]);
            tx.execute("DELETE FROM folders WHERE path = ?1", [&path])?;
            tx.execute("INSERT OR IGNORE INTO folders (path) VALUES (?1)", [&rewritten])?;
        }

        tx.execute(
            "UPDATE prompts SET folder_path = ?1 || substr(folder_path, ?2)
             WHERE folder_path = ?3 OR folder_path LIKE ?4 ESCAPE '\\'",
            params![new_str, suffix_start, exact, descendants],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Deletes a folder by collapsing its whole subtree into its parent:
    /// every prompt in the folder or any descendant is reassigned to the
    /// parent (root if none), and all explicit folder rows at or below the
    /// path are dropped. Prompts are never deleted.
    pub fn delete_folder(&mut self, path: &FolderPath) -> AppResult<()> {
        if path.is_root() {
            return Err(AppError::InvalidArgument(
                "the root folder cannot be deleted".into(),
            ));
        }

        let tx = self
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !folder_exists(&tx, path)? {
            return Err(AppError::not_found("folder", path.as_str()));
        }

        let parent = path.parent().unwrap_or_else(FolderPath::root).as_str();
        let (exact, descendants) = subtree_params(path);

        tx.execute(
            "UPDATE prompts SET folder_path = ?1
             WHERE folder_path = ?2 OR folder_path LIKE ?3 ESCAPE '\\'",
            params![parent, exact, descendants],
        )?;
        tx.execute(
            "DELETE FROM folders WHERE path = ?1 OR path LIKE ?2 ESCAPE '\\'",
            params![exact, descendants],
        )?;

        tx.commit()?;
        Ok(())
    }
}
