//! Domain façade over the store.
//!
//! Both the CLI and the MCP server go through this layer, so path
//! normalization, empty-patch rejection and template rendering behave
//! identically whichever surface made the call.

use crate::models::{Folder, Prompt, PromptPatch, SearchQuery, Tag};
use crate::path::FolderPath;
use crate::store::Store;
use crate::template::{self, Rendering};
use crate::utils::error::{AppError, AppResult};
use std::collections::HashMap;
use std::path::Path;

pub struct Library {
    store: Store,
}

impl Library {
    pub fn open(db_path: impl AsRef<Path>) -> AppResult<Self> {
        Ok(Self {
            store: Store::open(db_path.as_ref())?,
        })
    }

    #[cfg(test)]
    pub fn in_memory() -> AppResult<Self> {
        Ok(Self {
            store: Store::in_memory()?,
        })
    }

    // Prompts

    pub fn create_prompt(
        &mut self,
        title: &str,
        content: &str,
        description: Option<&str>,
        folder: Option<&str>,
        tags: &[String],
    ) -> AppResult<Prompt> {
        let folder = match folder {
            Some(raw) => FolderPath::parse(raw)?,
            None => FolderPath::root(),
        };
        self.store.create_prompt(title, content, description, &folder, tags)
    }

    pub fn get_prompt(&self, id: i64) -> AppResult<Prompt> {
        self.store.get_prompt(id)
    }

    pub fn update_prompt(&mut self, id: i64, patch: &PromptPatch) -> AppResult<Prompt> {
        if patch.is_empty() {
            return Err(AppError::InvalidArgument(
                "update requires at least one field".into(),
            ));
        }
        self.store.update_prompt(id, patch)
    }

    pub fn delete_prompt(&mut self, id: i64) -> AppResult<Prompt> {
        self.store.delete_prompt(id)
    }

    pub fn search_prompts(&self, query: &SearchQuery) -> AppResult<Vec<Prompt>> {
        self.store.search_prompts(query)
    }

    /// Substitutes the given variables into the prompt's placeholders.
    /// Unknown placeholders pass through unchanged and are reported in
    /// the result rather than treated as errors.
    pub fn render_prompt(
        &self,
        id: i64,
        variables: &HashMap<String, String>,
    ) -> AppResult<(Prompt, Rendering)> {
        let prompt = self.store.get_prompt(id)?;
        let rendering = template::render(&prompt.content, variables);
        Ok((prompt, rendering))
    }

    // Folders

    pub fn list_folders(&self) -> AppResult<Vec<Folder>> {
        self.store.list_folders()
    }

    pub fn create_folder(&self, path: &str) -> AppResult<FolderPath> {
        let path = FolderPath::parse(path)?;
        self.store.create_folder(&path)?;
        Ok(path)
    }

    pub fn rename_folder(&mut self, old: &str, new: &str) -> AppResult<FolderPath> {
        let old = FolderPath::parse(old)?;
        let new = FolderPath::parse(new)?;
        self.store.rename_folder(&old, &new)?;
        Ok(new)
    }

    pub fn delete_folder(&mut self, path: &str) -> AppResult<FolderPath> {
        let path = FolderPath::parse(path)?;
        self.store.delete_folder(&path)?;
        Ok(path)
    }

    // Tags

    pub fn list_tags(&self, category: Option<&str>) -> AppResult<Vec<Tag>> {
        self.store.list_tags(category)
    }

    pub fn create_tag(
        &mut self,
        name: &str,
        category: Option<&str>,
        color: Option<&str>,
    ) -> AppResult<Tag> {
        self.store.create_tag(name, category, color)
    }

    pub fn update_tag(
        &mut self,
        name: &str,
        new_name: Option<&str>,
        category: Option<&str>,
        color: Option<&str>,
    ) -> AppResult<Tag> {
        self.store.update_tag(name, new_name, category, color)
    }

    pub fn delete_tag(&mut self, name: &str) -> AppResult<()> {
        self.store.delete_tag(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_paths_normalize_on_the_way_in() {
        let mut lib = Library::in_memory().unwrap();
        let p = lib
            .create_prompt("t", "c", None, Some(" AI / Coding "), &[])
            .unwrap();
        assert_eq!(p.folder_path, "AI/Coding");
    }

    #[test]
    fn empty_update_is_rejected() {
        let mut lib = Library::in_memory().unwrap();
        let p = lib.create_prompt("t", "c", None, None, &[]).unwrap();
        let err = lib.update_prompt(p.id, &PromptPatch::default()).unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[test]
    fn render_reports_substituted_and_missing() {
        let mut lib = Library::in_memory().unwrap();
        let p = lib
            .create_prompt("t", "Hello {name}, meet {{other}}", None, None, &[])
            .unwrap();

        let vars = HashMap::from([("name".to_string(), "Ann".to_string())]);
        let (_, rendering) = lib.render_prompt(p.id, &vars).unwrap();

        assert_eq!(rendering.text, "Hello Ann, meet {{other}}");
        assert!(rendering.substituted.contains("name"));
        assert!(rendering.missing.contains("other"));
    }

    #[test]
    fn render_missing_prompt_is_not_found() {
        let lib = Library::in_memory().unwrap();
        let err = lib.render_prompt(42, &HashMap::new()).unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
