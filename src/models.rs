use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored prompt. `folder_path` is the canonical normalized form
/// (empty string = root); `tags` is sorted and deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub folder_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// A tag. Names compare case-insensitively but store case-preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A folder as reported by `list_folders`: its canonical path and the
/// number of prompts directly in it (not in descendants).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub path: String,
    pub prompt_count: usize,
}

/// Partial update for a prompt; `None` fields are left untouched.
/// A supplied tag list replaces all existing associations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub folder_path: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PromptPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.description.is_none()
            && self.folder_path.is_none()
            && self.tags.is_none()
    }
}

/// Search parameters. All filters are optional and combine with AND;
/// the tag filter requires a prompt to carry every listed name.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub tags: Vec<String>,
    pub folder_path: Option<String>,
    pub limit: Option<u32>,
}
