//! Promptstash - a prompt library with folders, tags and templates
//!
//! Prompts live in one SQLite database, organized by hierarchical folder
//! paths and flat tags, with `{var}` / `{{var}}` template substitution.
//! The same store is exposed through a CLI and an MCP stdio server.

pub mod cli;
pub mod commands;
pub mod config;
pub mod library;
pub mod mcp;
pub mod models;
pub mod path;
pub mod store;
pub mod template;
pub mod utils;

pub use library::Library;
pub use models::{Folder, Prompt, PromptPatch, SearchQuery, Tag};
pub use path::FolderPath;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
