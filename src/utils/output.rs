//! Terminal output styling shared by all CLI commands.

use crate::models::{Folder, Prompt, Tag};
use chrono::{DateTime, Local, Utc};
use colored::*;

pub struct OutputStyle;

impl OutputStyle {
    pub fn title(text: &str) -> ColoredString {
        text.bright_blue().bold()
    }

    pub fn label(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn tags(text: &str) -> ColoredString {
        text.bright_cyan()
    }

    pub fn folder(text: &str) -> ColoredString {
        text.bright_yellow()
    }

    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    pub fn muted(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn separator() -> String {
        "─".repeat(50)
    }

    pub fn print_field(label: &str, value: &str) {
        println!("{:>12}: {}", Self::label(label), value);
    }

    /// One-line listing entry: id, title, folder, tags.
    pub fn print_prompt_line(prompt: &Prompt) {
        let folder = if prompt.folder_path.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", prompt.folder_path)
        };
        let tags = if prompt.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", prompt.tags.join(", "))
        };
        println!(
            "{:>4}  {}  {}{}",
            Self::muted(&prompt.id.to_string()),
            Self::title(&prompt.title),
            Self::folder(&folder),
            Self::tags(&tags),
        );
    }

    pub fn print_prompt_detailed(prompt: &Prompt) {
        Self::print_field("ID", &prompt.id.to_string());
        Self::print_field("Title", &prompt.title);
        if let Some(description) = &prompt.description {
            Self::print_field("Description", description);
        }
        let folder = if prompt.folder_path.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", prompt.folder_path)
        };
        Self::print_field("Folder", &folder);
        if !prompt.tags.is_empty() {
            Self::print_field("Tags", &prompt.tags.join(", "));
        }
        Self::print_field("Created", &format_datetime(&prompt.created_at));
        Self::print_field("Updated", &format_datetime(&prompt.updated_at));
        println!("{}", Self::separator());
        println!("{}", prompt.content);
    }

    pub fn print_tag_line(tag: &Tag) {
        let mut extras = Vec::new();
        if let Some(category) = &tag.category {
            extras.push(category.clone());
        }
        if let Some(color) = &tag.color {
            extras.push(color.clone());
        }
        if extras.is_empty() {
            println!("  {}", Self::tags(&tag.name));
        } else {
            println!(
                "  {}  {}",
                Self::tags(&tag.name),
                Self::muted(&format!("({})", extras.join(", ")))
            );
        }
    }

    /// Indented tree entry; depth comes from the path itself.
    pub fn print_folder_line(folder: &Folder) {
        let depth = folder.path.matches('/').count();
        let name = folder.path.rsplit('/').next().unwrap_or(&folder.path);
        let count = if folder.prompt_count > 0 {
            format!(" ({})", folder.prompt_count)
        } else {
            String::new()
        };
        println!(
            "{}{}{}",
            "  ".repeat(depth + 1),
            Self::folder(name),
            Self::muted(&count),
        );
    }
}

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn print_success(message: &str) {
    println!("{} {}", OutputStyle::success("✓"), message);
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", OutputStyle::warning("!"), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", OutputStyle::error("✗"), message);
}

pub fn print_empty_result(what: &str) {
    println!("{}", OutputStyle::muted(&format!("No {} found.", what)));
}
