use crate::commands::{folder, prompt, serve, tag};
use crate::config::Config;
use crate::utils::error::AppResult;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "promptstash")]
#[command(about = "Organize, search and render reusable prompts")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Commands {
    pub fn execute(self, config: Config) -> AppResult<()> {
        match self {
            Commands::Init => prompt::handle_init_command(config),
            Commands::Add(args) => prompt::handle_add_command(config, &args),
            Commands::List(args) => prompt::handle_list_command(config, &args),
            Commands::Search(args) => prompt::handle_search_command(config, &args),
            Commands::Show(args) => prompt::handle_show_command(config, &args),
            Commands::Edit(args) => prompt::handle_edit_command(config, &args),
            Commands::Delete(args) => prompt::handle_delete_command(config, &args),
            Commands::Render(args) => prompt::handle_render_command(config, &args),
            Commands::Folder(args) => folder::handle_folder_command(config, args.command),
            Commands::Tag(args) => tag::handle_tag_command(config, args.command),
            Commands::Serve => serve::handle_serve_command(config),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the config file and database
    Init,

    /// Add a new prompt
    Add(AddArgs),

    /// List prompts, most recently updated first
    List(ListArgs),

    /// Search prompts by text, tags and folder
    Search(SearchArgs),

    /// Show full prompt details
    Show(ShowArgs),

    /// Update fields of an existing prompt
    Edit(EditArgs),

    /// Delete a prompt
    Delete(DeleteArgs),

    /// Render a prompt with template variables
    Render(RenderArgs),

    /// Manage folders
    Folder(FolderArgs),

    /// Manage tags
    Tag(TagArgs),

    /// Run the MCP server on stdio
    Serve,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(help = "Prompt title")]
    pub title: String,

    #[arg(long, help = "Prompt content; read from stdin when omitted")]
    pub content: Option<String>,

    #[arg(short = 'd', long)]
    pub description: Option<String>,

    #[arg(short = 'f', long, help = "Folder path, e.g. AI/Coding")]
    pub folder: Option<String>,

    #[arg(short = 't', long = "tag", help = "Tag name (repeatable)")]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short = 'f', long, help = "Only prompts directly in this folder")]
    pub folder: Option<String>,

    #[arg(short = 't', long = "tag", help = "Require this tag (repeatable)")]
    pub tags: Vec<String>,

    #[arg(short = 'n', long)]
    pub limit: Option<u32>,
}

#[derive(Args)]
pub struct SearchArgs {
    #[arg(help = "Text to match in title, content or description")]
    pub query: Option<String>,

    #[arg(short = 't', long = "tag", help = "Require this tag (repeatable)")]
    pub tags: Vec<String>,

    #[arg(short = 'f', long, help = "Only prompts directly in this folder")]
    pub folder: Option<String>,

    #[arg(short = 'n', long)]
    pub limit: Option<u32>,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(help = "Prompt ID")]
    pub id: i64,
}

#[derive(Args)]
pub struct EditArgs {
    #[arg(help = "Prompt ID")]
    pub id: i64,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub content: Option<String>,

    #[arg(short = 'd', long)]
    pub description: Option<String>,

    #[arg(short = 'f', long, help = "Move to this folder")]
    pub folder: Option<String>,

    #[arg(
        short = 't',
        long = "tag",
        help = "Replace all tags with these (repeatable)"
    )]
    pub tags: Option<Vec<String>>,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[arg(help = "Prompt ID")]
    pub id: i64,

    #[arg(long, help = "Skip confirmation")]
    pub force: bool,
}

#[derive(Args)]
pub struct RenderArgs {
    #[arg(help = "Prompt ID")]
    pub id: i64,

    #[arg(long = "var", help = "Variable as key=value (repeatable)")]
    pub vars: Vec<String>,
}

#[derive(Args)]
pub struct FolderArgs {
    #[command(subcommand)]
    pub command: FolderCommands,
}

#[derive(Subcommand)]
pub enum FolderCommands {
    /// List all folders with prompt counts
    List,

    /// Create a folder (and its ancestors)
    Create {
        #[arg(help = "Folder path, e.g. AI/Coding")]
        path: String,
    },

    /// Rename or move a folder and everything below it
    Rename {
        #[arg(help = "Current folder path")]
        old: String,
        #[arg(help = "New folder path")]
        new: String,
    },

    /// Delete a folder; its prompts move to the parent folder
    Delete {
        #[arg(help = "Folder path")]
        path: String,
        #[arg(long, help = "Skip confirmation")]
        force: bool,
    },
}

#[derive(Args)]
pub struct TagArgs {
    #[command(subcommand)]
    pub command: TagCommands,
}

#[derive(Subcommand)]
pub enum TagCommands {
    /// List tags, optionally only one category
    List {
        #[arg(short = 'c', long)]
        category: Option<String>,
    },

    /// Create a tag
    Create {
        #[arg(help = "Tag name (case-insensitively unique)")]
        name: String,
        #[arg(short = 'c', long)]
        category: Option<String>,
        #[arg(long, help = "Display color, e.g. #3B82F6")]
        color: Option<String>,
    },

    /// Rename a tag or change its metadata
    Update {
        #[arg(help = "Current tag name")]
        name: String,
        #[arg(long, help = "New tag name")]
        rename: Option<String>,
        #[arg(short = 'c', long)]
        category: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a tag and remove it from all prompts
    Delete {
        #[arg(help = "Tag name")]
        name: String,
        #[arg(long, help = "Skip confirmation")]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_tags_and_folder() {
        let cli = Cli::parse_from([
            "promptstash",
            "add",
            "Code Review",
            "--content",
            "Review {language} code",
            "-f",
            "AI/Coding",
            "-t",
            "rust",
            "-t",
            "review",
        ]);
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.title, "Code Review");
                assert_eq!(args.folder.as_deref(), Some("AI/Coding"));
                assert_eq!(args.tags, ["rust", "review"]);
            },
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn parses_render_vars() {
        let cli = Cli::parse_from([
            "promptstash",
            "render",
            "3",
            "--var",
            "name=Ann",
            "--var",
            "lang=Rust",
        ]);
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.id, 3);
                assert_eq!(args.vars, ["name=Ann", "lang=Rust"]);
            },
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn edit_distinguishes_no_tags_from_empty_tags() {
        let cli = Cli::parse_from(["promptstash", "edit", "7", "--title", "new"]);
        match cli.command {
            Commands::Edit(args) => assert!(args.tags.is_none()),
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn parses_folder_rename() {
        let cli = Cli::parse_from(["promptstash", "folder", "rename", "AI", "ML"]);
        match cli.command {
            Commands::Folder(args) => match args.command {
                FolderCommands::Rename { old, new } => {
                    assert_eq!(old, "AI");
                    assert_eq!(new, "ML");
                },
                _ => panic!("expected rename"),
            },
            _ => panic!("expected folder"),
        }
    }
}
