//! Tag subcommands.

use super::open_library;
use crate::cli::TagCommands;
use crate::config::Config;
use crate::utils::error::AppResult;
use crate::utils::output::{OutputStyle, print_empty_result, print_success};
use crate::utils::prompt_yes_no;

pub fn handle_tag_command(config: Config, command: TagCommands) -> AppResult<()> {
    match command {
        TagCommands::List { category } => {
            let library = open_library(&config)?;
            let tags = library.list_tags(category.as_deref())?;
            if tags.is_empty() {
                print_empty_result("tags");
                return Ok(());
            }
            for tag in &tags {
                OutputStyle::print_tag_line(tag);
            }
            Ok(())
        },
        TagCommands::Create {
            name,
            category,
            color,
        } => {
            let mut library = open_library(&config)?;
            let tag = library.create_tag(&name, category.as_deref(), color.as_deref())?;
            print_success(&format!("Created tag '{}'", tag.name));
            Ok(())
        },
        TagCommands::Update {
            name,
            rename,
            category,
            color,
        } => {
            let mut library = open_library(&config)?;
            let tag = library.update_tag(
                &name,
                rename.as_deref(),
                category.as_deref(),
                color.as_deref(),
            )?;
            print_success(&format!("Updated tag '{}'", tag.name));
            Ok(())
        },
        TagCommands::Delete { name, force } => {
            let mut library = open_library(&config)?;
            if !force
                && !prompt_yes_no(&format!(
                    "Delete tag '{}'? It will be removed from all prompts",
                    name
                ))?
            {
                println!("Cancelled.");
                return Ok(());
            }
            library.delete_tag(&name)?;
            print_success(&format!("Deleted tag '{}'", name));
            Ok(())
        },
    }
}
