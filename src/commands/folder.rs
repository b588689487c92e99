//! Folder subcommands.

use super::open_library;
use crate::cli::FolderCommands;
use crate::config::Config;
use crate::utils::error::AppResult;
use crate::utils::output::{OutputStyle, print_empty_result, print_success};
use crate::utils::prompt_yes_no;

pub fn handle_folder_command(config: Config, command: FolderCommands) -> AppResult<()> {
    match command {
        FolderCommands::List => {
            let library = open_library(&config)?;
            let folders = library.list_folders()?;
            if folders.is_empty() {
                print_empty_result("folders");
                return Ok(());
            }
            println!("{}", OutputStyle::folder("/"));
            for folder in &folders {
                OutputStyle::print_folder_line(folder);
            }
            Ok(())
        },
        FolderCommands::Create { path } => {
            let library = open_library(&config)?;
            let created = library.create_folder(&path)?;
            print_success(&format!("Created folder /{}", created));
            Ok(())
        },
        FolderCommands::Rename { old, new } => {
            let mut library = open_library(&config)?;
            let renamed = library.rename_folder(&old, &new)?;
            print_success(&format!("Renamed folder to /{}", renamed));
            Ok(())
        },
        FolderCommands::Delete { path, force } => {
            let mut library = open_library(&config)?;
            if !force
                && !prompt_yes_no(&format!(
                    "Delete folder '{}'? Its prompts move to the parent folder",
                    path
                ))?
            {
                println!("Cancelled.");
                return Ok(());
            }
            let deleted = library.delete_folder(&path)?;
            print_success(&format!("Deleted folder /{}", deleted));
            Ok(())
        },
    }
}
