//! Prompt subcommands: add, list, search, show, edit, delete, render.

use super::open_library;
use crate::cli::{AddArgs, DeleteArgs, EditArgs, ListArgs, RenderArgs, SearchArgs, ShowArgs};
use crate::config::Config;
use crate::models::{PromptPatch, SearchQuery};
use crate::utils::error::{AppError, AppResult};
use crate::utils::output::{OutputStyle, print_empty_result, print_success};
use crate::utils::{parse_variables, prompt_yes_no};
use std::io::Read;

pub fn handle_init_command(config: Config) -> AppResult<()> {
    Config::ensure_config_exists()?;
    let library = open_library(&config)?;
    drop(library);
    print_success(&format!(
        "Initialized database at {}",
        config.general.database_path.display()
    ));
    Ok(())
}

pub fn handle_add_command(config: Config, args: &AddArgs) -> AppResult<()> {
    let content = match &args.content {
        Some(content) => content.clone(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| AppError::InvalidArgument(format!("reading stdin: {}", e)))?;
            buf
        },
    };

    let mut library = open_library(&config)?;
    let prompt = library.create_prompt(
        &args.title,
        &content,
        args.description.as_deref(),
        args.folder.as_deref(),
        &args.tags,
    )?;

    print_success(&format!("Saved prompt '{}' (id {})", prompt.title, prompt.id));
    Ok(())
}

pub fn handle_list_command(config: Config, args: &ListArgs) -> AppResult<()> {
    let query = SearchQuery {
        query: None,
        tags: args.tags.clone(),
        folder_path: args.folder.clone(),
        limit: Some(args.limit.unwrap_or(config.general.default_limit)),
    };
    print_results(&config, &query)
}

pub fn handle_search_command(config: Config, args: &SearchArgs) -> AppResult<()> {
    let query = SearchQuery {
        query: args.query.clone(),
        tags: args.tags.clone(),
        folder_path: args.folder.clone(),
        limit: Some(args.limit.unwrap_or(config.general.default_limit)),
    };
    print_results(&config, &query)
}

fn print_results(config: &Config, query: &SearchQuery) -> AppResult<()> {
    let library = open_library(config)?;
    let prompts = library.search_prompts(query)?;

    if prompts.is_empty() {
        print_empty_result("prompts");
        return Ok(());
    }
    for prompt in &prompts {
        OutputStyle::print_prompt_line(prompt);
    }
    Ok(())
}

pub fn handle_show_command(config: Config, args: &ShowArgs) -> AppResult<()> {
    let library = open_library(&config)?;
    let prompt = library.get_prompt(args.id)?;
    OutputStyle::print_prompt_detailed(&prompt);

    let placeholders = crate::template::placeholder_names(&prompt.content);
    if !placeholders.is_empty() {
        println!("{}", OutputStyle::separator());
        OutputStyle::print_field("Variables", &placeholders.join(", "));
    }
    Ok(())
}

pub fn handle_edit_command(config: Config, args: &EditArgs) -> AppResult<()> {
    let patch = PromptPatch {
        title: args.title.clone(),
        content: args.content.clone(),
        description: args.description.clone(),
        folder_path: args.folder.clone(),
        tags: args.tags.clone(),
    };

    let mut library = open_library(&config)?;
    let prompt = library.update_prompt(args.id, &patch)?;
    print_success(&format!("Updated prompt '{}' (id {})", prompt.title, prompt.id));
    Ok(())
}

pub fn handle_delete_command(config: Config, args: &DeleteArgs) -> AppResult<()> {
    let mut library = open_library(&config)?;
    let prompt = library.get_prompt(args.id)?;

    if !args.force && !prompt_yes_no(&format!("Delete prompt '{}'?", prompt.title))? {
        println!("Cancelled.");
        return Ok(());
    }

    library.delete_prompt(args.id)?;
    print_success(&format!("Deleted prompt '{}'", prompt.title));
    Ok(())
}

pub fn handle_render_command(config: Config, args: &RenderArgs) -> AppResult<()> {
    let variables = parse_variables(&args.vars)?;
    let library = open_library(&config)?;
    let (_, rendering) = library.render_prompt(args.id, &variables)?;

    // Rendered text goes to stdout untouched so it can be piped.
    println!("{}", rendering.text);
    if !rendering.missing.is_empty() {
        let names: Vec<&str> = rendering.missing.iter().map(String::as_str).collect();
        crate::utils::output::print_warning(&format!(
            "unfilled placeholders: {}",
            names.join(", ")
        ));
    }
    Ok(())
}
