//! MCP tool definitions and execution.
//!
//! Each tool wraps one library operation. Domain failures never become
//! JSON-RPC errors; they come back as a tool result with `isError` set and
//! a machine-readable error payload in the text content.

use crate::library::Library;
use crate::models::{Prompt, PromptPatch, SearchQuery};
use crate::utils::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;

/// Definition of an MCP tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(default)]
    pub is_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

impl ToolResult {
    fn ok(value: Value) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string()),
            }],
            is_error: false,
        }
    }

    fn err(error: &AppError) -> Self {
        let payload = json!({
            "error": {
                "kind": error.kind(),
                "message": error.to_string(),
            }
        });
        Self {
            content: vec![ToolContent::Text {
                text: serde_json::to_string_pretty(&payload)
                    .unwrap_or_else(|_| "{}".to_string()),
            }],
            is_error: true,
        }
    }
}

/// Registry of the prompt-library tools, in stable listing order.
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
}

impl ToolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: definitions(),
        }
    }

    #[must_use]
    pub fn list_tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Executes a tool against the shared library. `Err` is reserved for
    /// protocol-level problems (unknown tool, malformed arguments).
    pub fn execute(
        &self,
        library: &mut Library,
        name: &str,
        arguments: Value,
    ) -> Result<ToolResult, String> {
        let outcome = match name {
            "create_prompt" => execute_create_prompt(library, arguments)?,
            "get_prompt" => execute_get_prompt(library, arguments)?,
            "update_prompt" => execute_update_prompt(library, arguments)?,
            "delete_prompt" => execute_delete_prompt(library, arguments)?,
            "search_prompts" => execute_search_prompts(library, arguments)?,
            "render_prompt" => execute_render_prompt(library, arguments)?,
            "list_folders" => library.list_folders().map(|folders| json!({ "folders": folders })),
            "create_folder" => execute_create_folder(library, arguments)?,
            "rename_folder" => execute_rename_folder(library, arguments)?,
            "delete_folder" => execute_delete_folder(library, arguments)?,
            "list_tags" => execute_list_tags(library, arguments)?,
            "create_tag" => execute_create_tag(library, arguments)?,
            "update_tag" => execute_update_tag(library, arguments)?,
            "delete_tag" => execute_delete_tag(library, arguments)?,
            _ => return Err(format!("Unknown tool: {name}")),
        };

        Ok(match outcome {
            Ok(value) => ToolResult::ok(value),
            Err(e) => ToolResult::err(&e),
        })
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(arguments: Value) -> Result<T, String> {
    serde_json::from_value(arguments).map_err(|e| format!("Invalid arguments: {e}"))
}

fn prompt_value(prompt: &Prompt) -> Value {
    json!({ "prompt": prompt })
}

#[derive(Debug, Deserialize)]
struct CreatePromptArgs {
    title: String,
    content: String,
    description: Option<String>,
    folder_path: Option<String>,
    tags: Option<Vec<String>>,
}

fn execute_create_prompt(
    library: &mut Library,
    arguments: Value,
) -> Result<AppResult<Value>, String> {
    let args: CreatePromptArgs = parse_args(arguments)?;
    Ok(library
        .create_prompt(
            &args.title,
            &args.content,
            args.description.as_deref(),
            args.folder_path.as_deref(),
            &args.tags.unwrap_or_default(),
        )
        .map(|p| prompt_value(&p)))
}

#[derive(Debug, Deserialize)]
struct IdArgs {
    id: i64,
}

fn execute_get_prompt(library: &mut Library, arguments: Value) -> Result<AppResult<Value>, String> {
    let args: IdArgs = parse_args(arguments)?;
    Ok(library.get_prompt(args.id).map(|p| prompt_value(&p)))
}

#[derive(Debug, Deserialize)]
struct UpdatePromptArgs {
    id: i64,
    #[serde(flatten)]
    patch: PromptPatch,
}

fn execute_update_prompt(
    library: &mut Library,
    arguments: Value,
) -> Result<AppResult<Value>, String> {
    let args: UpdatePromptArgs = parse_args(arguments)?;
    Ok(library
        .update_prompt(args.id, &args.patch)
        .map(|p| prompt_value(&p)))
}

fn execute_delete_prompt(
    library: &mut Library,
    arguments: Value,
) -> Result<AppResult<Value>, String> {
    let args: IdArgs = parse_args(arguments)?;
    Ok(library
        .delete_prompt(args.id)
        .map(|p| json!({ "deleted": p.id })))
}

#[derive(Debug, Deserialize)]
struct SearchPromptsArgs {
    query: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    folder_path: Option<String>,
    limit: Option<u32>,
}

fn execute_search_prompts(
    library: &mut Library,
    arguments: Value,
) -> Result<AppResult<Value>, String> {
    let args: SearchPromptsArgs = parse_args(arguments)?;
    let query = SearchQuery {
        query: args.query,
        tags: args.tags,
        folder_path: args.folder_path,
        limit: args.limit,
    };
    Ok(library
        .search_prompts(&query)
        .map(|prompts| json!({ "count": prompts.len(), "prompts": prompts })))
}

#[derive(Debug, Deserialize)]
struct RenderPromptArgs {
    id: i64,
    #[serde(default)]
    variables: HashMap<String, String>,
}

fn execute_render_prompt(
    library: &mut Library,
    arguments: Value,
) -> Result<AppResult<Value>, String> {
    let args: RenderPromptArgs = parse_args(arguments)?;
    Ok(library.render_prompt(args.id, &args.variables).map(
        |(prompt, rendering)| {
            json!({
                "id": prompt.id,
                "title": prompt.title,
                "rendered": rendering.text,
                "substituted": rendering.substituted,
                "missing": rendering.missing,
            })
        },
    ))
}

#[derive(Debug, Deserialize)]
struct FolderPathArgs {
    path: String,
}

fn execute_create_folder(
    library: &mut Library,
    arguments: Value,
) -> Result<AppResult<Value>, String> {
    let args: FolderPathArgs = parse_args(arguments)?;
    Ok(library
        .create_folder(&args.path)
        .map(|path| json!({ "created": path.as_str() })))
}

#[derive(Debug, Deserialize)]
struct RenameFolderArgs {
    old_path: String,
    new_path: String,
}

fn execute_rename_folder(
    library: &mut Library,
    arguments: Value,
) -> Result<AppResult<Value>, String> {
    let args: RenameFolderArgs = parse_args(arguments)?;
    Ok(library
        .rename_folder(&args.old_path, &args.new_path)
        .map(|path| json!({ "renamed_to": path.as_str() })))
}

fn execute_delete_folder(
    library: &mut Library,
    arguments: Value,
) -> Result<AppResult<Value>, String> {
    let args: FolderPathArgs = parse_args(arguments)?;
    Ok(library
        .delete_folder(&args.path)
        .map(|path| json!({ "deleted": path.as_str() })))
}

#[derive(Debug, Deserialize)]
struct ListTagsArgs {
    category: Option<String>,
}

fn execute_list_tags(
    library: &mut Library,
    arguments: Value,
) -> Result<AppResult<Value>, String> {
    let args: ListTagsArgs = parse_args(arguments)?;
    Ok(library
        .list_tags(args.category.as_deref())
        .map(|tags| json!({ "tags": tags })))
}

#[derive(Debug, Deserialize)]
struct CreateTagArgs {
    name: String,
    category: Option<String>,
    color: Option<String>,
}

fn execute_create_tag(
    library: &mut Library,
    arguments: Value,
) -> Result<AppResult<Value>, String> {
    let args: CreateTagArgs = parse_args(arguments)?;
    Ok(library
        .create_tag(&args.name, args.category.as_deref(), args.color.as_deref())
        .map(|tag| json!({ "tag": tag })))
}

#[derive(Debug, Deserialize)]
struct UpdateTagArgs {
    name: String,
    new_name: Option<String>,
    category: Option<String>,
    color: Option<String>,
}

fn execute_update_tag(
    library: &mut Library,
    arguments: Value,
) -> Result<AppResult<Value>, String> {
    let args: UpdateTagArgs = parse_args(arguments)?;
    Ok(library
        .update_tag(
            &args.name,
            args.new_name.as_deref(),
            args.category.as_deref(),
            args.color.as_deref(),
        )
        .map(|tag| json!({ "tag": tag })))
}

#[derive(Debug, Deserialize)]
struct TagNameArgs {
    name: String,
}

fn execute_delete_tag(
    library: &mut Library,
    arguments: Value,
) -> Result<AppResult<Value>, String> {
    let args: TagNameArgs = parse_args(arguments)?;
    Ok(library
        .delete_tag(&args.name)
        .map(|()| json!({ "deleted": args.name })))
}

fn definitions() -> Vec<ToolDefinition> {
    let id_schema = json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer", "description": "Prompt ID" }
        },
        "required": ["id"]
    });

    vec![
        ToolDefinition {
            name: "create_prompt".to_string(),
            description: "Create a new prompt. Unknown tags are created automatically; the folder comes into existence implicitly.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "Prompt title" },
                    "content": { "type": "string", "description": "Prompt text; may contain {var} or {{var}} placeholders" },
                    "description": { "type": "string", "description": "Optional summary" },
                    "folder_path": { "type": "string", "description": "Folder path like 'AI/Coding'; omit for the root folder" },
                    "tags": { "type": "array", "items": { "type": "string" }, "description": "Tag names" }
                },
                "required": ["title", "content"]
            }),
        },
        ToolDefinition {
            name: "get_prompt".to_string(),
            description: "Fetch one prompt by ID, including its tags.".to_string(),
            input_schema: id_schema.clone(),
        },
        ToolDefinition {
            name: "update_prompt".to_string(),
            description: "Update fields of a prompt. Omitted fields are left untouched; a supplied tag list replaces all tags.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "description": "Prompt ID" },
                    "title": { "type": "string" },
                    "content": { "type": "string" },
                    "description": { "type": "string", "description": "New description; an empty string clears it" },
                    "folder_path": { "type": "string", "description": "Move the prompt to this folder" },
                    "tags": { "type": "array", "items": { "type": "string" }, "description": "Replacement tag list" }
                },
                "required": ["id"]
            }),
        },
        ToolDefinition {
            name: "delete_prompt".to_string(),
            description: "Delete a prompt by ID.".to_string(),
            input_schema: id_schema.clone(),
        },
        ToolDefinition {
            name: "search_prompts".to_string(),
            description: "Search prompts by text (title, content, description), required tags and exact folder. Results come back most recently updated first.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Case-insensitive substring" },
                    "tags": { "type": "array", "items": { "type": "string" }, "description": "Prompt must carry every listed tag" },
                    "folder_path": { "type": "string", "description": "Exact folder (not its subtree)" },
                    "limit": { "type": "integer", "description": "Maximum results (default 10)", "minimum": 1, "maximum": 1000 }
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "render_prompt".to_string(),
            description: "Substitute variables into a prompt's {var} / {{var}} placeholders. Unmatched placeholders pass through and are reported as missing.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "description": "Prompt ID" },
                    "variables": {
                        "type": "object",
                        "additionalProperties": { "type": "string" },
                        "description": "Placeholder name to value"
                    }
                },
                "required": ["id"]
            }),
        },
        ToolDefinition {
            name: "list_folders".to_string(),
            description: "List every folder with its direct prompt count, including folders implied by prompt paths.".to_string(),
            input_schema: json!({ "type": "object", "properties": {}, "required": [] }),
        },
        ToolDefinition {
            name: "create_folder".to_string(),
            description: "Create a folder (and its ancestors). Idempotent.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "description": "Folder path like 'AI/Coding'" }
                },
                "required": ["path"]
            }),
        },
        ToolDefinition {
            name: "rename_folder".to_string(),
            description: "Rename or move a folder; every prompt and subfolder below it follows.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "old_path": { "type": "string", "description": "Current folder path" },
                    "new_path": { "type": "string", "description": "New folder path" }
                },
                "required": ["old_path", "new_path"]
            }),
        },
        ToolDefinition {
            name: "delete_folder".to_string(),
            description: "Delete a folder. Prompts in it or below it move to its parent folder; no prompt is deleted.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "description": "Folder path" }
                },
                "required": ["path"]
            }),
        },
        ToolDefinition {
            name: "list_tags".to_string(),
            description: "List tags sorted by name, optionally only those in one category.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "category": { "type": "string", "description": "Only tags with this category" }
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "create_tag".to_string(),
            description: "Create a tag. Names are unique case-insensitively.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Tag name" },
                    "category": { "type": "string", "description": "Optional grouping" },
                    "color": { "type": "string", "description": "Display color, e.g. #3B82F6" }
                },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: "update_tag".to_string(),
            description: "Rename a tag or change its category/color. A rename carries every prompt association with it.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Current tag name" },
                    "new_name": { "type": "string" },
                    "category": { "type": "string" },
                    "color": { "type": "string" }
                },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: "delete_tag".to_string(),
            description: "Delete a tag and remove it from every prompt. Prompts themselves survive.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Tag name" }
                },
                "required": ["name"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(library: &mut Library, name: &str, args: Value) -> ToolResult {
        ToolRegistry::new().execute(library, name, args).unwrap()
    }

    fn text_of(result: &ToolResult) -> Value {
        let ToolContent::Text { text } = &result.content[0];
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn registry_lists_every_tool_once() {
        let registry = ToolRegistry::new();
        let names: Vec<&str> = registry
            .list_tools()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names.len(), 14);
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names, deduped);
        assert!(names.contains(&"create_prompt"));
        assert!(names.contains(&"render_prompt"));
    }

    #[test]
    fn create_then_get_round_trips() {
        let mut library = Library::in_memory().unwrap();

        let created = call(
            &mut library,
            "create_prompt",
            json!({
                "title": "Review",
                "content": "Review {language} code",
                "folder_path": "AI/Coding",
                "tags": ["rust"]
            }),
        );
        assert!(!created.is_error);
        let id = text_of(&created)["prompt"]["id"].as_i64().unwrap();

        let fetched = call(&mut library, "get_prompt", json!({ "id": id }));
        let value = text_of(&fetched);
        assert_eq!(value["prompt"]["title"], "Review");
        assert_eq!(value["prompt"]["folder_path"], "AI/Coding");
        assert_eq!(value["prompt"]["tags"][0], "rust");
    }

    #[test]
    fn domain_errors_become_tool_errors_not_protocol_errors() {
        let mut library = Library::in_memory().unwrap();
        let result = call(&mut library, "get_prompt", json!({ "id": 404 }));
        assert!(result.is_error);
        let value = text_of(&result);
        assert_eq!(value["error"]["kind"], "not_found");
    }

    #[test]
    fn malformed_arguments_are_protocol_errors() {
        let mut library = Library::in_memory().unwrap();
        let err = ToolRegistry::new()
            .execute(&mut library, "get_prompt", json!({ "id": "seven" }))
            .unwrap_err();
        assert!(err.contains("Invalid arguments"));
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let mut library = Library::in_memory().unwrap();
        let err = ToolRegistry::new()
            .execute(&mut library, "bogus_tool", json!({}))
            .unwrap_err();
        assert!(err.contains("Unknown tool"));
    }

    #[test]
    fn render_reports_missing_placeholders() {
        let mut library = Library::in_memory().unwrap();
        let created = call(
            &mut library,
            "create_prompt",
            json!({ "title": "t", "content": "Hi {name}, {mood}?" }),
        );
        let id = text_of(&created)["prompt"]["id"].as_i64().unwrap();

        let rendered = call(
            &mut library,
            "render_prompt",
            json!({ "id": id, "variables": { "name": "Ann" } }),
        );
        let value = text_of(&rendered);
        assert_eq!(value["rendered"], "Hi Ann, {mood}?");
        assert_eq!(value["substituted"][0], "name");
        assert_eq!(value["missing"][0], "mood");
    }

    #[test]
    fn list_tags_filters_by_category() {
        let mut library = Library::in_memory().unwrap();
        call(
            &mut library,
            "create_tag",
            json!({ "name": "rust", "category": "language" }),
        );
        call(
            &mut library,
            "create_tag",
            json!({ "name": "review", "category": "workflow" }),
        );

        let all = call(&mut library, "list_tags", json!({}));
        assert_eq!(text_of(&all)["tags"].as_array().unwrap().len(), 2);

        let filtered = call(&mut library, "list_tags", json!({ "category": "language" }));
        let value = text_of(&filtered);
        let tags = value["tags"].as_array().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0]["name"], "rust");
    }

    #[test]
    fn folder_tools_cascade() {
        let mut library = Library::in_memory().unwrap();
        let created = call(
            &mut library,
            "create_prompt",
            json!({ "title": "t", "content": "c", "folder_path": "AI/Coding" }),
        );
        let id = text_of(&created)["prompt"]["id"].as_i64().unwrap();

        let renamed = call(
            &mut library,
            "rename_folder",
            json!({ "old_path": "AI", "new_path": "ML" }),
        );
        assert!(!renamed.is_error);

        let fetched = call(&mut library, "get_prompt", json!({ "id": id }));
        assert_eq!(text_of(&fetched)["prompt"]["folder_path"], "ML/Coding");
    }
}
