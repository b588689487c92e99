//! End-to-end tests against a database file on disk, the way the CLI and
//! the MCP server share it.

use promptstash::models::{PromptPatch, SearchQuery};
use promptstash::Library;
use std::collections::HashMap;
use tempfile::TempDir;

fn open_library(dir: &TempDir) -> Library {
    Library::open(dir.path().join("prompts.db")).unwrap()
}

#[test]
fn database_persists_across_reopens() {
    let dir = TempDir::new().unwrap();

    let id = {
        let mut library = open_library(&dir);
        library
            .create_prompt(
                "Code Review",
                "Review {language} code for {focus}",
                Some("general review helper"),
                Some("AI/Coding"),
                &["rust".to_string(), "review".to_string()],
            )
            .unwrap()
            .id
    };

    // Fresh handle on the same file, as a second process would take.
    let library = open_library(&dir);
    let prompt = library.get_prompt(id).unwrap();
    assert_eq!(prompt.title, "Code Review");
    assert_eq!(prompt.folder_path, "AI/Coding");
    assert_eq!(prompt.tags, ["review", "rust"]);
}

#[test]
fn folder_rename_and_delete_cascade_end_to_end() {
    let dir = TempDir::new().unwrap();
    let mut library = open_library(&dir);

    let a = library
        .create_prompt("a", "c", None, Some("AI/Coding"), &[])
        .unwrap();
    let b = library
        .create_prompt("b", "c", None, Some("AI/Coding/Python"), &[])
        .unwrap();

    library.rename_folder("AI", "ML").unwrap();
    assert_eq!(library.get_prompt(a.id).unwrap().folder_path, "ML/Coding");
    assert_eq!(
        library.get_prompt(b.id).unwrap().folder_path,
        "ML/Coding/Python"
    );

    library.delete_folder("ML/Coding").unwrap();
    assert_eq!(library.get_prompt(a.id).unwrap().folder_path, "ML");
    assert_eq!(library.get_prompt(b.id).unwrap().folder_path, "ML");

    let paths: Vec<String> = library
        .list_folders()
        .unwrap()
        .into_iter()
        .map(|f| f.path)
        .collect();
    assert_eq!(paths, ["ML"]);
}

#[test]
fn search_combines_text_tags_and_folder() {
    let dir = TempDir::new().unwrap();
    let mut library = open_library(&dir);

    library
        .create_prompt(
            "Review helper",
            "look carefully",
            None,
            Some("Work"),
            &["rust".to_string()],
        )
        .unwrap();
    library
        .create_prompt(
            "Review notes",
            "look carefully",
            None,
            Some("Work"),
            &["python".to_string()],
        )
        .unwrap();
    library
        .create_prompt(
            "Review elsewhere",
            "look carefully",
            None,
            Some("Play"),
            &["rust".to_string()],
        )
        .unwrap();

    let found = library
        .search_prompts(&SearchQuery {
            query: Some("review".to_string()),
            tags: vec!["rust".to_string()],
            folder_path: Some("Work".to_string()),
            limit: None,
        })
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Review helper");
}

#[test]
fn tag_rename_reaches_every_prompt() {
    let dir = TempDir::new().unwrap();
    let mut library = open_library(&dir);

    let ids: Vec<i64> = (0..3)
        .map(|n| {
            library
                .create_prompt(
                    &format!("p{n}"),
                    "c",
                    None,
                    None,
                    &["draft".to_string()],
                )
                .unwrap()
                .id
        })
        .collect();

    library
        .update_tag("draft", Some("published"), None, None)
        .unwrap();

    for id in ids {
        assert_eq!(library.get_prompt(id).unwrap().tags, ["published"]);
    }
}

#[test]
fn update_then_render_uses_latest_content() {
    let dir = TempDir::new().unwrap();
    let mut library = open_library(&dir);

    let prompt = library
        .create_prompt("t", "Hello {name}", None, None, &[])
        .unwrap();

    library
        .update_prompt(
            prompt.id,
            &PromptPatch {
                content: Some("Goodbye {{name}}".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let vars = HashMap::from([("name".to_string(), "Ann".to_string())]);
    let (_, rendering) = library.render_prompt(prompt.id, &vars).unwrap();
    assert_eq!(rendering.text, "Goodbye Ann");
}

#[test]
fn failed_delete_leaves_no_trace() {
    let dir = TempDir::new().unwrap();
    let mut library = open_library(&dir);

    let prompt = library.create_prompt("keep", "c", None, None, &[]).unwrap();
    let err = library.delete_prompt(prompt.id + 10).unwrap_err();
    assert_eq!(err.kind(), "not_found");

    let all = library.search_prompts(&SearchQuery::default()).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "keep");
}
