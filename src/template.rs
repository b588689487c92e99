use regex::{Captures, Regex};
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

/// Outcome of rendering a template: the substituted text plus which
/// placeholder names were filled in and which were left verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    pub text: String,
    pub substituted: BTreeSet<String>,
    pub missing: BTreeSet<String>,
}

/// Matches `{{name}}` before `{name}` at the same position, so a
/// double-brace span is never read as a braced single-brace span.
fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}|\{([A-Za-z0-9_]+)\}").unwrap()
    })
}

/// Substitutes `{name}` and `{{name}}` placeholders in `content`.
///
/// Both syntaxes refer to the same variable. Names absent from `variables`
/// stay verbatim in the output and are reported in `missing` so callers can
/// warn the user. Replacement text is inserted as-is, never re-scanned for
/// further placeholders. Pure: no side effects on the prompt.
pub fn render(content: &str, variables: &HashMap<String, String>) -> Rendering {
    let mut substituted = BTreeSet::new();
    let mut missing = BTreeSet::new();

    let text = placeholder_re()
        .replace_all(content, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();

            if let Some(value) = variables.get(name) {
                substituted.insert(name.to_string());
                value.clone()
            } else {
                missing.insert(name.to_string());
                caps.get(0).map(|m| m.as_str()).unwrap_or_default().to_string()
            }
        })
        .into_owned();

    Rendering {
        text,
        substituted,
        missing,
    }
}

/// Placeholder names present in `content`, in first-appearance order.
pub fn placeholder_names(content: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::new();
    for caps in placeholder_re().captures_iter(content) {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        if seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_both_syntaxes_for_one_variable() {
        let out = render("Hello {name}, {{name}}!", &vars(&[("name", "Ann")]));
        assert_eq!(out.text, "Hello Ann, Ann!");
        assert!(out.substituted.contains("name"));
        assert!(out.missing.is_empty());
    }

    #[test]
    fn missing_variables_pass_through_and_are_reported() {
        let out = render("Hello {name}, {{name}}!", &HashMap::new());
        assert_eq!(out.text, "Hello {name}, {{name}}!");
        assert!(out.substituted.is_empty());
        assert_eq!(out.missing.iter().collect::<Vec<_>>(), ["name"]);
    }

    #[test]
    fn replacement_text_is_not_rescanned() {
        let out = render("{outer}", &vars(&[("outer", "{inner}"), ("inner", "x")]));
        assert_eq!(out.text, "{inner}");
    }

    #[test]
    fn double_brace_wins_over_single_at_same_position() {
        // Without longest-match-first, "{{x}}" would read as "{" + "{x}" + "}".
        let out = render("{{x}}", &vars(&[("x", "v")]));
        assert_eq!(out.text, "v");

        let missing = render("{{x}}", &HashMap::new());
        assert_eq!(missing.text, "{{x}}");
    }

    #[test]
    fn non_identifier_braces_are_left_alone() {
        let out = render("json: { \"a\": 1 } and {a-b}", &vars(&[("a", "v")]));
        assert_eq!(out.text, "json: { \"a\": 1 } and {a-b}");
        assert!(out.missing.is_empty());
    }

    #[test]
    fn mixed_present_and_missing() {
        let out = render("{a} {b} {{c}}", &vars(&[("a", "1"), ("c", "3")]));
        assert_eq!(out.text, "1 {b} 3");
        assert_eq!(out.substituted.len(), 2);
        assert_eq!(out.missing.iter().collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn lists_placeholder_names_once_in_order() {
        let names = placeholder_names("{b} {{a}} {b} {a}");
        assert_eq!(names, ["b", "a"]);
    }
}
