use crate::error::Result;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

pub const MANIFEST_FILE: &str = "package.json";
pub const DEPENDENCY_SECTIONS: [&str; 2] = ["dependencies", "devDependencies"];

// An object key with its opening brace, a bare string, or a brace.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)"\s*:\s*\{|"(?:[^"\\]|\\.)*"|\{|\}"#).expect("token regex")
});

static ENTRY_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*"((?:[^"\\]|\\.)+)"\s*:"#).expect("entry regex"));

pub fn dependency_names(contents: &str) -> Result<Vec<String>> {
    let manifest: Value = serde_json::from_str(contents)?;
    let names: BTreeSet<String> = DEPENDENCY_SECTIONS
        .iter()
        .filter_map(|section| manifest.get(section).and_then(Value::as_object))
        .flat_map(|deps| deps.keys().cloned())
        .collect();
    Ok(names.into_iter().collect())
}

pub fn read_dependency_names(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    dependency_names(&contents)
}

/// Name of the dependency entry on `line` (zero-based), if that line is an
/// entry of one of the dependency sections.
pub fn dependency_at_line(contents: &str, line: usize) -> Option<String> {
    let mut stack: Vec<Option<String>> = Vec::new();
    for text in contents.lines().take(line) {
        for caps in TOKEN.captures_iter(text) {
            let token = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            if let Some(key) = caps.get(1) {
                stack.push(Some(key.as_str().to_string()));
            } else if token == "{" {
                stack.push(None);
            } else if token == "}" {
                stack.pop();
            }
        }
    }

    // root object, then the section object
    if stack.len() != 2 {
        return None;
    }
    let section = stack.last()?.as_deref()?;
    if !DEPENDENCY_SECTIONS.contains(&section) {
        return None;
    }

    let caret_line = contents.lines().nth(line)?;
    ENTRY_KEY
        .captures(caret_line)
        .map(|caps| caps[1].to_string())
}
