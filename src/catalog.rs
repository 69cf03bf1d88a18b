use crate::fork::FORK_REMOTE;
use crate::git::repo;
use std::path::{Path, PathBuf};

/// Language -> marker files, probed top to bottom; first hit wins.
pub const LANGUAGE_MARKERS: &[(&str, &[&str])] = &[
    ("Rust", &["Cargo.toml"]),
    ("Go", &["go.mod"]),
    ("TypeScript", &["tsconfig.json"]),
    ("JavaScript", &["package.json"]),
    ("Python", &["pyproject.toml", "setup.py", "requirements.txt"]),
    ("Kotlin", &["build.gradle.kts"]),
    ("Java", &["pom.xml", "build.gradle"]),
    ("Ruby", &["Gemfile"]),
    ("PHP", &["composer.json"]),
    ("C#", &["global.json", "Directory.Build.props"]),
    ("Swift", &["Package.swift"]),
    ("Elixir", &["mix.exs"]),
    ("Haskell", &["stack.yaml"]),
    ("Dart", &["pubspec.yaml"]),
    ("Zig", &["build.zig"]),
    ("C/C++", &["CMakeLists.txt", "Makefile"]),
    ("Nix", &["flake.nix"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    pub dir_name: String,
    pub path: PathBuf,
    pub language: Option<&'static str>,
    pub depth: Option<usize>,
    pub forked: bool,
}

impl RepoEntry {
    pub fn display(&self) -> String {
        let depth = self
            .depth
            .map(|d| d.to_string())
            .unwrap_or_else(|| "?".to_string());
        let mut line = format!(
            "{}  {}  depth:{depth}",
            self.dir_name,
            self.language.unwrap_or("-")
        );
        if self.forked {
            line.push_str(" [forked]");
        }
        line
    }
}

pub fn detect_language(dir: &Path) -> Option<&'static str> {
    LANGUAGE_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| dir.join(m).exists()))
        .map(|(language, _)| *language)
}

fn inspect(path: PathBuf, dir_name: String) -> RepoEntry {
    let language = detect_language(&path);
    let (depth, forked) = match git2::Repository::open(&path) {
        Ok(r) => (
            repo::commit_count(&r).ok(),
            repo::has_remote(&r, FORK_REMOTE).unwrap_or(false),
        ),
        Err(e) => {
            tracing::debug!(path = %path.display(), "not a repository: {e}");
            (None, false)
        }
    };
    RepoEntry {
        dir_name,
        path,
        language,
        depth,
        forked,
    }
}

pub fn list(root_dir: &Path) -> Vec<RepoEntry> {
    let read = match std::fs::read_dir(root_dir) {
        Ok(read) => read,
        Err(e) => {
            tracing::debug!(root = %root_dir.display(), "cannot list: {e}");
            return Vec::new();
        }
    };

    let mut entries: Vec<RepoEntry> = read
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let dir_name = entry.file_name().to_string_lossy().into_owned();
            if dir_name.starts_with('.') {
                return None;
            }
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            is_dir.then(|| inspect(entry.path(), dir_name))
        })
        .collect();

    entries.sort_by_cached_key(|e| e.display().to_lowercase());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn marker_priority_first_match_wins() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("package.json"), "{}").unwrap();
        assert_eq!(detect_language(tmp.path()), Some("JavaScript"));
        std::fs::write(tmp.path().join("tsconfig.json"), "{}").unwrap();
        assert_eq!(detect_language(tmp.path()), Some("TypeScript"));
        std::fs::write(tmp.path().join("Cargo.toml"), "").unwrap();
        assert_eq!(detect_language(tmp.path()), Some("Rust"));
    }

    #[test]
    fn unknown_layout_has_no_language() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(detect_language(tmp.path()), None);
    }

    #[test]
    fn lists_sorted_with_placeholders() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();

        let repo_dir = root.join("zed---tool");
        std::fs::create_dir(&repo_dir).unwrap();
        let r = init_repo(&repo_dir);
        commit(&r, "second");
        r.remote("fork", "git@github.com:me/tool.git").unwrap();
        std::fs::write(repo_dir.join("go.mod"), "module x").unwrap();

        std::fs::create_dir(root.join("Alpha---lib")).unwrap();
        std::fs::create_dir(root.join("beta---app")).unwrap();
        std::fs::create_dir(root.join(".cache")).unwrap();
        std::fs::write(root.join("notes.txt"), "").unwrap();

        let entries = list(root);
        let names: Vec<&str> = entries.iter().map(|e| e.dir_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha---lib", "beta---app", "zed---tool"]);

        let plain = &entries[0];
        assert_eq!(plain.depth, None);
        assert!(!plain.forked);
        assert_eq!(plain.display(), "Alpha---lib  -  depth:?");

        let cloned = &entries[2];
        assert_eq!(cloned.depth, Some(2));
        assert!(cloned.forked);
        assert_eq!(cloned.language, Some("Go"));
        assert_eq!(cloned.display(), "zed---tool  Go  depth:2 [forked]");
    }

    #[test]
    fn missing_root_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(list(&tmp.path().join("nope")).is_empty());
    }
}
