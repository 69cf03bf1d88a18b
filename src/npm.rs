use crate::error::{GhcloneError, Result};
use crate::process::CommandRunner;
use crate::reference::{normalize, normalize_host_url, RepoRef};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RepositoryField {
    Text(String),
    Detailed {
        #[serde(rename = "type")]
        kind: Option<String>,
        url: Option<String>,
        path: Option<String>,
        user: Option<String>,
        project: Option<String>,
        repo: Option<String>,
        directory: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRepository {
    pub reference: RepoRef,
    pub directory: Option<String>,
}

fn reference_from_url(url: &str) -> Option<RepoRef> {
    normalize_host_url(url)
        .and_then(|canonical| normalize(&canonical).ok())
        .or_else(|| normalize(url).ok())
}

pub fn parse_repository(package: &str, json: &str) -> Result<Option<PackageRepository>> {
    if json.trim().is_empty() {
        return Ok(None);
    }
    let field: RepositoryField = serde_json::from_str(json)?;

    let resolved = match field {
        RepositoryField::Text(text) => reference_from_url(&text).map(|reference| PackageRepository {
            reference,
            directory: None,
        }),
        RepositoryField::Detailed {
            kind,
            url,
            path,
            user,
            project,
            repo,
            directory,
        } => {
            let from_url = url.or(path).and_then(|u| reference_from_url(&u));
            let from_parts = || {
                let user = user.as_deref()?;
                if kind.as_deref().is_some_and(|k| k != "github") {
                    return None;
                }
                let name = project
                    .or(repo)
                    .unwrap_or_else(|| unscoped(package).to_string());
                RepoRef::new(user, &name).ok()
            };
            from_url.or_else(from_parts).map(|reference| PackageRepository {
                reference,
                directory: directory.filter(|d| !d.is_empty()),
            })
        }
    };
    Ok(resolved)
}

fn unscoped(package: &str) -> &str {
    package.rsplit('/').next().unwrap_or(package)
}

pub fn lookup<R: CommandRunner>(runner: &R, npm: &str, package: &str) -> Result<PackageRepository> {
    runner.require(npm)?;
    let output = runner.run(npm, &["view", package, "repository", "--json"], None)?;
    if !output.success() {
        return Err(GhcloneError::InvalidReference(format!(
            "{package}: {}",
            output.diagnostic("npm view exited unsuccessfully")
        )));
    }

    let found = parse_repository(package, &output.stdout)?.ok_or_else(|| {
        GhcloneError::InvalidReference(format!("{package} declares no GitHub repository"))
    })?;
    if let Some(dir) = &found.directory {
        tracing::info!(package, directory = %dir, "package lives in a monorepo subdirectory");
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingRunner;

    fn slug(package: &str, json: &str) -> Option<String> {
        parse_repository(package, json)
            .unwrap()
            .map(|r| r.reference.slug())
    }

    #[test]
    fn bare_string_forms() {
        assert_eq!(slug("x", r#""github:owner/name""#).as_deref(), Some("owner/name"));
        assert_eq!(slug("x", r#""owner/name""#).as_deref(), Some("owner/name"));
        assert_eq!(
            slug("x", r#""git+https://github.com/owner/name.git""#).as_deref(),
            Some("owner/name")
        );
        assert_eq!(slug("x", r#""gitlab:owner/name""#), None);
    }

    #[test]
    fn object_with_url_and_directory() {
        let json = r#"{
            "type": "git",
            "url": "git+https://github.com/facebook/react.git",
            "directory": "packages/react-dom"
        }"#;
        let repo = parse_repository("react-dom", json).unwrap().unwrap();
        assert_eq!(repo.reference.slug(), "facebook/react");
        assert_eq!(repo.directory.as_deref(), Some("packages/react-dom"));
    }

    #[test]
    fn object_with_path() {
        let json = r#"{"path": "git@github.com:owner/name.git"}"#;
        assert_eq!(slug("x", json).as_deref(), Some("owner/name"));
    }

    #[test]
    fn object_with_host_parts() {
        let json = r#"{"type": "github", "user": "owner", "project": "name"}"#;
        assert_eq!(slug("x", json).as_deref(), Some("owner/name"));

        let json = r#"{"type": "github", "user": "babel", "directory": "packages/babel-core"}"#;
        let repo = parse_repository("@babel/core", json).unwrap().unwrap();
        assert_eq!(repo.reference.slug(), "babel/core");
        assert_eq!(repo.directory.as_deref(), Some("packages/babel-core"));

        let json = r#"{"type": "bitbucket", "user": "owner", "project": "name"}"#;
        assert_eq!(slug("x", json), None);
    }

    #[test]
    fn empty_output_means_no_repository() {
        assert_eq!(parse_repository("x", "\n").unwrap(), None);
    }

    #[test]
    fn lookup_invokes_npm_view() {
        let runner = RecordingRunner::new().respond(
            "npm view left-pad",
            0,
            r#""git+https://github.com/left-pad/left-pad.git""#,
            "",
        );
        let repo = lookup(&runner, "npm", "left-pad").unwrap();
        assert_eq!(repo.reference.canonical_url(), "https://github.com/left-pad/left-pad");
        assert_eq!(runner.lines(), vec!["npm view left-pad repository --json"]);
    }

    #[test]
    fn lookup_without_repository_is_hard_error() {
        let runner = RecordingRunner::new().respond("npm view", 0, "", "");
        let err = lookup(&runner, "npm", "private-thing").unwrap_err();
        assert!(matches!(err, GhcloneError::InvalidReference(m) if m.contains("private-thing")));
    }

    #[test]
    fn lookup_without_npm_fails() {
        let runner = RecordingRunner::new().without("npm");
        assert!(matches!(
            lookup(&runner, "npm", "x"),
            Err(GhcloneError::MissingDependency(_))
        ));
    }
}
