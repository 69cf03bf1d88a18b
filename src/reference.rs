use crate::error::{GhcloneError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

pub const GITHUB_HOST: &str = "github.com";

static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$").expect("slug regex"));

static SSH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:ssh://)?git@([A-Za-z0-9.-]+)[:/]([A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+)/?$")
        .expect("ssh regex")
});

static SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^github:([A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+)$").expect("shorthand regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    owner: String,
    name: String,
    canonical_url: String,
}

impl RepoRef {
    pub fn new(owner: &str, name: &str) -> Result<Self> {
        let name = strip_git_suffix(name);
        if [owner, name].iter().any(|part| part.chars().all(|c| c == '.')) {
            return Err(GhcloneError::InvalidReference(format!("{owner}/{name}")));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            canonical_url: format!("https://{GITHUB_HOST}/{owner}/{name}"),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canonical_url(&self) -> &str {
        &self.canonical_url
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn strip_git_suffix(name: &str) -> &str {
    name.strip_suffix(".git").unwrap_or(name)
}

pub fn normalize(input: &str) -> Result<RepoRef> {
    let input = input.trim();
    let invalid = || GhcloneError::InvalidReference(input.to_string());

    if input.contains("://") {
        return from_https(input).ok_or_else(invalid);
    }

    let caps = SLUG.captures(input).ok_or_else(invalid)?;
    RepoRef::new(&caps[1], &caps[2]).map_err(|_| invalid())
}

fn from_https(input: &str) -> Option<RepoRef> {
    let url = Url::parse(input).ok()?;
    if url.scheme() != "https" || url.host_str() != Some(GITHUB_HOST) {
        return None;
    }
    if url.query().is_some() || url.fragment().is_some() || !url.username().is_empty() {
        return None;
    }

    let mut segments: Vec<&str> = url.path_segments()?.collect();
    if segments.len() == 3 && segments[2].is_empty() {
        segments.pop();
    }
    match segments.as_slice() {
        [owner, name] => RepoRef::new(owner, name).ok(),
        _ => None,
    }
}

pub fn normalize_host_url(url: &str) -> Option<String> {
    let url = url.trim();
    let url = url.strip_prefix("git+").unwrap_or(url);

    let slug = if let Some(caps) = SSH.captures(url) {
        if &caps[1] != GITHUB_HOST {
            return None;
        }
        caps[2].to_string()
    } else if let Some(caps) = SHORTHAND.captures(url) {
        caps[1].to_string()
    } else if let Some(rest) = url.strip_prefix("git://") {
        let rest = rest.strip_prefix(GITHUB_HOST)?.strip_prefix('/')?;
        rest.trim_end_matches('/').to_string()
    } else if url.starts_with("https://") || url.starts_with("http://") {
        let https = url.replacen("http://", "https://", 1);
        return from_https(&https).map(|r| r.canonical_url().to_string());
    } else {
        return None;
    };

    normalize(&slug).ok().map(|r| r.canonical_url().to_string())
}
