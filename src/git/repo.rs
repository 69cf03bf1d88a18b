use crate::error::{GhcloneError, Result};
use git2::{BranchType, ErrorCode, Repository};
use std::path::{Path, PathBuf};

pub fn open_repo(path: &Path) -> Result<Repository> {
    Repository::discover(path)
        .map_err(|e| GhcloneError::NotARepo(format!("{}: {e}", path.display())))
}

pub fn workdir(repo: &Repository) -> Result<PathBuf> {
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or_else(|| GhcloneError::NotARepo(format!("{} is bare", repo.path().display())))
}

pub fn remote_url(repo: &Repository, name: &str) -> Result<Option<String>> {
    match repo.find_remote(name) {
        Ok(remote) => Ok(remote.url().map(String::from)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) if e.code() == ErrorCode::InvalidSpec => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn has_remote(repo: &Repository, name: &str) -> Result<bool> {
    let remotes = repo.remotes()?;
    Ok(remotes.iter().flatten().any(|r| r == name))
}

pub fn local_branch_exists(repo: &Repository, name: &str) -> Result<bool> {
    match repo.find_branch(name, BranchType::Local) {
        Ok(_) => Ok(true),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub fn commit_count(repo: &Repository) -> Result<usize> {
    let mut revwalk = repo.revwalk()?;
    revwalk.push_head()?;
    let mut count = 0;
    for oid in revwalk {
        oid?;
        count += 1;
    }
    Ok(count)
}
