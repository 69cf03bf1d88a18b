use crate::clone::CloneTarget;
use crate::config::Config;
use crate::error::{GhcloneError, Result};
use crate::git::repo;
use crate::lock::ForkLock;
use crate::process::CommandRunner;
use crate::reference::{normalize, normalize_host_url, RepoRef};
use std::path::{Path, PathBuf};

pub const FORK_REMOTE: &str = "fork";
pub const ORIGIN_REMOTE: &str = "origin";
pub const BRANCH_STEM: &str = "forked";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeAllocation {
    pub branch_name: String,
    pub worktree_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkOutcome {
    pub upstream: RepoRef,
    pub allocation: WorktreeAllocation,
    pub fork_created: bool,
    pub push_warning: Option<String>,
}

/// First of `forked`, `forked1`, `forked2`, ... for which `exists` is false.
pub fn next_branch_name(mut exists: impl FnMut(&str) -> Result<bool>) -> Result<String> {
    let mut n = 0usize;
    loop {
        let candidate = if n == 0 {
            BRANCH_STEM.to_string()
        } else {
            format!("{BRANCH_STEM}{n}")
        };
        if !exists(&candidate)? {
            return Ok(candidate);
        }
        n += 1;
    }
}

pub fn next_worktree_path(dir: &Path, repo_dir_name: &str, branch: &str) -> PathBuf {
    let base = format!("{repo_dir_name}-{branch}");
    let mut candidate = dir.join(&base);
    let mut n = 1usize;
    while candidate.exists() {
        candidate = dir.join(format!("{base}-{n}"));
        n += 1;
    }
    candidate
}

pub fn parse_origin(url: &str) -> Result<RepoRef> {
    normalize_host_url(url)
        .and_then(|canonical| normalize(&canonical).ok())
        .or_else(|| normalize(url).ok())
        .ok_or_else(|| GhcloneError::UnparsableOrigin(url.to_string()))
}

pub fn locate_repo(input: Option<&str>, cwd: &Path, repos_dir: &Path) -> Result<PathBuf> {
    let input = input.map(str::trim).filter(|s| !s.is_empty());
    let start = match input {
        None => cwd.to_path_buf(),
        Some(arg) if cwd.join(arg).is_dir() => cwd.join(arg),
        Some(arg) => {
            let reference = normalize(arg)?;
            let target = CloneTarget::new(repos_dir, &reference).path();
            if !target.is_dir() {
                return Err(GhcloneError::NotARepo(format!(
                    "{reference} is not cloned at {}",
                    target.display()
                )));
            }
            target
        }
    };
    let found = repo::open_repo(&start)?;
    repo::workdir(&found)
}

pub struct ForkWorkflow<'a, R: CommandRunner> {
    runner: &'a R,
    config: &'a Config,
}

impl<'a, R: CommandRunner> ForkWorkflow<'a, R> {
    pub fn new(runner: &'a R, config: &'a Config) -> Self {
        Self { runner, config }
    }

    pub fn fork(&self, repo_path: &Path) -> Result<ForkOutcome> {
        self.runner.require(&self.config.git)?;
        self.runner.require(&self.config.gh)?;

        let git_repo = repo::open_repo(repo_path)?;
        let workdir = repo::workdir(&git_repo)?;

        let origin = repo::remote_url(&git_repo, ORIGIN_REMOTE)?
            .ok_or(GhcloneError::NoOriginRemote)?;
        let upstream = parse_origin(&origin)?;
        tracing::debug!(%upstream, workdir = %workdir.display(), "forking");

        let fork_created = if repo::has_remote(&git_repo, FORK_REMOTE)? {
            false
        } else {
            self.create_fork(&workdir)?;
            true
        };

        let repo_dir_name = workdir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| upstream.name().to_string());

        let allocation = {
            let lock = ForkLock::acquire(&self.config.forked_dir, &repo_dir_name)?;
            tracing::debug!(lock = %lock.path().display(), "probing for a free branch");
            let branch_name = next_branch_name(|b| repo::local_branch_exists(&git_repo, b))?;
            let worktree_path =
                next_worktree_path(&self.config.forked_dir, &repo_dir_name, &branch_name);
            self.add_worktree(&workdir, &branch_name, &worktree_path)?;
            WorktreeAllocation {
                branch_name,
                worktree_path,
            }
        };

        let push_warning = self.push_branch(&allocation);
        Ok(ForkOutcome {
            upstream,
            allocation,
            fork_created,
            push_warning,
        })
    }

    fn create_fork(&self, workdir: &Path) -> Result<()> {
        tracing::info!("creating fork remote");
        let output = self.runner.run(
            &self.config.gh,
            &[
                "repo",
                "fork",
                "--clone=false",
                "--remote",
                "--remote-name",
                FORK_REMOTE,
            ],
            Some(workdir),
        )?;
        if !output.success() {
            return Err(GhcloneError::ForkCreationFailed(
                output.diagnostic(&format!("{} repo fork exited unsuccessfully", self.config.gh)),
            ));
        }
        Ok(())
    }

    fn add_worktree(&self, workdir: &Path, branch: &str, path: &Path) -> Result<()> {
        let path_arg = path.to_string_lossy();
        let output = self.runner.run(
            &self.config.git,
            &["worktree", "add", "-b", branch, &path_arg],
            Some(workdir),
        )?;
        if !output.success() {
            return Err(GhcloneError::WorktreeCreationFailed(
                output.diagnostic(&format!("{} worktree add exited unsuccessfully", self.config.git)),
            ));
        }
        Ok(())
    }

    fn push_branch(&self, allocation: &WorktreeAllocation) -> Option<String> {
        let branch = allocation.branch_name.as_str();
        let result = self.runner.run(
            &self.config.git,
            &["push", "--set-upstream", FORK_REMOTE, branch],
            Some(&allocation.worktree_path),
        );
        let warning = match result {
            Ok(output) if output.success() => return None,
            Ok(output) => output.diagnostic("push exited unsuccessfully"),
            Err(e) => e.to_string(),
        };
        tracing::warn!(branch, "push to {FORK_REMOTE} failed: {warning}");
        Some(format!(
            "worktree created but pushing {branch} to {FORK_REMOTE} failed: {warning}"
        ))
    }
}
