use crate::error::{GhcloneError, Result};
use crate::process::CommandRunner;
use crate::reference::RepoRef;
use std::path::{Path, PathBuf};

pub const OWNER_SEPARATOR: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneTarget {
    pub root_dir: PathBuf,
    pub owner: String,
    pub name: String,
}

impl CloneTarget {
    pub fn new(root_dir: &Path, repo: &RepoRef) -> Self {
        Self {
            root_dir: root_dir.to_path_buf(),
            owner: repo.owner().to_string(),
            name: repo.name().to_string(),
        }
    }

    pub fn dir_name(&self) -> String {
        format!("{}{OWNER_SEPARATOR}{}", self.owner, self.name)
    }

    pub fn path(&self) -> PathBuf {
        self.root_dir.join(self.dir_name())
    }
}

pub struct Cloner<'a, R: CommandRunner> {
    runner: &'a R,
    git: &'a str,
    depth: u32,
}

impl<'a, R: CommandRunner> Cloner<'a, R> {
    pub fn new(runner: &'a R, git: &'a str, depth: u32) -> Self {
        Self { runner, git, depth }
    }

    pub fn clone_repo(&self, repo: &RepoRef, root_dir: &Path) -> Result<PathBuf> {
        let target = CloneTarget::new(root_dir, repo).path();
        if target.exists() {
            return Err(GhcloneError::AlreadyExists(target));
        }

        std::fs::create_dir_all(root_dir)?;
        let depth = format!("--depth={}", self.depth.max(1));
        let target_arg = target.to_string_lossy();
        tracing::info!(url = repo.canonical_url(), target = %target.display(), "cloning");

        let output = self.runner.run(
            self.git,
            &["clone", &depth, repo.canonical_url(), &target_arg],
            None,
        )?;
        if !output.success() {
            return Err(GhcloneError::CloneFailed(
                output.diagnostic(&format!("{} clone exited unsuccessfully", self.git)),
            ));
        }
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::normalize;
    use crate::test_utils::RecordingRunner;

    #[test]
    fn target_path_joins_owner_and_name() {
        let repo = normalize("user/repo").unwrap();
        let target = CloneTarget::new(Path::new("/home/me/git"), &repo);
        assert_eq!(target.path(), PathBuf::from("/home/me/git/user---repo"));
    }

    #[test]
    fn clones_shallow_into_target() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let repo = normalize("user/repo").unwrap();

        let path = Cloner::new(&runner, "git", 1)
            .clone_repo(&repo, tmp.path())
            .unwrap();

        let expected = tmp.path().join("user---repo");
        assert_eq!(path, expected);
        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "git");
        assert_eq!(
            calls[0].args,
            vec![
                "clone".to_string(),
                "--depth=1".to_string(),
                "https://github.com/user/repo".to_string(),
                expected.to_string_lossy().into_owned(),
            ]
        );
    }

    #[test]
    fn reports_clone_stderr_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new().respond("git clone", 128, "", "git clone failed");
        let repo = normalize("user/repo").unwrap();

        let err = Cloner::new(&runner, "git", 1)
            .clone_repo(&repo, tmp.path())
            .unwrap_err();
        match err {
            GhcloneError::CloneFailed(msg) => assert_eq!(msg, "git clone failed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn silent_failure_gets_generic_message() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new().respond("git clone", 1, "", "");
        let repo = normalize("user/repo").unwrap();

        let err = Cloner::new(&runner, "git", 1)
            .clone_repo(&repo, tmp.path())
            .unwrap_err();
        assert!(matches!(err, GhcloneError::CloneFailed(msg) if msg.contains("exited")));
    }

    #[test]
    fn existing_target_skips_subprocess() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("user---repo")).unwrap();
        let runner = RecordingRunner::new();
        let repo = normalize("user/repo").unwrap();

        let err = Cloner::new(&runner, "git", 1)
            .clone_repo(&repo, tmp.path())
            .unwrap_err();
        assert!(matches!(err, GhcloneError::AlreadyExists(p) if p.ends_with("user---repo")));
        assert!(runner.calls.borrow().is_empty());
    }
}
