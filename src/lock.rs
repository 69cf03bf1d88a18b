use crate::error::{GhcloneError, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ForkLock {
    file: File,
    path: PathBuf,
}

impl ForkLock {
    pub fn acquire(dir: &Path, repo_dir_name: &str) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!(".{repo_dir_name}.lock"));
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self { file, path }),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Err(GhcloneError::Lock(format!(
                "another fork of {repo_dir_name} is in progress ({})",
                path.display()
            ))),
            Err(e) => Err(GhcloneError::Io(e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// Never unlinked: every holder must lock the same inode.
impl Drop for ForkLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_holder_is_refused_until_release() {
        let tmp = tempfile::tempdir().unwrap();
        let first = ForkLock::acquire(tmp.path(), "repo").unwrap();
        assert!(first.path().exists());

        let err = ForkLock::acquire(tmp.path(), "repo").unwrap_err();
        assert!(matches!(err, GhcloneError::Lock(msg) if msg.contains("repo")));

        let path = first.path().to_path_buf();
        drop(first);
        assert!(path.exists());
        let again = ForkLock::acquire(tmp.path(), "repo").unwrap();
        assert_eq!(again.path(), path.as_path());
    }

    #[test]
    fn different_repositories_do_not_contend() {
        let tmp = tempfile::tempdir().unwrap();
        let _a = ForkLock::acquire(tmp.path(), "alpha").unwrap();
        assert!(ForkLock::acquire(tmp.path(), "beta").is_ok());
    }
}
