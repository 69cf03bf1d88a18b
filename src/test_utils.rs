#![cfg(test)]

use crate::error::{GhcloneError, Result};
use crate::process::{CommandOutput, CommandRunner};
use git2::{Repository, Signature};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Default)]
pub struct RecordingRunner {
    script: Vec<(String, CommandOutput)>,
    missing: HashSet<String>,
    pub calls: RefCell<Vec<Invocation>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, prefix: &str, code: i32, stdout: &str, stderr: &str) -> Self {
        self.script.push((
            prefix.to_string(),
            CommandOutput {
                code: Some(code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        ));
        self
    }

    pub fn without(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(Invocation::line).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput> {
        if self.missing.contains(program) {
            return Err(GhcloneError::MissingDependency(program.to_string()));
        }
        let invocation = Invocation {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.map(Path::to_path_buf),
        };
        let line = invocation.line();
        self.calls.borrow_mut().push(invocation);

        let scripted = self
            .script
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, out)| out.clone());
        Ok(scripted.unwrap_or(CommandOutput {
            code: Some(0),
            ..Default::default()
        }))
    }

    fn require(&self, program: &str) -> Result<()> {
        if self.missing.contains(program) {
            return Err(GhcloneError::MissingDependency(program.to_string()));
        }
        Ok(())
    }
}

pub fn init_repo(path: &Path) -> Repository {
    let repo = Repository::init(path).expect("init repo");
    commit(&repo, "initial");
    repo
}

pub fn commit(repo: &Repository, message: &str) {
    let sig = Signature::now("test", "test@example.com").expect("signature");
    let tree_id = repo.index().expect("index").write_tree().expect("tree");
    let tree = repo.find_tree(tree_id).expect("find tree");
    let parent = repo
        .head()
        .ok()
        .and_then(|h| h.target())
        .and_then(|oid| repo.find_commit(oid).ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("commit");
}

pub fn create_branch(repo: &Repository, name: &str) {
    let head = repo.head().expect("head").peel_to_commit().expect("commit");
    repo.branch(name, &head, false).expect("branch");
}
