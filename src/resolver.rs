use crate::error::{GhcloneError, Result};
use crate::manifest::{self, MANIFEST_FILE};
use crate::npm;
use crate::process::CommandRunner;
use crate::reference::{normalize, RepoRef};
use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Argument,
    Detected,
    Clipboard,
    Manual,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Source::Argument => "argument",
            Source::Detected => "detected",
            Source::Clipboard => "clipboard",
            Source::Manual => "manual",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub repo: RepoRef,
    pub source: Source,
    pub detail: Option<String>,
}

impl Resolution {
    fn new(repo: RepoRef, source: Source) -> Self {
        Self {
            repo,
            source,
            detail: None,
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.source != Source::Argument
    }
}

#[derive(Debug, Clone)]
pub struct DocumentContext {
    pub path: PathBuf,
    pub contents: String,
    /// Zero-based caret line.
    pub line: usize,
}

impl DocumentContext {
    pub fn load(path: PathBuf, line: usize) -> Result<Self> {
        let contents = std::fs::read_to_string(&path)?;
        Ok(Self {
            path,
            contents,
            line,
        })
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

pub trait Detector<R: CommandRunner> {
    fn applies(&self, doc: &DocumentContext) -> bool;

    /// `Ok(None)` lets the chain continue; an error stops it.
    fn resolve(&self, doc: &DocumentContext, runner: &R) -> Result<Option<Resolution>>;
}

pub struct PackageManifestDetector {
    pub npm: String,
}

impl<R: CommandRunner> Detector<R> for PackageManifestDetector {
    fn applies(&self, doc: &DocumentContext) -> bool {
        doc.file_name() == Some(MANIFEST_FILE)
    }

    fn resolve(&self, doc: &DocumentContext, runner: &R) -> Result<Option<Resolution>> {
        let Some(package) = manifest::dependency_at_line(&doc.contents, doc.line) else {
            return Ok(None);
        };
        tracing::debug!(%package, "dependency under caret");
        let found = npm::lookup(runner, &self.npm, &package)?;
        let mut resolution = Resolution::new(found.reference, Source::Detected);
        resolution.detail = Some(match found.directory {
            Some(dir) => format!("npm package {package} ({dir})"),
            None => format!("npm package {package}"),
        });
        Ok(Some(resolution))
    }
}

pub trait Clipboard {
    fn read_text(&self) -> Option<String>;
}

#[cfg(target_os = "macos")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[("pbpaste", &[])];

#[cfg(target_os = "windows")]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] =
    &[("powershell", &["-NoProfile", "-Command", "Get-Clipboard"])];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("wl-paste", &["--no-newline"]),
    ("xclip", &["-o", "-selection", "clipboard"]),
    ("xsel", &["-ob"]),
];

pub struct SystemClipboard<'a, R: CommandRunner> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> SystemClipboard<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> Clipboard for SystemClipboard<'_, R> {
    fn read_text(&self) -> Option<String> {
        CLIPBOARD_TOOLS
            .iter()
            .filter(|(program, _)| self.runner.is_available(program))
            .find_map(|(program, args)| {
                let output = self.runner.run(program, args, None).ok()?;
                output.success().then_some(output.stdout)
            })
    }
}

pub trait Prompter {
    fn ask_reference(&self) -> Result<Option<String>>;
    fn confirm(&self, resolution: &Resolution) -> Result<bool>;
}

pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_line(prompt: &str) -> Result<Option<String>> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{prompt}")?;
        stderr.flush()?;
        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl Prompter for TerminalPrompter {
    fn ask_reference(&self) -> Result<Option<String>> {
        let answer = Self::read_line("Repository (owner/name or URL): ")?;
        Ok(answer.filter(|a| !a.is_empty()))
    }

    fn confirm(&self, resolution: &Resolution) -> Result<bool> {
        let from = match &resolution.detail {
            Some(detail) => format!("{} via {detail}", resolution.source),
            None => resolution.source.to_string(),
        };
        let answer = Self::read_line(&format!(
            "Use {} (from {from})? [Y/n] ",
            resolution.repo.canonical_url()
        ))?;
        // EOF declines, an empty line accepts
        Ok(matches!(answer.as_deref(), Some("" | "y" | "Y" | "yes" | "Yes")))
    }
}

pub struct ResolverChain<'a, R: CommandRunner> {
    runner: &'a R,
    detectors: Vec<Box<dyn Detector<R> + 'a>>,
    clipboard: Box<dyn Clipboard + 'a>,
    prompter: Box<dyn Prompter + 'a>,
}

impl<'a, R: CommandRunner> ResolverChain<'a, R> {
    pub fn new(
        runner: &'a R,
        clipboard: Box<dyn Clipboard + 'a>,
        prompter: Box<dyn Prompter + 'a>,
    ) -> Self {
        Self {
            runner,
            detectors: Vec::new(),
            clipboard,
            prompter,
        }
    }

    pub fn with_detector(mut self, detector: Box<dyn Detector<R> + 'a>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Argument, then the first applicable detector, then clipboard, then a
    /// manual prompt.
    pub fn resolve(
        &self,
        argument: Option<&str>,
        doc: Option<&DocumentContext>,
    ) -> Result<Resolution> {
        if let Some(arg) = argument.map(str::trim).filter(|a| !a.is_empty()) {
            return Ok(Resolution::new(normalize(arg)?, Source::Argument));
        }

        if let Some(doc) = doc {
            for detector in self.detectors.iter().filter(|d| d.applies(doc)) {
                if let Some(found) = detector.resolve(doc, self.runner)? {
                    return Ok(found);
                }
            }
        }

        if let Some(text) = self.clipboard.read_text() {
            match normalize(&text) {
                Ok(repo) => return Ok(Resolution::new(repo, Source::Clipboard)),
                Err(_) => tracing::debug!("clipboard does not hold a repository reference"),
            }
        }

        match self.prompter.ask_reference()? {
            Some(text) => Ok(Resolution::new(normalize(&text)?, Source::Manual)),
            None => Err(GhcloneError::EmptyInput),
        }
    }

    pub fn resolve_confirmed(
        &self,
        argument: Option<&str>,
        doc: Option<&DocumentContext>,
        assume_yes: bool,
    ) -> Result<Resolution> {
        let resolution = self.resolve(argument, doc)?;
        tracing::info!(repo = %resolution.repo, source = %resolution.source, "resolved");
        if resolution.is_provisional() && !assume_yes && !self.prompter.confirm(&resolution)? {
            return Err(GhcloneError::Cancelled);
        }
        Ok(resolution)
    }
}
