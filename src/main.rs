mod app;
mod catalog;
mod clone;
mod config;
mod error;
mod fork;
mod git;
mod lock;
mod manifest;
mod notify;
mod npm;
mod process;
mod reference;
mod resolver;
#[cfg(test)]
mod test_utils;
mod ui;

use app::{App, PickerOutcome};
use clap::{Parser, Subcommand};
use clone::Cloner;
use config::{Config, Overrides};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use error::{GhcloneError, Result};
use fork::ForkWorkflow;
use notify::Notice;
use process::SystemRunner;
use resolver::{
    DocumentContext, PackageManifestDetector, ResolverChain, SystemClipboard, TerminalPrompter,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ghclone", about = "Clone, browse and fork GitHub repositories")]
struct Cli {
    #[arg(long, global = true, help = "Directory holding clones (owner---name)")]
    repos_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory holding fork worktrees")]
    forked_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Shallow-clone a repository into the repos directory")]
    Clone {
        #[arg(help = "owner/name or GitHub URL; falls back to the open file, clipboard, then a prompt")]
        reference: Option<String>,

        #[arg(long, help = "File being edited, for detecting a reference under the caret")]
        file: Option<PathBuf>,

        #[arg(long, default_value_t = 1, help = "Caret line in --file (1-based)")]
        line: usize,

        #[arg(long, short, help = "Do not ask before using a detected reference")]
        yes: bool,
    },
    #[command(about = "Pick one of the cloned repositories")]
    Browse {
        #[arg(long, help = "Print the listing instead of opening the picker")]
        plain: bool,
    },
    #[command(about = "Fork a repository into a fresh worktree and branch")]
    Fork {
        #[arg(help = "Path, owner/name or URL; defaults to the repository around the current directory")]
        repo: Option<String>,
    },
    #[command(about = "List the dependencies declared in a package.json")]
    Deps {
        #[arg(value_name = "MANIFEST", default_value = manifest::MANIFEST_FILE)]
        path: PathBuf,
    },
    #[command(about = "Print the effective configuration")]
    Config,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GHCLONE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(Overrides {
        repos_dir: cli.repos_dir,
        forked_dir: cli.forked_dir,
    });
    tracing::debug!(?config, "loaded configuration");

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let notice = Notice::from(&e);
            notice.emit();
            if notice.level.is_failure() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}

fn run(command: Command, config: &Config) -> Result<()> {
    let runner = SystemRunner;
    match command {
        Command::Clone {
            reference,
            file,
            line,
            yes,
        } => {
            let doc = file
                .map(|path| DocumentContext::load(path, line.saturating_sub(1)))
                .transpose()?;
            clone_flow(&runner, config, reference.as_deref(), doc.as_ref(), yes)
        }
        Command::Browse { plain } => {
            if plain {
                for entry in catalog::list(&config.repos_dir) {
                    println!("{}", entry.display());
                }
                return Ok(());
            }
            match run_picker(config)? {
                PickerOutcome::Open(entry) => {
                    println!("{}", entry.path.display());
                    Ok(())
                }
                PickerOutcome::Fork(entry) => fork_flow(&runner, config, &entry.path),
                PickerOutcome::Clone => clone_flow(&runner, config, None, None, false),
                PickerOutcome::Quit => Ok(()),
            }
        }
        Command::Fork { repo } => {
            let cwd = std::env::current_dir()?;
            let path = fork::locate_repo(repo.as_deref(), &cwd, &config.repos_dir)?;
            fork_flow(&runner, config, &path)
        }
        Command::Deps { path } => {
            for name in manifest::read_dependency_names(&path)? {
                println!("{name}");
            }
            Ok(())
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn clone_flow(
    runner: &SystemRunner,
    config: &Config,
    reference: Option<&str>,
    doc: Option<&DocumentContext>,
    assume_yes: bool,
) -> Result<()> {
    let chain = ResolverChain::new(
        runner,
        Box::new(SystemClipboard::new(runner)),
        Box::new(TerminalPrompter),
    )
    .with_detector(Box::new(PackageManifestDetector {
        npm: config.npm.clone(),
    }));

    let resolution = chain.resolve_confirmed(reference, doc, assume_yes)?;
    let path = Cloner::new(runner, &config.git, config.clone_depth)
        .clone_repo(&resolution.repo, &config.repos_dir)?;

    Notice::info(format!("cloned {} into {}", resolution.repo, path.display())).emit();
    println!("{}", path.display());
    Ok(())
}

fn fork_flow(runner: &SystemRunner, config: &Config, repo_path: &std::path::Path) -> Result<()> {
    let outcome = ForkWorkflow::new(runner, config).fork(repo_path)?;
    if outcome.fork_created {
        Notice::info(format!("created fork of {}", outcome.upstream)).emit();
    }
    if let Some(warning) = &outcome.push_warning {
        Notice::warn(warning.clone()).emit();
    }
    Notice::info(format!(
        "branch {} checked out at {}",
        outcome.allocation.branch_name,
        outcome.allocation.worktree_path.display()
    ))
    .emit();
    println!("{}", outcome.allocation.worktree_path.display());
    Ok(())
}

fn run_picker(config: &Config) -> Result<PickerOutcome> {
    let mut app = App::new(config.clone());

    // Install panic hook before entering raw mode so terminal is restored on panic
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stderr = std::io::stderr();
    execute!(stderr, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stderr);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let result = picker_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(app.outcome.unwrap_or(PickerOutcome::Quit))
}

fn picker_loop<B: ratatui::backend::Backend>(
    terminal: &mut ratatui::Terminal<B>,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| app.render(f))?;
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            _ => {}
        }
    }
    Ok(())
}
