use crate::catalog::{self, RepoEntry};
use crate::config::{Config, KeyBinding};
use crate::notify::Notice;
use crate::ui::{
    help_panel::HelpPanel,
    input::{self, Action},
    repo_list::RepoList,
    status_bar::StatusBar,
};
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Open(RepoEntry),
    Fork(RepoEntry),
    Clone,
    Quit,
}

const PAGE: usize = 10;

pub struct App {
    pub config: Config,
    pub entries: Vec<RepoEntry>,
    pub visible: Vec<usize>,
    pub selected: usize,
    pub scroll: usize,
    pub filter_mode: bool,
    pub filter_text: String,
    pub show_help: bool,
    pub notice: Option<Notice>,
    pub outcome: Option<PickerOutcome>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut app = Self::new_empty(config);
        app.reload();
        app
    }

    pub fn with_entries(config: Config, entries: Vec<RepoEntry>) -> Self {
        let mut app = Self::new_empty(config);
        app.entries = entries;
        app.apply_filter();
        app
    }

    fn new_empty(config: Config) -> Self {
        Self {
            config,
            entries: Vec::new(),
            visible: Vec::new(),
            selected: 0,
            scroll: 0,
            filter_mode: false,
            filter_text: String::new(),
            show_help: false,
            notice: None,
            outcome: None,
        }
    }

    pub fn reload(&mut self) {
        self.entries = catalog::list(&self.config.repos_dir);
        self.apply_filter();
        if self.entries.is_empty() {
            self.notice = Some(Notice::info(format!(
                "nothing cloned under {}",
                self.config.repos_dir.display()
            )));
        }
    }

    fn apply_filter(&mut self) {
        let needle = self.filter_text.to_lowercase();
        self.visible = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| needle.is_empty() || e.display().to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        self.selected = self.selected.min(self.visible.len().saturating_sub(1));
    }

    pub fn selected_entry(&self) -> Option<&RepoEntry> {
        self.visible
            .get(self.selected)
            .and_then(|&i| self.entries.get(i))
    }

    pub fn should_quit(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let action = input::map_key(key, self.filter_mode, &self.config.keys);
        self.handle_action(action);
    }

    pub fn handle_action(&mut self, action: Action) {
        if self.show_help && !matches!(action, Action::Quit) {
            self.show_help = false;
            return;
        }
        let last = self.visible.len().saturating_sub(1);

        match action {
            Action::Quit => self.outcome = Some(PickerOutcome::Quit),
            Action::ScrollDown => self.selected = (self.selected + 1).min(last),
            Action::ScrollUp => self.selected = self.selected.saturating_sub(1),
            Action::PageDown => self.selected = (self.selected + PAGE).min(last),
            Action::PageUp => self.selected = self.selected.saturating_sub(PAGE),
            Action::Top => self.selected = 0,
            Action::Bottom => self.selected = last,
            Action::Select => {
                if let Some(entry) = self.selected_entry() {
                    self.outcome = Some(PickerOutcome::Open(entry.clone()));
                }
            }
            Action::Fork => match self.selected_entry() {
                Some(entry) => self.outcome = Some(PickerOutcome::Fork(entry.clone())),
                None => self.notice = Some(Notice::warn("nothing selected")),
            },
            Action::Clone => self.outcome = Some(PickerOutcome::Clone),
            Action::Reload => {
                self.reload();
                if !self.entries.is_empty() {
                    self.notice =
                        Some(Notice::info(format!("{} repositories", self.entries.len())));
                }
            }
            Action::Filter => self.filter_mode = true,
            Action::FilterChar(c) => {
                self.filter_text.push(c);
                self.apply_filter();
            }
            Action::FilterBackspace => {
                self.filter_text.pop();
                self.apply_filter();
            }
            Action::FilterConfirm => self.filter_mode = false,
            Action::FilterCancel => {
                self.filter_mode = false;
                self.filter_text.clear();
                self.apply_filter();
            }
            Action::Help => self.show_help = true,
            Action::ClosePopup => {
                if !self.filter_text.is_empty() {
                    self.filter_text.clear();
                    self.apply_filter();
                } else {
                    self.outcome = Some(PickerOutcome::Quit);
                }
            }
            Action::None => {}
        }
    }

    fn hints(&self) -> String {
        let mut parts = vec!["enter open".to_string(), "/ filter".to_string()];
        for (binding, label) in [
            (self.config.keys.clone, "clone"),
            (self.config.keys.fork, "fork"),
            (self.config.keys.browse, "reload"),
        ] {
            if let KeyBinding::Key(c) = binding {
                parts.push(format!("{c} {label}"));
            }
        }
        parts.push("? help".to_string());
        parts.join("  ")
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(size);

        self.ensure_scroll_bounds(chunks[0].height.saturating_sub(2) as usize);

        let shown: Vec<&RepoEntry> = self.visible.iter().map(|&i| &self.entries[i]).collect();
        let title = self.config.repos_dir.display().to_string();
        let list = RepoList {
            entries: &shown,
            selected: self.selected,
            scroll: self.scroll,
            title: &title,
        };
        frame.render_widget(list, chunks[0]);

        let hints = self.hints();
        let status = StatusBar {
            shown: self.visible.len(),
            total: self.entries.len(),
            filter_mode: self.filter_mode,
            filter_text: &self.filter_text,
            notice: self.notice.as_ref(),
            hints: &hints,
        };
        frame.render_widget(status, chunks[1]);

        if self.show_help {
            frame.render_widget(HelpPanel { keys: &self.config.keys }, size);
        }
    }

    fn ensure_scroll_bounds(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected >= self.scroll + visible_height {
            self.scroll = self.selected - visible_height + 1;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(name: &str, forked: bool) -> RepoEntry {
        RepoEntry {
            dir_name: name.to_string(),
            path: PathBuf::from("/git").join(name),
            language: Some("Rust"),
            depth: Some(1),
            forked,
        }
    }

    fn app() -> App {
        App::with_entries(
            Config::default(),
            vec![
                entry("a---one", false),
                entry("b---two", true),
                entry("c---three", false),
            ],
        )
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut app = app();
        app.handle_action(Action::ScrollUp);
        assert_eq!(app.selected, 0);
        app.handle_action(Action::Bottom);
        assert_eq!(app.selected, 2);
        app.handle_action(Action::ScrollDown);
        assert_eq!(app.selected, 2);
        app.handle_action(Action::PageUp);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn filter_narrows_and_select_returns_entry() {
        let mut app = app();
        app.handle_action(Action::Filter);
        for c in "TWO".chars() {
            app.handle_action(Action::FilterChar(c));
        }
        assert_eq!(app.visible, vec![1]);
        app.handle_action(Action::FilterConfirm);
        app.handle_action(Action::Select);
        assert_eq!(app.outcome, Some(PickerOutcome::Open(entry("b---two", true))));
    }

    #[test]
    fn escape_clears_filter_before_quitting() {
        let mut app = app();
        app.filter_text = "one".to_string();
        app.apply_filter();
        app.handle_action(Action::ClosePopup);
        assert_eq!(app.visible.len(), 3);
        assert!(!app.should_quit());
        app.handle_action(Action::ClosePopup);
        assert_eq!(app.outcome, Some(PickerOutcome::Quit));
    }

    #[test]
    fn fork_and_clone_actions_close_picker() {
        let mut app = app();
        app.handle_action(Action::ScrollDown);
        app.handle_action(Action::Fork);
        assert_eq!(app.outcome, Some(PickerOutcome::Fork(entry("b---two", true))));

        let mut app = self::app();
        app.handle_action(Action::Clone);
        assert_eq!(app.outcome, Some(PickerOutcome::Clone));
    }

    #[test]
    fn fork_with_empty_listing_only_warns() {
        let mut app = App::with_entries(Config::default(), Vec::new());
        app.handle_action(Action::Fork);
        assert!(!app.should_quit());
        assert_eq!(app.notice.map(|n| n.level), Some(crate::notify::Severity::Warn));
    }

    #[test]
    fn help_popup_swallows_next_key() {
        let mut app = app();
        app.handle_action(Action::Help);
        assert!(app.show_help);
        app.handle_action(Action::Select);
        assert!(!app.show_help);
        assert!(!app.should_quit());
    }

    #[test]
    fn reload_reads_repos_dir() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("x---y")).unwrap();
        let config = Config {
            repos_dir: tmp.path().to_path_buf(),
            ..Config::default()
        };
        let app = App::new(config);
        assert_eq!(app.entries.len(), 1);
        assert_eq!(app.entries[0].dir_name, "x---y");
    }
}
