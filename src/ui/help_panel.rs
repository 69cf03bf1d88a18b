use crate::config::KeyBindings;
use crate::ui::theme;
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

const FIXED_BINDINGS: &[(&str, &str)] = &[
    ("j/k  \u{2191}/\u{2193}", "Move"),
    ("g/G", "First / last"),
    ("Enter", "Print path and exit"),
    ("/", "Filter"),
    ("?", "This help"),
    ("q / Esc", "Quit / Close"),
];

pub struct HelpPanel<'a> {
    pub keys: &'a KeyBindings,
}

impl<'a> HelpPanel<'a> {
    fn bindings(&self) -> Vec<(String, &'static str)> {
        let configured = [
            (self.keys.clone, "Clone a repository"),
            (self.keys.fork, "Fork into a worktree"),
            (self.keys.browse, "Reload listing"),
        ];
        let mut rows: Vec<(String, &'static str)> = FIXED_BINDINGS
            .iter()
            .map(|(k, d)| (k.to_string(), *d))
            .collect();
        rows.extend(
            configured
                .into_iter()
                .filter(|(binding, _)| *binding != crate::config::KeyBinding::Disabled)
                .map(|(binding, desc)| (binding.to_string(), desc)),
        );
        rows
    }
}

impl<'a> Widget for HelpPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let popup = super::centered_rect(50, 60, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Keybindings ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));
        let inner = block.inner(popup);
        block.render(popup, buf);

        for (i, (key, desc)) in self.bindings().iter().enumerate() {
            if i >= inner.height as usize {
                break;
            }
            let y = inner.y + i as u16;
            let key_style = Style::default()
                .fg(theme::FILTER_COLOR)
                .add_modifier(Modifier::BOLD);

            let key_col_w = 16;
            let line = Line::from(vec![
                Span::styled(format!(" {:<width$}", key, width = key_col_w), key_style),
                Span::raw(desc.to_string()),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
