use crate::catalog::RepoEntry;
use crate::ui::{theme, truncate_with_ellipsis};
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

pub struct RepoList<'a> {
    pub entries: &'a [&'a RepoEntry],
    pub selected: usize,
    pub scroll: usize,
    pub title: &'a str,
}

impl<'a> Widget for RepoList<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER_COLOR));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.entries.is_empty() {
            let line = Line::from(Span::styled(
                " no repositories",
                Style::default().fg(theme::DIM_TEXT),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        let name_w = self
            .entries
            .iter()
            .map(|e| e.dir_name.chars().count())
            .max()
            .unwrap_or(0)
            .min((inner.width as usize).saturating_sub(24));

        for (i, entry) in self
            .entries
            .iter()
            .skip(self.scroll)
            .take(inner.height as usize)
            .enumerate()
        {
            let y = inner.y + i as u16;
            let is_selected = self.scroll + i == self.selected;
            let line = entry_line(entry, name_w, is_selected);
            buf.set_line(inner.x, y, &line, inner.width);

            if is_selected {
                for x in inner.x..(inner.x + inner.width) {
                    buf[(x, y)].set_style(Style::default().bg(theme::SELECTED_BG));
                }
            }
        }
    }
}

fn entry_line(entry: &RepoEntry, name_w: usize, is_selected: bool) -> Line<'static> {
    let name = truncate_with_ellipsis(&entry.dir_name, name_w);
    let mut name_style = Style::default();
    if is_selected {
        name_style = name_style.add_modifier(Modifier::BOLD);
    }

    let (language, language_style) = match entry.language {
        Some(lang) => (lang, Style::default().fg(theme::language_color(lang))),
        None => ("-", Style::default().fg(theme::DIM_TEXT)),
    };
    let depth = entry
        .depth
        .map(|d| d.to_string())
        .unwrap_or_else(|| "?".to_string());

    let mut spans = vec![
        Span::styled(if is_selected { " \u{25b8} " } else { "   " }, name_style),
        Span::styled(format!("{name:<name_w$}"), name_style),
        Span::raw("  "),
        Span::styled(format!("{language:<10}"), language_style),
        Span::styled(format!(" depth:{depth}"), Style::default().fg(theme::DIM_TEXT)),
    ];
    if entry.forked {
        spans.push(Span::styled(" [forked]", Style::default().fg(theme::FORK_FG)));
    }
    Line::from(spans)
}
