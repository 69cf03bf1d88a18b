use crate::notify::Notice;
use crate::ui::theme;
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

pub struct StatusBar<'a> {
    pub shown: usize,
    pub total: usize,
    pub filter_mode: bool,
    pub filter_text: &'a str,
    pub notice: Option<&'a Notice>,
    pub hints: &'a str,
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let bg = Style::default().bg(theme::STATUS_BG);
        for x in area.x..area.right() {
            buf[(x, area.y)].set_style(bg);
        }

        if self.filter_mode {
            let line = Line::from(vec![
                Span::styled(
                    " /",
                    Style::default()
                        .fg(theme::FILTER_COLOR)
                        .bg(theme::STATUS_BG)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(self.filter_text.to_string(), bg),
                Span::styled(
                    "\u{258c}",
                    Style::default().fg(theme::FILTER_COLOR).bg(theme::STATUS_BG),
                ),
            ]);
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let separator = Span::styled(
            "\u{2502}",
            Style::default().fg(theme::BORDER_COLOR).bg(theme::STATUS_BG),
        );
        let mut spans = vec![Span::styled(
            format!(" {}/{} ", self.shown, self.total),
            bg,
        )];

        if !self.filter_text.is_empty() {
            spans.push(separator.clone());
            spans.push(Span::styled(
                format!(" filter: {} ", self.filter_text),
                Style::default().fg(theme::FILTER_COLOR).bg(theme::STATUS_BG),
            ));
        }

        spans.push(separator);
        match self.notice {
            Some(notice) => spans.push(Span::styled(
                format!(" {} ", notice.message),
                Style::default().fg(notice.level.color()).bg(theme::STATUS_BG),
            )),
            None => spans.push(Span::styled(
                format!(" {} ", self.hints),
                Style::default().fg(theme::DIM_TEXT).bg(theme::STATUS_BG),
            )),
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
