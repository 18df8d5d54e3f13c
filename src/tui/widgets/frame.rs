//! Shared view chrome: tab bar, title, separators and keybinding hints

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::tabs::{Tab, TabBar};
use crate::tui::theme::Theme;

/// Maximum content width for every view
const MAX_CONTENT_WIDTH: u16 = 170;

/// Hints shown on every view after the view-specific ones
const COMMON_HINTS: [(&str, &str); 3] = [("Tab", "Switch view"), ("?", "Help"), ("q", "Quit")];

/// Frame around one view. `render` returns the area left for the view body.
pub struct ViewFrame<'a> {
    tab: Tab,
    title: String,
    subtitle: Option<String>,
    hints: &'a [(&'a str, &'a str)],
    theme: Theme,
}

impl<'a> ViewFrame<'a> {
    pub fn new(tab: Tab, title: impl Into<String>, theme: Theme) -> Self {
        Self {
            tab,
            title: title.into(),
            subtitle: None,
            hints: &[],
            theme,
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// View-specific key hints: (key, action)
    pub fn hints(mut self, hints: &'a [(&'a str, &'a str)]) -> Self {
        self.hints = hints;
        self
    }

    pub fn render(self, area: Rect, buf: &mut Buffer) -> Rect {
        let centered = centered_area(area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Top padding
            Constraint::Length(1), // Tabs
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Title
            Constraint::Length(1), // Subtitle
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Keybindings
        ])
        .split(centered);

        TabBar::new(self.tab, self.theme).render(chunks[1], buf);
        render_separator(chunks[2], buf, self.theme);

        Paragraph::new(Line::from(Span::styled(
            self.title.as_str(),
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        if let Some(subtitle) = &self.subtitle {
            Paragraph::new(Line::from(Span::styled(
                subtitle.as_str(),
                Style::default().fg(self.theme.muted()),
            )))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
        }

        render_separator(chunks[6], buf, self.theme);
        self.render_keybindings(chunks[7], buf);

        chunks[5]
    }

    fn render_keybindings(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for &(key, action) in self.hints {
            push_hint(&mut spans, key, action, self.theme);
        }
        for &(key, action) in &COMMON_HINTS {
            push_hint(&mut spans, key, action, self.theme);
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

fn push_hint(spans: &mut Vec<Span<'static>>, key: &str, action: &str, theme: Theme) {
    if !spans.is_empty() {
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
        key.to_string(),
        Style::default().fg(theme.accent()),
    ));
    spans.push(Span::styled(
        format!(": {}", action),
        Style::default().fg(theme.muted()),
    ));
}

/// Apply max width constraint and center the content
pub fn centered_area(area: Rect) -> Rect {
    let content_width = area.width.min(MAX_CONTENT_WIDTH);
    let x_offset = (area.width.saturating_sub(content_width)) / 2;
    Rect {
        x: area.x + x_offset,
        y: area.y,
        width: content_width,
        height: area.height,
    }
}

pub fn render_separator(area: Rect, buf: &mut Buffer, theme: Theme) {
    if area.height == 0 {
        return;
    }
    let line = "─".repeat(area.width as usize);
    buf.set_string(area.x, area.y, &line, Style::default().fg(theme.muted()));
}
