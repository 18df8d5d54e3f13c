//! Help popup widget - displays keyboard shortcuts

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width and height of the help popup
const POPUP_WIDTH: u16 = 46;
const POPUP_HEIGHT: u16 = 21;

const NAVIGATION: [(&str, &str); 4] = [
    ("Tab / Shift+Tab", "Switch view"),
    ("1-5", "Jump to view"),
    ("Up/Down or j/k", "Scroll table"),
    ("b", "Cycle branch filter"),
];

const PERIOD: [(&str, &str); 3] = [
    ("Left/Right or h/l", "Previous/next month"),
    ("[ / ]", "Previous/next year"),
    ("y", "Monthly / yearly"),
];

const GENERAL: [(&str, &str); 2] = [("q / Esc", "Quit"), ("?", "Toggle help")];

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Calculate centered popup area
    pub fn centered_area(area: Rect) -> Rect {
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(POPUP_HEIGHT)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: POPUP_HEIGHT.min(area.height),
        }
    }

    fn render_section(
        &self,
        header: &str,
        bindings: &[(&str, &str)],
        chunks: &[Rect],
        buf: &mut Buffer,
    ) {
        let Some((first, rest)) = chunks.split_first() else {
            return;
        };

        Paragraph::new(Line::from(vec![Span::styled(
            header,
            Style::default()
                .fg(self.theme.date())
                .add_modifier(Modifier::BOLD),
        )]))
        .alignment(Alignment::Left)
        .render(*first, buf);

        if let Some(sep_area) = rest.first() {
            let sep = "─".repeat(sep_area.width as usize);
            buf.set_string(
                sep_area.x,
                sep_area.y,
                &sep,
                Style::default().fg(self.theme.muted()),
            );
        }

        for ((key, desc), area) in bindings.iter().zip(rest.iter().skip(1)) {
            render_keybinding(*area, buf, key, desc, self.theme);
        }
    }
}

impl Default for HelpPopup {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clear the area first (for overlay effect)
        Clear.render(area, buf);

        let title = format!(" salesboard v{} ", VERSION);
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        let inner = block.inner(area);
        block.render(area, buf);

        // Each section: header, separator, one line per binding
        let mut constraints = Vec::new();
        for len in [NAVIGATION.len(), PERIOD.len(), GENERAL.len()] {
            constraints.extend(std::iter::repeat(Constraint::Length(1)).take(len + 2));
        }
        constraints.push(Constraint::Length(1)); // Close hint
        constraints.push(Constraint::Min(0));
        let chunks = Layout::vertical(constraints).split(inner);

        let nav_end = NAVIGATION.len() + 2;
        let period_end = nav_end + PERIOD.len() + 2;
        let general_end = period_end + GENERAL.len() + 2;

        self.render_section("Navigation", &NAVIGATION, &chunks[..nav_end], buf);
        self.render_section("Period", &PERIOD, &chunks[nav_end..period_end], buf);
        self.render_section("General", &GENERAL, &chunks[period_end..general_end], buf);

        let hint = Line::from(vec![Span::styled(
            "Press ? to close",
            Style::default().fg(self.theme.muted()),
        )]);
        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .render(chunks[general_end], buf);
    }
}

/// Render a single keybinding line
fn render_keybinding(area: Rect, buf: &mut Buffer, key: &str, desc: &str, theme: Theme) {
    let line = Line::from(vec![
        Span::styled(
            format!("  {:<20}", key),
            Style::default().fg(theme.accent()),
        ),
        Span::styled(desc, Style::default().fg(theme.text())),
    ]);
    Paragraph::new(line)
        .alignment(Alignment::Left)
        .render(area, buf);
}
