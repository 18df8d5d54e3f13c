//! Scrollable text table with optional TOTAL footer

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Body rows shown at once
pub const VISIBLE_ROWS: usize = 12;

const COLUMN_GAP: u16 = 2;

/// Header, body rows and footer as preformatted cells.
/// The first column is left-aligned, the rest right-aligned.
pub struct GridTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    footer: Option<Vec<String>>,
    scroll: usize,
    column_colors: Vec<Color>,
    theme: Theme,
}

impl GridTable {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>, theme: Theme) -> Self {
        Self {
            header,
            rows,
            footer: None,
            scroll: 0,
            column_colors: Vec::new(),
            theme,
        }
    }

    pub fn footer(mut self, footer: Vec<String>) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn scroll(mut self, offset: usize) -> Self {
        self.scroll = offset;
        self
    }

    /// Body text color per column; missing entries use the theme text color
    pub fn column_colors(mut self, colors: Vec<Color>) -> Self {
        self.column_colors = colors;
        self
    }

    /// Largest useful scroll offset for `row_count` body rows
    pub fn max_scroll_offset(row_count: usize) -> usize {
        row_count.saturating_sub(VISIBLE_ROWS)
    }

    /// Lines the table occupies when fully shown
    pub fn height(row_count: usize, with_footer: bool) -> u16 {
        (1 + row_count.min(VISIBLE_ROWS) + usize::from(with_footer)) as u16
    }

    fn widths(&self) -> Vec<u16> {
        let all_rows = std::iter::once(&self.header)
            .chain(self.rows.iter())
            .chain(self.footer.iter());
        let mut widths: Vec<u16> = Vec::new();
        for row in all_rows {
            for (col, cell) in row.iter().enumerate() {
                let w = cell.chars().count() as u16;
                match widths.get_mut(col) {
                    Some(existing) => *existing = (*existing).max(w),
                    None => widths.push(w),
                }
            }
        }
        widths
    }

    fn line<'a>(&self, cells: &'a [String], widths: &[u16], style_for: impl Fn(usize) -> Style) -> Line<'a> {
        let mut spans = Vec::with_capacity(cells.len() * 2);
        for (col, cell) in cells.iter().enumerate() {
            let width = widths.get(col).copied().unwrap_or(0) as usize;
            if col > 0 {
                spans.push(Span::raw(" ".repeat(COLUMN_GAP as usize)));
            }
            let text = if col == 0 {
                format!("{:<w$}", cell, w = width)
            } else {
                format!("{:>w$}", cell, w = width)
            };
            spans.push(Span::styled(text, style_for(col)));
        }
        Line::from(spans)
    }

    fn render_line(line: Line<'_>, x: u16, y: u16, width: u16, buf: &mut Buffer) {
        Paragraph::new(line).alignment(Alignment::Left).render(
            Rect {
                x,
                y,
                width,
                height: 1,
            },
            buf,
        );
    }
}

impl Widget for GridTable {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let widths = self.widths();
        let table_width = (widths.iter().sum::<u16>()
            + COLUMN_GAP * (widths.len() as u16).saturating_sub(1))
        .min(area.width);
        let x = area.x + area.width.saturating_sub(table_width) / 2;
        let bottom = area.y + area.height;
        let mut y = area.y;

        let bold = Style::default()
            .fg(self.theme.text())
            .add_modifier(Modifier::BOLD);

        Self::render_line(self.line(&self.header, &widths, |_| bold), x, y, table_width, buf);
        y += 1;

        let footer_lines = u16::from(self.footer.is_some());
        let room = bottom.saturating_sub(y + footer_lines) as usize;
        let start = self.scroll.min(self.rows.len());
        let end = (start + room.min(VISIBLE_ROWS)).min(self.rows.len());

        for row in &self.rows[start..end] {
            let line = self.line(row, &widths, |col| {
                let color = if col == 0 {
                    self.theme.date()
                } else {
                    self.column_colors
                        .get(col)
                        .copied()
                        .unwrap_or_else(|| self.theme.text())
                };
                Style::default().fg(color)
            });
            Self::render_line(line, x, y, table_width, buf);
            y += 1;
        }

        if let Some(footer) = &self.footer {
            if y < bottom {
                let style = Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD);
                Self::render_line(self.line(footer, &widths, |_| style), x, y, table_width, buf);
            }
        }
    }
}
