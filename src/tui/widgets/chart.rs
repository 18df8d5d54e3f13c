//! Vertical column chart drawn with block characters

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::services::format::format_compact;
use crate::tui::theme::Theme;

/// Partial block glyphs, one per eighth of a cell
const BLOCKS: [&str; 8] = ["▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

/// Widest column slot, gap included
const MAX_SLOT_WIDTH: u16 = 8;

/// Bar height in eighths of a cell, scaled so `max` fills `rows` cells
pub fn bar_eighths(value: f64, max: f64, rows: u16) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    let full = rows as f64 * 8.0;
    ((value / max) * full).round().clamp(0.0, full) as usize
}

/// One column per label: the axis maximum on top, labels underneath
pub struct ColumnChart<'a> {
    labels: &'a [String],
    values: &'a [f64],
    color: Color,
    theme: Theme,
}

impl<'a> ColumnChart<'a> {
    pub fn new(labels: &'a [String], values: &'a [f64], theme: Theme) -> Self {
        Self {
            labels,
            values,
            color: theme.bar(),
            theme,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    fn slot_width(&self, width: u16) -> u16 {
        let n = self.values.len().max(1) as u16;
        (width / n).clamp(1, MAX_SLOT_WIDTH)
    }
}

impl Widget for ColumnChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width == 0 || self.values.is_empty() {
            return;
        }

        let max = self.values.iter().copied().fold(0.0_f64, f64::max);
        let muted = Style::default().fg(self.theme.muted());
        buf.set_string(
            area.x,
            area.y,
            format!("max {}", format_compact(max)),
            muted,
        );

        let bar_rows = area.height - 2;
        let slot = self.slot_width(area.width);
        let bar_width = if slot > 2 { slot - 1 } else { 1 };
        let visible = (area.width / slot) as usize;
        let chart_width = slot * visible.min(self.values.len()) as u16;
        let x0 = area.x + area.width.saturating_sub(chart_width) / 2;
        let base_y = area.y + 1 + bar_rows - 1;
        let bar_style = Style::default().fg(self.color);

        for (i, value) in self.values.iter().take(visible).enumerate() {
            let x = x0 + i as u16 * slot;
            let mut eighths = bar_eighths(*value, max, bar_rows);

            let mut row = 0;
            while eighths > 0 && row < bar_rows {
                let glyph = BLOCKS[eighths.min(8) - 1];
                for dx in 0..bar_width {
                    buf.set_string(x + dx, base_y - row, glyph, bar_style);
                }
                eighths = eighths.saturating_sub(8);
                row += 1;
            }

            if let Some(label) = self.labels.get(i) {
                let text: String = label.chars().take(bar_width as usize).collect();
                buf.set_string(x, area.y + area.height - 1, text, muted);
            }
        }
    }
}
