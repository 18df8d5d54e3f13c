//! Landing dashboard view: stat cards, daily chart and fluctuation table

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use super::chart::ColumnChart;
use super::frame::ViewFrame;
use super::table::GridTable;
use super::tabs::Tab;
use crate::services::dashboard::DashboardSnapshot;
use crate::services::format::{format_currency, format_number};
use crate::services::generator::SNAPSHOT_PERIOD;
use crate::tui::theme::Theme;

/// Card dimensions
const CARD_WIDTH: u16 = 28;
const CARD_HEIGHT: u16 = 5;

const CARD_COUNT: usize = 4;

const CHART_HEIGHT: u16 = 9;

const HINTS: [(&str, &str); 2] = [("b", "Branch"), ("↑↓", "Scroll")];

/// Cards per row for the available width (at most all four)
fn cards_per_row(width: u16) -> usize {
    let usable_width = width.saturating_sub(4); // padding
    let cards = (usable_width / (CARD_WIDTH + 2)) as usize; // +2 for spacing
    cards.clamp(1, CARD_COUNT)
}

pub struct DashboardView<'a> {
    snapshot: &'a DashboardSnapshot,
    scroll: usize,
    theme: Theme,
}

impl<'a> DashboardView<'a> {
    pub fn new(snapshot: &'a DashboardSnapshot, theme: Theme) -> Self {
        Self {
            snapshot,
            scroll: 0,
            theme,
        }
    }

    pub fn scroll(mut self, offset: usize) -> Self {
        self.scroll = offset;
        self
    }

    fn build_cards(&self) -> Vec<StatCard> {
        let metrics = &self.snapshot.metrics;
        vec![
            StatCard {
                title: "Total Sales",
                value: format_currency(metrics.total_sales as f64),
                color: self.theme.cash(),
            },
            StatCard {
                title: "Daily Average",
                value: format_currency(metrics.average_daily),
                color: self.theme.stat_blue(),
            },
            StatCard {
                title: "Peak Day",
                value: metrics
                    .peak_day
                    .map(|(day, sales)| format!("Day {} (₱{})", day, format_number(sales)))
                    .unwrap_or_else(|| "N/A".to_string()),
                color: self.theme.date(),
            },
            StatCard {
                title: "Up / Down Days",
                value: format!("{} ▲  {} ▼", metrics.up_days, metrics.down_days),
                color: self.theme.bar(),
            },
        ]
    }

    fn render_card_grid(&self, area: Rect, buf: &mut Buffer, cols: usize) {
        let cards = self.build_cards();

        let total_cards_width = (cols as u16) * CARD_WIDTH + ((cols - 1) as u16) * 2;
        let start_x = area.x + (area.width.saturating_sub(total_cards_width)) / 2;

        for (i, card) in cards.iter().enumerate() {
            let row = i / cols;
            let col = i % cols;

            let card_area = Rect {
                x: start_x + (col as u16) * (CARD_WIDTH + 2),
                y: area.y + (row as u16) * (CARD_HEIGHT + 1),
                width: CARD_WIDTH,
                height: CARD_HEIGHT,
            };

            if card_area.bottom() > area.bottom() || card_area.right() > area.right() {
                continue;
            }

            card.render(card_area, buf);
        }
    }

    fn fluctuation_table(&self) -> GridTable {
        let header = ["Date", "Branch", "Sales", "Trend"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = self
            .snapshot
            .fluctuation
            .iter()
            .map(|day| {
                vec![
                    day.label.clone(),
                    day.branch.clone(),
                    format_currency(day.sales as f64),
                    day.trend.arrow().to_string(),
                ]
            })
            .collect();

        let colors = vec![
            self.theme.date(),
            self.theme.text(),
            self.theme.cash(),
            self.theme.muted(),
        ];

        GridTable::new(header, rows, self.theme)
            .scroll(self.scroll)
            .column_colors(colors)
    }
}

impl Widget for DashboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let subtitle = format!(
            "Branch: {} | {}",
            self.snapshot.filter.label(),
            SNAPSHOT_PERIOD.title()
        );
        let body = ViewFrame::new(Tab::Dashboard, "Sales Dashboard", self.theme)
            .subtitle(subtitle)
            .hints(&HINTS)
            .render(area, buf);

        let cols = cards_per_row(body.width);
        let grid_rows = CARD_COUNT.div_ceil(cols) as u16;
        let grid_height = grid_rows * (CARD_HEIGHT + 1);
        let row_count = self.snapshot.fluctuation.len();

        let chunks = Layout::vertical([
            Constraint::Length(1),                                   // Blank
            Constraint::Length(grid_height),                         // Card grid
            Constraint::Length(CHART_HEIGHT),                        // Daily chart
            Constraint::Length(1),                                   // Blank
            Constraint::Length(GridTable::height(row_count, false)), // Fluctuation
            Constraint::Min(0),
        ])
        .split(body);

        self.render_card_grid(chunks[1], buf, cols);

        let values = self
            .snapshot
            .series
            .datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or(&[]);
        let labels: Vec<String> = (1..=values.len()).map(|d| d.to_string()).collect();
        ColumnChart::new(&labels, values, self.theme)
            .color(self.theme.cash())
            .render(chunks[2], buf);

        self.fluctuation_table().render(chunks[4], buf);
        self.render_trend_column(chunks[4], buf);
    }
}

impl DashboardView<'_> {
    /// Recolor trend arrows green or red after the table has drawn them
    fn render_trend_column(&self, area: Rect, buf: &mut Buffer) {
        let start = self.scroll.min(self.snapshot.fluctuation.len());
        let visible = area.height.saturating_sub(1) as usize;
        for (offset, day) in self
            .snapshot
            .fluctuation
            .iter()
            .skip(start)
            .take(visible)
            .enumerate()
        {
            let y = area.y + 1 + offset as u16;
            let color = self.theme.trend(day.trend);
            for x in area.left()..area.right() {
                let cell = &mut buf[(x, y)];
                if cell.symbol() == day.trend.arrow() {
                    cell.set_fg(color);
                }
            }
        }
    }
}

/// One bordered metric card
struct StatCard {
    title: &'static str,
    value: String,
    color: Color,
}

impl StatCard {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.color))
            .render(area, buf);

        if area.height > 2 {
            let width = self.title.chars().count() as u16;
            let x = area.x + (area.width.saturating_sub(width)) / 2;
            buf.set_string(x, area.y + 1, self.title, Style::default().fg(self.color));
        }

        if area.height > 3 {
            let width = self.value.chars().count() as u16;
            let x = area.x + (area.width.saturating_sub(width)) / 2;
            buf.set_string(
                x,
                area.y + 3,
                &self.value,
                Style::default().fg(self.color).add_modifier(Modifier::BOLD),
            );
        }
    }
}
