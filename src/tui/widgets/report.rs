//! Period report view: totals chart, period table and distribution.
//! Serves the branch cash, branch volume and driver tabs.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::chart::ColumnChart;
use super::frame::ViewFrame;
use super::table::GridTable;
use super::tabs::Tab;
use crate::services::calendar::ReportPeriod;
use crate::services::format::{format_currency, format_percent, format_volume};
use crate::services::{Granularity, Scope};
use crate::tui::theme::Theme;
use crate::types::{AggregationReport, DriverRanking, DriverReport, Measure, Share};

const CHART_HEIGHT: u16 = 9;

/// Side panel width for the driver ranking
const RANKING_WIDTH: u16 = 52;

const HINTS: [(&str, &str); 4] = [
    ("←→", "Month"),
    ("[ ]", "Year"),
    ("y", "Monthly/Yearly"),
    ("↑↓", "Scroll"),
];

/// Branch or driver report for one period and scope
pub struct ReportView<'a> {
    tab: Tab,
    title: String,
    scope: Scope,
    granularity: Granularity,
    report: &'a AggregationReport,
    ranking: Option<&'a DriverRanking>,
    format: fn(f64) -> String,
    scroll: usize,
    theme: Theme,
}

impl<'a> ReportView<'a> {
    pub fn branch(
        report: &'a AggregationReport,
        measure: Measure,
        period: ReportPeriod,
        scope: Scope,
        theme: Theme,
    ) -> Self {
        let (tab, format): (Tab, fn(f64) -> String) = match measure {
            Measure::Cash => (Tab::Branch, format_currency),
            Measure::Volume => (Tab::Volume, format_volume),
        };
        Self {
            tab,
            title: scope.title(measure.label(), period),
            scope,
            granularity: scope.granularity(period),
            report,
            ranking: None,
            format,
            scroll: 0,
            theme,
        }
    }

    pub fn drivers(
        driver_report: &'a DriverReport,
        period: ReportPeriod,
        scope: Scope,
        theme: Theme,
    ) -> Self {
        Self {
            tab: Tab::Drivers,
            title: scope.title("Driver Volume", period),
            scope,
            granularity: scope.granularity(period),
            report: &driver_report.report,
            ranking: Some(&driver_report.ranking),
            format: format_volume,
            scroll: 0,
            theme,
        }
    }

    pub fn scroll(mut self, offset: usize) -> Self {
        self.scroll = offset;
        self
    }

    fn subtitle(&self) -> String {
        format!(
            "{} view | Total {}",
            self.scope.label(),
            (self.format)(self.report.table.grand_total)
        )
    }

    fn period_table(&self) -> GridTable {
        let table = &self.report.table;
        let fmt = self.format;

        let mut header = vec![self.granularity.period_heading().to_string()];
        header.extend(table.column_totals.iter().map(|c| c.label.clone()));
        header.push(self.granularity.total_heading().to_string());

        let rows = table
            .rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.label.clone()];
                cells.extend(row.values.iter().map(|v| fmt(*v)));
                cells.push(fmt(row.total));
                cells
            })
            .collect();

        let mut footer = vec!["TOTAL".to_string()];
        footer.extend(table.column_totals.iter().map(|c| fmt(c.total)));
        footer.push(fmt(table.grand_total));

        // Column 0 is the period label, dimensions start at 1
        let mut colors = vec![self.theme.date()];
        colors.extend((0..table.column_totals.len()).map(|i| self.theme.series(i)));
        colors.push(self.theme.text());

        GridTable::new(header, rows, self.theme)
            .footer(footer)
            .scroll(self.scroll)
            .column_colors(colors)
    }

    fn ranking_table(&self, ranking: &DriverRanking) -> GridTable {
        let header = ["#", "Driver", "Volume", "Share"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = ranking
            .rows
            .iter()
            .zip(ranking.distribution())
            .enumerate()
            .map(|(i, (row, share))| {
                vec![
                    (i + 1).to_string(),
                    row.name.clone(),
                    format_volume(row.total_volume),
                    format_percent(share.percent),
                ]
            })
            .collect();
        let footer = vec![
            String::new(),
            "TOTAL".to_string(),
            format_volume(ranking.total_volume),
            String::new(),
        ];
        GridTable::new(header, rows, self.theme).footer(footer)
    }

    fn shares(&self) -> Vec<Share> {
        match self.ranking {
            Some(ranking) => ranking.distribution(),
            None => self.report.table.distribution(),
        }
    }

    fn render_distribution(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (i, share) in self.shares().iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled(
                format!("■ {} ", share.label),
                Style::default().fg(self.theme.series(i)),
            ));
            spans.push(Span::styled(
                format_percent(share.percent),
                Style::default().fg(self.theme.muted()),
            ));
        }
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

impl Widget for ReportView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let body = ViewFrame::new(self.tab, self.title.clone(), self.theme)
            .subtitle(self.subtitle())
            .hints(&HINTS)
            .render(area, buf);

        let (main, side) = match self.ranking {
            Some(_) if body.width > RANKING_WIDTH * 2 => {
                let cols =
                    Layout::horizontal([Constraint::Min(0), Constraint::Length(RANKING_WIDTH)])
                        .split(body);
                (cols[0], Some(cols[1]))
            }
            _ => (body, None),
        };

        let row_count = self.report.table.rows.len();
        let chunks = Layout::vertical([
            Constraint::Length(CHART_HEIGHT),                       // Chart
            Constraint::Length(1),                                  // Blank
            Constraint::Length(GridTable::height(row_count, true)), // Table
            Constraint::Length(1),                                  // Blank
            Constraint::Length(1),                                  // Distribution
            Constraint::Min(0),
        ])
        .split(main);

        let totals: Vec<f64> = self.report.table.rows.iter().map(|r| r.total).collect();
        ColumnChart::new(&self.report.series.labels, &totals, self.theme).render(chunks[0], buf);
        self.period_table().render(chunks[2], buf);
        self.render_distribution(chunks[4], buf);

        if let (Some(side), Some(ranking)) = (side, self.ranking) {
            let height = GridTable::height(ranking.rows.len(), true);
            let ranking_area = Rect {
                height: height.min(side.height),
                ..side
            };
            self.ranking_table(ranking).render(ranking_area, buf);
        }
    }
}
