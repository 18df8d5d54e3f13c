//! Comparison view: one month side by side across three years

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::chart::ColumnChart;
use super::frame::ViewFrame;
use super::table::GridTable;
use super::tabs::Tab;
use crate::services::comparison::{MonthlyComparison, YearTotals};
use crate::services::format::{format_currency, format_volume};
use crate::tui::theme::Theme;

const CHART_HEIGHT: u16 = 10;

const HINTS: [(&str, &str); 3] = [("←→", "Month"), ("[ ]", "Year"), ("↑↓", "Scroll")];

pub struct ComparisonView<'a> {
    comparison: &'a MonthlyComparison,
    scroll: usize,
    theme: Theme,
}

impl<'a> ComparisonView<'a> {
    pub fn new(comparison: &'a MonthlyComparison, theme: Theme) -> Self {
        Self {
            comparison,
            scroll: 0,
            theme,
        }
    }

    pub fn scroll(mut self, offset: usize) -> Self {
        self.scroll = offset;
        self
    }

    fn subtitle(&self) -> String {
        let years: Vec<String> = self
            .comparison
            .years()
            .iter()
            .map(|y| y.year.to_string())
            .collect();
        years.join(" vs ")
    }

    fn table(&self) -> GridTable {
        let years = self.comparison.years();

        let mut header = vec!["Branch".to_string()];
        for year in years {
            header.push(format!("{} Cash", year.year));
            header.push(format!("{} MT", year.year));
        }

        let rows = self
            .comparison
            .rows
            .iter()
            .map(|r| {
                vec![
                    r.branch.clone(),
                    format_currency(r.prev_cash),
                    format_volume(r.prev_volume),
                    format_currency(r.curr_cash),
                    format_volume(r.curr_volume),
                    format_currency(r.next_cash),
                    format_volume(r.next_volume),
                ]
            })
            .collect();

        let mut footer = vec!["TOTAL".to_string()];
        for year in years {
            footer.push(format_currency(year.total_cash()));
            footer.push(format_volume(year.total_volume()));
        }

        let colors = std::iter::once(self.theme.text())
            .chain(years.iter().flat_map(|_| [self.theme.cash(), self.theme.text()]))
            .collect();

        GridTable::new(header, rows, self.theme)
            .footer(footer)
            .scroll(self.scroll)
            .column_colors(colors)
    }

    /// Cash per branch for one year, headed by the year
    fn render_year_chart(&self, year: &YearTotals, color_index: usize, area: Rect, buf: &mut Buffer) {
        let [heading, chart] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

        Paragraph::new(Line::from(Span::styled(
            year.year.to_string(),
            Style::default()
                .fg(self.theme.date())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(heading, buf);

        let series = year.chart();
        let Some(cash) = series.dataset("cash") else {
            return;
        };
        ColumnChart::new(&series.labels, &cash.data, self.theme)
            .color(self.theme.series(color_index))
            .render(chart, buf);
    }
}

impl Widget for ComparisonView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!("Monthly Comparison - {}", self.comparison.period.title());
        let body = ViewFrame::new(Tab::Comparison, title, self.theme)
            .subtitle(self.subtitle())
            .hints(&HINTS)
            .render(area, buf);

        let row_count = self.comparison.rows.len();
        let chunks = Layout::vertical([
            Constraint::Length(1),                                  // Blank
            Constraint::Length(GridTable::height(row_count, true)), // Table
            Constraint::Length(1),                                  // Blank
            Constraint::Length(CHART_HEIGHT + 1),                   // Charts
            Constraint::Min(0),
        ])
        .split(body);

        self.table().render(chunks[1], buf);

        let columns = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[3]);
        for (i, (year, column)) in self.comparison.years().iter().zip(columns.iter()).enumerate() {
            self.render_year_chart(year, i, *column, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::calendar::ReportPeriod;
    use crate::types::BranchSale;
    use chrono::NaiveDate;

    fn sale(y: i32, m: u32, d: u32, branch: &str, cash: f64, volume: f64) -> BranchSale {
        BranchSale::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), branch, cash, volume)
    }

    fn make_comparison() -> MonthlyComparison {
        let records = vec![
            sale(2025, 3, 1, "Molo", 1_000.0, 1.0),
            sale(2026, 3, 5, "Molo", 3_000.0, 3.0),
            sale(2026, 3, 9, "Oton", 400.0, 0.5),
            sale(2027, 3, 31, "Oton", 700.0, 2.0),
        ];
        let branches = vec!["Molo".to_string(), "Oton".to_string()];
        MonthlyComparison::build(&records, &branches, ReportPeriod::new(2026, 3).unwrap())
    }

    fn render(view: ComparisonView<'_>, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_subtitle_lists_three_years() {
        let comparison = make_comparison();
        let view = ComparisonView::new(&comparison, Theme::Dark);
        assert_eq!(view.subtitle(), "2025 vs 2026 vs 2027");
    }

    #[test]
    fn test_render_table_and_totals() {
        let comparison = make_comparison();
        let content = render(ComparisonView::new(&comparison, Theme::Dark), 140, 40);

        assert!(content.contains("Monthly Comparison - March 2026"));
        assert!(content.contains("[Comparison]"));
        assert!(content.contains("2026 Cash"));
        assert!(content.contains("2027 MT"));
        assert!(content.contains("₱3,400"));
        assert!(content.contains("3.50 MT"));
        assert!(content.contains("TOTAL"));
    }

    #[test]
    fn test_empty_year_renders_zero_totals() {
        let records: Vec<BranchSale> = Vec::new();
        let branches = vec!["Molo".to_string()];
        let comparison =
            MonthlyComparison::build(&records, &branches, ReportPeriod::new(2026, 1).unwrap());
        let content = render(ComparisonView::new(&comparison, Theme::Dark), 140, 40);

        assert!(content.contains("₱0"));
        assert!(content.contains("0.00 MT"));
        assert!(!content.contains('█'));
    }
}
