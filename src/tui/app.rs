//! Application state and event loop

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, DefaultTerminal, Frame};

use crate::services::{Aggregator, Dataset, LandingDashboard, MonthlyComparison, ReportPeriod, Scope};
use crate::types::{AggregationReport, DriverReport, Measure};

use super::theme::Theme;
use super::widgets::{
    comparison::ComparisonView, dashboard::DashboardView, help::HelpPopup, report::ReportView,
    table::GridTable, tabs::Tab,
};

/// Every report the period-driven tabs render, computed together
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSnapshot {
    pub period: ReportPeriod,
    pub scope: Scope,
    pub branch: AggregationReport,
    pub volume: AggregationReport,
    pub drivers: DriverReport,
    pub comparison: MonthlyComparison,
}

impl ReportSnapshot {
    pub fn build(dataset: &Dataset, period: ReportPeriod, scope: Scope) -> Self {
        let branches = dataset.branches();
        let records = &dataset.branch_sales;
        Self {
            period,
            scope,
            branch: Aggregator::branch_report(records, branches, period, scope, Measure::Cash),
            volume: Aggregator::branch_report(records, branches, period, scope, Measure::Volume),
            drivers: Aggregator::driver_report(&dataset.driver_sales, period, scope),
            comparison: MonthlyComparison::build(records, branches, period),
        }
    }
}

/// Main application
pub struct App {
    dataset: Dataset,
    snapshot: ReportSnapshot,
    dashboard: LandingDashboard,
    current_tab: Tab,
    scroll: usize,
    show_help: bool,
    should_quit: bool,
    redraw_pending: bool,
    theme: Theme,
}

impl App {
    pub fn new(dataset: Dataset, period: ReportPeriod) -> Self {
        let snapshot = ReportSnapshot::build(&dataset, period, Scope::default());
        Self {
            dataset,
            snapshot,
            dashboard: LandingDashboard::default(),
            current_tab: Tab::default(),
            scroll: 0,
            show_help: false,
            should_quit: false,
            redraw_pending: true,
            theme: Theme::default(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn period(&self) -> ReportPeriod {
        self.snapshot.period
    }

    pub fn scope(&self) -> Scope {
        self.snapshot.scope
    }

    pub fn snapshot(&self) -> &ReportSnapshot {
        &self.snapshot
    }

    pub fn dashboard(&self) -> &LandingDashboard {
        &self.dashboard
    }

    /// Handle keyboard and resize events
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.should_quit = true;
                    }
                    KeyCode::Tab => self.select_tab(self.current_tab.next()),
                    KeyCode::BackTab => self.select_tab(self.current_tab.prev()),
                    KeyCode::Char(c @ '1'..='5') => {
                        if let Some(tab) = Tab::from_number(c as u8 - b'0') {
                            self.select_tab(tab);
                        }
                    }
                    KeyCode::Left | KeyCode::Char('h') if self.current_tab.uses_period() => {
                        self.navigate(self.period().prev_month(), self.scope());
                    }
                    KeyCode::Right | KeyCode::Char('l') if self.current_tab.uses_period() => {
                        self.navigate(self.period().next_month(), self.scope());
                    }
                    KeyCode::Char('[') if self.current_tab.uses_period() => {
                        self.navigate(self.period().prev_year(), self.scope());
                    }
                    KeyCode::Char(']') if self.current_tab.uses_period() => {
                        self.navigate(self.period().next_year(), self.scope());
                    }
                    KeyCode::Char('y') if self.current_tab.uses_period() => {
                        self.navigate(self.period(), self.scope().toggle());
                    }
                    KeyCode::Char('b') if self.current_tab == Tab::Dashboard => {
                        self.dashboard.cycle_filter();
                        self.scroll = 0;
                        tracing::debug!(
                            filter = self.dashboard.snapshot().filter.label(),
                            "dashboard filter changed"
                        );
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.scroll = self.scroll.saturating_sub(1);
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        self.scroll = (self.scroll + 1).min(self.max_scroll());
                    }
                    KeyCode::Char('?') => {
                        self.show_help = !self.show_help;
                    }
                    _ => return,
                }
                self.request_redraw();
            }
            Event::Resize(..) => self.request_redraw(),
            _ => {}
        }
    }

    fn select_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
        self.scroll = 0;
    }

    /// Recompute every period report, then swap the snapshot in whole
    fn navigate(&mut self, period: ReportPeriod, scope: Scope) {
        if period == self.period() && scope == self.scope() {
            return;
        }
        self.snapshot = ReportSnapshot::build(&self.dataset, period, scope);
        self.scroll = 0;
        tracing::debug!(
            year = period.year,
            month = period.month,
            scope = scope.label(),
            "report period changed"
        );
    }

    /// Body rows of the table on the current tab
    fn row_count(&self) -> usize {
        match self.current_tab {
            Tab::Dashboard => self.dashboard.snapshot().fluctuation.len(),
            Tab::Branch => self.snapshot.branch.table.rows.len(),
            Tab::Volume => self.snapshot.volume.table.rows.len(),
            Tab::Drivers => self.snapshot.drivers.report.table.rows.len(),
            Tab::Comparison => self.snapshot.comparison.rows.len(),
        }
    }

    fn max_scroll(&self) -> usize {
        GridTable::max_scroll_offset(self.row_count())
    }

    /// Mark the screen stale. Repeated calls before a draw collapse into one.
    pub fn request_redraw(&mut self) {
        self.redraw_pending = true;
    }

    /// Consume the redraw flag
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_pending)
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let period = self.period();
        let scope = self.scope();
        let snapshot = &self.snapshot;

        match self.current_tab {
            Tab::Dashboard => DashboardView::new(self.dashboard.snapshot(), self.theme)
                .scroll(self.scroll)
                .render(area, buf),
            Tab::Branch => {
                ReportView::branch(&snapshot.branch, Measure::Cash, period, scope, self.theme)
                    .scroll(self.scroll)
                    .render(area, buf)
            }
            Tab::Volume => {
                ReportView::branch(&snapshot.volume, Measure::Volume, period, scope, self.theme)
                    .scroll(self.scroll)
                    .render(area, buf)
            }
            Tab::Drivers => ReportView::drivers(&snapshot.drivers, period, scope, self.theme)
                .scroll(self.scroll)
                .render(area, buf),
            Tab::Comparison => ComparisonView::new(&snapshot.comparison, self.theme)
                .scroll(self.scroll)
                .render(area, buf),
        }

        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(self.theme).render(popup_area, buf);
        }
    }
}

/// Run the TUI application
pub fn run(dataset: Dataset, period: ReportPeriod) -> anyhow::Result<()> {
    // Theme detection queries the terminal, so it must happen before raw mode
    let theme = Theme::detect();
    let app = App::new(dataset, period).with_theme(theme);

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, app);
    ratatui::restore();
    result
}

fn run_app(terminal: &mut DefaultTerminal, mut app: App) -> anyhow::Result<()> {
    tracing::info!(
        year = app.period().year,
        month = app.period().month,
        "starting dashboard"
    );

    loop {
        if app.take_redraw() {
            terminal.draw(|frame| app.draw(frame))?;
        }

        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::dashboard::BranchFilter;
    use crate::types::{BranchSale, DriverSale};
    use chrono::NaiveDate;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_dataset() -> Dataset {
        Dataset::new(
            vec!["Molo".to_string(), "Oton".to_string()],
            vec![
                BranchSale::new(date(2026, 1, 1), "Molo", 100.0, 1.0),
                BranchSale::new(date(2026, 1, 1), "Oton", 50.0, 2.0),
                BranchSale::new(date(2026, 2, 3), "Molo", 300.0, 3.0),
                BranchSale::new(date(2025, 12, 31), "Oton", 70.0, 0.5),
            ],
            vec![
                DriverSale::new(date(2026, 1, 2), "DRV-001", "John Martinez", 8.0),
                DriverSale::new(date(2026, 2, 2), "DRV-002", "Carlos Reyes", 4.5),
            ],
        )
    }

    fn make_app() -> App {
        App::new(make_dataset(), ReportPeriod::new(2026, 1).unwrap())
    }

    /// App showing the branch cash tab
    fn make_report_app() -> App {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('2'));
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    // ========== Construction tests ==========

    #[test]
    fn test_app_initial_state() {
        let mut app = make_app();
        assert_eq!(app.current_tab, Tab::Dashboard);
        assert_eq!(app.scope(), Scope::Monthly);
        assert_eq!(app.snapshot().branch.table.grand_total, 150.0);
        assert!(!app.should_quit());
        // First frame is always drawn
        assert!(app.take_redraw());
    }

    // ========== Quit / help tests ==========

    #[test]
    fn test_app_quit_on_q() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_app_quit_on_esc() {
        let mut app = make_app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }

    #[test]
    fn test_help_toggle() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('?'));
        assert!(!app.show_help);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut app = make_app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        app.handle_event(Event::Key(key));
        assert!(!app.should_quit());
    }

    // ========== Tab navigation tests ==========

    #[test]
    fn test_app_tab_navigation() {
        let mut app = make_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_tab, Tab::Branch);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_tab, Tab::Comparison);
    }

    #[test]
    fn test_number_keys_select_tab() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.current_tab, Tab::Drivers);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.current_tab, Tab::Drivers);
    }

    #[test]
    fn test_tab_switch_resets_scroll() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.scroll, 2);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.scroll, 0);
    }

    // ========== Period navigation tests ==========

    #[test]
    fn test_month_navigation_recomputes_snapshot() {
        let mut app = make_report_app();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.period(), ReportPeriod::new(2026, 2).unwrap());
        assert_eq!(app.snapshot().branch.table.rows.len(), 28);
        assert_eq!(app.snapshot().branch.table.grand_total, 300.0);
        assert_eq!(app.snapshot().drivers.ranking.rows[0].name, "Carlos Reyes");
        assert_eq!(app.snapshot().comparison.period.month, 2);
    }

    #[test]
    fn test_month_navigation_wraps_year() {
        let mut app = make_report_app();
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.period(), ReportPeriod::new(2025, 12).unwrap());
        assert_eq!(app.snapshot().branch.table.grand_total, 70.0);
    }

    #[test]
    fn test_year_navigation() {
        let mut app = make_report_app();
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.period(), ReportPeriod::new(2027, 1).unwrap());
        press(&mut app, KeyCode::Char('['));
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.period(), ReportPeriod::new(2025, 1).unwrap());
    }

    #[test]
    fn test_scope_toggle_switches_to_months() {
        let mut app = make_report_app();
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.scope(), Scope::Yearly);
        assert_eq!(app.snapshot().branch.table.rows.len(), 12);
        assert_eq!(app.snapshot().branch.table.grand_total, 450.0);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.scope(), Scope::Monthly);
    }

    #[test]
    fn test_navigation_resets_scroll() {
        let mut app = make_report_app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_period_keys_ignored_on_dashboard() {
        let mut app = make_app();
        app.take_redraw();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(']'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.period(), ReportPeriod::new(2026, 1).unwrap());
        assert_eq!(app.scope(), Scope::Monthly);
        assert!(!app.take_redraw());
    }

    // ========== Scroll tests ==========

    #[test]
    fn test_scroll_clamped_to_table() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('2'));
        for _ in 0..100 {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.scroll, GridTable::max_scroll_offset(31));

        for _ in 0..100 {
            press(&mut app, KeyCode::Up);
        }
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_scroll_short_table_stays_zero() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.scroll, 0);
    }

    // ========== Dashboard filter tests ==========

    #[test]
    fn test_branch_filter_cycles_on_dashboard() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(
            app.dashboard().snapshot().filter,
            BranchFilter::Branch("Molo".to_string())
        );
    }

    #[test]
    fn test_branch_filter_ignored_on_other_tabs() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.dashboard().snapshot().filter, BranchFilter::All);
    }

    // ========== Redraw flag tests ==========

    #[test]
    fn test_redraw_flag_is_idempotent() {
        let mut app = make_app();
        assert!(app.take_redraw());
        assert!(!app.take_redraw());

        app.request_redraw();
        app.request_redraw();
        assert!(app.take_redraw());
        assert!(!app.take_redraw());
    }

    #[test]
    fn test_navigation_requests_redraw() {
        let mut app = make_report_app();
        app.take_redraw();
        press(&mut app, KeyCode::Right);
        assert!(app.take_redraw());
    }

    #[test]
    fn test_unbound_key_does_not_redraw() {
        let mut app = make_app();
        app.take_redraw();
        press(&mut app, KeyCode::Char('z'));
        assert!(!app.take_redraw());
    }

    #[test]
    fn test_resize_requests_redraw() {
        let mut app = make_app();
        app.take_redraw();
        app.handle_event(Event::Resize(120, 40));
        assert!(app.take_redraw());
    }

    // ========== Render tests ==========

    #[test]
    fn test_render_each_tab() {
        let mut app = make_app();
        let area = Rect::new(0, 0, 140, 50);
        let expected = [
            "Sales Dashboard",
            "Cash Sales - January 2026",
            "Volume Sales - January 2026",
            "Driver Volume - January 2026",
            "Monthly Comparison - January 2026",
        ];

        for title in expected {
            let mut buf = Buffer::empty(area);
            (&app).render(area, &mut buf);
            let content: String = buf.content().iter().map(|c| c.symbol()).collect();
            assert!(content.contains(title), "missing {title}");
            press(&mut app, KeyCode::Tab);
        }
    }

    #[test]
    fn test_render_help_overlay() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('?'));
        let area = Rect::new(0, 0, 140, 50);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);
        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Press ? to close"));
    }
}
