//! Chart dashboard event loop.
//!
//! [`ChartApp`] takes over the terminal, draws the revenue charts, and blocks
//! until the user dismisses them.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use sales_core::models::{CategoryRevenue, MonthlyRevenue};

use crate::charts;
use crate::themes::Theme;

/// Whether a run draws the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardMode {
    Show,
    /// Turned off with `--no-charts`.
    Disabled,
    /// stdin or stdout is not a terminal (cron, CI, pipes).
    NoTerminal,
}

/// Decide the dashboard mode for this process.
pub fn dashboard_mode(no_charts: bool) -> DashboardMode {
    select_mode(no_charts, io::stdin().is_tty(), io::stdout().is_tty())
}

fn select_mode(no_charts: bool, stdin_tty: bool, stdout_tty: bool) -> DashboardMode {
    if no_charts {
        DashboardMode::Disabled
    } else if stdin_tty && stdout_tty {
        DashboardMode::Show
    } else {
        DashboardMode::NoTerminal
    }
}

/// Owns the dashboard theme.
pub struct ChartApp {
    theme: Theme,
    tick_rate: Duration,
}

impl ChartApp {
    /// Create an app using the named theme (`light`, `dark` or `auto`).
    pub fn new(theme_name: &str) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            tick_rate: Duration::from_millis(250),
        }
    }

    /// Show the dashboard, then wait for `q` / `Esc` / `Ctrl+C`.
    ///
    /// The terminal is restored before returning, also when drawing fails.
    pub fn run(
        &self,
        monthly: &[MonthlyRevenue],
        categories: &[CategoryRevenue],
        total_revenue: f64,
    ) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal, monthly, categories, total_revenue);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn event_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        monthly: &[MonthlyRevenue],
        categories: &[CategoryRevenue],
        total_revenue: f64,
    ) -> io::Result<()> {
        loop {
            terminal.draw(|frame| {
                let area = frame.area();
                charts::render_dashboard(
                    frame,
                    area,
                    monthly,
                    categories,
                    total_revenue,
                    &self.theme,
                );
            })?;

            if event::poll(self.tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if is_quit_key(&key) {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// `true` for the keys that close the dashboard.
fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        _ => false,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
