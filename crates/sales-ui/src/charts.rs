//! Revenue charts for the sales dashboard.
//!
//! A line chart of revenue per calendar month and a horizontal bar chart of
//! revenue per category, side by side, with the grand total underneath.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use sales_core::dates::{add_months, months_between};
use sales_core::formatting::{format_compact, format_month, format_revenue};
use sales_core::models::{CategoryRevenue, MonthlyRevenue};

use crate::themes::Theme;

/// Widest category label drawn next to a bar, in terminal columns.
const MAX_LABEL_WIDTH: usize = 14;

// ── Dashboard ─────────────────────────────────────────────────────────────────

/// Render both charts and the total line into `area`.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    monthly: &[MonthlyRevenue],
    categories: &[CategoryRevenue],
    total_revenue: f64,
    theme: &Theme,
) {
    if monthly.is_empty() && categories.is_empty() {
        render_no_data(frame, area, theme);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_monthly_chart(frame, columns[0], monthly, theme);
    render_category_chart(frame, columns[1], categories, theme);

    let footer = Line::from(vec![
        Span::styled("Total revenue: ", theme.text),
        Span::styled(format_revenue(total_revenue), theme.total),
        Span::styled("   Press 'q' or Ctrl+C to exit", theme.dim),
    ]);
    frame.render_widget(Paragraph::new(footer), rows[1]);
}

// ── Monthly line chart ────────────────────────────────────────────────────────

/// Line chart of revenue by month, x axis labelled `Mon/YYYY`.
pub fn render_monthly_chart(frame: &mut Frame, area: Rect, monthly: &[MonthlyRevenue], theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(" Revenue by Month ", theme.title));

    let points = month_points(monthly);
    let x_max = points.last().map_or(0.0, |&(x, _)| x).max(1.0);
    let (y_min, y_max) = y_bounds(monthly.iter().map(|m| m.total_revenue));

    let dataset = Dataset::default()
        .name("revenue")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.line)
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .title("Month")
                .style(theme.axis)
                .bounds([0.0, x_max])
                .labels(month_labels(monthly)),
        )
        .y_axis(
            Axis::default()
                .title("Revenue")
                .style(theme.axis)
                .bounds([y_min, y_max])
                .labels(vec![
                    format_compact(y_min),
                    format_compact((y_min + y_max) / 2.0),
                    format_compact(y_max),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Chart points with x = months since the first month, so gaps between
/// months keep their calendar width.
fn month_points(monthly: &[MonthlyRevenue]) -> Vec<(f64, f64)> {
    let Some(first) = monthly.first() else {
        return Vec::new();
    };
    monthly
        .iter()
        .map(|m| {
            let x = months_between(first.month_start, m.month_start);
            (f64::from(x), m.total_revenue)
        })
        .collect()
}

/// Labels for the first and last month, plus the midpoint month when the
/// span is even so it sits exactly under the middle tick.
fn month_labels(monthly: &[MonthlyRevenue]) -> Vec<String> {
    let (Some(first), Some(last)) = (monthly.first(), monthly.last()) else {
        return Vec::new();
    };
    let span = months_between(first.month_start, last.month_start);
    if span <= 0 {
        return vec![format_month(first.month_start)];
    }
    let mut labels = vec![format_month(first.month_start)];
    if span % 2 == 0 {
        if let Some(mid) = add_months(first.month_start, (span / 2) as u32) {
            labels.push(format_month(mid));
        }
    }
    labels.push(format_month(last.month_start));
    labels
}

/// Y range covering every value and zero, with 10 % headroom.
fn y_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if max - min <= f64::EPSILON {
        return (min, min + 1.0);
    }
    let pad = (max - min) * 0.1;
    (if min < 0.0 { min - pad } else { 0.0 }, max + pad)
}

// ── Category bar chart ────────────────────────────────────────────────────────

/// Horizontal bar chart of revenue by category, largest first.
///
/// Bar lengths are proportional to revenue; negative totals draw as empty
/// bars but keep their printed value.
pub fn render_category_chart(
    frame: &mut Frame,
    area: Rect,
    categories: &[CategoryRevenue],
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(" Revenue by Category ", theme.title));

    let bars: Vec<Bar> = categories
        .iter()
        .map(|c| {
            Bar::default()
                .value(c.total_revenue.max(0.0).round() as u64)
                .text_value(format_compact(c.total_revenue))
                .label(Line::from(truncate_label(&c.category, MAX_LABEL_WIDTH)))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .bar_style(theme.bar)
        .value_style(theme.bar_value)
        .label_style(theme.bar_label)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

/// Cut `label` to at most `max_width` terminal columns, marking the cut with
/// an ellipsis.
fn truncate_label(label: &str, max_width: usize) -> String {
    if label.width() <= max_width {
        return label.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

// ── Empty state ───────────────────────────────────────────────────────────────

/// Placeholder shown when the sales table produced no aggregates.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No sales data to chart", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "The sales file has no dated, categorised rows.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Sales Pipeline "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
