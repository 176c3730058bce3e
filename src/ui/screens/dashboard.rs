use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph, Sparkline},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::summary::BudgetStatus;
use crate::ui::app::App;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Length(4), // Monthly budget
            Constraint::Min(8),    // Spending by category
            Constraint::Length(4), // Monthly trend sparkline
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_budget(f, chunks[1], app);
    render_spending_chart(f, chunks[2], app);
    render_trend_sparkline(f, chunks[3], app);
}

fn titled_block<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(app.palette.border_style())
        .title(Span::styled(title, app.palette.title_style()))
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    let p = app.palette;
    let stats = &app.stats;
    let entries = [
        (" Total Spent ", stats.total, p.accent),
        (" Food ", stats.food, p.green),
        (" Bills ", stats.bills, p.yellow),
        (" Travel ", stats.travel, p.accent),
        (" Shopping ", stats.shopping, p.red),
    ];
    for (i, (title, amount, color)) in entries.into_iter().enumerate() {
        render_card(f, cards[i], app, title, amount, color);
    }
}

fn render_card(f: &mut Frame, area: Rect, app: &App, title: &str, amount: Decimal, color: Color) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount, app.currency()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(titled_block(app, title));

    f.render_widget(text, area);
}

fn render_budget(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette;
    let block = titled_block(app, " Monthly Budget ");

    let Some(month) = app.filter.month.as_deref() else {
        let msg = Paragraph::new(Line::from(Span::styled(
            "Select a month to set a budget (:month YYYY-MM)",
            p.dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    };

    let Some(usage) = &app.budget_usage else {
        let msg = Paragraph::new(Line::from(Span::styled(
            format!("No budget for {month}. Set one with :budget <amount>"),
            p.dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    };

    let (color, note) = match usage.status() {
        BudgetStatus::Exceeded => (p.red, "You have crossed the budget for this month!".to_string()),
        BudgetStatus::Warning => (
            p.yellow,
            format!("Warning: {:.0}% of budget used.", usage.used_pct),
        ),
        BudgetStatus::Ok => (p.green, String::new()),
    };

    let label = format!(
        "{} of {} ({:.0}%) {note}",
        format_amount(usage.spent, app.currency()),
        format_amount(usage.budget, app.currency()),
        usage.used_pct
    );
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(color).bg(p.surface))
        .ratio(usage.ratio().clamp(0.0, 1.0))
        .label(Span::styled(label, Style::default().fg(p.text).add_modifier(Modifier::BOLD)));
    f.render_widget(gauge, area);
}

fn render_spending_chart(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette;
    if app.spending_by_category.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No categorized expenses for this filter. Add one with :add",
            p.dim_style(),
        )))
        .centered()
        .block(titled_block(app, " Spending by Category "));
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = app
        .spending_by_category
        .iter()
        .take(12)
        .map(|(name, amt)| {
            let val = amt.round().to_u64().unwrap_or(0);
            Bar::default()
                .value(val)
                .label(Line::from(truncate(name, 10)))
                .style(Style::default().fg(p.accent))
                .value_style(Style::default().fg(p.header_bg).bg(p.accent).add_modifier(Modifier::BOLD))
        })
        .collect();

    let chart = BarChart::default()
        .block(titled_block(app, " Spending by Category "))
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .bar_style(Style::default().fg(p.accent))
        .value_style(Style::default().fg(p.text));

    f.render_widget(chart, area);
}

fn render_trend_sparkline(f: &mut Frame, area: Rect, app: &App) {
    let data: Vec<u64> = app
        .monthly_trend
        .iter()
        .map(|(_, total)| total.round().to_u64().unwrap_or(0))
        .collect();

    let title = match (app.monthly_trend.first(), app.monthly_trend.last()) {
        (Some((first, _)), Some((last, _))) if first != last => {
            format!(" Monthly Spending ({first} .. {last}) ")
        }
        (Some((only, _)), _) => format!(" Monthly Spending ({only}) "),
        _ => " Monthly Spending ".to_string(),
    };

    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.palette.border_style())
                .title(Span::styled(title, app.palette.title_style())),
        )
        .data(&data)
        .style(Style::default().fg(app.palette.yellow));

    f.render_widget(sparkline, area);
}
