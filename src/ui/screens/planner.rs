use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::models::CoreCategory;
use crate::planner::PlanVerdict;
use crate::ui::app::App;
use crate::ui::util::{format_amount, plan_message};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette;
    let Some(plan) = &app.plan else {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No plan yet", p.dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Run :plan <salary> <goal amount> [YYYY-MM] [goal name]",
                p.dim_style(),
            )),
            Line::from(Span::styled(
                "e.g. :plan 50000 20000 2024-06 New phone",
                p.dim_style(),
            )),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(p.border_style())
            .title(Span::styled(" Purchase Planner ", p.title_style()));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Overview
            Constraint::Length(4), // Verdict
            Constraint::Min(5),    // Category limits
        ])
        .split(area);

    let symbol = app.currency();
    let label = Style::default().fg(p.text_dim);
    let value = Style::default().fg(p.text).add_modifier(Modifier::BOLD);
    let leftover_style = if plan.leftover > rust_decimal::Decimal::ZERO {
        p.good_style()
    } else {
        p.bad_style()
    };

    let overview = vec![
        Line::from(vec![
            Span::styled("  Goal           ", label),
            Span::styled(&plan.goal_name, value),
        ]),
        Line::from(vec![
            Span::styled("  Month          ", label),
            Span::styled(&plan.month, value),
        ]),
        Line::from(vec![
            Span::styled("  Salary         ", label),
            Span::styled(format_amount(plan.salary, symbol), value),
        ]),
        Line::from(vec![
            Span::styled("  Goal cost      ", label),
            Span::styled(format_amount(plan.goal_amount, symbol), value),
        ]),
        Line::from(vec![
            Span::styled("  Left to spend  ", label),
            Span::styled(format_amount(plan.leftover, symbol), leftover_style),
        ]),
        Line::from(vec![
            Span::styled("  Spent so far   ", label),
            Span::styled(format_amount(plan.spent_so_far, symbol), value),
        ]),
    ];
    f.render_widget(
        Paragraph::new(overview).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(p.border_style())
                .title(Span::styled(" Purchase Planner ", p.title_style())),
        ),
        chunks[0],
    );

    let verdict_style = match plan.verdict() {
        PlanVerdict::Infeasible => p.bad_style(),
        PlanVerdict::Achievable => p.good_style(),
        PlanVerdict::OverBudget => p.warn_style(),
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(plan_message(plan, symbol), verdict_style)))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(p.border_style()),
            ),
        chunks[1],
    );

    let header = Row::new(
        ["Category", "Recommended maximum"]
            .iter()
            .map(|h| Cell::from(*h).style(p.header_style())),
    );
    let rows: Vec<Row> = CoreCategory::all()
        .iter()
        .enumerate()
        .map(|(i, cat)| {
            let style = if i % 2 == 1 {
                p.alt_row_style()
            } else {
                p.normal_style()
            };
            Row::new(vec![
                Cell::from(format!("  {cat}")),
                Cell::from(format_amount(plan.budget_for(*cat), symbol)),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(16)])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(p.border_style())
                .title(Span::styled(
                    " Recommended maximum spending this month ",
                    p.title_style(),
                )),
        );
    f.render_widget(table, chunks[2]);
}
