use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::util::{format_amount_precise, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let p = app.palette;
    if app.expenses.is_empty() {
        let msg = if !app.search_input.is_empty() {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("No expenses matching '{}'", app.search_input),
                    p.dim_style(),
                )),
                Line::from(""),
                Line::from(Span::styled("Press Esc to clear the search", p.dim_style())),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled("No expenses for this filter", p.dim_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Add one with :add <YYYY-MM-DD> <amount> <description> | <category>",
                    p.dim_style(),
                )),
            ]
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(p.border_style())
            .title(Span::styled(" Expenses (0) ", p.title_style()));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Date", "Description", "Category", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(p.header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .expenses
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, exp)| {
            let style = if i == app.expense_index {
                p.selected_style()
            } else if i % 2 == 1 {
                p.alt_row_style()
            } else {
                p.normal_style()
            };

            let category = if exp.is_categorized() {
                exp.category.as_str()
            } else {
                "-"
            };

            Row::new(vec![
                Cell::from(format!("  {}", exp.date)),
                Cell::from(truncate(&exp.description, 40)),
                Cell::from(truncate(category, 18)),
                Cell::from(Span::styled(
                    format_amount_precise(exp.amount, app.currency()),
                    p.bad_style(),
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Min(20),
        Constraint::Length(18),
        Constraint::Length(16),
    ];

    let total = crate::summary::total_amount(&app.expenses);
    let title = format!(
        " Expenses ({}) {} {}",
        app.expenses.len(),
        format_amount_precise(total, app.currency()),
        if app.search_input.is_empty() {
            String::new()
        } else {
            format!("search: '{}' ", app.search_input)
        }
    );

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(p.border_style())
            .title(Span::styled(title, p.title_style())),
    );

    f.render_widget(table, area);
}
