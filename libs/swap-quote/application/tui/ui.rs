//! Rendering for the terminal form

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::{Focus, FormApp};
use crate::domain::QuoteStatus;
use crate::infrastructure::client::zerox::PriceSource;

/// Draw the main UI layout
pub fn draw<S: PriceSource>(frame: &mut Frame, app: &FormApp<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Sell input
            Constraint::Length(1), // Status
            Constraint::Length(3), // Buy input
            Constraint::Min(0),
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);

    let pair = app.form.pair();
    draw_input(
        frame,
        &format!(" sell amount ({}) ", pair.sell_symbol),
        app.form.sell_amount(),
        app.focus == Focus::Sell,
        chunks[1],
    );
    draw_status(frame, app.form.status(), chunks[2]);
    draw_input(
        frame,
        &format!(" buy amount ({}) ", pair.buy_symbol),
        app.form.buy_amount(),
        app.focus == Focus::Buy,
        chunks[3],
    );

    draw_footer(frame, app, chunks[5]);
}

fn draw_header<S: PriceSource>(frame: &mut Frame, app: &FormApp<S>, area: Rect) {
    let pair = app.form.pair();
    let header_text = format!(" {} -> {} | decimals: {}", pair.sell_symbol, pair.buy_symbol, pair.decimals);

    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" Swap Quote "));

    frame.render_widget(header, area);
}

fn draw_input(frame: &mut Frame, title: &str, value: &str, focused: bool, area: Rect) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let input = Paragraph::new(value.to_string()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title.to_string()),
    );
    frame.render_widget(input, area);

    if focused {
        let max_x = area.x + area.width.saturating_sub(2);
        let x = (area.x + 1 + value.chars().count() as u16).min(max_x);
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn draw_status(frame: &mut Frame, status: QuoteStatus, area: Rect) {
    let color = match status {
        QuoteStatus::Failed => Color::Red,
        _ => Color::Gray,
    };

    let line = Paragraph::new(format!(" {}", status.indicator())).style(Style::default().fg(color));
    frame.render_widget(line, area);
}

fn draw_footer<S: PriceSource>(frame: &mut Frame, app: &FormApp<S>, area: Rect) {
    let last = match app.form.last_quote() {
        Some(quote) => format!("last quote {}", quote.fetched_at.format("%H:%M:%S")),
        None => "no quote yet".to_string(),
    };

    let footer_text = format!(" {} | esc=quit tab=switch ctrl+r=refresh", last);
    let footer = Paragraph::new(footer_text).block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
