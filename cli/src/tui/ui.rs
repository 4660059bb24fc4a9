use goaltracker_core::service::dto::{CalendarDay, CalendarMonth};
use goaltracker_core::time::format_date;
use goaltracker_core::{DayStatus, SyncState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, InputMode};

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Content
            Constraint::Length(3), // Message / input
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let header = Paragraph::new(format!("GOAL TRACKER  ·  {}", app.ws.user))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[1]);

    let month = app.month_view();
    draw_calendar(f, app, &month, content_chunks[0]);
    draw_summary(f, app, content_chunks[1]);
    draw_message(f, app, main_chunks[2]);

    let help = match app.input_mode {
        InputMode::Normal => "←↓↑→/hjkl: Move | [ ]: Month | t: Today | Space: Toggle | d: Start date | i: Import | e: Export | s: Save | q: Quit",
        _ => "Enter: Confirm | Esc: Cancel",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn day_style(app: &App, day: &CalendarDay) -> Style {
    let mut style = match day.status {
        DayStatus::Failed => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        DayStatus::Success => Style::default().fg(Color::Green),
        DayStatus::BeforeStart | DayStatus::Future => Style::default().fg(Color::DarkGray),
    };
    if day.is_today {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if day.key == format_date(app.cursor) {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn draw_calendar(f: &mut Frame, app: &App, month: &CalendarMonth, area: Rect) {
    let rows: Vec<Row> = month
        .weeks()
        .into_iter()
        .map(|week| {
            let cells: Vec<Cell> = week
                .into_iter()
                .map(|cell| match cell {
                    Some(day) => {
                        let mark = if day.status == DayStatus::Failed { "✖" } else { " " };
                        Cell::from(format!("{:>2}{}", day.day_of_month, mark)).style(day_style(app, day))
                    }
                    None => Cell::from(""),
                })
                .collect();
            Row::new(cells).height(2)
        })
        .collect();

    let header = Row::new(month.weekday_labels.iter().map(|l| Cell::from(l.as_str())))
        .style(Style::default().fg(Color::Yellow));

    let table = Table::new(rows, [Constraint::Length(5); 7])
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(format!(" {} ", month.title))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );

    f.render_widget(table, area);
}

fn draw_summary(f: &mut Frame, app: &App, area: Rect) {
    let summary = app.summary();
    let selected = app.ws.session.day_status(app.cursor, app.today);

    let (sync_text, sync_style) = match app.ws.session.sync_state() {
        SyncState::Clean => ("In sync", Style::default().fg(Color::Green)),
        SyncState::Dirty => ("Unsaved changes", Style::default().fg(Color::Yellow)),
        SyncState::Saving => ("Saving...", Style::default().fg(Color::Blue)),
    };

    let selected_text = match selected {
        DayStatus::Failed => "failed",
        DayStatus::Success => "success",
        DayStatus::BeforeStart => "before start (locked)",
        DayStatus::Future => "future (locked)",
    };

    let text = vec![
        Line::from(vec![
            Span::styled("Accumulated: ", Style::default().fg(Color::Blue)),
            Span::styled(summary.money, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Current streak: ", Style::default().fg(Color::Blue)),
            Span::raw(format!("{} days", summary.current_streak)),
        ]),
        Line::from(vec![
            Span::styled("Since: ", Style::default().fg(Color::Blue)),
            Span::raw(summary.start_date),
        ]),
        Line::from(vec![
            Span::styled("Failed days: ", Style::default().fg(Color::Blue)),
            Span::raw(summary.failed_days.to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Selected: ", Style::default().fg(Color::Blue)),
            Span::raw(format!("{} ({})", format_date(app.cursor), selected_text)),
        ]),
        Line::from(""),
        Line::from(Span::styled(sync_text, sync_style)),
    ];

    let block = Paragraph::new(text)
        .block(Block::default().title(" Progress ").borders(Borders::ALL).border_type(BorderType::Rounded))
        .wrap(Wrap { trim: true });
    f.render_widget(block, area);
}

fn draw_message(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.input_mode {
        InputMode::Normal => {
            let style = if app.message.starts_with("Error") || app.message.starts_with("Warning") {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            let message = Paragraph::new(app.message.as_str())
                .style(style)
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
            f.render_widget(message, area);
            return;
        }
        InputMode::StartDate => " Start date (YYYY-MM-DD) ",
        InputMode::ImportPath => " Import file path ",
    };

    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().title(title).borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(input, area);

    let before: String = app.input.chars().take(app.cursor_position).collect();
    f.set_cursor_position((area.x + 1 + before.width() as u16, area.y + 1));
}
