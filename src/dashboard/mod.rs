use anyhow::Result;
use crossterm::{
    event::{self as ct_event, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::{io, time::Duration};

use crate::config::AppConfig;
use crate::domain::TournamentRecord;
use crate::filter::TournamentFilters;
use crate::store::TournamentStore;

mod state;

pub use state::DashboardState;

/// Browse the stored tournaments in the terminal: a scrollable table with
/// interactive narrowing by type, event gender, and event type.
pub fn run(config: &AppConfig) -> Result<()> {
    let store = TournamentStore::from_settings(&config.storage);
    // The reduced projection is enough here; no raw payloads are shown.
    let rows = store.load(&TournamentFilters::default(), true);
    let state = DashboardState::new(rows);

    install_panic_hook();

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, state);

    // Always restore the terminal, even if the loop returned an error
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut state: DashboardState,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, &state))?;

        if state.quit {
            break;
        }

        if ct_event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = ct_event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(key.code, &mut state);
                }
            }
        }
    }
    Ok(())
}

fn handle_key(code: KeyCode, state: &mut DashboardState) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => state.quit = true,
        KeyCode::Char('j') | KeyCode::Down => state.move_down(),
        KeyCode::Char('k') | KeyCode::Up => state.move_up(),
        KeyCode::Char('t') => state.cycle_type(),
        KeyCode::Char('g') => state.cycle_gender(),
        KeyCode::Char('e') => state.cycle_event_type(),
        KeyCode::Char('r') => state.reset_filters(),
        _ => {}
    }
}

fn draw(frame: &mut Frame, state: &DashboardState) {
    // Vertical: table | 8-line detail pane | 1-line status bar
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_table(frame, state, vert[0]);
    draw_detail(frame, state.selected_row(), vert[1]);
    draw_status(frame, state, vert[2]);
}

fn draw_table(frame: &mut Frame, state: &DashboardState, area: ratatui::layout::Rect) {
    let header = Row::new(["Name", "Start", "Location", "Type", "Level"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = state.visible.iter().map(|record| {
        Row::new([
            record.name.clone(),
            format_date(record),
            record.full_location.clone(),
            record.tournament_type.clone(),
            record.tournament_level.clone(),
        ])
    });

    let widths = [
        Constraint::Percentage(35),
        Constraint::Length(12),
        Constraint::Percentage(30),
        Constraint::Percentage(15),
        Constraint::Percentage(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Tournaments ({}) ", state.visible.len())),
        )
        .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");

    let mut table_state = TableState::default();
    if !state.visible.is_empty() {
        table_state.select(Some(state.selected));
    }

    frame.render_stateful_widget(table, area, &mut table_state);
}

fn draw_detail(frame: &mut Frame, row: Option<&TournamentRecord>, area: ratatui::layout::Rect) {
    let lines = match row {
        Some(record) => {
            let events = record
                .events
                .iter()
                .map(|event| format!("{} {}", event.gender, event.event_type))
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                Line::from(record.name.clone()),
                Line::from(format!("Location: {}", record.full_location)),
                Line::from(format!(
                    "Type: {}  Level: {}",
                    record.tournament_type, record.tournament_level
                )),
                Line::from(format!("Events: {events}")),
                Line::from(format!(
                    "Link: {}",
                    record.tournament_url.as_deref().unwrap_or("-")
                )),
            ]
        }
        None => vec![Line::from("No tournaments match the active filters")],
    };

    let detail = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Detail "));
    frame.render_widget(detail, area);
}

fn draw_status(frame: &mut Frame, state: &DashboardState, area: ratatui::layout::Rect) {
    let status = Paragraph::new(format!(
        " {}  |  j/k move, t/g/e filter, r reset, q quit",
        state.filter_summary()
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, area);
}

fn format_date(record: &TournamentRecord) -> String {
    record
        .start_date
        .map(|start| start.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}
