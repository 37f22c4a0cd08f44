use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use cal_board::{Phase, ui::day_view::calculate_layout};
use crate::tui::{board::{Board, Screen}, calendar_views, dialogs};

pub fn ui(f: &mut Frame, board: &Board) {
    render(f, &board.screen());
}

pub fn render(f: &mut Frame, screen: &Screen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    let layout = calculate_layout(screen.state);

    let title = Paragraph::new(layout.heading.as_str())
        .style(Style::default().fg(screen.theme.header).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    calendar_views::event_list::render(f, screen, &layout.display, chunks[1]);

    let state = screen.state;
    let (phase_label, phase_color) = match state.phase() {
        Phase::Idle | Phase::Loading => ("Loading...", screen.theme.pending),
        Phase::Loaded => ("Up to date", screen.theme.status_bar),
        Phase::LoadFailed(_) => ("Load failed, press 'r' to retry", screen.theme.error),
        Phase::Creating => ("Saving...", screen.theme.pending),
        Phase::CreateFailed(_) => ("Save failed", screen.theme.error),
    };

    let status_text = format!(
        "Events: {} | {} | 'a' add, 'r' reload, '?' help, 'q' quit",
        state.total(),
        phase_label
    );
    let status = Paragraph::new(status_text)
        .style(Style::default().fg(phase_color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[2]);

    if screen.show_help {
        dialogs::help::render(f, screen);
    }

    if screen.form.visible {
        dialogs::add_event::render(f, screen);
    }
}
