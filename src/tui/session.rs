use std::io;
use crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use cal_board::{
    EventListViewModel,
    input::{insert_mode, normal_mode, BoardAction, FormAction},
    storage::config::{Config, Credential},
    sync,
    ui::theme::Theme,
};
use crate::tui::{board::{Board, Screen}, presentation::{render, ui}};

pub async fn run_tui(config: Config, credential: Credential) -> Result<(), io::Error> {
    let api = sync::connect(&config, credential)
        .map_err(|e| io::Error::other(e.to_string()))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::get_by_name(&config.ui.theme);
    let mut board = Board::new(EventListViewModel::new(api), theme);

    terminal.draw(|f| ui(f, &board)).ok();
    board.view_model.mount().await;

    let res = run_app(&mut terminal, &mut board).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, board: &mut Board) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, board))?;

        if let TermEvent::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if board.form.visible {
                handle_form_keys(key.code, terminal, board).await?;
            } else if board.show_help {
                handle_help_keys(key.code, board);
            } else if handle_board_keys(key.code, board).await {
                return Ok(());
            }
        }
    }
}

/// Returns `true` when the user asked to quit.
async fn handle_board_keys(key: KeyCode, board: &mut Board) -> bool {
    match normal_mode::handle_key(key, &board.view_model) {
        BoardAction::Quit => return true,
        BoardAction::OpenForm => board.form.open(),
        BoardAction::Reload => {
            board.scroll = 0;
            board.view_model.reload().await;
        }
        BoardAction::ToggleHelp => board.show_help = !board.show_help,
        BoardAction::ScrollDown => board.scroll = board.scroll.saturating_add(1),
        BoardAction::ScrollUp => board.scroll = board.scroll.saturating_sub(1),
        BoardAction::None => {}
    }
    false
}

fn handle_help_keys(key: KeyCode, board: &mut Board) {
    if matches!(key, KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc) {
        board.show_help = false;
    }
}

async fn handle_form_keys<B: Backend>(
    key: KeyCode,
    terminal: &mut Terminal<B>,
    board: &mut Board,
) -> io::Result<()> {
    match insert_mode::handle_key(key, &mut board.form) {
        FormAction::Submit => save_form(terminal, board).await?,
        FormAction::Cancel => board.form.close(),
        FormAction::None => {}
    }
    Ok(())
}

/// Saves through the form, drawing the pending entry before the service answers.
async fn save_form<B: Backend>(terminal: &mut Terminal<B>, board: &mut Board) -> io::Result<()> {
    let theme = &board.theme;
    let scroll = board.scroll;
    let mut drawn = Ok(());

    let saved = board
        .form
        .submit_with(&mut board.view_model, |form, state| {
            let screen = Screen {
                state,
                form,
                theme,
                show_help: false,
                scroll,
            };
            drawn = terminal.draw(|f| render(f, &screen)).map(|_| ());
        })
        .await;
    drawn?;

    if saved {
        tracing::info!("New event saved");
    }
    Ok(())
}
