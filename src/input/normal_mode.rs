use crossterm::event::KeyCode;

use crate::app::EventListViewModel;
use crate::input::BoardAction;

pub fn handle_key(key: KeyCode, view_model: &EventListViewModel) -> BoardAction {
    match key {
        KeyCode::Char('q') => BoardAction::Quit,
        KeyCode::Char('a') if view_model.can_create() => BoardAction::OpenForm,
        KeyCode::Char('a') => {
            tracing::debug!("Add ignored: events not loaded or a save is pending");
            BoardAction::None
        }
        KeyCode::Char('r') if !view_model.state().is_pending() => BoardAction::Reload,
        KeyCode::Char('?') => BoardAction::ToggleHelp,
        KeyCode::Char('j') | KeyCode::Down => BoardAction::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => BoardAction::ScrollUp,
        _ => BoardAction::None,
    }
}
