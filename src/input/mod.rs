pub mod insert_mode;
pub mod normal_mode;

/// What the session loop should do after a key on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoardAction {
    None,
    OpenForm,
    Reload,
    ToggleHelp,
    ScrollDown,
    ScrollUp,
    Quit,
}

/// What the session loop should do after a key in the add-event dialog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormAction {
    None,
    Submit,
    Cancel,
}
