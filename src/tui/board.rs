use cal_board::{AddEventForm, EventListViewModel, ViewState, ui::theme::Theme};

/// Everything the terminal draws from. The view-model owns the event data;
/// the rest is local to the terminal session.
pub struct Board {
    pub view_model: EventListViewModel,
    pub form: AddEventForm,
    pub theme: Theme,
    pub show_help: bool,
    pub scroll: u16,
}

impl Board {
    pub fn new(view_model: EventListViewModel, theme: Theme) -> Self {
        Self {
            view_model,
            form: AddEventForm::new(),
            theme,
            show_help: false,
            scroll: 0,
        }
    }

    pub fn screen(&self) -> Screen<'_> {
        Screen {
            state: self.view_model.state(),
            form: &self.form,
            theme: &self.theme,
            show_help: self.show_help,
            scroll: self.scroll,
        }
    }
}

/// Read-only view of a [`Board`] for one frame. Built from parts while a save
/// holds the form and view-model mutably.
pub struct Screen<'a> {
    pub state: &'a ViewState,
    pub form: &'a AddEventForm,
    pub theme: &'a Theme,
    pub show_help: bool,
    pub scroll: u16,
}
