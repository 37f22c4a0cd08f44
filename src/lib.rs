pub mod calendar;
pub mod input;
pub mod ui;
pub mod sync;
pub mod storage;
pub mod app;
pub mod form;

pub use calendar::{CalendarEvent, CalendarEventList};
pub use app::{EventDraft, EventListViewModel, Phase, ViewState};
pub use form::AddEventForm;

pub use input::{normal_mode, insert_mode};
