mod authentication;
mod board;
mod session;
mod presentation;
mod calendar_views;
mod dialogs;

pub use authentication::check_setup;
pub use session::run_tui;
