pub mod event;

pub use event::{CalendarEvent, CalendarEventList, format_long_date, parse_timestamp};
