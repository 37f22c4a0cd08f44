use chrono::{Local, NaiveDate, TimeZone};
use std::fmt::Display;

use crate::app::{Phase, ViewState};
use crate::calendar::{CalendarEvent, format_long_date};

const DAY_HEADING_FORMAT: &str = "%A, %B %-d, %Y";

#[derive(Debug, Clone, PartialEq)]
pub struct DayLayout {
    pub date: NaiveDate,
    pub heading: String,
    pub display: ListDisplay,
}

/// What the list area shows. Failure and "nothing today" are distinct.
#[derive(Debug, Clone, PartialEq)]
pub enum ListDisplay {
    Loading,
    Failed(String),
    Empty,
    Events(Vec<EventCard>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventCard {
    pub event_id: String,
    pub title: String,
    pub dates: String,
    pub description: String,
    /// Optimistically added and not yet confirmed by the service.
    pub pending: bool,
}

pub fn calculate_layout(state: &ViewState) -> DayLayout {
    calculate_layout_for(state, Local::now().date_naive(), &Local)
}

pub fn calculate_layout_for<Tz: TimeZone>(state: &ViewState, date: NaiveDate, tz: &Tz) -> DayLayout
where
    Tz::Offset: Display,
{
    let heading = format!("Calendar Events for {}", date.format(DAY_HEADING_FORMAT));

    let display = match state.phase() {
        Phase::Idle | Phase::Loading => ListDisplay::Loading,
        Phase::LoadFailed(message) => ListDisplay::Failed(message.clone()),
        Phase::Loaded | Phase::Creating | Phase::CreateFailed(_) => {
            let pending_id = pending_event_id(state);
            let cards: Vec<EventCard> = state
                .events_on(date, tz)
                .into_iter()
                .map(|event| build_card(event, tz, pending_id))
                .collect();

            if cards.is_empty() {
                ListDisplay::Empty
            } else {
                ListDisplay::Events(cards)
            }
        }
    };

    DayLayout {
        date,
        heading,
        display,
    }
}

fn pending_event_id(state: &ViewState) -> Option<&str> {
    if state.is_pending() {
        state.events().last().map(|e| e.id.as_str())
    } else {
        None
    }
}

fn build_card<Tz: TimeZone>(event: &CalendarEvent, tz: &Tz, pending_id: Option<&str>) -> EventCard
where
    Tz::Offset: Display,
{
    EventCard {
        event_id: event.id.clone(),
        title: event.title.clone(),
        dates: format!(
            "{} to {}",
            format_long_date(&event.start_date, tz),
            format_long_date(&event.end_date, tz)
        ),
        description: event.description.clone(),
        pending: pending_id == Some(event.id.as_str()),
    }
}
