use chrono::{NaiveDate, TimeZone};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::calendar::{CalendarEvent, CalendarEventList};
use crate::sync::events_api::{ClientError, EventsApi};

/// Lifecycle of the event list: `Idle → Loading → Loaded | LoadFailed`,
/// then `Loaded | CreateFailed → Creating → Loaded | CreateFailed`.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    LoadFailed(String),
    Creating,
    CreateFailed(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum CreateError {
    #[error("Events have not finished loading")]
    NotLoaded,
    #[error("An event is already being saved")]
    Busy,
}

/// Field values collected by the add-event form.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

impl EventDraft {
    fn into_event(self, id: String) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.title,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Everything the list screen shows. Only [`EventListViewModel`] mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    events: Vec<CalendarEvent>,
    total: u64,
    phase: Phase,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            total: 0,
            phase: Phase::Idle,
        }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Creating
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::LoadFailed(message) | Phase::CreateFailed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Events starting on `day` in `tz`, in provider order.
    pub fn events_on<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> Vec<&CalendarEvent> {
        self.events
            .iter()
            .filter(|event| event.starts_on(day, tz))
            .collect()
    }

    fn begin_load(&mut self) {
        self.phase = Phase::Loading;
    }

    fn finish_load(&mut self, result: Result<CalendarEventList, String>) {
        match result {
            Ok(list) => {
                self.events = list.items;
                self.total = list.total;
                self.phase = Phase::Loaded;
            }
            Err(message) => {
                self.phase = Phase::LoadFailed(message);
            }
        }
    }

    fn begin_create(&mut self, event: CalendarEvent) -> Result<(), CreateError> {
        match self.phase {
            Phase::Loaded | Phase::CreateFailed(_) => {}
            Phase::Creating => return Err(CreateError::Busy),
            _ => return Err(CreateError::NotLoaded),
        }

        self.events.push(event);
        self.total += 1;
        self.phase = Phase::Creating;
        Ok(())
    }

    fn confirm_create(&mut self, local_id: &str, confirmed: CalendarEvent) {
        match self.events.iter_mut().find(|e| e.id == local_id) {
            Some(slot) => *slot = confirmed,
            None => self.events.push(confirmed),
        }
        self.phase = Phase::Loaded;
    }

    fn fail_create(&mut self, local_id: &str, message: String) {
        let before = self.events.len();
        self.events.retain(|e| e.id != local_id);
        if self.events.len() < before {
            self.total = self.total.saturating_sub(1);
        }
        self.phase = Phase::CreateFailed(message);
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventListViewModel {
    api: Arc<dyn EventsApi>,
    state: ViewState,
}

impl EventListViewModel {
    pub fn new(api: Arc<dyn EventsApi>) -> Self {
        Self {
            api,
            state: ViewState::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn can_create(&self) -> bool {
        matches!(self.state.phase, Phase::Loaded | Phase::CreateFailed(_))
    }

    /// Initial fetch. Only runs from `Idle`; later refreshes go through [`Self::reload`].
    pub async fn mount(&mut self) {
        if self.state.phase != Phase::Idle {
            return;
        }
        self.load().await;
    }

    /// User-initiated refetch. Ignored while a create is in flight.
    pub async fn reload(&mut self) {
        if self.state.is_pending() {
            tracing::debug!("Reload ignored while an event is being saved");
            return;
        }
        self.load().await;
    }

    async fn load(&mut self) {
        self.state.begin_load();
        let result = self.api.list().await.map_err(|e| {
            tracing::error!("Loading events failed: {}", e);
            e.to_string()
        });
        if let Ok(list) = &result {
            tracing::info!("Loaded {} events", list.items.len());
        }
        self.state.finish_load(result);
    }

    /// Appends the draft optimistically under a fresh id and enters `Creating`.
    pub fn stage_create(&mut self, draft: EventDraft) -> Result<CalendarEvent, CreateError> {
        let event = draft.into_event(Uuid::new_v4().to_string());
        self.state.begin_create(event.clone())?;
        tracing::debug!("Staged event {} optimistically", event.id);
        Ok(event)
    }

    /// Sends a staged event and reconciles or rolls back the optimistic entry.
    pub async fn commit_create(&mut self, staged: CalendarEvent) -> Result<CalendarEvent, ClientError> {
        match self.api.create(&staged).await {
            Ok(confirmed) => {
                self.state.confirm_create(&staged.id, confirmed.clone());
                Ok(confirmed)
            }
            Err(e) => {
                tracing::error!("Creating event {} failed: {}", staged.id, e);
                self.state.fail_create(&staged.id, e.to_string());
                Err(e)
            }
        }
    }

    /// Returns `true` only once the service has confirmed the new event.
    pub async fn on_save(&mut self, draft: EventDraft) -> bool {
        self.on_save_with(draft, |_| {}).await
    }

    /// [`Self::on_save`], handing the optimistic state to `on_staged` before
    /// the service is contacted.
    pub async fn on_save_with<F>(&mut self, draft: EventDraft, on_staged: F) -> bool
    where
        F: FnOnce(&ViewState),
    {
        let staged = match self.stage_create(draft) {
            Ok(staged) => staged,
            Err(e) => {
                tracing::warn!("Save refused: {}", e);
                return false;
            }
        };
        on_staged(&self.state);
        self.commit_create(staged).await.is_ok()
    }
}
