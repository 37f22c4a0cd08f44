use chrono::{DateTime, Local};
use thiserror::Error;

use crate::app::{EventDraft, EventListViewModel, ViewState};
use crate::calendar::parse_timestamp;

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Start must look like YYYY-MM-DD HH:MM")]
    InvalidStart,
    #[error("End must look like YYYY-MM-DD HH:MM")]
    InvalidEnd,
    #[error("End must not be before start")]
    EndBeforeStart,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Title,
    Description,
    StartDate,
    EndDate,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::StartDate,
            FormField::StartDate => FormField::EndDate,
            FormField::EndDate => FormField::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::EndDate,
            FormField::Description => FormField::Title,
            FormField::StartDate => FormField::Description,
            FormField::EndDate => FormField::StartDate,
        }
    }
}

/// The "add new event" dialog. Stays open until the service confirms a save.
#[derive(Debug, Clone, PartialEq)]
pub struct AddEventForm {
    pub visible: bool,
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub active_field: FormField,
    pub error: Option<String>,
}

impl AddEventForm {
    pub fn new() -> Self {
        Self {
            visible: false,
            title: String::new(),
            description: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            active_field: FormField::Title,
            error: None,
        }
    }

    pub fn open(&mut self) {
        *self = Self::new();
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.error = None;
    }

    pub fn active_value_mut(&mut self) -> &mut String {
        match self.active_field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
            FormField::StartDate => &mut self.start_date,
            FormField::EndDate => &mut self.end_date,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Description => &self.description,
            FormField::StartDate => &self.start_date,
            FormField::EndDate => &self.end_date,
        }
    }

    /// Validates the fields and normalizes timestamps to RFC 3339 in local time.
    pub fn draft(&self) -> Result<EventDraft, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }

        let start = parse_form_timestamp(&self.start_date).ok_or(FormError::InvalidStart)?;
        let end = parse_form_timestamp(&self.end_date).ok_or(FormError::InvalidEnd)?;
        if end < start {
            return Err(FormError::EndBeforeStart);
        }

        Ok(EventDraft {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            start_date: start.to_rfc3339(),
            end_date: end.to_rfc3339(),
        })
    }

    /// Hands the draft to the view-model and closes only on confirmed success.
    pub async fn submit(&mut self, view_model: &mut EventListViewModel) -> bool {
        self.submit_with(view_model, |_, _| {}).await
    }

    /// [`Self::submit`], calling `on_staged` once the event has been added
    /// optimistically and before the service answers.
    pub async fn submit_with<F>(&mut self, view_model: &mut EventListViewModel, on_staged: F) -> bool
    where
        F: FnOnce(&AddEventForm, &ViewState),
    {
        let draft = match self.draft() {
            Ok(draft) => draft,
            Err(e) => {
                self.error = Some(e.to_string());
                return false;
            }
        };
        self.error = None;

        let form: &AddEventForm = self;
        let saved = view_model
            .on_save_with(draft, |state| on_staged(form, state))
            .await;

        if saved {
            self.close();
        } else {
            let message = view_model.last_error().unwrap_or("Event could not be saved");
            self.error = Some(message.to_string());
        }
        saved
    }
}

impl Default for AddEventForm {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_form_timestamp(raw: &str) -> Option<DateTime<Local>> {
    parse_timestamp(raw, &Local)
}
