use crossterm::event::KeyCode;

use crate::form::{AddEventForm, FormField};
use crate::input::FormAction;

const MAX_TIMESTAMP_LEN: usize = 25;

pub fn handle_key(key: KeyCode, form: &mut AddEventForm) -> FormAction {
    if !form.visible {
        return FormAction::None;
    }

    match key {
        KeyCode::Esc => FormAction::Cancel,
        KeyCode::Enter => FormAction::Submit,
        KeyCode::Tab => {
            form.active_field = form.active_field.next();
            FormAction::None
        }
        KeyCode::BackTab => {
            form.active_field = form.active_field.prev();
            FormAction::None
        }
        KeyCode::Backspace => {
            form.active_value_mut().pop();
            FormAction::None
        }
        KeyCode::Char(c) => {
            match form.active_field {
                FormField::StartDate | FormField::EndDate => {
                    let value = form.active_value_mut();
                    if accepts_timestamp_char(c) && value.len() < MAX_TIMESTAMP_LEN {
                        value.push(c);
                    }
                }
                FormField::Title | FormField::Description => form.active_value_mut().push(c),
            }
            form.error = None;
            FormAction::None
        }
        _ => FormAction::None,
    }
}

fn accepts_timestamp_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | ':' | ' ' | 'T' | '+' | 'Z' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_form() -> AddEventForm {
        let mut form = AddEventForm::new();
        form.open();
        form
    }

    fn type_text(form: &mut AddEventForm, text: &str) {
        for c in text.chars() {
            handle_key(KeyCode::Char(c), form);
        }
    }

    #[test]
    fn tab_moves_to_next_field() {
        let mut form = open_form();

        handle_key(KeyCode::Tab, &mut form);

        assert_eq!(form.active_field, FormField::Description);
    }

    #[test]
    fn backtab_moves_to_previous_field() {
        let mut form = open_form();
        form.active_field = FormField::StartDate;

        handle_key(KeyCode::BackTab, &mut form);

        assert_eq!(form.active_field, FormField::Description);
    }

    #[test]
    fn char_appends_to_title_field() {
        let mut form = open_form();

        type_text(&mut form, "Hi");

        assert_eq!(form.title, "Hi");
    }

    #[test]
    fn backspace_removes_from_active_field() {
        let mut form = open_form();
        form.active_field = FormField::Description;
        form.description = "Hello".to_string();

        handle_key(KeyCode::Backspace, &mut form);

        assert_eq!(form.description, "Hell");
    }

    #[test]
    fn timestamp_fields_ignore_letters() {
        let mut form = open_form();
        form.active_field = FormField::StartDate;

        type_text(&mut form, "2026-01-15 09:30abc");

        assert_eq!(form.start_date, "2026-01-15 09:30");
    }

    #[test]
    fn typing_clears_inline_error() {
        let mut form = open_form();
        form.error = Some("Title is required".to_string());

        type_text(&mut form, "x");

        assert_eq!(form.error, None);
    }

    #[test]
    fn enter_and_escape_are_reported_to_caller() {
        let mut form = open_form();

        assert_eq!(handle_key(KeyCode::Enter, &mut form), FormAction::Submit);
        assert_eq!(handle_key(KeyCode::Esc, &mut form), FormAction::Cancel);
    }

    #[test]
    fn hidden_form_ignores_keys() {
        let mut form = AddEventForm::new();

        assert_eq!(handle_key(KeyCode::Enter, &mut form), FormAction::None);
        type_text(&mut form, "x");
        assert!(form.title.is_empty());
    }
}
