use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use cal_board::form::FormField;
use crate::tui::board::Screen;

const FIELDS: [(FormField, &str, &str); 4] = [
    (FormField::Title, "Title: ", ""),
    (FormField::Description, "Description: ", ""),
    (FormField::StartDate, "Start: ", " (YYYY-MM-DD HH:MM)"),
    (FormField::EndDate, "End: ", " (YYYY-MM-DD HH:MM)"),
];

pub fn render(f: &mut Frame, screen: &Screen) {
    let form = screen.form;
    let theme = screen.theme;

    let area = f.size();
    let form_width = 70.min(area.width);
    let form_height = 16.min(area.height);
    let x = (area.width.saturating_sub(form_width)) / 2;
    let y = (area.height.saturating_sub(form_height)) / 2;

    let form_area = Rect {
        x,
        y,
        width: form_width,
        height: form_height,
    };

    f.render_widget(Clear, form_area);

    let saving = screen.state.is_pending();

    let mut form_text = vec![
        Line::from(vec![Span::styled("Add New Event", Style::default().fg(theme.header).add_modifier(Modifier::BOLD))]),
        Line::from(""),
    ];

    for (field, label, hint) in FIELDS {
        let active = form.active_field == field;
        let label_color = if active { theme.active_field } else { theme.muted };
        form_text.push(Line::from(vec![
            Span::styled(label, Style::default().fg(label_color)),
            Span::raw(form.value(field)),
            Span::styled(if active { hint } else { "" }, Style::default().fg(theme.muted)),
        ]));
        form_text.push(Line::from(""));
    }

    if saving {
        form_text.push(Line::from(Span::styled("Saving...", Style::default().fg(theme.pending))));
    } else if let Some(error) = &form.error {
        form_text.push(Line::from(Span::styled(error.as_str(), Style::default().fg(theme.error))));
    } else {
        form_text.push(Line::from(""));
    }

    form_text.push(Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::Cyan)),
        Span::raw(" = Next field | "),
        Span::styled("Enter", Style::default().fg(Color::Green)),
        Span::raw(" = Save | "),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(" = Cancel"),
    ]));

    let form_paragraph = Paragraph::new(form_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(" New Event ")
            .style(Style::default().bg(Color::Black)))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(form_paragraph, form_area);
}
