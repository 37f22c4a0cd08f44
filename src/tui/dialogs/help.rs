use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use cal_board::ui::theme::Theme;
use crate::tui::board::Screen;

pub fn render(f: &mut Frame, screen: &Screen) {
    let area = f.size();
    let help_width = 56.min(area.width);
    let help_height = 20.min(area.height);
    let x = (area.width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x,
        y,
        width: help_width,
        height: help_height,
    };

    f.render_widget(Clear, help_area);

    let theme = screen.theme;
    let help_text = vec![
        Line::from(vec![Span::styled("cal-board Help", Style::default().fg(theme.header).add_modifier(Modifier::BOLD))]),
        Line::from(""),
        section("Board:", theme),
        Line::from("  a        - Add new event"),
        Line::from("  r        - Reload events from the service"),
        Line::from("  j/k      - Scroll the event list"),
        Line::from("  ?        - Toggle this help"),
        Line::from("  q        - Quit"),
        Line::from(""),
        section("New Event:", theme),
        Line::from("  Tab      - Next field"),
        Line::from("  S-Tab    - Previous field"),
        Line::from("  Enter    - Save (stays open until confirmed)"),
        Line::from("  Esc      - Cancel"),
        Line::from(""),
        section("Dates:", theme),
        Line::from("  2026-01-15 09:30 or RFC 3339 (local time)"),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(" Help (? or q to close) ")
            .style(Style::default().bg(Color::Black)))
        .alignment(Alignment::Left);

    f.render_widget(help_paragraph, help_area);
}

fn section<'a>(label: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![Span::styled(label, Style::default().fg(theme.card_dates))])
}
