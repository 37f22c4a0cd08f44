use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use cal_board::ui::day_view::{EventCard, ListDisplay};
use crate::tui::board::Screen;

pub fn render(f: &mut Frame, screen: &Screen, display: &ListDisplay, area: Rect) {
    let theme = screen.theme;

    let lines = match display {
        ListDisplay::Loading => vec![Line::from(Span::styled(
            "Loading events...",
            Style::default().fg(theme.muted),
        ))],
        ListDisplay::Failed(message) => vec![
            Line::from(Span::styled(
                "Could not load events",
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(message.as_str(), Style::default().fg(theme.error))),
            Line::from(""),
            Line::from(vec![
                Span::styled("r", Style::default().fg(theme.header)),
                Span::raw(" = Retry"),
            ]),
        ],
        ListDisplay::Empty => vec![Line::from(Span::styled(
            "No available events.",
            Style::default().fg(theme.muted),
        ))],
        ListDisplay::Events(cards) => cards.iter().flat_map(|card| card_lines(screen, card)).collect(),
    };

    let content = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((screen.scroll, 0));
    f.render_widget(content, area);
}

fn card_lines<'a>(screen: &Screen, card: &'a EventCard) -> Vec<Line<'a>> {
    let theme = screen.theme;
    let title_color = if card.pending { theme.pending } else { theme.card_title };

    let mut title = vec![Span::styled(
        card.title.as_str(),
        Style::default().fg(title_color).add_modifier(Modifier::BOLD),
    )];
    if card.pending {
        title.push(Span::styled(" (saving)", Style::default().fg(theme.pending)));
    }

    let mut lines = vec![
        Line::from(title),
        Line::from(Span::styled(card.dates.as_str(), Style::default().fg(theme.card_dates))),
    ];
    if !card.description.is_empty() {
        lines.push(Line::from(Span::styled(
            card.description.as_str(),
            Style::default().fg(theme.card_body),
        )));
    }
    lines.push(Line::from(""));
    lines
}
