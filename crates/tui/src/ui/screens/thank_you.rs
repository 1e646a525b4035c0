use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use crate::{
    app::AppState,
    ui::{components::card::Card, theme::Theme},
};

fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let card_area = centered_box(area.width.min(56), 8, area);
    frame.render_widget(Clear, card_area);

    let card = Card::new("registered", &theme).focused(true);
    let inner = card.inner(card_area);
    frame.render_widget(card.block(), card_area);

    let message = state
        .confirmation
        .as_deref()
        .unwrap_or("Your registration has been received.");

    let lines = vec![
        Line::from(Span::styled(
            "Thank you!",
            Style::default()
                .fg(theme.positive)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to register another firm.",
            Style::default().fg(theme.text_muted),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}
