pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::Paragraph,
};

use crate::app::{AppState, Focus, RowField, Screen};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Screen
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    match state.screen {
        Screen::Register => screens::register::render(frame, layout[0], state),
        Screen::ThankYou => screens::thank_you::render(frame, layout[0], state),
    }

    render_bottom_bar(frame, layout[1], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let hints = match state.screen {
        Screen::Register => components::hints::register_hints(matches!(
            state.focus,
            Focus::Row(_, RowField::Image)
        )),
        Screen::ThankYou => components::hints::thank_you_hints(),
    };

    let bar = Paragraph::new(Line::from(components::hints::hints_to_spans(&hints, theme)));
    frame.render_widget(bar, area);
}
