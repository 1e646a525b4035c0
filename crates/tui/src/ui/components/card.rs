use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use crate::ui::theme::Theme;

/// Rounded panel used for the firm section and each representative row.
///
/// The border takes the focus colour when the cursor is inside, and the
/// error colour when any field inside failed validation.
pub struct Card<'a> {
    title: String,
    theme: &'a Theme,
    focused: bool,
    invalid: bool,
}

impl<'a> Card<'a> {
    pub fn new(title: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            title: title.into(),
            theme,
            focused: false,
            invalid: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }

    pub fn block(&self) -> Block<'static> {
        let border_color = if self.invalid {
            self.theme.error
        } else if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border
        };

        Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
    }

    pub fn inner(&self, area: Rect) -> Rect {
        self.block().inner(area)
    }
}
