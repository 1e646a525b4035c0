use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn register_hints(on_image_field: bool) -> Vec<KeyHint> {
    let enter = if on_image_field {
        KeyHint::new("Enter", "attach file")
    } else {
        KeyHint::new("Enter", "submit")
    };
    vec![
        KeyHint::new("Tab", "next"),
        KeyHint::new("S-Tab", "prev"),
        enter,
        KeyHint::new("Ctrl+N", "add representative"),
        KeyHint::new("Ctrl+D", "remove representative"),
        KeyHint::new("Esc", "quit"),
    ]
}

pub fn thank_you_hints() -> Vec<KeyHint> {
    vec![
        KeyHint::new("Enter", "new registration"),
        KeyHint::new("Esc", "quit"),
    ]
}
