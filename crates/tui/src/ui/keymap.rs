use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    NextField,
    PrevField,
    Submit,
    Backspace,
    AddRow,
    RemoveRow,
    Input(char),
    None,
}

pub fn map_key(key: KeyEvent) -> AppAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => AppAction::Quit,
            KeyCode::Char('n') => AppAction::AddRow,
            KeyCode::Char('d') => AppAction::RemoveRow,
            _ => AppAction::None,
        };
    }

    match key.code {
        KeyCode::Esc => AppAction::Quit,
        KeyCode::Tab | KeyCode::Down => AppAction::NextField,
        KeyCode::BackTab | KeyCode::Up => AppAction::PrevField,
        KeyCode::Enter => AppAction::Submit,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Char(ch) => AppAction::Input(ch),
        _ => AppAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn control_shortcuts() {
        assert_eq!(
            map_key(key(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            AppAction::AddRow
        );
        assert_eq!(
            map_key(key(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            AppAction::RemoveRow
        );
        assert_eq!(
            map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            AppAction::Quit
        );
    }

    #[test]
    fn plain_letters_are_input() {
        assert_eq!(
            map_key(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            AppAction::Input('q')
        );
        assert_eq!(
            map_key(key(KeyCode::Char('N'), KeyModifiers::SHIFT)),
            AppAction::Input('N')
        );
    }
}
