use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use registration::{FieldError, FirmField, ImageFile, SubmissionState};

use crate::{
    app::{AppState, Focus, RowField},
    ui::{components::card::Card, theme::Theme},
};

const FIRM_FIELDS: [FirmField; 3] = [FirmField::Name, FirmField::BrandName, FirmField::Email];
/// Border, three inputs and one error line.
const ROW_HEIGHT: u16 = 6;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Length(8), // Firm card
            Constraint::Length(1), // Representatives heading
            Constraint::Min(0),    // Representative rows
            Constraint::Length(1), // Submit
        ])
        .split(area);

    render_header(frame, layout[0], state, &theme);
    render_firm(frame, layout[1], state, &theme);

    let heading = Line::from(vec![
        Span::styled(
            "Representatives",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({})", state.form.state.representatives.len()),
            Style::default().fg(theme.text_muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(heading), layout[2]);

    render_rows(frame, layout[3], state, &theme);
    render_submit(frame, layout[4], state, &theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled(
            "Participant ID Cards",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("server: {}", state.base_url),
            Style::default().fg(theme.text_muted),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_firm(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let errors = &state.form.errors.firm;
    let invalid = FIRM_FIELDS.iter().any(|field| errors.get(*field).is_some());
    let card = Card::new("firm", theme)
        .focused(matches!(state.focus, Focus::Firm(_)))
        .invalid(invalid);
    let inner = card.inner(area);
    frame.render_widget(card.block(), area);

    let mut lines = Vec::with_capacity(FIRM_FIELDS.len() * 2);
    for field in FIRM_FIELDS {
        let focus = Focus::Firm(field);
        lines.push(input_line(
            field.label(),
            true,
            state.form.state.firm.get(field),
            state.focus == focus,
            theme,
        ));
        lines.push(error_line(&[errors.get(field)], theme));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_rows(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let total = state.form.state.representatives.len();
    let visible = usize::from((area.height / ROW_HEIGHT).max(1));

    // Keep the focused row on screen.
    let focused_row = state.focus.row().unwrap_or(0);
    let start = focused_row.saturating_sub(visible - 1).min(total.saturating_sub(visible));
    let end = (start + visible).min(total);

    let constraints: Vec<Constraint> = (start..end)
        .map(|_| Constraint::Length(ROW_HEIGHT))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (slot, index) in (start..end).enumerate() {
        render_row(frame, slots[slot], state, index, theme);
    }
}

fn render_row(frame: &mut Frame<'_>, area: Rect, state: &AppState, index: usize, theme: &Theme) {
    let Some(rep) = state.form.state.representatives.get(index) else {
        return;
    };
    let errors = state.form.errors.representative(index);
    let name_error = errors.and_then(|e| e.name.as_ref());
    let image_error = errors.and_then(|e| e.image.as_ref());

    let card = Card::new(format!("representative {}", index + 1), theme)
        .focused(state.focus.row() == Some(index))
        .invalid(name_error.is_some() || image_error.is_some());
    let inner = card.inner(area);
    frame.render_widget(card.block(), area);

    let path = state.image_paths.get(index).map(String::as_str).unwrap_or("");
    let mut image_line = input_line(
        "Image",
        true,
        path,
        state.focus == Focus::Row(index, RowField::Image),
        theme,
    );
    if let Some(image) = &rep.image {
        image_line.spans.push(Span::styled(
            format!("  ✓ File selected ({})", describe_image(image)),
            Style::default().fg(theme.positive),
        ));
    }

    let lines = vec![
        input_line(
            "Name",
            true,
            &rep.name,
            state.focus == Focus::Row(index, RowField::Name),
            theme,
        ),
        input_line(
            "Mobile",
            false,
            rep.mobile.as_deref().unwrap_or(""),
            state.focus == Focus::Row(index, RowField::Mobile),
            theme,
        ),
        image_line,
        error_line(&[name_error, image_error], theme),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_submit(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let (label, style) = match state.coordinator.state() {
        SubmissionState::Pending => ("[ Submitting... ]", Style::default().fg(theme.text_muted)),
        _ => (
            "[ Submit Registration ]",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
    };

    // Request failures surface through the toast only.
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(label, style))).alignment(Alignment::Right),
        area,
    );
}

fn input_line(
    label: &str,
    required: bool,
    value: &str,
    focused: bool,
    theme: &Theme,
) -> Line<'static> {
    let cursor = if focused { "│" } else { "" };
    let label_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };

    let mut spans = vec![Span::styled(format!("{label:<11}"), label_style)];
    if required {
        spans.push(Span::styled("* ", Style::default().fg(theme.error)));
    } else {
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
        format!("{value}{cursor}"),
        Style::default().fg(theme.text),
    ));
    Line::from(spans)
}

/// Messages of the given errors joined by " & ", or an empty line.
fn error_line(errors: &[Option<&FieldError>], theme: &Theme) -> Line<'static> {
    let message = errors
        .iter()
        .flatten()
        .map(|err| err.to_string())
        .collect::<Vec<_>>()
        .join(" & ");
    Line::from(Span::styled(
        format!("             {message}"),
        Style::default().fg(theme.error),
    ))
}

fn describe_image(image: &ImageFile) -> String {
    let size = image.size();
    let human = if size >= 1_000_000 {
        format!("{:.1} MB", size as f64 / 1_000_000.0)
    } else {
        format!("{} KB", size.div_ceil(1_000))
    };
    format!("{}, {human}", image.file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(state: &AppState) -> String {
        let backend = TestBackend::new(90, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn describes_image_size() {
        let image = ImageFile::from_bytes("jane.jpg", vec![0; 120_000]);
        assert_eq!(describe_image(&image), "jane.jpg, 120 KB");
        let image = ImageFile::from_bytes("big.png", vec![0; 2_500_000]);
        assert_eq!(describe_image(&image), "big.png, 2.5 MB");
    }

    #[test]
    fn error_line_joins_messages() {
        let theme = Theme::default();
        let line = error_line(
            &[
                Some(&FieldError::RepresentativeNameRequired),
                Some(&FieldError::ImageRequired),
            ],
            &theme,
        );
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.ends_with("Name is required & Image is required"));
    }

    #[test]
    fn renders_inline_errors_after_validation() {
        let mut state = AppState::new("http://127.0.0.1:8000".to_string());
        state.form.validate();

        let text = screen_text(&state);
        assert!(text.contains("Firm name is required"));
        assert!(text.contains("Submit Registration"));
    }

    #[test]
    fn failed_request_is_not_pinned_beside_submit() {
        let mut state = AppState::new("http://127.0.0.1:8000".to_string());
        state.coordinator.finish(Err(registration::ClientError::Rejected {
            status: registration::StatusCode::INTERNAL_SERVER_ERROR,
            message: Some("Database offline".to_string()),
        }));
        state.form.validate();

        let text = screen_text(&state);
        assert!(text.contains("Firm name is required"));
        assert!(text.contains("Submit Registration"));
        assert!(!text.contains("Database offline"));
    }
}
