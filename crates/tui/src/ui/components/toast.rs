use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{ToastLevel, ToastState},
    ui::theme::Theme,
};

/// Draws the toast in the bottom-right corner, above the hint bar.
pub fn render(frame: &mut Frame<'_>, area: Rect, toast: Option<&ToastState>) {
    let Some(toast) = toast else {
        return;
    };
    let theme = Theme::default();
    let content_width = toast.message.chars().count().max(toast.title.chars().count());
    let width = (content_width + 4).min(area.width as usize) as u16;
    let height = 4u16;
    let x = area.x + area.width.saturating_sub(width);
    let y = area
        .y
        .saturating_add(area.height.saturating_sub(height + 1));
    let rect = Rect { x, y, width, height };

    let style = match toast.level {
        ToastLevel::Info => Style::default().fg(theme.text),
        ToastLevel::Success => Style::default().fg(theme.positive),
        ToastLevel::Error => Style::default().fg(theme.error),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style);
    let content = Paragraph::new(vec![
        Line::from(Span::styled(
            toast.title.as_str(),
            style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(toast.message.as_str(), style)),
    ]);

    frame.render_widget(Clear, rect);
    frame.render_widget(content.block(block), rect);
}
