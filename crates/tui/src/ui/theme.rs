use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub positive: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(230, 224, 210),
            text_muted: Color::Rgb(150, 140, 120),
            accent: Color::Rgb(217, 119, 6),
            border: Color::Rgb(120, 90, 40),
            border_focused: Color::Rgb(245, 158, 11),
            positive: Color::Rgb(80, 170, 100),
            error: Color::Rgb(220, 70, 70),
        }
    }
}
