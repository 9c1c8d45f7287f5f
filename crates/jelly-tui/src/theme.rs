//! Color palette and styles for the TUI, carried as a value into `render`.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub muted: Color,
    pub accent: Color,
    pub error: Color,
    pub success: Color,
    pub selection_bg: Color,
    pub marked: Color,
    pub border: Color,
    pub border_focused: Color,
    pub input_fg: Color,
    pub input_bg: Color,
    pub mode_normal: Color,
    pub mode_input: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Rgb(210, 210, 225),
            secondary: Color::Rgb(115, 115, 138),
            muted: Color::Rgb(72, 72, 88),
            accent: Color::Rgb(255, 95, 95),
            error: Color::Rgb(255, 80, 80),
            success: Color::Rgb(80, 200, 120),
            selection_bg: Color::Rgb(28, 28, 40),
            marked: Color::Rgb(255, 210, 50),
            border: Color::Rgb(40, 40, 52),
            border_focused: Color::Rgb(120, 100, 200),
            input_fg: Color::Rgb(255, 200, 80),
            input_bg: Color::Rgb(20, 20, 32),
            mode_normal: Color::Rgb(115, 115, 138),
            mode_input: Color::Rgb(255, 200, 80),
        }
    }
}

// ── Predefined styles ─────────────────────────────────────────────────────────

impl Theme {
    pub fn text(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn secondary(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn marked(&self) -> Style {
        Style::default().fg(self.marked)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn input(&self) -> Style {
        Style::default().fg(self.input_fg).bg(self.input_bg)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }
}
