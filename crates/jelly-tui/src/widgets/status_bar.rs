//! Header and footer strips.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Input,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Input => "INPUT",
        }
    }
}

/// Cut `s` to at most `max` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Draw the top line: app name and view on the left, who is signed in on the right.
pub fn draw_header(frame: &mut Frame, area: Rect, view: &str, signed_in: Option<&str>, theme: &Theme) {
    let left = format!(" jelly · {view}");
    let right = match signed_in {
        Some(who) => format!("{who} "),
        None => "not signed in ".to_string(),
    };
    let width = area.width as usize;
    let room = width.saturating_sub(left.width() + 1);
    let right = truncate_to_width(&right, room);
    let gap = width.saturating_sub(left.width() + right.width());

    let line = Line::from(vec![
        Span::styled(left, theme.title()),
        Span::raw(" ".repeat(gap)),
        Span::styled(right, theme.secondary()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, keys: &str, theme: &Theme) {
    let label_color = match mode {
        InputMode::Normal => theme.mode_normal,
        InputMode::Input => theme.mode_input,
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(label_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            truncate_to_width(keys, (area.width as usize).saturating_sub(9)),
            theme.muted(),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
