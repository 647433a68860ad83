use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use super::{bold_style, error_style, hint_style, render_centered, title_style};
use crate::input::TextInput;
use crate::settings::{Mode, SessionContext, MAX_DURATION_SECS, MIN_DURATION_SECS};

pub const TITLE: &str = "TYPING FALL";

/// Nickname entry
pub struct StartView<'a> {
    pub input: &'a TextInput,
    pub error: Option<&'a str>,
}

impl Widget for &StartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![
            Line::styled(TITLE, title_style()),
            Line::styled(
                "Words fall from the sky. Type them before they land.",
                hint_style(),
            ),
            Line::raw(""),
            Line::styled("Nickname", bold_style()),
            Line::from(vec![
                Span::styled(self.input.as_str().to_string(), bold_style().fg(Color::Yellow)),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ]),
            Line::raw(""),
        ];
        lines.push(match self.error {
            Some(msg) => Line::styled(msg.to_string(), error_style()),
            None => Line::raw(""),
        });
        lines.push(Line::styled("(enter) continue / (esc)ape", hint_style()));

        render_centered(lines, area, buf);
    }
}

pub struct MenuView<'a> {
    pub nickname: &'a str,
}

impl Widget for &MenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::styled(TITLE, title_style()),
            Line::raw(format!("Player: {}", self.nickname)),
            Line::raw(""),
            Line::styled("(1) Settings", bold_style()),
            Line::styled("(2) Play", bold_style()),
            Line::styled("(3) Leaderboard", bold_style()),
            Line::raw(""),
            Line::styled("(esc)ape to quit", hint_style()),
        ];
        render_centered(lines, area, buf);
    }
}

pub struct SettingsView<'a> {
    pub ctx: &'a SessionContext,
}

impl Widget for &SettingsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let settings = &self.ctx.settings;
        let duration_style = if settings.mode == Mode::Timed {
            bold_style()
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };

        let lines = vec![
            Line::styled("Settings", title_style()),
            Line::raw(format!("Player: {}", self.ctx.nickname)),
            Line::raw(""),
            field("Language", settings.language.to_string(), "(l)", bold_style()),
            field(
                "Difficulty",
                settings.difficulty.to_string(),
                "(1/2/3)",
                bold_style(),
            ),
            field("Mode", settings.mode.to_string(), "(m)", bold_style()),
            field(
                "Duration",
                format!("{} s", settings.duration_secs),
                "(-/+)",
                duration_style,
            ),
            Line::raw(""),
            Line::styled(
                format!(
                    "timed games last {MIN_DURATION_SECS}-{MAX_DURATION_SECS} s, (enter) or (esc) to go back"
                ),
                hint_style(),
            ),
        ];
        render_centered(lines, area, buf);
    }
}

fn field<'a>(name: &'a str, value: String, keys: &'a str, value_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::raw(format!("{name}: ")),
        Span::styled(value, value_style.fg(Color::Yellow)),
        Span::styled(format!("  {keys}"), hint_style()),
    ])
}
