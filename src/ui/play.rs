use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::{bold_style, hint_style};
use crate::effects::{ColorTag, Effects};
use crate::game::{FallingWord, GameSession, FIELD_WIDTH, FLOOR_Y};
use crate::input::TextInput;

// Words in the lowest quarter of the field turn red
const DANGER_ZONE: f64 = 0.75;

pub struct PlayView<'a> {
    pub session: &'a GameSession,
    pub input: &'a TextInput,
    pub effects: &'a Effects,
}

impl Widget for &PlayView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // hud
                Constraint::Min(3),    // playfield
                Constraint::Length(3), // input box
                Constraint::Length(1), // key hint
            ])
            .split(area);

        Paragraph::new(hud_line(self.session)).render(chunks[0], buf);

        let field = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = field.inner(chunks[1]);
        field.render(chunks[1], buf);

        let (dx, dy) = self.effects.shake_offset();
        for p in &self.effects.particles {
            if let Some((x, y)) = to_cell(inner, p.x + dx, p.y + dy) {
                let color = match p.color {
                    ColorTag::Good => Color::Green,
                    ColorTag::Bad => Color::Red,
                };
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_symbol("*");
                    cell.set_style(Style::default().fg(color));
                }
            }
        }

        for word in self.session.words() {
            render_word(word, self.input.as_str(), (dx, dy), inner, buf);
        }

        let typed = Line::from(vec![
            Span::styled(self.input.as_str().to_string(), bold_style().fg(Color::Yellow)),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]);
        Paragraph::new(typed)
            .block(Block::default().borders(Borders::ALL).title(" type here "))
            .render(chunks[2], buf);

        Paragraph::new(Span::styled(
            "(enter) submit / (backspace) delete / (esc) finish",
            hint_style(),
        ))
        .render(chunks[3], buf);
    }
}

fn hud_line(session: &GameSession) -> Line<'static> {
    let scoring = session.scoring();
    let mode = match session.time_left() {
        Some(secs) => format!("{secs}s"),
        None => "∞".to_string(),
    };
    let stats = [
        format!("Score: {}", scoring.score),
        format!("OK: {}", scoring.correct),
        format!("Miss: {}", scoring.mistakes),
        format!("Mode: {mode}"),
    ]
    .iter()
    .join(" | ");

    Line::from(vec![
        Span::styled(format!("{}  ", session.nickname()), bold_style().fg(Color::Cyan)),
        Span::styled(stats, bold_style()),
    ])
}

/// Terminal cell for a playfield point, None when it is off screen.
/// Rows are scaled so the floor line lands on the last row of `area`.
pub fn to_cell(area: Rect, x: f64, y: f64) -> Option<(u16, u16)> {
    if area.width == 0 || area.height == 0 || x < 0.0 || y < 0.0 {
        return None;
    }
    let col = (x / FIELD_WIDTH * area.width as f64).floor() as u16;
    let row = (y / FLOOR_Y * area.height as f64).floor() as u16;
    (col < area.width && row < area.height).then(|| (area.x + col, area.y + row))
}

fn render_word(word: &FallingWord, typed: &str, shake: (f64, f64), area: Rect, buf: &mut Buffer) {
    let Some((center, row)) = to_cell(area, word.x + shake.0, word.y + shake.1) else {
        return;
    };

    let width = (word.text.width() as u16).min(area.width);
    let left = center
        .saturating_sub(width / 2)
        .clamp(area.x, area.right().saturating_sub(width));

    let base = if word.y / FLOOR_Y > DANGER_ZONE {
        bold_style().fg(Color::LightRed)
    } else {
        bold_style().fg(Color::White)
    };

    let matched = if !typed.is_empty() && word.text.starts_with(typed) {
        typed
    } else {
        ""
    };
    let rest = &word.text[matched.len()..];

    let (x, _) = buf.set_stringn(
        left,
        row,
        matched,
        width as usize,
        bold_style().fg(Color::Green),
    );
    let used = x - left;
    buf.set_stringn(x, row, rest, width.saturating_sub(used) as usize, base);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::game::Collaborators;
    use crate::settings::{Language, Mode, Settings};
    use crate::storage::ResultsDb;
    use crate::ui::buffer_text;
    use crate::words::SequenceCatalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settings(mode: Mode) -> Settings {
        Settings {
            language: Language::En,
            difficulty: 1,
            mode,
            duration_secs: 90,
        }
    }

    fn running_session(mode: Mode, words: &[&str], secs: f64) -> (GameSession, Effects) {
        let clock = ManualClock::new();
        let mut session = GameSession::new(
            "neo",
            &settings(mode),
            Box::new(clock.clone()),
            StdRng::seed_from_u64(3),
        );
        let mut catalog = SequenceCatalog::new(words.iter().copied());
        let mut effects = Effects::default();
        let mut store = ResultsDb::open_in_memory().unwrap();
        clock.advance_secs(secs);
        session.tick(
            secs,
            &mut Collaborators {
                words: &mut catalog,
                effects: &mut effects,
                store: &mut store,
            },
        );
        (session, effects)
    }

    fn draw(view: &PlayView<'_>) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn test_to_cell_maps_corners() {
        let area = Rect::new(1, 1, 100, 20);
        assert_eq!(to_cell(area, 0.0, 0.0), Some((1, 1)));
        assert_eq!(to_cell(area, 999.0, FLOOR_Y - 1.0), Some((100, 20)));
        assert_eq!(to_cell(area, 500.0, -10.0), None);
        assert_eq!(to_cell(area, 500.0, FLOOR_Y), None);
        assert_eq!(to_cell(Rect::new(0, 0, 0, 0), 1.0, 1.0), None);
    }

    #[test]
    fn test_renders_hud_words_and_input() {
        let (session, effects) = running_session(Mode::Endless, &["planet"], 1.7);
        let input = TextInput::with_text("pla", 24);
        let text = draw(&PlayView {
            session: &session,
            input: &input,
            effects: &effects,
        });

        assert!(text.contains("Score: 0 | OK: 0 | Miss: 0 | Mode: ∞"));
        assert!(text.contains("planet"));
        assert!(text.contains("pla_"));
    }

    #[test]
    fn test_timed_hud_shows_seconds_left() {
        let (session, effects) = running_session(Mode::Timed, &["sun"], 10.0);
        let input = TextInput::default();
        let text = draw(&PlayView {
            session: &session,
            input: &input,
            effects: &effects,
        });
        assert!(text.contains("Mode: 80s"));
    }

    #[test]
    fn test_cyrillic_words_render() {
        let (session, effects) = running_session(Mode::Endless, &["слово"], 1.7);
        let input = TextInput::default();
        let text = draw(&PlayView {
            session: &session,
            input: &input,
            effects: &effects,
        });
        assert!(text.contains("слово"));
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let (session, effects) = running_session(Mode::Endless, &["extraordinarily"], 1.7);
        let input = TextInput::default();
        let view = PlayView {
            session: &session,
            input: &input,
            effects: &effects,
        };
        for (w, h) in [(1, 1), (8, 4), (12, 9)] {
            let area = Rect::new(0, 0, w, h);
            let mut buf = Buffer::empty(area);
            (&view).render(area, &mut buf);
        }
    }
}
