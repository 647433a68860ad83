use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::Widget,
};

use super::{bold_style, error_style, hint_style, render_centered, title_style};
use crate::router::LEADERBOARD_SIZE;
use crate::scoring::ResultSummary;
use crate::storage::ResultRow;

pub const EMPTY_LEADERBOARD: &str = "No results yet. Play your first game!";

pub struct ResultsView<'a> {
    pub nickname: &'a str,
    pub summary: &'a ResultSummary,
    pub persist_error: Option<&'a str>,
}

impl Widget for &ResultsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let s = self.summary;
        let mut lines = vec![
            Line::styled("Game over", title_style()),
            Line::raw(format!("Player: {}", self.nickname)),
            Line::raw(""),
            Line::styled(format!("Score: {}", s.score), bold_style().fg(Color::Yellow)),
            Line::raw(format!("Correct: {}   Mistakes: {}", s.correct, s.mistakes)),
            Line::raw(format!("WPM: {:.1}", s.wpm)),
            Line::raw(format!("Accuracy: {:.1}%", s.accuracy_percent())),
            Line::raw(format!("Time: {} s", s.seconds_played)),
            Line::raw(""),
        ];
        if let Some(err) = self.persist_error {
            lines.push(Line::styled(format!("Result not saved: {err}"), error_style()));
        }
        lines.push(Line::styled(
            "(enter) menu / (3) leaderboard",
            hint_style(),
        ));

        render_centered(lines, area, buf);
    }
}

pub struct LeaderboardView<'a> {
    pub rows: Result<&'a [ResultRow], &'a str>,
}

impl Widget for &LeaderboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![
            Line::styled(format!("TOP {LEADERBOARD_SIZE}"), title_style()),
            Line::raw(""),
        ];

        match self.rows {
            Ok([]) => lines.push(Line::styled(EMPTY_LEADERBOARD, hint_style())),
            Ok(rows) => lines.extend(
                rows.iter()
                    .enumerate()
                    .map(|(i, row)| {
                        let style = if i == 0 {
                            bold_style().fg(Color::Yellow)
                        } else {
                            Style::default()
                        };
                        Line::styled(leaderboard_line(i + 1, row), style)
                    })
                    .collect_vec(),
            ),
            Err(err) => lines.push(Line::styled(
                format!("Leaderboard unavailable: {err}"),
                error_style(),
            )),
        }

        lines.push(Line::raw(""));
        lines.push(Line::styled("(enter) back to menu", hint_style()));
        render_centered(lines, area, buf);
    }
}

/// One leaderboard row as shown on screen, rank first and date last
pub fn leaderboard_line(rank: usize, row: &ResultRow) -> String {
    format!(
        "{rank}) {} — {} (WPM {:.1}, {:.0}%)  {}",
        row.nickname,
        row.score,
        row.wpm,
        row.accuracy * 100.0,
        row.created_at.format("%Y-%m-%d %H:%M")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::buffer_text;
    use chrono::{Local, TimeZone};

    fn draw(widget: impl Widget) -> String {
        let area = Rect::new(0, 0, 90, 24);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buffer_text(&buf)
    }

    fn summary() -> ResultSummary {
        ResultSummary {
            score: 140,
            correct: 14,
            mistakes: 2,
            wpm: 14.0,
            accuracy: 0.875,
            seconds_played: 60,
        }
    }

    fn row(nickname: &str, score: u32) -> ResultRow {
        ResultRow {
            nickname: nickname.into(),
            score,
            wpm: 32.54,
            accuracy: 0.9,
            created_at: Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 0).unwrap(),
        }
    }

    #[test]
    fn test_results_view_shows_summary() {
        let s = summary();
        let text = draw(&ResultsView {
            nickname: "neo",
            summary: &s,
            persist_error: None,
        });
        assert!(text.contains("Player: neo"));
        assert!(text.contains("Score: 140"));
        assert!(text.contains("WPM: 14.0"));
        assert!(text.contains("Accuracy: 87.5%"));
        assert!(!text.contains("not saved"));
    }

    #[test]
    fn test_results_view_warns_when_not_saved() {
        let s = summary();
        let text = draw(&ResultsView {
            nickname: "neo",
            summary: &s,
            persist_error: Some("disk full"),
        });
        assert!(text.contains("Result not saved: disk full"));
    }

    #[test]
    fn test_leaderboard_line_format() {
        assert_eq!(
            leaderboard_line(1, &row("neo", 200)),
            "1) neo — 200 (WPM 32.5, 90%)  2026-03-14 09:26"
        );
    }

    #[test]
    fn test_leaderboard_lists_rows_in_order() {
        let rows = vec![row("neo", 200), row("trinity", 100)];
        let text = draw(&LeaderboardView {
            rows: Ok(rows.as_slice()),
        });
        let first = text.find("1) neo").unwrap();
        let second = text.find("2) trinity").unwrap();
        assert!(first < second);
        assert!(text.contains("TOP 10"));
    }

    #[test]
    fn test_empty_leaderboard_message() {
        let text = draw(&LeaderboardView { rows: Ok(&[][..]) });
        assert!(text.contains(EMPTY_LEADERBOARD));
    }

    #[test]
    fn test_leaderboard_error() {
        let text = draw(&LeaderboardView {
            rows: Err("database is locked"),
        });
        assert!(text.contains("Leaderboard unavailable: database is locked"));
    }
}
