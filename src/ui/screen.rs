use ratatui::Frame;

use super::menu::{MenuView, SettingsView, StartView};
use super::play::PlayView;
use super::results::{LeaderboardView, ResultsView};
use crate::router::{Router, Screen};

/// Draw the router's active screen over the whole frame
pub fn render(router: &Router, f: &mut Frame) {
    let area = f.area();
    let ctx = router.context();

    match router.screen() {
        Screen::Start { input, error } => f.render_widget(
            &StartView {
                input,
                error: error.as_deref(),
            },
            area,
        ),
        Screen::Menu => f.render_widget(
            &MenuView {
                nickname: &ctx.nickname,
            },
            area,
        ),
        Screen::Settings => f.render_widget(&SettingsView { ctx }, area),
        Screen::Play { session, input } => f.render_widget(
            &PlayView {
                session,
                input,
                effects: router.effects(),
            },
            area,
        ),
        Screen::Results {
            summary,
            persist_error,
        } => f.render_widget(
            &ResultsView {
                nickname: &ctx.nickname,
                summary,
                persist_error: persist_error.as_deref(),
            },
            area,
        ),
        Screen::Leaderboard { rows } => f.render_widget(
            &LeaderboardView {
                rows: rows.as_deref().map_err(String::as_str),
            },
            area,
        ),
    }
}
