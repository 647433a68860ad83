pub mod menu;
pub mod play;
pub mod results;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Paragraph, Widget, Wrap},
};

pub use screen::render;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn bold_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn title_style() -> Style {
    bold_style().fg(Color::Cyan)
}

fn hint_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

fn error_style() -> Style {
    bold_style().fg(Color::Red)
}

/// Area left after the standard screen margins
fn content_area(area: Rect) -> Rect {
    let width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2);
    let height = area.height.saturating_sub(VERTICAL_MARGIN * 2);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Draw a block of lines centred both ways, clipped to the area
fn render_centered(lines: Vec<Line>, area: Rect, buf: &mut Buffer) {
    let area = content_area(area);
    let height = (lines.len() as u16).min(area.height);
    let top = (area.height - height) / 2;
    let target = Rect::new(area.x, area.y + top, area.width, height);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(target, buf);
}

#[cfg(test)]
pub(crate) fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area();
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
