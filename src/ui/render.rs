use crate::ui::state::LcdState;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draws the character grid inside a bordered panel in the top-left corner of
/// the frame.
pub fn render_lcd(frame: &mut Frame, state: &LcdState) {
    let geometry = state.geometry();
    let full = frame.area();
    let area = Rect {
        x: full.x,
        y: full.y,
        width: (geometry.columns as u16 + 2).min(full.width),
        height: (geometry.lines as u16 + 2).min(full.height),
    };

    // Unlit panels are dark text on the green glass.
    let style = if state.backlight() {
        Style::default().fg(Color::White).bg(Color::Blue)
    } else {
        Style::default().fg(Color::Black).bg(Color::Green)
    };

    let block = Block::default()
        .title("runpi")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines: Vec<Line> = state.lines().into_iter().map(Line::from).collect();
    let paragraph = Paragraph::new(lines).style(style).block(block);

    frame.render_widget(paragraph, area);
}
