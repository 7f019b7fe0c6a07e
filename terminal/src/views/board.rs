use crate::app::App;
use crate::render::arena::ArenaRenderer;
use crate::render::standard_renderer::StandardRenderer;
use crate::render::types::RenderConfig;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_board(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title("Arena").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let config = RenderConfig::default();
    let char_dims = config.chars_per_point;
    let arena_renderer = ArenaRenderer::new(StandardRenderer::new(char_dims));
    let settings = app.round.settings();
    let char_grid = arena_renderer.render(
        app.round.arena(),
        app.effects.particles(),
        settings,
        &config,
    );

    // +2 for the border on each axis
    let board_width = char_grid.physical_width() + 2;
    let board_height = char_grid.physical_height() + 2;

    let (shake_x, shake_y) = app.shake_offset();
    let x_offset = (inner.width.saturating_sub(board_width as u16) / 2) as i32 + shake_x as i32;
    let y_offset = (inner.height.saturating_sub(board_height as u16) / 2) as i32 + shake_y as i32;
    let x_offset = x_offset.max(0) as usize;
    let y_offset = y_offset.max(0) as usize;

    let border_style = Style::default().fg(Color::DarkGray);
    let mut lines: Vec<Line> = Vec::new();

    for _ in 0..y_offset {
        lines.push(Line::from(""));
    }

    let padding = " ".repeat(x_offset);
    let horizontal = "─".repeat(char_grid.physical_width());
    lines.push(Line::from(Span::styled(
        format!("{padding}┌{horizontal}┐"),
        border_style,
    )));

    for (chars, styles) in char_grid.into_styled_lines() {
        let mut spans = Vec::with_capacity(chars.len() + 3);
        if x_offset > 0 {
            spans.push(Span::raw(padding.clone()));
        }
        spans.push(Span::styled("│", border_style));
        for (ch, style) in chars.into_iter().zip(styles) {
            spans.push(Span::styled(ch.to_string(), style));
        }
        spans.push(Span::styled("│", border_style));
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(Span::styled(
        format!("{padding}└{horizontal}┘"),
        border_style,
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}
