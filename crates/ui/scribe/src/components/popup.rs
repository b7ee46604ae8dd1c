use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Block, Borders, Clear},
};

use crate::tui::Frame;

/// Simulated dim overlay; terminals have no transparency. Draw it after the
/// page and before the dialog.
pub fn render_backdrop(frame: &mut Frame<'_>, area: Rect) {
    let backdrop = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(backdrop, area);
}

/// A `width` x `height` rectangle centered in `area`, clamped to fit.
pub fn centered_rect_fixed(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);

    let x = area.x.saturating_add((area.width.saturating_sub(w)) / 2);
    let y = area.y.saturating_add((area.height.saturating_sub(h)) / 2);

    Rect {
        x,
        y,
        width: w,
        height: h,
    }
}

/// Clear `area` and draw a rounded, titled shell on it. Returns the inner
/// rectangle content should go into.
pub fn draw_popup_frame(frame: &mut Frame<'_>, area: Rect, title: impl Into<String>, accent: Color) -> Rect {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", title.into()))
        .borders(Borders::ALL)
        .border_set(symbols::border::ROUNDED)
        .border_style(Style::default().fg(accent))
        .style(Style::default().fg(Color::White).bg(Color::Black));
    let inner = block.inner(area);

    frame.render_widget(block, area);
    inner
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn centered_rect_is_clamped() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect_fixed(area, 40, 10), Rect::new(20, 7, 40, 10));
        assert_eq!(centered_rect_fixed(area, 200, 50), area);
    }
}
