use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::{
    action::Action,
    components::Component,
    tui::{EventResponse, Frame},
};

use super::popup::{centered_rect_fixed, draw_popup_frame, render_backdrop};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Notice,
    Error,
}

/// Modal alert with a title and a message. Enter or Esc acknowledges it and
/// emits [`Action::ClosePopup`].
pub struct AlertPopup {
    kind: AlertKind,
    title: String,
    message: String,
    min_width: u16,
    min_height: u16,
}

impl AlertPopup {
    pub fn new<T: Into<String>, M: Into<String>>(kind: AlertKind, title: T, message: M) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            min_width: 50,
            min_height: 7,
        }
    }

    pub fn notice(message: impl Into<String>) -> Self {
        Self::new(AlertKind::Notice, "Notice", message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(AlertKind::Error, "Error", message)
    }

    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn accent(&self) -> Color {
        match self.kind {
            AlertKind::Notice => Color::Green,
            AlertKind::Error => Color::Red,
        }
    }
}

impl Component for AlertPopup {
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        // modal: swallow everything, only Enter/Esc do something
        let response = match key.code {
            KeyCode::Enter | KeyCode::Esc => EventResponse::Stop(Action::ClosePopup),
            _ => EventResponse::Stop(Action::Render),
        };
        Ok(Some(response))
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        if area.width < 5 || area.height < 5 {
            return Ok(());
        }
        render_backdrop(f, area);

        let w = self.min_width.min(area.width);
        let h = self.min_height.min(area.height);
        let dialog = centered_rect_fixed(area, w, h);
        let inner = draw_popup_frame(f, dialog, &self.title, self.accent());

        let mut lines: Vec<Line> = self
            .message
            .lines()
            .map(|l| Line::from(Span::raw(l.to_string())))
            .collect();
        if inner.height >= 3 {
            lines.push(Line::raw(""));
        }
        lines.push(
            Line::from(vec![
                Span::styled("Enter", Style::default().fg(Color::White)),
                Span::raw(": OK   "),
                Span::styled("Esc", Style::default().fg(Color::White)),
                Span::raw(": Close"),
            ])
            .fg(Color::DarkGray),
        );

        let para = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
        f.render_widget(para, inner);
        Ok(())
    }
}
