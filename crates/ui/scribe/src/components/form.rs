use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use form_engine::{FieldKind, FieldValue, FormSession, SessionError, SinkChain};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use tracing::{info, warn};

use super::Component;
use super::field::{FieldControl, button_line};
use crate::{
    action::Action,
    tui::{EventResponse, Frame},
};

pub const PREV_BUTTON_TAG: &str = "prev-button";
pub const NEXT_BUTTON_TAG: &str = "next-button";
pub const SUBMIT_BUTTON_TAG: &str = "submit-button";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Field(usize),
    Prev,
    Next,
    Submit,
}

/// The form view: one section at a time, with Previous / Next / Submit.
pub struct FormComponent {
    session: FormSession,
    sink: SinkChain,
    controls: Vec<FieldControl>,
    focus: Focus,
    scroll: usize,
}

impl FormComponent {
    pub fn new(session: FormSession, sink: SinkChain) -> Self {
        let mut form = Self {
            session,
            sink,
            controls: Vec::new(),
            focus: Focus::Next,
            scroll: 0,
        };
        form.load_section();
        form
    }

    pub fn session(&self) -> &FormSession {
        &self.session
    }

    /// Rebuild the controls for the active section and focus its first one.
    fn load_section(&mut self) {
        let section = self.session.current_section();
        self.controls = section
            .fields
            .iter()
            .map(|def| FieldControl::new(def.clone(), self.session.value(&def.field_id)))
            .collect();
        self.scroll = 0;
        self.focus = self.ring().first().copied().unwrap_or(Focus::Next);
    }

    /// Focus order: fields, then the enabled buttons.
    fn ring(&self) -> Vec<Focus> {
        let mut ring: Vec<Focus> = self
            .controls
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_focusable())
            .map(|(i, _)| Focus::Field(i))
            .collect();
        if !self.session.is_first() {
            ring.push(Focus::Prev);
        }
        ring.push(if self.session.is_last() { Focus::Submit } else { Focus::Next });
        ring
    }

    fn step_focus(&mut self, forward: bool) {
        let ring = self.ring();
        let pos = ring.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % ring.len()
        } else {
            (pos + ring.len() - 1) % ring.len()
        };
        self.focus = ring[next];
    }

    fn tag_of(&self, focus: Focus) -> &str {
        match focus {
            Focus::Field(i) => self.controls[i].tag(),
            Focus::Prev => PREV_BUTTON_TAG,
            Focus::Next => NEXT_BUTTON_TAG,
            Focus::Submit => SUBMIT_BUTTON_TAG,
        }
    }

    pub fn focused_tag(&self) -> &str {
        self.tag_of(self.focus)
    }

    /// Move focus to the control with this tag, if it is on screen and enabled.
    pub fn focus_tag(&mut self, tag: &str) -> bool {
        let target = self.ring().into_iter().find(|f| self.tag_of(*f) == tag);
        if let Some(focus) = target {
            self.focus = focus;
        }
        target.is_some()
    }

    /// Activate a control by tag: a button, an option of a choice field, or a
    /// single checkbox.
    pub fn press(&mut self, tag: &str) -> Option<Action> {
        match tag {
            PREV_BUTTON_TAG => {
                self.retreat();
                return None;
            }
            NEXT_BUTTON_TAG => {
                self.advance();
                return None;
            }
            SUBMIT_BUTTON_TAG => return self.submit(),
            _ => {}
        }

        for i in 0..self.controls.len() {
            let field_id = self.controls[i].def().field_id.clone();
            let current = self.session.value(&field_id).cloned();
            let control = &mut self.controls[i];
            let value = if let Some(option) = control.option_for_tag(tag) {
                control.pick(&option, current.as_ref())
            } else if control.tag() == tag && control.kind() == FieldKind::Toggle {
                control.flip(current.as_ref())
            } else {
                continue;
            };
            self.focus = Focus::Field(i);
            if let Some(value) = value {
                self.set(&field_id, value);
            }
            return None;
        }
        warn!(tag, "no control with this tag in the current section");
        None
    }

    fn set(&mut self, field_id: &str, value: FieldValue) {
        if let Err(e) = self.session.set_value(field_id, value) {
            warn!("rejected value: {e}");
        }
    }

    fn focus_first_error(&mut self) {
        if let Some(i) = self
            .controls
            .iter()
            .position(|c| self.session.error(&c.def().field_id).is_some())
        {
            self.focus = Focus::Field(i);
        }
    }

    fn advance(&mut self) {
        match self.session.advance() {
            Ok(_) => self.load_section(),
            Err(SessionError::Invalid { .. }) => self.focus_first_error(),
            Err(e) => warn!("cannot advance: {e}"),
        }
    }

    fn retreat(&mut self) {
        match self.session.retreat() {
            Ok(_) => self.load_section(),
            Err(e) => warn!("cannot go back: {e}"),
        }
    }

    fn submit(&mut self) -> Option<Action> {
        match self.session.submit(&self.sink) {
            Ok(submission) => {
                info!(fields = submission.form_values.len(), "form submitted");
                Some(Action::Submitted)
            }
            Err(SessionError::Invalid { .. }) => {
                self.focus_first_error();
                None
            }
            Err(e) => {
                warn!("cannot submit: {e}");
                None
            }
        }
    }

    /// Keep the focused field inside the visible window of `height` rows.
    fn ensure_visible(&mut self, height: u16) {
        let Focus::Field(focused) = self.focus else {
            return;
        };
        self.scroll = self.scroll.min(focused);
        loop {
            let used: u16 = (self.scroll..=focused).map(|i| self.control_height(i)).sum();
            if used <= height || self.scroll == focused {
                break;
            }
            self.scroll += 1;
        }
    }

    fn control_height(&self, i: usize) -> u16 {
        let control = &self.controls[i];
        let has_error = self.session.error(&control.def().field_id).is_some();
        // one spacer row between fields
        control.height(self.focus == Focus::Field(i), has_error) + 1
    }

    fn draw_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let schema = self.session.schema();
        let (current, total) = self.session.progress();
        let [title, meta, progress] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)]).areas(area);

        frame.render_widget(
            Paragraph::new(schema.form_title.as_str()).style(Style::default().add_modifier(Modifier::BOLD)),
            title,
        );
        frame.render_widget(
            Paragraph::new(format!("Form ID: {} | Version: {}", schema.form_id, schema.version))
                .style(Style::default().fg(Color::Gray)),
            meta,
        );

        let [label, bar] = Layout::horizontal([Constraint::Length(20), Constraint::Fill(1)]).areas(progress);
        frame.render_widget(Paragraph::new(format!("Section {current} of {total}")), label);
        frame.render_widget(
            Gauge::default()
                .ratio(self.session.progress_ratio())
                .label("")
                .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray)),
            bar,
        );
    }

    fn draw_section(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let section = self.session.current_section();
        let mut intro = vec![Line::from(Span::styled(
            section.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        if !section.description.is_empty() {
            intro.push(Line::styled(section.description.clone(), Style::default().fg(Color::Gray)));
        }
        let intro_height = intro.len() as u16 + 1;
        let [intro_area, fields_area] =
            Layout::vertical([Constraint::Length(intro_height), Constraint::Fill(1)]).areas(area);
        frame.render_widget(Paragraph::new(intro).wrap(Wrap { trim: true }), intro_area);

        self.ensure_visible(fields_area.height);
        for (i, rect) in self.field_rects(fields_area) {
            let control = &self.controls[i];
            let field_id = &control.def().field_id;
            control.draw(
                frame,
                rect,
                self.session.value(field_id),
                self.session.error(field_id),
                self.focus == Focus::Field(i),
            );
        }
    }

    /// Where each visible control goes, starting at the scroll offset. A
    /// control that runs past the bottom is clipped to what is left.
    fn field_rects(&self, area: Rect) -> Vec<(usize, Rect)> {
        let bottom = area.y + area.height;
        let mut y = area.y;
        let mut rects = Vec::new();
        for i in self.scroll..self.controls.len() {
            if y >= bottom {
                break;
            }
            let height = self.control_height(i);
            let rows = if y + height <= bottom { height - 1 } else { bottom - y };
            rects.push((i, Rect::new(area.x, y, area.width, rows)));
            y = y.saturating_add(height);
        }
        rects
    }

    fn draw_buttons(&self, frame: &mut Frame<'_>, area: Rect) {
        let [prev, _, next] =
            Layout::horizontal([Constraint::Length(14), Constraint::Fill(1), Constraint::Length(12)]).areas(area);
        frame.render_widget(
            Paragraph::new(button_line("Previous", self.focus == Focus::Prev, !self.session.is_first())),
            prev,
        );
        let forward = if self.session.is_last() {
            button_line("Submit", self.focus == Focus::Submit, true)
        } else {
            button_line("Next", self.focus == Focus::Next, true)
        };
        frame.render_widget(Paragraph::new(forward).right_aligned(), next);
    }
}

impl Component for FormComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        match key.code {
            KeyCode::Tab => {
                self.step_focus(true);
                return Ok(None);
            }
            KeyCode::BackTab => {
                self.step_focus(false);
                return Ok(None);
            }
            KeyCode::PageDown if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.advance();
                return Ok(None);
            }
            KeyCode::PageUp if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.retreat();
                return Ok(None);
            }
            _ => {}
        }

        let index = match self.focus {
            Focus::Field(i) => i,
            button => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    let tag = self.tag_of(button).to_string();
                    return Ok(self.press(&tag).map(EventResponse::Stop));
                }
                return Ok(None);
            }
        };

        let control = &mut self.controls[index];
        if key.code == KeyCode::Enter && matches!(control.kind(), FieldKind::Line(_)) {
            self.step_focus(true);
            return Ok(None);
        }
        let field_id = control.def().field_id.clone();
        if let Some(value) = control.handle_key(key, self.session.value(&field_id)) {
            self.set(&field_id, value);
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [_, column, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Max(90),
            Constraint::Fill(1),
        ])
        .areas(area);
        let block = Block::default().borders(Borders::ALL).border_set(ratatui::symbols::border::ROUNDED);
        let inner = block.inner(column);
        frame.render_widget(block, column);

        let [header, _, section, buttons, help] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        self.draw_header(frame, header);
        self.draw_section(frame, section);
        self.draw_buttons(frame, buttons);
        frame.render_widget(
            Paragraph::new("Tab/Shift+Tab: move   ↑↓: choose   Space/Enter: select   Ctrl+C: quit")
                .style(Style::default().fg(Color::DarkGray)),
            help,
        );
        Ok(())
    }
}
