//! Terminal controls for schema fields.
//!
//! A [`FieldControl`] renders one [`FieldDef`] and turns key presses into the
//! value the session should store. It keeps no value of its own: every
//! accepted keystroke or selection is returned right away and the caller
//! writes it into the session.
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use form_engine::{Edit, FieldDef, FieldKind, FieldValue};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use tui_input::backend::crossterm::EventHandler as _;
use tui_input::{Input, InputRequest};

use crate::tui::Frame;

const DROPDOWN_PLACEHOLDER: &str = "Select an option";
const AREA_HEIGHT: u16 = 5;

pub struct FieldControl {
    def: FieldDef,
    kind: FieldKind,
    input: Input,
    cursor: usize,
}

impl FieldControl {
    pub fn new(def: FieldDef, current: Option<&FieldValue>) -> Self {
        let kind = FieldKind::of(&def);
        let mut control = Self {
            def,
            kind,
            input: Input::default(),
            cursor: 0,
        };
        control.sync(current);
        control
    }

    pub fn def(&self) -> &FieldDef {
        &self.def
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn tag(&self) -> &str {
        self.def.control_tag()
    }

    pub fn is_focusable(&self) -> bool {
        self.kind != FieldKind::Unsupported
    }

    /// Align the edit buffer and option cursor with the stored value.
    pub fn sync(&mut self, current: Option<&FieldValue>) {
        let shown = self.kind.displayed(current);
        if self.kind.is_textual() {
            let text = shown.as_ref().and_then(FieldValue::as_text).unwrap_or_default();
            if self.input.value() != text {
                self.input = Input::new(text.to_string());
            }
        }
        if let Some(selected) = shown.as_ref().and_then(FieldValue::as_text) {
            if let Some(i) = self.def.option_list().iter().position(|o| o.value == selected) {
                self.cursor = i;
            }
        }
    }

    /// Feed a key to the control. Returns the new value when the key changed it.
    pub fn handle_key(&mut self, key: KeyEvent, current: Option<&FieldValue>) -> Option<FieldValue> {
        match self.kind {
            FieldKind::Line(_) => self.edit_text(key, current),
            FieldKind::Area => {
                if key.code == KeyCode::Enter {
                    if self.is_full() {
                        return None;
                    }
                    self.input.handle(InputRequest::InsertChar('\n'));
                    self.commit_text(current)
                } else {
                    self.edit_text(key, current)
                }
            }
            FieldKind::Dropdown | FieldKind::Radio | FieldKind::MultiCheck => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.cursor = self.cursor.saturating_sub(1);
                    None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    let last = self.def.option_list().len().saturating_sub(1);
                    self.cursor = (self.cursor + 1).min(last);
                    None
                }
                KeyCode::Char(' ') | KeyCode::Enter => {
                    let value = self.def.option_list().get(self.cursor)?.value.clone();
                    self.pick(&value, current)
                }
                _ => None,
            },
            FieldKind::Toggle => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => self.flip(current),
                _ => None,
            },
            FieldKind::Unsupported => None,
        }
    }

    /// Select (or for a checkbox group, toggle) the option with this value.
    pub fn pick(&mut self, option_value: &str, current: Option<&FieldValue>) -> Option<FieldValue> {
        let edit = match self.kind {
            FieldKind::Dropdown | FieldKind::Radio => Edit::Select(option_value.to_string()),
            FieldKind::MultiCheck => Edit::ToggleOption(option_value.to_string()),
            _ => return None,
        };
        let value = self.kind.apply(&self.def, current, edit)?;
        if let Some(i) = self.def.option_list().iter().position(|o| o.value == option_value) {
            self.cursor = i;
        }
        Some(value)
    }

    pub fn flip(&self, current: Option<&FieldValue>) -> Option<FieldValue> {
        self.kind.apply(&self.def, current, Edit::Flip)
    }

    /// The option value whose tag is `tag`, if this control has one.
    pub fn option_for_tag(&self, tag: &str) -> Option<String> {
        self.def
            .option_list()
            .iter()
            .find(|o| self.def.option_tag(o) == tag)
            .map(|o| o.value.clone())
    }

    /// The buffer holds as many characters as the field accepts.
    fn is_full(&self) -> bool {
        self.kind
            .input_cap(&self.def)
            .is_some_and(|cap| at_cap(&self.input, cap))
    }

    fn edit_text(&mut self, key: KeyEvent, current: Option<&FieldValue>) -> Option<FieldValue> {
        if inserts_char(&key) && self.is_full() {
            return None;
        }
        self.input.handle_event(&crossterm::event::Event::Key(key))?;
        self.commit_text(current)
    }

    fn commit_text(&mut self, current: Option<&FieldValue>) -> Option<FieldValue> {
        let before = self.kind.displayed(current);
        let value = self
            .kind
            .apply(&self.def, current, Edit::Text(self.input.value().to_string()))?;
        if let Some(text) = value.as_text() {
            if text != self.input.value() {
                self.input = Input::new(text.to_string());
            }
        }
        (before.as_ref() != Some(&value)).then_some(value)
    }

    pub fn height(&self, focused: bool, has_error: bool) -> u16 {
        let options = self.def.option_list().len() as u16;
        let body = match self.kind {
            FieldKind::Line(_) => 3,
            FieldKind::Area => AREA_HEIGHT,
            FieldKind::Dropdown if focused => 1 + 3 + options,
            FieldKind::Dropdown => 1 + 3,
            FieldKind::Radio => 1 + options,
            FieldKind::MultiCheck => options,
            FieldKind::Toggle => 1,
            FieldKind::Unsupported => 2,
        };
        body + u16::from(has_error)
    }

    pub fn draw(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        current: Option<&FieldValue>,
        error: Option<&str>,
        focused: bool,
    ) {
        let [body, error_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(u16::from(error.is_some()))]).areas(area);
        let shown = self.kind.displayed(current);

        match self.kind {
            FieldKind::Line(_) => {
                let placeholder = self.def.placeholder.as_deref().unwrap_or_default();
                draw_line_input(frame, body, &self.input, self.label_line(), placeholder, focused);
            }
            FieldKind::Area => self.draw_area(frame, body, focused),
            FieldKind::Dropdown => self.draw_dropdown(frame, body, shown.as_ref(), focused),
            FieldKind::Radio | FieldKind::MultiCheck => {
                let mut lines = Vec::new();
                if self.kind.shows_label() {
                    lines.push(self.label_line());
                }
                for (i, option) in self.def.option_list().iter().enumerate() {
                    let checked = match &shown {
                        Some(FieldValue::Text(v)) => *v == option.value,
                        Some(FieldValue::List(items)) => items.contains(&option.value),
                        _ => false,
                    };
                    let mark = match (self.kind, checked) {
                        (FieldKind::Radio, true) => "(•)",
                        (FieldKind::Radio, false) => "( )",
                        (_, true) => "[x]",
                        (_, false) => "[ ]",
                    };
                    lines.push(option_line(mark, &option.label, focused && i == self.cursor));
                }
                frame.render_widget(Paragraph::new(lines), body);
            }
            FieldKind::Toggle => {
                let checked = matches!(shown, Some(FieldValue::Flag(true)));
                let mark = if checked { "[x]" } else { "[ ]" };
                let mut line = option_line(mark, &self.def.label, focused);
                if self.def.required {
                    line.push_span(Span::styled(" *", Style::default().fg(Color::Red)));
                }
                frame.render_widget(Paragraph::new(line), body);
            }
            FieldKind::Unsupported => {
                let lines = vec![
                    self.label_line(),
                    Line::styled(
                        format!("Unsupported field type: {}", self.def.field_type),
                        Style::default().fg(Color::DarkGray),
                    ),
                ];
                frame.render_widget(Paragraph::new(lines), body);
            }
        }

        if let Some(err) = error {
            frame.render_widget(Paragraph::new(err).style(Style::default().fg(Color::Red)), error_area);
        }
    }

    fn label_line(&self) -> Line<'static> {
        let mut spans = vec![Span::raw(self.def.label.clone())];
        if self.def.required {
            spans.push(Span::styled(" *", Style::default().fg(Color::Red)));
        }
        Line::from(spans)
    }

    fn draw_area(&self, frame: &mut Frame<'_>, area: Rect, focused: bool) {
        let value = self.input.value();
        let before_cursor: String = value.chars().take(self.input.cursor()).collect();
        let row = before_cursor.matches('\n').count() as u16;
        let col = before_cursor.rsplit('\n').next().map_or(0, |l| l.chars().count()) as u16;
        let visible_rows = area.height.saturating_sub(2).max(1);
        let scroll = row.saturating_sub(visible_rows - 1);

        let text = if value.is_empty() {
            Paragraph::new(self.def.placeholder.clone().unwrap_or_default())
                .style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(value.to_string()).scroll((scroll, 0))
        };
        frame.render_widget(text.block(input_block(self.label_line(), focused)), area);

        if focused {
            frame.set_cursor_position((area.x + 1 + col, area.y + 1 + row - scroll));
        }
    }

    fn draw_dropdown(&self, frame: &mut Frame<'_>, area: Rect, shown: Option<&FieldValue>, focused: bool) {
        let [label, select, list] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(3), Constraint::Fill(1)]).areas(area);
        frame.render_widget(Paragraph::new(self.label_line()), label);

        let selected = shown
            .and_then(FieldValue::as_text)
            .and_then(|v| self.def.option_list().iter().find(|o| o.value == v));
        let content = match selected {
            Some(option) => Line::from(format!("{} ▾", option.label)),
            None => Line::styled(
                format!(
                    "{} ▾",
                    self.def.placeholder.as_deref().unwrap_or(DROPDOWN_PLACEHOLDER)
                ),
                Style::default().fg(Color::DarkGray),
            ),
        };
        frame.render_widget(Paragraph::new(content).block(input_block("", focused)), select);

        if focused {
            let lines: Vec<Line> = self
                .def
                .option_list()
                .iter()
                .enumerate()
                .map(|(i, o)| {
                    let mark = if selected.is_some_and(|s| s.value == o.value) { "✓" } else { " " };
                    option_line(mark, &o.label, i == self.cursor)
                })
                .collect();
            frame.render_widget(Paragraph::new(lines), list);
        }
    }
}

fn input_block<'a>(title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
    let (title_style, border_style) = if focused {
        (
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Cyan),
        )
    } else {
        (Style::default().fg(Color::Gray), Style::default().fg(Color::DarkGray))
    };
    Block::bordered()
        .title(title)
        .title_style(title_style)
        .border_set(border::ROUNDED)
        .border_style(border_style)
}

fn option_line(mark: &str, label: &str, highlighted: bool) -> Line<'static> {
    let pointer = if highlighted { "› " } else { "  " };
    let style = if highlighted {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(pointer, Style::default().fg(Color::Cyan)),
        Span::styled(format!("{mark} {label}"), style),
    ])
}

/// Whether `key` types a character into a tui-input buffer.
pub fn inserts_char(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(_)) && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

pub fn at_cap(input: &Input, cap: usize) -> bool {
    input.value().chars().count() >= cap
}

/// Bordered single-line input with the cursor placed when focused.
pub fn draw_line_input<'a>(
    frame: &mut Frame<'_>,
    area: Rect,
    input: &Input,
    title: impl Into<Line<'a>>,
    placeholder: &str,
    focused: bool,
) {
    // keep 2 for borders and 1 for cursor
    let width = area.width.max(3) - 3;
    let scroll = input.visual_scroll(width as usize);

    let paragraph = if input.value().is_empty() {
        Paragraph::new(placeholder.to_string()).style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(input.value().to_string()).scroll((0, scroll as u16))
    };
    frame.render_widget(paragraph.block(input_block(title, focused)), area);

    if focused {
        let x = input.visual_cursor().max(scroll) - scroll + 1;
        frame.set_cursor_position((area.x + x as u16, area.y + 1))
    }
}

pub fn button_line(label: &str, focused: bool, enabled: bool) -> Line<'static> {
    let style = if !enabled {
        Style::default().fg(Color::DarkGray)
    } else if focused {
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(Span::styled(format!("[ {label} ]"), style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_engine::{FieldOption, FieldType};
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Drive a control the way the form does: store whatever it emits.
    fn type_into(control: &mut FieldControl, value: &mut Option<FieldValue>, text: &str) {
        for c in text.chars() {
            if let Some(v) = control.handle_key(key(KeyCode::Char(c)), value.as_ref()) {
                *value = Some(v);
            }
        }
    }

    #[test]
    fn every_keystroke_emits() {
        let def = FieldDef::new("f1", FieldType::Text, "Name");
        let mut control = FieldControl::new(def, None);
        let emitted = control.handle_key(key(KeyCode::Char('A')), None);
        assert_eq!(emitted, Some(FieldValue::text("A")));
        let emitted = control.handle_key(key(KeyCode::Char('l')), emitted.as_ref());
        assert_eq!(emitted, Some(FieldValue::text("Al")));
        let emitted = control.handle_key(key(KeyCode::Backspace), emitted.as_ref());
        assert_eq!(emitted, Some(FieldValue::text("A")));
    }

    #[test]
    fn line_input_stops_at_declared_cap() {
        let def = FieldDef::new("f1", FieldType::Tel, "Phone").max_length(10);
        let mut control = FieldControl::new(def, None);
        let mut value = None;
        type_into(&mut control, &mut value, "987654321012");
        assert_eq!(value, Some(FieldValue::text("9876543210")));
        assert_eq!(control.input.value(), "9876543210");
    }

    #[test]
    fn full_input_ignores_typing_mid_text() {
        let def = FieldDef::new("t", FieldType::Text, "Code").max_length(5);
        let stored = FieldValue::text("abcde");
        let mut control = FieldControl::new(def, Some(&stored));
        assert_eq!(control.handle_key(key(KeyCode::Home), Some(&stored)), None);
        assert_eq!(control.input.cursor(), 0);

        assert_eq!(control.handle_key(key(KeyCode::Char('Z')), Some(&stored)), None);
        assert_eq!(control.input.value(), "abcde");
        assert_eq!(control.input.cursor(), 0);

        // deleting still works on a full field
        let emitted = control.handle_key(key(KeyCode::Delete), Some(&stored));
        assert_eq!(emitted, Some(FieldValue::text("bcde")));
    }

    #[test]
    fn full_textarea_ignores_enter() {
        let def = FieldDef::new("bio", FieldType::Textarea, "Bio").max_length(3);
        let stored = FieldValue::text("abc");
        let mut control = FieldControl::new(def, Some(&stored));
        assert_eq!(control.handle_key(key(KeyCode::Enter), Some(&stored)), None);
        assert_eq!(control.input.value(), "abc");
    }

    #[test]
    fn textarea_takes_newlines() {
        let def = FieldDef::new("bio", FieldType::Textarea, "Bio");
        let mut control = FieldControl::new(def, None);
        let mut value = None;
        type_into(&mut control, &mut value, "a");
        value = control.handle_key(key(KeyCode::Enter), value.as_ref()).or(value);
        type_into(&mut control, &mut value, "b");
        assert_eq!(value, Some(FieldValue::text("a\nb")));
    }

    #[test]
    fn radio_selects_under_cursor() {
        let def = FieldDef::new("g", FieldType::Radio, "Gender")
            .options(vec![FieldOption::new("m", "Male"), FieldOption::new("f", "Female")]);
        let mut control = FieldControl::new(def, None);
        assert_eq!(control.handle_key(key(KeyCode::Down), None), None);
        assert_eq!(
            control.handle_key(key(KeyCode::Char(' ')), None),
            Some(FieldValue::text("f"))
        );
        // cursor does not run past the last option
        control.handle_key(key(KeyCode::Down), None);
        assert_eq!(control.cursor, 1);
    }

    #[test]
    fn checkbox_group_toggles_by_tag() {
        let def = FieldDef::new("f2", FieldType::Checkbox, "Pick")
            .options(vec![FieldOption::new("A", "Alpha"), FieldOption::new("B", "Beta")]);
        let mut control = FieldControl::new(def, None);
        let value = control.option_for_tag("f2-B").unwrap();
        let on = control.pick(&value, None);
        assert_eq!(on, Some(FieldValue::List(vec!["B".into()])));
        let off = control.pick(&value, on.as_ref());
        assert_eq!(off, Some(FieldValue::List(vec![])));
        assert_eq!(control.option_for_tag("f2-Z"), None);
    }

    #[test]
    fn toggle_flips_and_ignores_typing() {
        let def = FieldDef::new("ok", FieldType::Checkbox, "I agree");
        let mut control = FieldControl::new(def, None);
        assert_eq!(control.handle_key(key(KeyCode::Char('x')), None), None);
        let on = control.handle_key(key(KeyCode::Char(' ')), None);
        assert_eq!(on, Some(FieldValue::Flag(true)));
        assert_eq!(control.flip(on.as_ref()), Some(FieldValue::Flag(false)));
    }

    #[test]
    fn foreign_shape_reads_as_empty() {
        let def = FieldDef::new("f1", FieldType::Text, "Name");
        let control = FieldControl::new(def, Some(&FieldValue::Flag(true)));
        assert_eq!(control.input.value(), "");
    }

    #[test]
    fn unsupported_fields_are_inert() {
        let def = FieldDef::new("x", FieldType::Other("slider".into()), "Volume");
        let mut control = FieldControl::new(def, None);
        assert!(!control.is_focusable());
        assert_eq!(control.handle_key(key(KeyCode::Char('a')), None), None);
    }

    #[test]
    fn heights_follow_kind() {
        let def = FieldDef::new("d", FieldType::Dropdown, "City")
            .options(vec![FieldOption::new("a", "A"), FieldOption::new("b", "B")]);
        let control = FieldControl::new(def, None);
        assert_eq!(control.height(false, false), 4);
        assert_eq!(control.height(true, true), 7);
    }
}
