use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use form_engine::{ROLL_NUMBER_CAP, SessionIdentity};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Paragraph},
};
use tracing::debug;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler as _;

use super::Component;
use super::field::{at_cap, button_line, draw_line_input, inserts_char};
use crate::{
    action::Action,
    tui::{EventResponse, Frame},
};

pub const ROLL_NUMBER_TAG: &str = "roll-number-input";
pub const NAME_TAG: &str = "name-input";
pub const LOGIN_BUTTON_TAG: &str = "login-button";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    RollNumber,
    Name,
    Button,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::RollNumber => Focus::Name,
            Focus::Name => Focus::Button,
            Focus::Button => Focus::RollNumber,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::RollNumber => Focus::Button,
            Focus::Name => Focus::RollNumber,
            Focus::Button => Focus::Name,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Focus::RollNumber => ROLL_NUMBER_TAG,
            Focus::Name => NAME_TAG,
            Focus::Button => LOGIN_BUTTON_TAG,
        }
    }
}

/// Student login: roll number and name, then one attempt at a time.
pub struct LoginComponent {
    roll_input: Input,
    name_input: Input,
    focus: Focus,
    error: Option<String>,
    loading: bool,
}

impl Default for LoginComponent {
    fn default() -> Self {
        Self {
            roll_input: Input::default(),
            name_input: Input::default(),
            focus: Focus::RollNumber,
            error: None,
            loading: false,
        }
    }
}

impl LoginComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roll_number(&self) -> &str {
        self.roll_input.value()
    }

    pub fn name(&self) -> &str {
        self.name_input.value()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn focused_tag(&self) -> &'static str {
        self.focus.tag()
    }

    /// Move focus to the control with this tag. Unknown tags are ignored.
    pub fn focus_tag(&mut self, tag: &str) -> bool {
        let target = [Focus::RollNumber, Focus::Name, Focus::Button]
            .into_iter()
            .find(|f| f.tag() == tag);
        if let Some(focus) = target {
            self.focus = focus;
        }
        target.is_some()
    }

    /// Activate the control with this tag; only the login button does anything.
    pub fn press(&mut self, tag: &str) -> Option<Action> {
        if tag == LOGIN_BUTTON_TAG {
            self.submit()
        } else {
            None
        }
    }

    fn clear_inputs(&mut self) {
        self.roll_input = Input::default();
        self.name_input = Input::default();
        self.focus = Focus::RollNumber;
        self.error = None;
    }

    fn submit(&mut self) -> Option<Action> {
        if self.loading {
            debug!("login already in flight");
            return None;
        }
        self.error = None;
        match SessionIdentity::new(self.roll_input.value(), self.name_input.value()) {
            Ok(identity) => {
                self.loading = true;
                Some(Action::Login(identity))
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    fn edit(&mut self, key: KeyEvent) {
        let ev = crossterm::event::Event::Key(key);
        match self.focus {
            Focus::RollNumber => {
                if inserts_char(&key) && at_cap(&self.roll_input, ROLL_NUMBER_CAP) {
                    return;
                }
                self.roll_input.handle_event(&ev);
            }
            Focus::Name => {
                self.name_input.handle_event(&ev);
            }
            Focus::Button => {}
        }
    }
}

impl Component for LoginComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        let response = match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                None
            }
            KeyCode::Enter => self.submit().map(EventResponse::Stop),
            KeyCode::Esc if !self.loading => {
                self.clear_inputs();
                None
            }
            _ if self.loading => None,
            _ => {
                self.edit(key);
                None
            }
        };
        Ok(response)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::LoginFailed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            Action::FetchFailed(_) => {
                self.loading = false;
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, body: Rect) -> Result<()> {
        let [_, column, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(50),
            Constraint::Fill(1),
        ])
        .areas(body);
        let [_, header, _, info, roll, _, name, _, button, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(2), // Header
            Constraint::Length(1),
            Constraint::Length(1), // Error
            Constraint::Length(3), // Roll number
            Constraint::Length(1),
            Constraint::Length(3), // Name
            Constraint::Length(1),
            Constraint::Length(1), // Button
            Constraint::Fill(1),
        ])
        .areas(column);

        frame.render_widget(Block::default(), body);
        let title = Paragraph::new(vec![
            Line::from("Student Login").style(Style::default().add_modifier(Modifier::BOLD)),
            Line::from("Enter your roll number and name to continue").style(Style::default().fg(Color::Gray)),
        ])
        .centered();
        frame.render_widget(title, header);

        if let Some(err) = &self.error {
            frame.render_widget(
                Paragraph::new(err.as_str()).centered().style(Style::default().fg(Color::Red)),
                info,
            );
        }

        draw_line_input(
            frame,
            roll,
            &self.roll_input,
            "Roll Number",
            "Enter your roll number (e.g., RA2211003)",
            self.focus == Focus::RollNumber,
        );
        draw_line_input(
            frame,
            name,
            &self.name_input,
            "Name",
            "Enter your name",
            self.focus == Focus::Name,
        );

        let label = if self.loading { "Logging in..." } else { "Login" };
        frame.render_widget(
            Paragraph::new(button_line(label, self.focus == Focus::Button, !self.loading)).centered(),
            button,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(login: &mut LoginComponent, text: &str) {
        for c in text.chars() {
            login.handle_key_events(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn roll_number_is_capped() {
        let mut login = LoginComponent::new();
        type_text(&mut login, "RA22110030000000000012345");
        assert_eq!(login.roll_number(), "RA221100300000000000");
    }

    #[test]
    fn full_roll_number_keeps_text_and_cursor() {
        let mut login = LoginComponent::new();
        type_text(&mut login, "RA221100300000000000");
        login.handle_key_events(key(KeyCode::Home)).unwrap();
        type_text(&mut login, "Z");
        assert_eq!(login.roll_number(), "RA221100300000000000");
        assert_eq!(login.roll_input.cursor(), 0);
    }

    #[test]
    fn login_emits_identity_once() {
        let mut login = LoginComponent::new();
        type_text(&mut login, "RA2211003");
        assert!(login.focus_tag(NAME_TAG));
        type_text(&mut login, "Alice");

        let action = login.press(LOGIN_BUTTON_TAG);
        let expected = SessionIdentity::new("RA2211003", "Alice").unwrap();
        assert_eq!(action, Some(Action::Login(expected)));
        assert!(login.is_loading());

        // a second press while in flight is ignored
        assert_eq!(login.press(LOGIN_BUTTON_TAG), None);
        let r = login.handle_key_events(key(KeyCode::Enter)).unwrap();
        assert_eq!(r, None);
    }

    #[test]
    fn missing_fields_are_reported_inline() {
        let mut login = LoginComponent::new();
        assert_eq!(login.press(LOGIN_BUTTON_TAG), None);
        assert_eq!(login.error(), Some("Roll number is required"));
        assert!(!login.is_loading());
    }

    #[test]
    fn rejection_shows_message_and_allows_retry() {
        let mut login = LoginComponent::new();
        type_text(&mut login, "RA1");
        login.focus_tag(NAME_TAG);
        type_text(&mut login, "Bob");
        assert!(login.press(LOGIN_BUTTON_TAG).is_some());

        login
            .update(Action::LoginFailed("User already exists".into()))
            .unwrap();
        assert_eq!(login.error(), Some("User already exists"));
        assert!(!login.is_loading());
        assert!(login.press(LOGIN_BUTTON_TAG).is_some());
    }

    #[test]
    fn tab_cycles_through_controls() {
        let mut login = LoginComponent::new();
        assert_eq!(login.focused_tag(), ROLL_NUMBER_TAG);
        login.handle_key_events(key(KeyCode::Tab)).unwrap();
        assert_eq!(login.focused_tag(), NAME_TAG);
        login.handle_key_events(key(KeyCode::Tab)).unwrap();
        assert_eq!(login.focused_tag(), LOGIN_BUTTON_TAG);
        login.handle_key_events(key(KeyCode::BackTab)).unwrap();
        assert_eq!(login.focused_tag(), NAME_TAG);
        assert!(!login.focus_tag("nope"));
    }
}
