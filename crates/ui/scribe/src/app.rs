use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use form_api::{FormService, bootstrap_with};
use form_engine::{FileSink, LogSink, SessionIdentity, SinkChain};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::{
    action::Action,
    components::{
        Component,
        alert::AlertPopup,
        form::FormComponent,
        login::LoginComponent,
    },
    config::Config,
    tui::{Event, EventResponse, Frame, Tui},
};

pub const SUBMITTED_MESSAGE: &str = "Form submitted successfully!";

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Login,
    /// Identity accepted, waiting for the schema.
    Loading,
    Form,
}

pub struct App {
    config: Config,
    service: Arc<dyn FormService>,
    login: LoginComponent,
    form: Option<FormComponent>,
    popup: Option<AlertPopup>,
    screen: Screen,
    spinner: usize,
    should_quit: bool,
    should_suspend: bool,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
}

impl App {
    pub fn new(config: Config, service: Arc<dyn FormService>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            config,
            service,
            login: LoginComponent::new(),
            form: None,
            popup: None,
            screen: Screen::Login,
            spinner: 0,
            should_quit: false,
            should_suspend: false,
            action_tx,
            action_rx,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(self.config.tick_rate)
            .frame_rate(self.config.frame_rate);
        tui.enter()?;
        info!(base_url = %self.config.api.base_url, "terminal ui started");

        loop {
            if let Some(e) = tui.next().await {
                self.handle_event(e)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                if action != Action::Tick && action != Action::Render {
                    debug!("{action}");
                }
                match action {
                    Action::Render => self.render(&mut tui)?,
                    Action::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, w, h))?;
                        self.render(&mut tui)?;
                    }
                    Action::ClearScreen => tui.terminal.clear()?,
                    action => self.update(action)?,
                }
            }

            if self.should_suspend {
                tui.suspend()?;
                self.action_tx.send(Action::Resume)?;
                self.action_tx.send(Action::ClearScreen)?;
                tui.enter()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    /// Route a terminal event: global keys first, then the popup, then the
    /// active screen.
    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Tick => self.action_tx.send(Action::Tick)?,
            Event::Render => self.action_tx.send(Action::Render)?,
            Event::Resize(x, y) => self.action_tx.send(Action::Resize(x, y))?,
            Event::Key(key) if key.modifiers.contains(KeyModifiers::CONTROL) => match key.code {
                KeyCode::Char('c') => self.action_tx.send(Action::Quit)?,
                KeyCode::Char('z') => self.action_tx.send(Action::Suspend)?,
                _ => self.dispatch(event)?,
            },
            _ => self.dispatch(event)?,
        }
        Ok(())
    }

    fn dispatch(&mut self, event: Event) -> Result<()> {
        let response = if let Some(popup) = self.popup.as_mut() {
            popup.handle_events(event)?
        } else {
            match self.screen {
                Screen::Login => self.login.handle_events(event)?,
                Screen::Form => match self.form.as_mut() {
                    Some(form) => form.handle_events(event)?,
                    None => None,
                },
                Screen::Loading => None,
            }
        };
        if let Some(EventResponse::Continue(action) | EventResponse::Stop(action)) = response {
            self.action_tx.send(action)?;
        }
        Ok(())
    }

    pub fn update(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Tick => self.spinner = self.spinner.wrapping_add(1),
            Action::Quit => self.should_quit = true,
            Action::Suspend => self.should_suspend = true,
            Action::Resume => self.should_suspend = false,
            Action::Login(identity) => {
                if self.screen == Screen::Login {
                    self.start_bootstrap(identity);
                }
            }
            Action::Authenticated => self.screen = Screen::Loading,
            Action::LoginFailed(_) => {
                self.screen = Screen::Login;
                self.login.update(action)?;
            }
            Action::FormLoaded(session) => {
                self.form = Some(FormComponent::new(*session, self.sinks()));
                self.screen = Screen::Form;
            }
            Action::FetchFailed(message) => {
                self.popup = Some(AlertPopup::error(message.clone()));
                self.form = None;
                self.screen = Screen::Login;
                self.login.update(Action::FetchFailed(message))?;
            }
            Action::Submitted => self.popup = Some(AlertPopup::notice(SUBMITTED_MESSAGE)),
            Action::ClosePopup => self.popup = None,
            _ => {}
        }
        Ok(())
    }

    fn sinks(&self) -> SinkChain {
        let chain = SinkChain::new().with(LogSink);
        match &self.config.submission.output {
            Some(path) => chain.with(FileSink::new(path.clone())),
            None => chain,
        }
    }

    /// Run the login and schema fetch off the UI loop; the outcome comes back
    /// as actions.
    fn start_bootstrap(&self, identity: SessionIdentity) {
        let service = Arc::clone(&self.service);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let authenticated = tx.clone();
            let result = bootstrap_with(service.as_ref(), identity, move || {
                let _ = authenticated.send(Action::Authenticated);
            })
            .await;
            let action = match result {
                Ok(session) => Action::FormLoaded(Box::new(session)),
                Err(e) if e.is_authentication() => Action::LoginFailed(e.to_string()),
                Err(e) => Action::FetchFailed(e.to_string()),
            };
            if tx.send(action).is_err() {
                error!("ui went away before the form session was ready");
            }
        });
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        let mut result = Ok(());
        tui.draw(|frame| {
            let area = frame.area();
            result = self.draw(frame, area);
        })?;
        result
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        match self.screen {
            Screen::Login => self.login.draw(frame, area)?,
            Screen::Loading => {
                let [_, middle, _] =
                    Layout::vertical([Constraint::Fill(1), Constraint::Length(2), Constraint::Fill(1)]).areas(area);
                let spinner = SPINNER[self.spinner % SPINNER.len()];
                frame.render_widget(
                    Paragraph::new(vec![
                        Line::from(spinner).style(Style::default().fg(Color::Cyan)),
                        Line::from("Loading form...").style(Style::default().fg(Color::Gray)),
                    ])
                    .centered(),
                    middle,
                );
            }
            Screen::Form => {
                if let Some(form) = self.form.as_mut() {
                    form.draw(frame, area)?;
                }
            }
        }
        if let Some(popup) = self.popup.as_mut() {
            popup.draw(frame, area)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::alert::AlertKind;
    use crate::components::login::{LOGIN_BUTTON_TAG, NAME_TAG};
    use crate::testing::{ScriptedService, one_page_form};
    use crossterm::event::KeyEvent;
    use pretty_assertions::assert_eq;

    fn app(service: ScriptedService) -> App {
        App::new(Config::default(), Arc::new(service))
    }

    fn fill_login(app: &mut App) {
        for c in "RA2211003".chars() {
            app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
                .unwrap();
        }
        app.login.focus_tag(NAME_TAG);
        for c in "Alice".chars() {
            app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
                .unwrap();
        }
    }

    /// Apply actions from the channel until `done` says stop.
    async fn pump(app: &mut App, done: impl Fn(&App) -> bool) {
        while !done(app) {
            let action = app.action_rx.recv().await.expect("channel open");
            app.update(action).unwrap();
        }
    }

    #[tokio::test]
    async fn login_then_form() {
        let mut app = app(ScriptedService::serving(one_page_form()));
        fill_login(&mut app);
        let login = app.login.press(LOGIN_BUTTON_TAG).unwrap();
        app.update(login).unwrap();

        pump(&mut app, |a| a.screen() == Screen::Form).await;
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.session().identity().roll_number(), "RA2211003");
        assert_eq!(form.session().schema().form_id, "F-7");
    }

    #[tokio::test]
    async fn rejected_login_stays_on_login_view() {
        let mut app = app(ScriptedService::rejecting("Invalid roll number"));
        fill_login(&mut app);
        let login = app.login.press(LOGIN_BUTTON_TAG).unwrap();
        app.update(login).unwrap();

        pump(&mut app, |a| !a.login.is_loading()).await;
        assert_eq!(app.screen(), Screen::Login);
        assert_eq!(app.login.error(), Some("Invalid roll number"));
        assert!(app.popup.is_none());
    }

    #[tokio::test]
    async fn failed_fetch_alerts_and_returns_to_login() {
        let mut app = app(ScriptedService::without_form());
        fill_login(&mut app);
        let login = app.login.press(LOGIN_BUTTON_TAG).unwrap();
        app.update(login).unwrap();

        pump(&mut app, |a| a.popup.is_some()).await;
        assert_eq!(app.screen(), Screen::Login);
        assert!(app.form.is_none());
        assert!(!app.login.is_loading());
        let popup = app.popup.as_ref().unwrap();
        assert_eq!(popup.kind(), AlertKind::Error);
        assert_eq!(popup.message(), "Failed to fetch form data. Please try again.");
    }

    #[test]
    fn popup_swallows_keys_until_closed() {
        let mut app = app(ScriptedService::without_form());
        app.update(Action::Submitted).unwrap();
        assert_eq!(app.popup.as_ref().unwrap().message(), SUBMITTED_MESSAGE);

        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('R'), KeyModifiers::NONE)))
            .unwrap();
        assert_eq!(app.login.roll_number(), "");

        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
            .unwrap();
        let swallowed = app.action_rx.try_recv().unwrap();
        assert_eq!(swallowed, Action::Render);
        let close = app.action_rx.try_recv().unwrap();
        assert_eq!(close, Action::ClosePopup);
        app.update(close).unwrap();
        assert!(app.popup.is_none());
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut app = app(ScriptedService::without_form());
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)))
            .unwrap();
        let action = app.action_rx.try_recv().unwrap();
        app.update(action).unwrap();
        assert!(app.should_quit);
    }
}
