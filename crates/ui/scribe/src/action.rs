use form_engine::{FormSession, SessionIdentity};
use strum::Display;

#[derive(Debug, Clone, PartialEq, Display)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    /// Login view asks for a session for this identity.
    Login(SessionIdentity),
    /// The identity was accepted; the schema is on its way.
    Authenticated,
    /// Identity creation failed; shown inline on the login view.
    LoginFailed(String),
    /// Bootstrap finished with a ready session.
    FormLoaded(Box<FormSession>),
    /// Schema could not be loaded; the user is sent back to log in.
    FetchFailed(String),
    /// Answers were handed to the submission sinks.
    Submitted,
    ClosePopup,
}
