mod bootstrap;
mod client;
mod error;

pub use crate::bootstrap::{bootstrap, bootstrap_with};
pub use crate::client::{
    DEFAULT_BASE_URL, FormService, HttpFormService, LOGIN_FALLBACK_MESSAGE, interpret_create_user,
    interpret_form,
};
pub use crate::error::{ApiError, BootstrapError};
