use form_engine::{FormSession, SessionIdentity};
use tracing::{error, info, warn};

use crate::client::FormService;
use crate::error::{ApiError, BootstrapError};

/// Authenticate, fetch the schema and start a session.
///
/// Each call is attempted exactly once. A session is only ever built from a
/// complete schema; anything short of that is reported as
/// [`BootstrapError::SchemaFetch`].
pub async fn bootstrap<S>(service: &S, identity: SessionIdentity) -> Result<FormSession, BootstrapError>
where
    S: FormService + ?Sized,
{
    bootstrap_with(service, identity, || {}).await
}

/// Like [`bootstrap`], calling `on_authenticated` once the identity has been
/// accepted and before the schema is requested.
pub async fn bootstrap_with<S, F>(
    service: &S,
    identity: SessionIdentity,
    on_authenticated: F,
) -> Result<FormSession, BootstrapError>
where
    S: FormService + ?Sized,
    F: FnOnce() + Send,
{
    info!(roll_number = identity.roll_number(), "logging in");
    if let Err(e) = service.create_user(&identity).await {
        warn!("login failed: {e}");
        let message = match e {
            ApiError::Rejected(message) => message,
            other => other.to_string(),
        };
        return Err(BootstrapError::Authentication(message));
    }
    on_authenticated();

    let schema = service
        .fetch_form(identity.roll_number())
        .await
        .map_err(|e| {
            error!("error fetching form: {e}");
            BootstrapError::SchemaFetch
        })?;
    info!(form_id = %schema.form_id, version = %schema.version, "form schema loaded");

    FormSession::new(schema, identity).map_err(|e| {
        error!("unusable form schema: {e}");
        BootstrapError::from(e)
    })
}
