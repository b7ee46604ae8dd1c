use color_eyre::Result;
use form_api::{FormService, bootstrap};
use form_engine::SessionIdentity;

/// Log in as `roll_number`/`name` and return the form that identity is
/// served, as pretty JSON.
pub async fn fetch_schema_json(service: &dyn FormService, roll_number: &str, name: &str) -> Result<String> {
    let identity = SessionIdentity::new(roll_number, name)?;
    let session = bootstrap(service, identity).await?;
    Ok(serde_json::to_string_pretty(session.schema())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedService, one_page_form};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn prints_the_served_schema() {
        let service = ScriptedService::serving(one_page_form());
        let json = fetch_schema_json(&service, "RA1", "Ann").await.unwrap();
        let back: form_engine::FormSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, one_page_form());
        assert!(json.contains("\"formId\": \"F-7\""));
    }

    #[tokio::test]
    async fn surfaces_login_rejection() {
        let service = ScriptedService::rejecting("User already exists");
        let err = fetch_schema_json(&service, "RA1", "Ann").await.unwrap_err();
        assert_eq!(err.to_string(), "User already exists");
    }

    #[tokio::test]
    async fn rejects_blank_identity_before_calling_out() {
        let service = ScriptedService::without_form();
        let err = fetch_schema_json(&service, "", "Ann").await.unwrap_err();
        assert_eq!(err.to_string(), "Roll number is required");
    }
}
