//! Scripted form service shared by the UI tests.
use async_trait::async_trait;
use form_api::{ApiError, FormService};
use form_engine::{FieldDef, FieldType, FormSchema, Section, SessionIdentity};
use reqwest::StatusCode;

pub struct ScriptedService {
    pub reject_login: Option<&'static str>,
    pub form: Option<FormSchema>,
}

impl ScriptedService {
    pub fn serving(form: FormSchema) -> Self {
        Self {
            reject_login: None,
            form: Some(form),
        }
    }

    pub fn rejecting(message: &'static str) -> Self {
        Self {
            reject_login: Some(message),
            form: None,
        }
    }

    pub fn without_form() -> Self {
        Self {
            reject_login: None,
            form: None,
        }
    }
}

#[async_trait]
impl FormService for ScriptedService {
    async fn create_user(&self, _identity: &SessionIdentity) -> Result<(), ApiError> {
        match self.reject_login {
            Some(msg) => Err(ApiError::Rejected(msg.to_string())),
            None => Ok(()),
        }
    }

    async fn fetch_form(&self, _roll_number: &str) -> Result<FormSchema, ApiError> {
        self.form.clone().ok_or(ApiError::Status(StatusCode::NOT_FOUND))
    }
}

pub fn one_page_form() -> FormSchema {
    FormSchema::new(
        "F-7",
        "Feedback",
        "1",
        vec![Section::new(
            "Feedback",
            vec![FieldDef::new("c", FieldType::Textarea, "Comments")],
        )],
    )
}
