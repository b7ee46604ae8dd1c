//! The form session: one explicit object owning everything that changes while
//! a user fills in a form.
//!
//! State lives here and nowhere else:
//!   * the (read-only) schema and the login identity
//!   * the active section index
//!   * the value map (all sections) and the error map (active section only)
//!
//! Mutation is only possible through four transitions: [`FormSession::set_value`],
//! [`FormSession::advance`], [`FormSession::retreat`] and [`FormSession::submit`].
//! Clearing one error on edit is deliberately separate from the wholesale
//! recomputation the validator performs on navigation.
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::field::FieldKind;
use crate::identity::SessionIdentity;
use crate::schema::{FieldDef, FormSchema, Section};
use crate::submission::{Submission, SubmissionSink};
use crate::validate::validate_section;
use crate::value::{ErrorMap, FieldValue, ValueMap, ValueShape};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("form schema has no sections")]
    EmptySchema,
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("field {0} has an unsupported type and takes no value")]
    UnsupportedField(String),
    #[error("field {field_id} takes a {expected} value, got a {got}")]
    ShapeMismatch {
        field_id: String,
        expected: ValueShape,
        got: ValueShape,
    },
    #[error("already at the last section")]
    AtLastSection,
    #[error("already at the first section")]
    AtFirstSection,
    #[error("submit is only possible from the last section")]
    NotAtLastSection,
    #[error("section {section} has {count} invalid field(s)")]
    Invalid { section: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Working state of one user filling in one form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSession {
    schema: FormSchema,
    identity: SessionIdentity,
    current: usize,
    values: ValueMap,
    errors: ErrorMap,
}

impl FormSession {
    /// Start a session at the first section with empty value and error maps.
    pub fn new(schema: FormSchema, identity: SessionIdentity) -> Result<Self> {
        if schema.sections.is_empty() {
            return Err(SessionError::EmptySchema);
        }
        info!(
            form_id = %schema.form_id,
            sections = schema.sections.len(),
            "form session started"
        );
        Ok(Self {
            schema,
            identity,
            current: 0,
            values: ValueMap::new(),
            errors: ErrorMap::new(),
        })
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn section_count(&self) -> usize {
        self.schema.sections.len()
    }

    pub fn current_section(&self) -> &Section {
        &self.schema.sections[self.current]
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.section_count()
    }

    /// 1-based position for "Section i of N".
    pub fn progress(&self) -> (usize, usize) {
        (self.current + 1, self.section_count())
    }

    /// Share of sections reached, in `(0.0, 1.0]`.
    pub fn progress_ratio(&self) -> f64 {
        (self.current + 1) as f64 / self.section_count() as f64
    }

    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    pub fn value(&self, field_id: &str) -> Option<&FieldValue> {
        self.values.get(field_id)
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn error(&self, field_id: &str) -> Option<&str> {
        self.errors.get(field_id).map(String::as_str)
    }

    fn field(&self, field_id: &str) -> Result<&FieldDef> {
        self.schema
            .field(field_id)
            .ok_or_else(|| SessionError::UnknownField(field_id.to_string()))
    }

    /// Record a new value for a field and drop that field's error, if any.
    ///
    /// Legal in any state. The value must have the shape the field's type
    /// dictates; anything else is rejected and nothing changes.
    pub fn set_value(&mut self, field_id: &str, value: FieldValue) -> Result<()> {
        let field = self.field(field_id)?;
        let expected = FieldKind::of(field)
            .shape()
            .ok_or_else(|| SessionError::UnsupportedField(field_id.to_string()))?;
        if value.shape() != expected {
            return Err(SessionError::ShapeMismatch {
                field_id: field_id.to_string(),
                expected,
                got: value.shape(),
            });
        }
        debug!(field_id, "value changed");
        self.values.insert(field_id.to_string(), value);
        self.errors.remove(field_id);
        Ok(())
    }

    /// Validate the active section and replace the error map with the result.
    fn revalidate(&mut self) -> bool {
        self.errors = validate_section(&self.schema.sections[self.current], &self.values);
        if !self.errors.is_empty() {
            warn!(
                section = self.current,
                invalid = self.errors.len(),
                "section failed validation"
            );
        }
        self.errors.is_empty()
    }

    fn invalid(&self) -> SessionError {
        SessionError::Invalid {
            section: self.current,
            count: self.errors.len(),
        }
    }

    /// Move to the next section if the active one validates.
    ///
    /// Returns the new index. On failure the index is unchanged and the
    /// section's errors are visible through [`Self::errors`].
    pub fn advance(&mut self) -> Result<usize> {
        if self.is_last() {
            return Err(SessionError::AtLastSection);
        }
        if !self.revalidate() {
            return Err(self.invalid());
        }
        self.current += 1;
        info!(section = self.current, "advanced to next section");
        Ok(self.current)
    }

    /// Move back one section without validating. Values are kept; the error
    /// map is dropped since it belonged to the section being left.
    pub fn retreat(&mut self) -> Result<usize> {
        if self.is_first() {
            return Err(SessionError::AtFirstSection);
        }
        self.current -= 1;
        self.errors.clear();
        info!(section = self.current, "returned to previous section");
        Ok(self.current)
    }

    /// Validate the last section and, if it passes, hand the assembled
    /// payload to `sink`.
    pub fn submit(&mut self, sink: &dyn SubmissionSink) -> Result<Submission> {
        if !self.is_last() {
            return Err(SessionError::NotAtLastSection);
        }
        if !self.revalidate() {
            return Err(self.invalid());
        }
        let submission = Submission {
            identity: self.identity.clone(),
            form_values: self.values.clone(),
        };
        info!(form_id = %self.schema.form_id, "submitting form");
        sink.submit(&submission);
        Ok(submission)
    }
}
