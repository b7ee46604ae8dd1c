//! Form schema definition as delivered by the remote form service.
//!
//! The schema is purely declarative: sections group fields, fields carry their
//! type, constraints and (for choice types) an option list. Nothing in here
//! mutates after the schema has been fetched; runtime values live in
//! [`crate::value`] and the session in [`crate::session`].
//!
//! Wire names follow the service's camelCase JSON. The builder setters exist
//! for code-defined schemas (tests, demos) and mirror what the JSON can carry.
//!
//! ```ignore
//! use form_engine::schema::{FieldDef, FieldType, FormSchema, Section};
//!
//! let schema = FormSchema::new("F-1", "Student Survey", "1.0", vec![
//!     Section::new("About you", vec![
//!         FieldDef::new("f1", FieldType::Text, "Name").required(),
//!         FieldDef::new("f2", FieldType::Email, "Email").placeholder("you@example.com"),
//!     ])
//!     .description("Basic details"),
//! ]);
//! ```
use std::fmt;

use serde::{Deserialize, Serialize};

/// Envelope returned by the schema-fetch call: `{ "message"?: ..., "form": {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub form: FormSchema,
}

/// Declarative schema for a multi-section form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub form_id: String,
    pub form_title: String,
    pub version: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl FormSchema {
    pub fn new(
        form_id: impl Into<String>,
        form_title: impl Into<String>,
        version: impl Into<String>,
        sections: Vec<Section>,
    ) -> Self {
        Self {
            form_id: form_id.into(),
            form_title: form_title.into(),
            version: version.into(),
            sections,
        }
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Find a field by its id across all sections.
    pub fn field(&self, field_id: &str) -> Option<&FieldDef> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.field_id == field_id)
    }
}

/// A named, ordered group of fields shown as one page of the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<u32>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl Section {
    pub fn new(title: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            section_id: None,
            title: title.into(),
            description: String::new(),
            fields,
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

/// Field type as declared by the schema.
///
/// Unknown type strings are kept in `Other` so an unexpected schema still
/// decodes; the renderer shows a placeholder for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Date,
    Textarea,
    Dropdown,
    Radio,
    Checkbox,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Date => "date",
            FieldType::Textarea => "textarea",
            FieldType::Dropdown => "dropdown",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Other(s) => s,
        }
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => FieldType::Text,
            "email" => FieldType::Email,
            "tel" => FieldType::Tel,
            "date" => FieldType::Date,
            "textarea" => FieldType::Textarea,
            "dropdown" => FieldType::Dropdown,
            "radio" => FieldType::Radio,
            "checkbox" => FieldType::Checkbox,
            _ => FieldType::Other(s),
        }
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option of a dropdown, radio group or multi-checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_test_id: Option<String>,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            data_test_id: None,
        }
    }
}

/// Declarative description of a single form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub field_id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_test_id: Option<String>,
}

impl FieldDef {
    pub fn new(field_id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            field_type,
            label: label.into(),
            placeholder: None,
            required: false,
            min_length: None,
            max_length: None,
            options: None,
            data_test_id: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn test_id(mut self, tag: impl Into<String>) -> Self {
        self.data_test_id = Some(tag.into());
        self
    }

    /// Declared minimum length; `0` counts as undeclared.
    pub fn declared_min(&self) -> Option<usize> {
        self.min_length.filter(|n| *n > 0)
    }

    /// Declared maximum length; `0` counts as undeclared.
    pub fn declared_max(&self) -> Option<usize> {
        self.max_length.filter(|n| *n > 0)
    }

    /// Option list, empty when none was declared.
    pub fn option_list(&self) -> &[FieldOption] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// Stable identification tag for this field's control.
    pub fn control_tag(&self) -> &str {
        self.data_test_id.as_deref().unwrap_or(&self.field_id)
    }

    /// Stable identification tag for one of this field's options.
    pub fn option_tag(&self, option: &FieldOption) -> String {
        option
            .data_test_id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.field_id, option.value))
    }
}
