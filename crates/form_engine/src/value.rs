//! Runtime value model of a form session.
//!
//! Values come in exactly three shapes. A field's shape is fixed by its type
//! (see [`crate::field::FieldKind::shape`]); the session refuses values of any
//! other shape for that field.
//!
//! Keys only appear in a [`ValueMap`] once a field has been touched. A missing
//! key means "unanswered", which is not the same as an explicit empty string.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Answers keyed by `fieldId`.
pub type ValueMap = BTreeMap<String, FieldValue>;

/// Validation messages keyed by `fieldId`. A key's presence means the field
/// currently fails validation.
pub type ErrorMap = BTreeMap<String, String>;

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text inputs, textareas, dropdowns and radio groups.
    Text(String),
    /// Multi-checkbox selections. Order carries no meaning.
    List(Vec<String>),
    /// Single checkbox.
    Flag(bool),
}

/// The shape of a [`FieldValue`], without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Text,
    List,
    Flag,
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueShape::Text => f.write_str("string"),
            ValueShape::List => f.write_str("list of strings"),
            ValueShape::Flag => f.write_str("boolean"),
        }
    }
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn shape(&self) -> ValueShape {
        match self {
            FieldValue::Text(_) => ValueShape::Text,
            FieldValue::List(_) => ValueShape::List,
            FieldValue::Flag(_) => ValueShape::Flag,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether the value counts as "given" for the length and format rules.
    ///
    /// Strings count when non-empty, lists always count (even empty ones) and
    /// flags count when set.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::List(_) => true,
            FieldValue::Flag(b) => *b,
        }
    }

    /// String rendition used for length and format checks.
    pub fn stringify(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(","),
            FieldValue::Flag(b) => b.to_string(),
        }
    }

    /// Length of [`Self::stringify`] in characters.
    pub fn char_len(&self) -> usize {
        match self {
            FieldValue::Text(s) => s.chars().count(),
            other => other.stringify().chars().count(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn presence_follows_shape() {
        assert!(!FieldValue::text("").is_present());
        assert!(FieldValue::text("x").is_present());
        assert!(FieldValue::List(vec![]).is_present());
        assert!(!FieldValue::Flag(false).is_present());
        assert!(FieldValue::Flag(true).is_present());
    }

    #[test]
    fn stringify_joins_lists_with_commas() {
        let v = FieldValue::List(vec!["a".into(), "bc".into()]);
        assert_eq!(v.stringify(), "a,bc");
        assert_eq!(v.char_len(), 4);
        assert_eq!(FieldValue::Flag(true).char_len(), 4);
        assert_eq!(FieldValue::text("héllo").char_len(), 5);
    }

    #[test]
    fn serializes_as_bare_json_values() {
        let mut map = ValueMap::new();
        map.insert("a".into(), FieldValue::text("x"));
        map.insert("b".into(), FieldValue::List(vec!["1".into()]));
        map.insert("c".into(), FieldValue::Flag(true));
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json, serde_json::json!({ "a": "x", "b": ["1"], "c": true }));
    }
}
