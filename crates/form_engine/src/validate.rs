//! Section validation.
//!
//! [`validate_section`] is a pure function: it reads the section definition
//! and the current answers and returns a fresh [`ErrorMap`] for that section.
//! It never merges with earlier results; the session replaces its error map
//! with whatever comes back.
//!
//! Rules run per field in this order, each one overwriting the message of the
//! previous one for the same field:
//!   1. required   (absent or empty string)
//!   2. minLength  (value present and too short)
//!   3. maxLength  (value present and too long)
//!   4. format     (email / tel, value present and not matching)
//!
//! `false` and an empty multi-select list are *not* treated as missing by the
//! required rule, so a required single checkbox passes while unchecked.
use crate::field::FieldKind;
use crate::schema::{FieldDef, Section};
use crate::value::{ErrorMap, FieldValue, ValueMap};

/// Validate every field of `section` against `values`.
pub fn validate_section(section: &Section, values: &ValueMap) -> ErrorMap {
    let mut errors = ErrorMap::new();
    for field in &section.fields {
        if let Some(msg) = check_field(field, values.get(&field.field_id)) {
            errors.insert(field.field_id.clone(), msg);
        }
    }
    errors
}

/// Convenience: `true` if the section produces no errors.
pub fn section_is_valid(section: &Section, values: &ValueMap) -> bool {
    validate_section(section, values).is_empty()
}

/// The message a single field ends up with, if any.
pub fn check_field(field: &FieldDef, value: Option<&FieldValue>) -> Option<String> {
    let mut error = None;

    let missing = match value {
        None => true,
        Some(FieldValue::Text(s)) => s.is_empty(),
        Some(_) => false,
    };
    if field.required && missing {
        error = Some(format!("{} is required", field.label));
    }

    let Some(value) = value.filter(|v| v.is_present()) else {
        return error;
    };

    if let Some(min) = field.declared_min() {
        if value.char_len() < min {
            error = Some(format!("{} must be at least {} characters", field.label, min));
        }
    }

    if let Some(max) = field.declared_max() {
        if value.char_len() > max {
            error = Some(format!("{} must be at most {} characters", field.label, max));
        }
    }

    if let Some(rule) = FieldKind::of(field).format_rule() {
        if !rule.matches(&value.stringify()) {
            error = Some(rule.message().to_string());
        }
    }

    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldOption, FieldType};
    use pretty_assertions::assert_eq;

    fn one(field: FieldDef) -> Section {
        Section::new("S", vec![field])
    }

    fn with(id: &str, v: impl Into<FieldValue>) -> ValueMap {
        let mut m = ValueMap::new();
        m.insert(id.to_string(), v.into());
        m
    }

    #[test]
    fn required_flags_absent_and_empty() {
        let s = one(FieldDef::new("f1", FieldType::Text, "Name").required());
        let errs = validate_section(&s, &ValueMap::new());
        assert_eq!(errs.get("f1").map(String::as_str), Some("Name is required"));
        assert!(validate_section(&s, &with("f1", "")).contains_key("f1"));
        assert!(section_is_valid(&s, &with("f1", " ")));
        assert!(section_is_valid(&s, &with("f1", "Alice")));
    }

    #[test]
    fn optional_empty_field_passes_everything() {
        let s = one(
            FieldDef::new("e", FieldType::Email, "Email")
                .min_length(5)
                .max_length(8),
        );
        assert!(section_is_valid(&s, &ValueMap::new()));
        assert!(section_is_valid(&s, &with("e", "")));
    }

    #[test]
    fn length_bounds_are_inclusive() {
        let s = one(FieldDef::new("f", FieldType::Text, "Code").min_length(3).max_length(5));
        for (input, ok) in [("ab", false), ("abc", true), ("abcd", true), ("abcde", true), ("abcdef", false)] {
            assert_eq!(section_is_valid(&s, &with("f", input)), ok, "input {input:?}");
        }
        assert_eq!(
            validate_section(&s, &with("f", "ab")).get("f").unwrap(),
            "Code must be at least 3 characters"
        );
        assert_eq!(
            validate_section(&s, &with("f", "abcdef")).get("f").unwrap(),
            "Code must be at most 5 characters"
        );
    }

    #[test]
    fn email_format() {
        let s = one(FieldDef::new("e", FieldType::Email, "Email"));
        assert!(section_is_valid(&s, &with("e", "a@b.co")));
        for bad in ["a@b", "plainstring"] {
            assert_eq!(
                validate_section(&s, &with("e", bad)).get("e").map(String::as_str),
                Some("Please enter a valid email address")
            );
        }
    }

    #[test]
    fn tel_format() {
        let s = one(FieldDef::new("t", FieldType::Tel, "Phone"));
        assert!(section_is_valid(&s, &with("t", "9876543210")));
        for bad in ["98765", "98765432100"] {
            assert_eq!(
                validate_section(&s, &with("t", bad)).get("t").map(String::as_str),
                Some("Please enter a valid 10-digit phone number")
            );
        }
    }

    #[test]
    fn later_rules_overwrite_earlier_messages() {
        let s = one(FieldDef::new("t", FieldType::Tel, "Phone").min_length(10));
        // too short *and* malformed: the format message wins
        assert_eq!(
            validate_section(&s, &with("t", "123")).get("t").unwrap(),
            "Please enter a valid 10-digit phone number"
        );
    }

    #[test]
    fn required_exempts_false_and_empty_list() {
        let toggle = one(FieldDef::new("ok", FieldType::Checkbox, "Terms").required());
        assert!(section_is_valid(&toggle, &with("ok", false)));
        assert!(!section_is_valid(&toggle, &ValueMap::new()));

        let multi = one(
            FieldDef::new("m", FieldType::Checkbox, "Langs")
                .required()
                .options(vec![FieldOption::new("rs", "Rust")]),
        );
        assert!(section_is_valid(&multi, &with("m", Vec::<String>::new())));
    }

    #[test]
    fn list_length_uses_joined_string() {
        let s = one(
            FieldDef::new("m", FieldType::Checkbox, "Langs")
                .min_length(1)
                .options(vec![FieldOption::new("rs", "Rust")]),
        );
        // empty list is "present" and stringifies to "", so it is too short
        assert!(!section_is_valid(&s, &with("m", Vec::<String>::new())));
        assert!(section_is_valid(&s, &with("m", vec!["rs".to_string()])));
    }

    #[test]
    fn only_fields_of_the_section_are_reported() {
        let s = Section::new(
            "S",
            vec![
                FieldDef::new("a", FieldType::Text, "A").required(),
                FieldDef::new("b", FieldType::Text, "B"),
            ],
        );
        let mut values = with("zzz", "leftover");
        values.insert("b".into(), FieldValue::text("fine"));
        let errs = validate_section(&s, &values);
        assert_eq!(errs.keys().collect::<Vec<_>>(), vec!["a"]);
    }
}
