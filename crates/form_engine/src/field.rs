//! Field kinds: the closed set of controls a schema field can resolve to.
//!
//! Each [`FieldKind`] pairs a renderer strategy (value shape, empty default,
//! input cap, how an [`Edit`] turns into a new value) with a validator
//! strategy (the optional [`FormatRule`]). Supporting a new kind of field means
//! adding a variant here; the validator and the terminal renderer match on it.
//!
//! Nothing in this module touches session state. Applying an edit yields the
//! value the change callback should receive, immediately and unbuffered.
use lazy_static::lazy_static;
use regex::Regex;

use crate::schema::{FieldDef, FieldType};
use crate::value::{FieldValue, ValueShape};

/// Input cap for single-line inputs that declare no `maxLength`.
pub const DEFAULT_LINE_CAP: usize = 100;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref TEL_RE: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}

/// Flavour of a single-line text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    Plain,
    Email,
    Tel,
    Date,
}

/// The control a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// text / email / tel / date
    Line(LineFormat),
    /// textarea
    Area,
    Dropdown,
    Radio,
    /// checkbox with a non-empty option list
    MultiCheck,
    /// checkbox without options
    Toggle,
    Unsupported,
}

/// A type-specific format rule applied by the section validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRule {
    Email,
    Tel,
}

impl FormatRule {
    pub fn matches(self, value: &str) -> bool {
        match self {
            FormatRule::Email => EMAIL_RE.is_match(value),
            FormatRule::Tel => TEL_RE.is_match(value),
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FormatRule::Email => "Please enter a valid email address",
            FormatRule::Tel => "Please enter a valid 10-digit phone number",
        }
    }
}

/// A single user interaction with a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// The full new content of a text input or textarea.
    Text(String),
    /// Pick an option of a dropdown or radio group by value.
    Select(String),
    /// Flip membership of an option value in a multi-checkbox.
    ToggleOption(String),
    /// Flip a single checkbox.
    Flip,
}

impl FieldKind {
    pub fn of(def: &FieldDef) -> Self {
        match &def.field_type {
            FieldType::Text => FieldKind::Line(LineFormat::Plain),
            FieldType::Email => FieldKind::Line(LineFormat::Email),
            FieldType::Tel => FieldKind::Line(LineFormat::Tel),
            FieldType::Date => FieldKind::Line(LineFormat::Date),
            FieldType::Textarea => FieldKind::Area,
            FieldType::Dropdown => FieldKind::Dropdown,
            FieldType::Radio => FieldKind::Radio,
            FieldType::Checkbox if def.option_list().is_empty() => FieldKind::Toggle,
            FieldType::Checkbox => FieldKind::MultiCheck,
            FieldType::Other(_) => FieldKind::Unsupported,
        }
    }

    /// Shape of the values this control produces; `None` for unsupported fields.
    pub fn shape(self) -> Option<ValueShape> {
        match self {
            FieldKind::Line(_) | FieldKind::Area | FieldKind::Dropdown | FieldKind::Radio => {
                Some(ValueShape::Text)
            }
            FieldKind::MultiCheck => Some(ValueShape::List),
            FieldKind::Toggle => Some(ValueShape::Flag),
            FieldKind::Unsupported => None,
        }
    }

    /// What the control shows while the field is unanswered.
    pub fn empty_value(self) -> Option<FieldValue> {
        self.shape().map(|shape| match shape {
            ValueShape::Text => FieldValue::Text(String::new()),
            ValueShape::List => FieldValue::List(Vec::new()),
            ValueShape::Flag => FieldValue::Flag(false),
        })
    }

    /// Input-level character cap. Single-line inputs fall back to
    /// [`DEFAULT_LINE_CAP`]; textareas have no default.
    pub fn input_cap(self, def: &FieldDef) -> Option<usize> {
        match self {
            FieldKind::Line(_) => Some(def.declared_max().unwrap_or(DEFAULT_LINE_CAP)),
            FieldKind::Area => def.declared_max(),
            _ => None,
        }
    }

    pub fn format_rule(self) -> Option<FormatRule> {
        match self {
            FieldKind::Line(LineFormat::Email) => Some(FormatRule::Email),
            FieldKind::Line(LineFormat::Tel) => Some(FormatRule::Tel),
            _ => None,
        }
    }

    pub fn is_textual(self) -> bool {
        matches!(self, FieldKind::Line(_) | FieldKind::Area)
    }

    /// Whether the renderer draws the field label above the control.
    /// Checkboxes carry their label next to the box (single) or skip it.
    pub fn shows_label(self) -> bool {
        !matches!(self, FieldKind::MultiCheck | FieldKind::Toggle)
    }

    /// The current value as this control sees it: values of a foreign shape
    /// (or none at all) read as the empty default.
    pub fn displayed(self, current: Option<&FieldValue>) -> Option<FieldValue> {
        match (self.shape(), current) {
            (Some(shape), Some(v)) if v.shape() == shape => Some(v.clone()),
            _ => self.empty_value(),
        }
    }

    /// Turn an interaction into the value the change callback receives.
    ///
    /// Returns `None` when the edit does not apply to this control (wrong edit
    /// kind, unknown option, unsupported field); nothing is emitted then.
    pub fn apply(self, def: &FieldDef, current: Option<&FieldValue>, edit: Edit) -> Option<FieldValue> {
        match (self, edit) {
            (FieldKind::Line(_) | FieldKind::Area, Edit::Text(text)) => {
                let text = match self.input_cap(def) {
                    Some(cap) if text.chars().count() > cap => text.chars().take(cap).collect(),
                    _ => text,
                };
                Some(FieldValue::Text(text))
            }
            (FieldKind::Dropdown | FieldKind::Radio, Edit::Select(value)) => def
                .option_list()
                .iter()
                .any(|o| o.value == value)
                .then_some(FieldValue::Text(value)),
            (FieldKind::MultiCheck, Edit::ToggleOption(value)) => {
                if !def.option_list().iter().any(|o| o.value == value) {
                    return None;
                }
                let mut items = match current {
                    Some(FieldValue::List(items)) => items.clone(),
                    _ => Vec::new(),
                };
                if items.contains(&value) {
                    items.retain(|v| v != &value);
                } else {
                    items.push(value);
                }
                Some(FieldValue::List(items))
            }
            (FieldKind::Toggle, Edit::Flip) => {
                let checked = matches!(current, Some(FieldValue::Flag(true)));
                Some(FieldValue::Flag(!checked))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldOption;
    use pretty_assertions::assert_eq;

    fn abc_checkbox() -> FieldDef {
        FieldDef::new("f2", FieldType::Checkbox, "Pick").options(vec![
            FieldOption::new("A", "Alpha"),
            FieldOption::new("B", "Beta"),
            FieldOption::new("C", "Gamma"),
        ])
    }

    #[test]
    fn checkbox_kind_depends_on_options() {
        assert_eq!(FieldKind::of(&abc_checkbox()), FieldKind::MultiCheck);
        let single = FieldDef::new("ok", FieldType::Checkbox, "I agree");
        assert_eq!(FieldKind::of(&single), FieldKind::Toggle);
        let empty = FieldDef::new("ok", FieldType::Checkbox, "I agree").options(vec![]);
        assert_eq!(FieldKind::of(&empty), FieldKind::Toggle);
    }

    #[test]
    fn line_inputs_cap_at_declared_or_default() {
        let plain = FieldDef::new("n", FieldType::Text, "Name");
        let kind = FieldKind::of(&plain);
        assert_eq!(kind.input_cap(&plain), Some(DEFAULT_LINE_CAP));

        let long = "x".repeat(150);
        let v = kind.apply(&plain, None, Edit::Text(long)).unwrap();
        assert_eq!(v.char_len(), DEFAULT_LINE_CAP);

        let capped = FieldDef::new("n", FieldType::Tel, "Phone").max_length(10);
        let v = FieldKind::of(&capped)
            .apply(&capped, None, Edit::Text("123456789012".into()))
            .unwrap();
        assert_eq!(v, FieldValue::text("1234567890"));
    }

    #[test]
    fn textarea_has_no_default_cap() {
        let area = FieldDef::new("bio", FieldType::Textarea, "Bio");
        let kind = FieldKind::of(&area);
        assert_eq!(kind.input_cap(&area), None);
        let long = "y".repeat(500);
        let v = kind.apply(&area, None, Edit::Text(long.clone())).unwrap();
        assert_eq!(v, FieldValue::Text(long));
    }

    #[test]
    fn toggling_option_on_and_off_restores_empty_list() {
        let def = abc_checkbox();
        let kind = FieldKind::of(&def);
        let before = kind.displayed(None).unwrap();
        let on = kind.apply(&def, Some(&before), Edit::ToggleOption("B".into())).unwrap();
        assert_eq!(on, FieldValue::List(vec!["B".into()]));
        let off = kind.apply(&def, Some(&on), Edit::ToggleOption("B".into())).unwrap();
        assert_eq!(off, before);
    }

    #[test]
    fn toggling_keeps_other_selections() {
        let def = abc_checkbox();
        let kind = FieldKind::of(&def);
        let cur = FieldValue::List(vec!["A".into(), "C".into()]);
        let next = kind.apply(&def, Some(&cur), Edit::ToggleOption("A".into())).unwrap();
        assert_eq!(next, FieldValue::List(vec!["C".into()]));
        assert_eq!(kind.apply(&def, Some(&cur), Edit::ToggleOption("Z".into())), None);
    }

    #[test]
    fn single_checkbox_inverts() {
        let def = FieldDef::new("ok", FieldType::Checkbox, "I agree");
        let kind = FieldKind::of(&def);
        let on = kind.apply(&def, None, Edit::Flip).unwrap();
        assert_eq!(on, FieldValue::Flag(true));
        assert_eq!(kind.apply(&def, Some(&on), Edit::Flip), Some(FieldValue::Flag(false)));
    }

    #[test]
    fn select_only_accepts_declared_options() {
        let def = FieldDef::new("g", FieldType::Radio, "Gender").options(vec![
            FieldOption::new("m", "Male"),
            FieldOption::new("f", "Female"),
        ]);
        let kind = FieldKind::of(&def);
        assert_eq!(kind.apply(&def, None, Edit::Select("f".into())), Some(FieldValue::text("f")));
        assert_eq!(kind.apply(&def, None, Edit::Select("x".into())), None);
        assert_eq!(kind.apply(&def, None, Edit::Flip), None);
    }

    #[test]
    fn foreign_shapes_display_as_empty_default() {
        let def = FieldDef::new("n", FieldType::Text, "Name");
        let kind = FieldKind::of(&def);
        assert_eq!(kind.displayed(Some(&FieldValue::Flag(true))), Some(FieldValue::text("")));
        let unsupported = FieldDef::new("u", FieldType::Other("file".into()), "Upload");
        assert_eq!(FieldKind::of(&unsupported).displayed(None), None);
    }

    #[test]
    fn format_rules() {
        assert!(FormatRule::Email.matches("a@b.co"));
        assert!(!FormatRule::Email.matches("a@b"));
        assert!(!FormatRule::Email.matches("plainstring"));
        assert!(!FormatRule::Email.matches("a b@c.de"));
        assert!(FormatRule::Tel.matches("9876543210"));
        assert!(!FormatRule::Tel.matches("98765"));
        assert!(!FormatRule::Tel.matches("98765432100"));
        assert!(!FormatRule::Tel.matches("98765-4321"));
    }
}
