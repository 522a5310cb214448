//! Subject-facing custom field form.
//!
//! Turns active field definitions (plus the options of select fields and the
//! legacy settings slots) into a flat list of controls the template renders
//! without any type logic of its own.

use std::collections::HashMap;

use crate::models::custom_field::{CustomField, FieldType};
use crate::models::custom_field_option::FieldOption;
use crate::models::setting::LegacyCustomField;

pub const TEXT_MAX_LEN: usize = 255;
pub const TEXTAREA_MAX_LEN: usize = 500;
pub const TEXTAREA_ROWS: usize = 3;
pub const LEGACY_MAX_LEN: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Text,
    Textarea,
    Select,
}

/// What a submitted control writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlTarget {
    Field(i64),
    Legacy(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormControl {
    pub target: ControlTarget,
    pub name: String,
    pub label: String,
    pub required: bool,
    pub kind: ControlKind,
    pub max_len: usize,
    pub rows: usize,
    pub value: String,
    pub choices: Vec<Choice>,
}

impl FormControl {
    pub fn is_text(&self) -> bool {
        self.kind == ControlKind::Text
    }

    pub fn is_textarea(&self) -> bool {
        self.kind == ControlKind::Textarea
    }

    pub fn is_select(&self) -> bool {
        self.kind == ControlKind::Select
    }
}

/// Current values of one subject, keyed by field id and legacy slot.
#[derive(Debug, Clone, Default)]
pub struct SubjectValues {
    pub fields: HashMap<i64, String>,
    pub legacy: HashMap<usize, String>,
}

impl SubjectValues {
    /// Read values back out of a posted form, keyed by control name.
    pub fn from_submission(controls: &[FormControl], posted: &HashMap<String, String>) -> Self {
        let mut values = SubjectValues::default();
        for control in controls {
            let value = posted.get(&control.name).map(|v| v.trim().to_string()).unwrap_or_default();
            match control.target {
                ControlTarget::Field(id) => values.fields.insert(id, value),
                ControlTarget::Legacy(slot) => values.legacy.insert(slot, value),
            };
        }
        values
    }
}

pub fn field_control_name(field_id: i64) -> String {
    format!("custom_field_{field_id}")
}

pub fn legacy_control_name(slot: usize) -> String {
    format!("legacy_custom_field_{slot}")
}

/// Build controls for every active field in sort order, then the enabled
/// legacy slots. Select fields without options are left out.
pub fn build_controls(
    fields: &[CustomField],
    options: &[FieldOption],
    legacy: &[LegacyCustomField],
    values: &SubjectValues,
) -> Vec<FormControl> {
    let mut active: Vec<&CustomField> = fields.iter().filter(|f| f.active).collect();
    active.sort_by_key(|f| (f.sort_order, f.id));

    let mut controls = Vec::with_capacity(active.len() + legacy.len());
    for field in active {
        let value = values.fields.get(&field.id).cloned().unwrap_or_default();
        let base = FormControl {
            target: ControlTarget::Field(field.id),
            name: field_control_name(field.id),
            label: field.label.clone(),
            required: field.required,
            kind: ControlKind::Text,
            max_len: TEXT_MAX_LEN,
            rows: 1,
            value,
            choices: Vec::new(),
        };
        let control = match field.field_type {
            FieldType::Text => base,
            FieldType::Textarea => FormControl {
                kind: ControlKind::Textarea,
                max_len: TEXTAREA_MAX_LEN,
                rows: TEXTAREA_ROWS,
                ..base
            },
            FieldType::Select => {
                let mut own: Vec<&FieldOption> = options.iter().filter(|o| o.field_id == field.id).collect();
                if own.is_empty() {
                    continue;
                }
                own.sort_by_key(|o| (o.sort_order, o.id));
                let mut choices = vec![Choice {
                    value: String::new(),
                    label: String::new(),
                    selected: base.value.is_empty(),
                }];
                choices.extend(own.into_iter().map(|o| Choice {
                    value: o.value.clone(),
                    label: o.label.clone(),
                    selected: o.value == base.value,
                }));
                FormControl { kind: ControlKind::Select, choices, ..base }
            }
        };
        controls.push(control);
    }

    for slot in legacy {
        controls.push(FormControl {
            target: ControlTarget::Legacy(slot.slot),
            name: legacy_control_name(slot.slot),
            label: slot.label.clone(),
            required: slot.required,
            kind: ControlKind::Text,
            max_len: LEGACY_MAX_LEN,
            rows: 1,
            value: values.legacy.get(&slot.slot).cloned().unwrap_or_default(),
            choices: Vec::new(),
        });
    }
    controls
}

/// Check controls carrying submitted values. Returns one message per problem.
pub fn check_submission(controls: &[FormControl]) -> Vec<String> {
    let mut errors = Vec::new();
    for control in controls {
        let value = control.value.trim();
        if value.is_empty() {
            if control.required {
                errors.push(format!("{} is required", control.label));
            }
            continue;
        }
        if value.chars().count() > control.max_len {
            errors.push(format!("{} must be at most {} characters", control.label, control.max_len));
        }
        if control.is_select() && !control.choices.iter().any(|c| c.value == value) {
            errors.push(format!("{} has an unknown choice", control.label));
        }
    }
    errors
}
