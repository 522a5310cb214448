use askama::Template;

use super::PageContext;
use crate::forms::FormControl;
use crate::models::custom_field::{CustomField, FieldType, view_model_for};

/// One entry of the admin type picker.
pub struct TypeOption {
    pub value: &'static str,
    pub label: &'static str,
    pub show_options_panel: bool,
}

impl TypeOption {
    pub fn all() -> Vec<TypeOption> {
        FieldType::ALL
            .iter()
            .map(|t| TypeOption {
                value: t.as_str(),
                label: t.label(),
                show_options_panel: view_model_for(*t).show_options_panel,
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "custom_fields/index.html")]
pub struct CustomFieldsTemplate {
    pub ctx: PageContext,
    pub fields: Vec<CustomField>,
    pub type_options: Vec<TypeOption>,
    pub booking_notice_days: u32,
}

#[derive(Template)]
#[template(path = "custom_fields/form.html")]
pub struct CustomFieldFormTemplate {
    pub ctx: PageContext,
    pub subject_id: Option<i64>,
    pub controls: Vec<FormControl>,
    pub errors: Vec<String>,
}
