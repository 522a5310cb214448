use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::cast;
use crate::models::custom_field_option::FieldOption;

/// Input control a custom field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Select,
}

impl FieldType {
    pub const ALL: [FieldType; 3] = [FieldType::Text, FieldType::Textarea, FieldType::Select];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
        }
    }

    /// Human label for the admin type picker.
    pub fn label(&self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Textarea => "Textarea",
            FieldType::Select => "Dropdown",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownFieldType(pub String);

impl fmt::Display for UnknownFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown custom field type {:?}", self.0)
    }
}

impl std::error::Error for UnknownFieldType {}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "textarea" => Ok(FieldType::Textarea),
            "select" => Ok(FieldType::Select),
            _ => Err(UnknownFieldType(s.to_string())),
        }
    }
}

/// What the admin form shows for a given type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeViewModel {
    pub show_options_panel: bool,
}

/// Pure replacement for toggling the options panel off page state.
pub fn view_model_for(field_type: FieldType) -> TypeViewModel {
    TypeViewModel {
        show_options_panel: matches!(field_type, FieldType::Select),
    }
}

/// Raw `custom_fields` row as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct CustomFieldRow {
    pub id: i64,
    pub name: String,
    pub label: String,
    #[sqlx(rename = "type")]
    pub field_type: String,
    pub required: bool,
    pub display_column: bool,
    pub sort_order: i32,
    pub active: bool,
    pub create_datetime: DateTime<Utc>,
    pub update_datetime: DateTime<Utc>,
}

/// A custom field definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomField {
    pub id: i64,
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub display_column: bool,
    pub sort_order: i32,
    pub active: bool,
    pub create_datetime: DateTime<Utc>,
    pub update_datetime: DateTime<Utc>,
}

impl TryFrom<CustomFieldRow> for CustomField {
    type Error = sqlx::Error;

    fn try_from(row: CustomFieldRow) -> Result<Self, Self::Error> {
        let field_type = row.field_type.parse::<FieldType>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "type".to_string(),
            source: Box::new(e),
        })?;
        Ok(CustomField {
            id: row.id,
            name: row.name,
            label: row.label,
            field_type,
            required: row.required,
            display_column: row.display_column,
            sort_order: row.sort_order,
            active: row.active,
            create_datetime: row.create_datetime,
            update_datetime: row.update_datetime,
        })
    }
}

/// A field plus, when requested, its ordered options.
#[derive(Debug, Clone, Serialize)]
pub struct CustomFieldDetail {
    #[serde(flatten)]
    pub field: CustomField,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
}

/// Save payload (`custom_field` in the request body). Unset flags keep their
/// stored value on update and take the column default on insert.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomFieldInput {
    #[serde(default, deserialize_with = "cast::optional_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "cast::optional_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "cast::optional_text")]
    pub label: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "cast::optional_text")]
    pub field_type: Option<String>,
    #[serde(default, deserialize_with = "cast::flag")]
    pub required: Option<bool>,
    #[serde(default, deserialize_with = "cast::flag")]
    pub display_column: Option<bool>,
    #[serde(default, deserialize_with = "cast::optional_sort_order")]
    pub sort_order: Option<i32>,
    #[serde(default, deserialize_with = "cast::flag")]
    pub active: Option<bool>,
}

/// Equality filter for `list`. `None` members are not constrained.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomFieldFilter {
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default, rename = "type")]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub display_column: Option<bool>,
}

impl CustomFieldFilter {
    pub fn active_only() -> Self {
        CustomFieldFilter { active: Some(true), ..Default::default() }
    }
}

/// Columns `list`/`search` may order by.
pub const ORDERABLE_COLUMNS: &[&str] = &[
    "id", "name", "label", "type", "required", "display_column",
    "sort_order", "active", "create_datetime", "update_datetime",
];
