use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::cast;

/// What one subject entered for one custom field.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct FieldValue {
    pub id: i64,
    #[serde(rename = "id_custom_fields")]
    pub field_id: i64,
    #[serde(rename = "id_users")]
    pub subject_id: i64,
    pub value: String,
    pub create_datetime: DateTime<Utc>,
    pub update_datetime: DateTime<Utc>,
}

/// Save payload (`field_value` in the request body). The value is free text
/// whatever the field type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldValueInput {
    #[serde(default, deserialize_with = "cast::optional_id")]
    pub id: Option<i64>,
    #[serde(default, rename = "id_custom_fields", alias = "field_id", deserialize_with = "cast::optional_id")]
    pub field_id: Option<i64>,
    #[serde(default, rename = "id_users", alias = "subject_id", deserialize_with = "cast::optional_id")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "cast::optional_text")]
    pub value: Option<String>,
}
