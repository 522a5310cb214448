use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::cast;

/// A selectable choice of a `select` custom field.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct FieldOption {
    pub id: i64,
    #[serde(rename = "id_custom_fields")]
    pub field_id: i64,
    #[serde(rename = "option_value")]
    pub value: String,
    #[serde(rename = "option_label")]
    pub label: String,
    pub sort_order: i32,
    pub create_datetime: DateTime<Utc>,
    pub update_datetime: DateTime<Utc>,
}

/// Save payload (`option` in the request body).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldOptionInput {
    #[serde(default, deserialize_with = "cast::optional_id")]
    pub id: Option<i64>,
    #[serde(default, rename = "id_custom_fields", alias = "field_id", deserialize_with = "cast::optional_id")]
    pub field_id: Option<i64>,
    #[serde(default, rename = "option_value", alias = "value", deserialize_with = "cast::optional_text")]
    pub value: Option<String>,
    #[serde(default, rename = "option_label", alias = "label", deserialize_with = "cast::optional_text")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "cast::optional_sort_order")]
    pub sort_order: Option<i32>,
}
