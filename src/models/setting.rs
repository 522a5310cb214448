use std::collections::HashMap;

use sqlx::PgPool;

use crate::errors::AppError;

/// Number of legacy fixed custom field slots.
pub const LEGACY_CUSTOM_FIELD_SLOTS: usize = 5;

/// A pre-dynamic custom field configured purely through settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyCustomField {
    pub slot: usize,
    pub label: String,
    pub required: bool,
}

/// Get a single setting's value by name, returning a default if not found.
pub async fn get_value(pool: &PgPool, name: &str, default: &str) -> String {
    sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| default.to_string())
}

/// Days of notice required before booking; 0 allows same-day appointments.
pub async fn minimum_advance_booking_days(pool: &PgPool) -> u32 {
    let raw = get_value(pool, "minimum_advance_booking", "0").await;
    parse_days(&raw)
}

fn parse_days(raw: &str) -> u32 {
    raw.trim().parse::<u32>().unwrap_or_else(|_| {
        log::warn!("minimum_advance_booking has a non-numeric value {raw:?}, using 0");
        0
    })
}

fn is_truthy(raw: Option<&String>) -> bool {
    matches!(raw.map(|s| s.trim()), Some("1") | Some("true"))
}

/// Resolve the displayed legacy slots from a settings map.
pub fn legacy_fields_from(values: &HashMap<String, String>) -> Vec<LegacyCustomField> {
    (1..=LEGACY_CUSTOM_FIELD_SLOTS)
        .filter(|i| is_truthy(values.get(&format!("display_custom_field_{i}"))))
        .map(|i| {
            let label = values
                .get(&format!("label_custom_field_{i}"))
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
                .unwrap_or_else(|| format!("Custom Field #{i}"));
            LegacyCustomField {
                slot: i,
                label,
                required: is_truthy(values.get(&format!("require_custom_field_{i}"))),
            }
        })
        .collect()
}

/// Legacy slots whose `display_custom_field_N` setting is on.
pub async fn legacy_custom_fields(pool: &PgPool) -> Result<Vec<LegacyCustomField>, AppError> {
    let rows = sqlx::query_as::<_, (String, String)>(
        "SELECT name, value FROM settings WHERE name LIKE '%\\_custom\\_field\\_%'",
    )
    .fetch_all(pool)
    .await?;
    let values: HashMap<String, String> = rows.into_iter().collect();
    Ok(legacy_fields_from(&values))
}
