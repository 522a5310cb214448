use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::custom_field;
use crate::models::setting::LEGACY_CUSTOM_FIELD_SLOTS;
use crate::models::validate;
use super::types::*;

const SELECT_VALUE: &str = "\
    SELECT id, id_custom_fields AS field_id, id_users AS subject_id, value, \
           create_datetime, update_datetime \
    FROM custom_field_values";

pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let found = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM custom_field_values WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found)
}

/// Required keys and referenced rows only; the value itself is not checked
/// against the field's type or options.
pub async fn validate(pool: &PgPool, input: &FieldValueInput) -> Result<(), AppError> {
    if let Some(id) = input.id {
        if !exists(pool, id).await? {
            return Err(AppError::InvalidInput(format!(
                "The provided field value ID does not exist: {id}"
            )));
        }
    }

    let mut errors = Vec::new();
    errors.extend(validate::validate_required_id(input.field_id, "Custom field"));
    errors.extend(validate::validate_required_id(input.subject_id, "Subject"));
    validate::into_result(errors)?;

    if let Some(field_id) = input.field_id {
        if !custom_field::exists(pool, field_id).await? {
            return Err(AppError::InvalidInput(format!(
                "The provided custom field ID does not exist: {field_id}"
            )));
        }
    }
    Ok(())
}

/// Insert when `id` is absent, update otherwise. Returns the row id.
/// Nothing stops two rows for the same (field, subject) pair.
pub async fn save(pool: &PgPool, input: &FieldValueInput) -> Result<i64, AppError> {
    validate(pool, input).await?;

    let now = Utc::now();
    match input.id {
        None => {
            let id = sqlx::query_scalar::<_, i64>(
                "INSERT INTO custom_field_values \
                     (id_custom_fields, id_users, value, create_datetime, update_datetime) \
                 VALUES ($1, $2, COALESCE($3, ''), $4, $4) \
                 RETURNING id",
            )
            .bind(input.field_id)
            .bind(input.subject_id)
            .bind(input.value.as_deref())
            .bind(now)
            .fetch_optional(pool)
            .await?;
            id.ok_or_else(|| AppError::StorageFailure("Could not insert custom field value".to_string()))
        }
        Some(id) => {
            let result = sqlx::query(
                "UPDATE custom_field_values SET \
                     id_custom_fields = $1, id_users = $2, value = COALESCE($3, value), update_datetime = $4 \
                 WHERE id = $5",
            )
            .bind(input.field_id)
            .bind(input.subject_id)
            .bind(input.value.as_deref())
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
            if result.rows_affected() == 0 {
                return Err(AppError::StorageFailure(format!("Could not update custom field value {id}")));
            }
            Ok(id)
        }
    }
}

/// Everything one subject entered, across all fields.
pub async fn list_by_subject(pool: &PgPool, subject_id: i64) -> Result<Vec<FieldValue>, AppError> {
    let sql = format!("{SELECT_VALUE} WHERE id_users = $1 ORDER BY id_custom_fields ASC, id ASC");
    let values = sqlx::query_as::<_, FieldValue>(&sql)
        .bind(subject_id)
        .fetch_all(pool)
        .await?;
    Ok(values)
}

/// Latest row for a (field, subject) pair, if any.
pub async fn find_for_subject(
    pool: &PgPool,
    field_id: i64,
    subject_id: i64,
) -> Result<Option<FieldValue>, AppError> {
    let sql = format!(
        "{SELECT_VALUE} WHERE id_custom_fields = $1 AND id_users = $2 ORDER BY id DESC LIMIT 1"
    );
    let value = sqlx::query_as::<_, FieldValue>(&sql)
        .bind(field_id)
        .bind(subject_id)
        .fetch_optional(pool)
        .await?;
    Ok(value)
}

/// Remove one value. Missing ids are a no-op.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM custom_field_values WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Legacy slot values of one subject, keyed by slot.
pub async fn list_legacy_for_subject(pool: &PgPool, subject_id: i64) -> Result<HashMap<usize, String>, AppError> {
    let rows = sqlx::query_as::<_, (i32, String)>(
        "SELECT slot, value FROM legacy_custom_field_values WHERE id_users = $1",
    )
    .bind(subject_id)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(slot, value)| usize::try_from(slot).ok().map(|s| (s, value)))
        .collect())
}

/// Upsert one legacy slot value.
pub async fn save_legacy(pool: &PgPool, subject_id: i64, slot: usize, value: &str) -> Result<(), AppError> {
    let slot = i32::try_from(slot)
        .ok()
        .filter(|s| (1..=LEGACY_CUSTOM_FIELD_SLOTS as i32).contains(s))
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown legacy custom field slot {slot}")))?;
    sqlx::query(
        "INSERT INTO legacy_custom_field_values (id_users, slot, value, update_datetime) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (id_users, slot) DO UPDATE SET value = excluded.value, update_datetime = excluded.update_datetime",
    )
    .bind(subject_id)
    .bind(slot)
    .bind(value)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}
