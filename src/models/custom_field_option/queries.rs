use chrono::Utc;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::custom_field;
use crate::models::ordering::{self, SortOrderItem};
use crate::models::validate::{self, MAX_TEXT_COLUMN};
use super::types::*;

const SELECT_OPTION: &str = "\
    SELECT id, id_custom_fields AS field_id, option_value AS value, option_label AS label, \
           sort_order, create_datetime, update_datetime \
    FROM custom_field_options";

pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let found = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM custom_field_options WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found)
}

pub async fn validate(pool: &PgPool, input: &FieldOptionInput) -> Result<(), AppError> {
    if let Some(id) = input.id {
        if !exists(pool, id).await? {
            return Err(AppError::InvalidInput(format!(
                "The provided option ID does not exist: {id}"
            )));
        }
    }

    let mut errors = Vec::new();
    errors.extend(validate::validate_required_id(input.field_id, "Custom field"));
    errors.extend(validate::validate_required(input.value.as_deref(), "Option value", MAX_TEXT_COLUMN));
    errors.extend(validate::validate_required(input.label.as_deref(), "Option label", MAX_TEXT_COLUMN));
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
pub async fn save(pool: &PgPool, input: &FieldOptionInput) -> Result<i64, AppError> {
    validate(pool, input).await?;

    let now = Utc::now();
    match input.id {
        None => {
            let id = sqlx::query_scalar::<_, i64>(
                "INSERT INTO custom_field_options \
                     (id_custom_fields, option_value, option_label, sort_order, create_datetime, update_datetime) \
                 VALUES ($1, $2, $3, COALESCE($4, 0), $5, $5) \
                 RETURNING id",
            )
            .bind(input.field_id)
            .bind(input.value.as_deref().map(str::trim))
            .bind(input.label.as_deref().map(str::trim))
            .bind(input.sort_order)
            .bind(now)
            .fetch_optional(pool)
            .await?;
            id.ok_or_else(|| AppError::StorageFailure("Could not insert custom field option".to_string()))
        }
        Some(id) => {
            let result = sqlx::query(
                "UPDATE custom_field_options SET \
                     id_custom_fields = $1, option_value = $2, option_label = $3, \
                     sort_order = COALESCE($4, sort_order), update_datetime = $5 \
                 WHERE id = $6",
            )
            .bind(input.field_id)
            .bind(input.value.as_deref().map(str::trim))
            .bind(input.label.as_deref().map(str::trim))
            .bind(input.sort_order)
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
            if result.rows_affected() == 0 {
                return Err(AppError::StorageFailure(format!("Could not update custom field option {id}")));
            }
            Ok(id)
        }
    }
}

pub async fn find(pool: &PgPool, id: i64) -> Result<FieldOption, AppError> {
    let sql = format!("{SELECT_OPTION} WHERE id = $1");
    sqlx::query_as::<_, FieldOption>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("custom field option {id}")))
}

/// Options of one field, by ascending sort order (ties by id).
pub async fn list_by_field(pool: &PgPool, field_id: i64) -> Result<Vec<FieldOption>, AppError> {
    let sql = format!("{SELECT_OPTION} WHERE id_custom_fields = $1 ORDER BY sort_order ASC, id ASC");
    let options = sqlx::query_as::<_, FieldOption>(&sql)
        .bind(field_id)
        .fetch_all(pool)
        .await?;
    Ok(options)
}

/// Options of several fields in one round trip, grouped by field then sort order.
pub async fn list_by_fields(pool: &PgPool, field_ids: &[i64]) -> Result<Vec<FieldOption>, AppError> {
    if field_ids.is_empty() {
        return Ok(vec![]);
    }
    let sql = format!(
        "{SELECT_OPTION} WHERE id_custom_fields = ANY($1) \
         ORDER BY id_custom_fields ASC, sort_order ASC, id ASC"
    );
    let options = sqlx::query_as::<_, FieldOption>(&sql)
        .bind(field_ids)
        .fetch_all(pool)
        .await?;
    Ok(options)
}

/// Remove one option. Missing ids are a no-op.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM custom_field_options WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn reorder(pool: &PgPool, items: &[SortOrderItem]) -> Result<u64, AppError> {
    ordering::reorder_rows(pool, "custom_field_options", items).await
}
