use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::errors::AppError;
use crate::models::custom_field_option;
use crate::models::ordering::{self, OrderBy, Page, SortOrderItem};
use crate::models::validate::{self, MAX_TEXT_COLUMN};
use super::types::*;

const SELECT_FIELD: &str = "\
    SELECT id, name, label, type, required, display_column, sort_order, active, \
           create_datetime, update_datetime \
    FROM custom_fields";

fn into_fields(rows: Vec<CustomFieldRow>) -> Result<Vec<CustomField>, AppError> {
    rows.into_iter()
        .map(|row| CustomField::try_from(row).map_err(AppError::from))
        .collect()
}

/// Escape LIKE wildcards so the keyword matches literally.
pub(crate) fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let found = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM custom_fields WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found)
}

/// Check a save payload. Returns the parsed field type on success.
pub async fn validate(pool: &PgPool, input: &CustomFieldInput) -> Result<FieldType, AppError> {
    if let Some(id) = input.id {
        if !exists(pool, id).await? {
            return Err(AppError::InvalidInput(format!(
                "The provided custom field ID does not exist: {id}"
            )));
        }
    }

    let mut errors = Vec::new();
    errors.extend(validate::validate_required(input.name.as_deref(), "Name", MAX_TEXT_COLUMN));
    errors.extend(validate::validate_required(input.label.as_deref(), "Label", MAX_TEXT_COLUMN));

    let field_type = match input.field_type.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push("Type is required".to_string());
            None
        }
        Some(raw) => match raw.parse::<FieldType>() {
            Ok(t) => Some(t),
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        },
    };

    validate::into_result(errors)?;
    field_type.ok_or_else(|| AppError::InvalidInput("Type is required".to_string()))
}

/// Insert when `id` is absent, update otherwise. Returns the row id.
pub async fn save(pool: &PgPool, input: &CustomFieldInput) -> Result<i64, AppError> {
    let field_type = validate(pool, input).await?;

    match input.id {
        None => insert(pool, input, field_type).await,
        Some(id) => update(pool, id, input, field_type).await,
    }
}

async fn insert(pool: &PgPool, input: &CustomFieldInput, field_type: FieldType) -> Result<i64, AppError> {
    let now = Utc::now();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO custom_fields \
             (name, label, type, required, display_column, sort_order, active, create_datetime, update_datetime) \
         VALUES ($1, $2, $3, COALESCE($4, FALSE), COALESCE($5, FALSE), COALESCE($6, 0), COALESCE($7, TRUE), $8, $8) \
         RETURNING id",
    )
    .bind(input.name.as_deref().map(str::trim))
    .bind(input.label.as_deref().map(str::trim))
    .bind(field_type.as_str())
    .bind(input.required)
    .bind(input.display_column)
    .bind(input.sort_order)
    .bind(input.active)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    id.ok_or_else(|| AppError::StorageFailure("Could not insert custom field".to_string()))
}

async fn update(pool: &PgPool, id: i64, input: &CustomFieldInput, field_type: FieldType) -> Result<i64, AppError> {
    let result = sqlx::query(
        "UPDATE custom_fields SET \
             name = $1, label = $2, type = $3, \
             required = COALESCE($4, required), \
             display_column = COALESCE($5, display_column), \
             sort_order = COALESCE($6, sort_order), \
             active = COALESCE($7, active), \
             update_datetime = $8 \
         WHERE id = $9",
    )
    .bind(input.name.as_deref().map(str::trim))
    .bind(input.label.as_deref().map(str::trim))
    .bind(field_type.as_str())
    .bind(input.required)
    .bind(input.display_column)
    .bind(input.sort_order)
    .bind(input.active)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::StorageFailure(format!("Could not update custom field {id}")));
    }
    Ok(id)
}

/// Find one field; `with_options` attaches its options in sort order.
pub async fn find(pool: &PgPool, id: i64, with_options: bool) -> Result<CustomFieldDetail, AppError> {
    let sql = format!("{SELECT_FIELD} WHERE id = $1");
    let row = sqlx::query_as::<_, CustomFieldRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("custom field {id}")))?;

    let field = CustomField::try_from(row)?;
    let options = if with_options {
        Some(custom_field_option::list_by_field(pool, id).await?)
    } else {
        None
    };

    Ok(CustomFieldDetail { field, options })
}

/// List fields matching `filter`.
pub async fn list(
    pool: &PgPool,
    filter: &CustomFieldFilter,
    page: Page,
    order: &OrderBy,
) -> Result<Vec<CustomField>, AppError> {
    let mut qb = QueryBuilder::<Postgres>::new(SELECT_FIELD);
    qb.push(" WHERE TRUE");
    if let Some(active) = filter.active {
        qb.push(" AND active = ").push_bind(active);
    }
    if let Some(field_type) = filter.field_type {
        qb.push(" AND type = ").push_bind(field_type.as_str());
    }
    if let Some(required) = filter.required {
        qb.push(" AND required = ").push_bind(required);
    }
    if let Some(display_column) = filter.display_column {
        qb.push(" AND display_column = ").push_bind(display_column);
    }
    qb.push(order.to_sql());
    page.push_to(&mut qb);

    let rows = qb.build_query_as::<CustomFieldRow>().fetch_all(pool).await?;
    into_fields(rows)
}

/// Case-insensitive substring search over name and label.
pub async fn search(
    pool: &PgPool,
    keyword: &str,
    page: Page,
    order: &OrderBy,
) -> Result<Vec<CustomField>, AppError> {
    let pattern = like_pattern(keyword);

    let mut qb = QueryBuilder::<Postgres>::new(SELECT_FIELD);
    qb.push(" WHERE (name ILIKE ")
        .push_bind(pattern.clone())
        .push(" ESCAPE '\\' OR label ILIKE ")
        .push_bind(pattern)
        .push(" ESCAPE '\\')");
    qb.push(order.to_sql());
    page.push_to(&mut qb);

    let rows = qb.build_query_as::<CustomFieldRow>().fetch_all(pool).await?;
    into_fields(rows)
}

/// Delete a field with its options and values. Missing ids are a no-op.
/// Returns whether a field row was removed.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM custom_field_values WHERE id_custom_fields = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM custom_field_options WHERE id_custom_fields = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM custom_fields WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

/// Apply drag-and-drop positions.
pub async fn reorder(pool: &PgPool, items: &[SortOrderItem]) -> Result<u64, AppError> {
    ordering::reorder_rows(pool, "custom_fields", items).await
}
