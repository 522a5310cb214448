use sqlx::PgPool;

use appointly::errors::AppError;
use appointly::models::custom_field_value::{self, FieldValueInput};

mod common;
use common::{count, create_field};

fn value_input(field_id: i64, subject_id: i64, value: &str) -> FieldValueInput {
    FieldValueInput {
        id: None,
        field_id: Some(field_id),
        subject_id: Some(subject_id),
        value: Some(value.to_string()),
    }
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn values_are_listed_per_subject(pool: PgPool) {
    let company = create_field(&pool, "company", "Company", "text").await;
    let notes = create_field(&pool, "notes", "Notes", "textarea").await;

    custom_field_value::save(&pool, &value_input(notes, 7, "Prefers mornings")).await.expect("save");
    custom_field_value::save(&pool, &value_input(company, 7, "Acme")).await.expect("save");
    custom_field_value::save(&pool, &value_input(company, 8, "Globex")).await.expect("save");

    let values = custom_field_value::list_by_subject(&pool, 7).await.expect("list");
    let pairs: Vec<(i64, &str)> = values.iter().map(|v| (v.field_id, v.value.as_str())).collect();
    assert_eq!(pairs, [(company, "Acme"), (notes, "Prefers mornings")]);
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn value_is_not_checked_against_options(pool: PgPool) {
    let size = create_field(&pool, "size", "Size", "select").await;
    let id = custom_field_value::save(&pool, &value_input(size, 3, "XXL")).await.expect("loose value");
    let stored = custom_field_value::find_for_subject(&pool, size, 3).await.expect("find");
    assert_eq!(stored.map(|v| (v.id, v.value)), Some((id, "XXL".to_string())));
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn update_replaces_value_and_missing_value_keeps_it(pool: PgPool) {
    let company = create_field(&pool, "company", "Company", "text").await;
    let id = custom_field_value::save(&pool, &value_input(company, 5, "Acme")).await.expect("insert");

    let mut update = value_input(company, 5, "Acme Corp");
    update.id = Some(id);
    custom_field_value::save(&pool, &update).await.expect("update");

    update.value = None;
    custom_field_value::save(&pool, &update).await.expect("update without value");

    let stored = custom_field_value::find_for_subject(&pool, company, 5).await.expect("find");
    assert_eq!(stored.map(|v| v.value).as_deref(), Some("Acme Corp"));
    assert_eq!(count(&pool, "custom_field_values").await, 1);
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn value_requires_existing_field_and_subject(pool: PgPool) {
    let company = create_field(&pool, "company", "Company", "text").await;

    let no_subject = FieldValueInput { field_id: Some(company), ..Default::default() };
    assert!(matches!(custom_field_value::save(&pool, &no_subject).await, Err(AppError::InvalidInput(_))));

    let orphan = value_input(company + 50, 1, "x");
    assert!(matches!(custom_field_value::save(&pool, &orphan).await, Err(AppError::InvalidInput(_))));

    let mut unknown_id = value_input(company, 1, "x");
    unknown_id.id = Some(404);
    assert!(matches!(custom_field_value::save(&pool, &unknown_id).await, Err(AppError::InvalidInput(_))));

    assert_eq!(count(&pool, "custom_field_values").await, 0);
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn delete_value(pool: PgPool) {
    let company = create_field(&pool, "company", "Company", "text").await;
    let id = custom_field_value::save(&pool, &value_input(company, 1, "Acme")).await.expect("insert");

    assert!(custom_field_value::delete(&pool, id).await.expect("delete"));
    assert!(!custom_field_value::delete(&pool, id).await.expect("missing id is a no-op"));
    assert!(custom_field_value::find_for_subject(&pool, company, 1).await.expect("find").is_none());
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn legacy_slots_upsert_per_subject(pool: PgPool) {
    custom_field_value::save_legacy(&pool, 9, 2, "Old company").await.expect("insert");
    custom_field_value::save_legacy(&pool, 9, 2, "New company").await.expect("upsert");
    custom_field_value::save_legacy(&pool, 9, 5, "Referral").await.expect("insert");

    let values = custom_field_value::list_legacy_for_subject(&pool, 9).await.expect("list");
    assert_eq!(values.len(), 2);
    assert_eq!(values.get(&2).map(String::as_str), Some("New company"));

    let err = custom_field_value::save_legacy(&pool, 9, 6, "x").await.expect_err("slot out of range");
    assert!(matches!(err, AppError::InvalidInput(_)));
}
