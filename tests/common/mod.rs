//! Shared fixtures for the database-backed tests.
//!
//! Each `#[sqlx::test]` gets a fresh database with `appointly::db::MIGRATOR`
//! applied, so fixtures only insert what a test needs.
#![allow(dead_code)]

use sqlx::PgPool;

use appointly::models::custom_field::{self, CustomFieldInput};
use appointly::models::custom_field_option::{self, FieldOptionInput};

pub fn field_input(name: &str, label: &str, field_type: &str) -> CustomFieldInput {
    CustomFieldInput {
        name: Some(name.to_string()),
        label: Some(label.to_string()),
        field_type: Some(field_type.to_string()),
        ..Default::default()
    }
}

pub async fn create_field(pool: &PgPool, name: &str, label: &str, field_type: &str) -> i64 {
    custom_field::save(pool, &field_input(name, label, field_type))
        .await
        .expect("create custom field")
}

pub async fn create_option(pool: &PgPool, field_id: i64, value: &str, label: &str, sort_order: i32) -> i64 {
    let input = FieldOptionInput {
        id: None,
        field_id: Some(field_id),
        value: Some(value.to_string()),
        label: Some(label.to_string()),
        sort_order: Some(sort_order),
    };
    custom_field_option::save(pool, &input).await.expect("create option")
}

pub async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count rows")
}

pub async fn set_setting(pool: &PgPool, name: &str, value: &str) {
    sqlx::query(
        "INSERT INTO settings (name, value) VALUES ($1, $2) \
         ON CONFLICT (name) DO UPDATE SET value = excluded.value",
    )
    .bind(name)
    .bind(value)
    .execute(pool)
    .await
    .expect("set setting");
}
