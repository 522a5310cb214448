use sqlx::PgPool;

use appointly::models::setting;

mod common;
use common::set_setting;

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn minimum_advance_booking_is_seeded_to_zero(pool: PgPool) {
    assert_eq!(setting::get_value(&pool, "minimum_advance_booking", "missing").await, "0");
    assert_eq!(setting::minimum_advance_booking_days(&pool).await, 0);

    set_setting(&pool, "minimum_advance_booking", "2").await;
    assert_eq!(setting::minimum_advance_booking_days(&pool).await, 2);
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn unknown_setting_falls_back_to_default(pool: PgPool) {
    assert_eq!(setting::get_value(&pool, "no_such_setting", "fallback").await, "fallback");
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn legacy_fields_read_from_settings(pool: PgPool) {
    assert!(setting::legacy_custom_fields(&pool).await.expect("none").is_empty());

    set_setting(&pool, "display_custom_field_1", "1").await;
    set_setting(&pool, "label_custom_field_1", "Company").await;
    set_setting(&pool, "display_custom_field_3", "1").await;
    set_setting(&pool, "require_custom_field_3", "1").await;
    set_setting(&pool, "display_custom_field_4", "0").await;

    let fields = setting::legacy_custom_fields(&pool).await.expect("legacy");
    let summary: Vec<(usize, &str, bool)> = fields
        .iter()
        .map(|f| (f.slot, f.label.as_str(), f.required))
        .collect();
    assert_eq!(summary, [(1, "Company", false), (3, "Custom Field #3", true)]);
}
