use sqlx::PgPool;

use appointly::errors::AppError;
use appointly::models::custom_field::{self, CustomFieldFilter, CustomFieldInput, FieldType, ORDERABLE_COLUMNS};
use appointly::models::custom_field_value::{self, FieldValueInput};
use appointly::models::ordering::{OrderBy, Page, SortOrderItem};

mod common;
use common::{count, create_field, create_option, field_input};

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn insert_returns_new_id_and_find_has_timestamps(pool: PgPool) {
    let first = create_field(&pool, "company", "Company", "text").await;
    let second = create_field(&pool, "notes", "Notes", "textarea").await;
    assert_ne!(first, second);

    let detail = custom_field::find(&pool, second, false).await.expect("find");
    assert_eq!(detail.field.name, "notes");
    assert_eq!(detail.field.field_type, FieldType::Textarea);
    assert!(detail.field.active);
    assert!(!detail.field.required);
    assert!(detail.field.update_datetime >= detail.field.create_datetime);
    assert!(detail.options.is_none());
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn missing_name_label_or_type_is_rejected_without_write(pool: PgPool) {
    for input in [
        field_input("", "x", "text"),
        field_input("x", "   ", "text"),
        field_input("x", "x", ""),
        CustomFieldInput::default(),
    ] {
        let err = custom_field::save(&pool, &input).await.expect_err("must fail");
        assert!(matches!(err, AppError::InvalidInput(_)), "got {err:?}");
    }
    assert_eq!(count(&pool, "custom_fields").await, 0);

    let hits = custom_field::search(&pool, "x", Page::all(), &OrderBy::default()).await.expect("search");
    assert!(hits.is_empty());
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn unknown_type_and_overlong_name_are_invalid(pool: PgPool) {
    let err = custom_field::save(&pool, &field_input("a", "A", "checkbox")).await.expect_err("type");
    assert!(matches!(err, AppError::InvalidInput(_)));

    let long = "n".repeat(256);
    let err = custom_field::save(&pool, &field_input(&long, "A", "text")).await.expect_err("length");
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(count(&pool, "custom_fields").await, 0);
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn save_with_unknown_id_is_invalid_input(pool: PgPool) {
    let mut input = field_input("ghost", "Ghost", "text");
    input.id = Some(9999);
    let err = custom_field::save(&pool, &input).await.expect_err("unknown id");
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(count(&pool, "custom_fields").await, 0);
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn update_keeps_unset_flags(pool: PgPool) {
    let mut input = field_input("vip", "VIP", "text");
    input.required = Some(true);
    input.sort_order = Some(4);
    let id = custom_field::save(&pool, &input).await.expect("insert");

    let mut update = field_input("vip", "VIP Customer", "textarea");
    update.id = Some(id);
    assert_eq!(custom_field::save(&pool, &update).await.expect("update"), id);

    let field = custom_field::find(&pool, id, false).await.expect("find").field;
    assert_eq!(field.label, "VIP Customer");
    assert_eq!(field.field_type, FieldType::Textarea);
    assert!(field.required);
    assert_eq!(field.sort_order, 4);
    assert_eq!(count(&pool, "custom_fields").await, 1);
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn find_missing_is_not_found(pool: PgPool) {
    let err = custom_field::find(&pool, 42, true).await.expect_err("missing");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn t_shirt_size_scenario(pool: PgPool) {
    let field_id = create_field(&pool, "t_shirt_size", "T-Shirt Size", "select").await;
    create_option(&pool, field_id, "L", "Large", 1).await;
    create_option(&pool, field_id, "S", "Small", 0).await;
    custom_field_value::save(&pool, &FieldValueInput {
        id: None,
        field_id: Some(field_id),
        subject_id: Some(12),
        value: Some("S".into()),
    })
    .await
    .expect("value");

    let detail = custom_field::find(&pool, field_id, true).await.expect("find");
    let labels: Vec<String> = detail.options.unwrap_or_default().into_iter().map(|o| o.label).collect();
    assert_eq!(labels, ["Small", "Large"]);

    assert!(custom_field::delete(&pool, field_id).await.expect("delete"));
    assert_eq!(count(&pool, "custom_fields").await, 0);
    assert_eq!(count(&pool, "custom_field_options").await, 0);
    assert_eq!(count(&pool, "custom_field_values").await, 0);
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn deleting_missing_field_is_silent(pool: PgPool) {
    let removed = custom_field::delete(&pool, 777).await.expect("no error");
    assert!(!removed);
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn search_matches_name_or_label_case_insensitively(pool: PgPool) {
    create_field(&pool, "abc_code", "Code", "text").await;
    create_field(&pool, "other", "Has ABC inside", "text").await;
    create_field(&pool, "unrelated", "Nothing", "text").await;
    create_field(&pool, "percent", "100% sure", "text").await;

    let hits = custom_field::search(&pool, "abc", Page::all(), &OrderBy::default()).await.expect("search");
    let mut names: Vec<String> = hits.into_iter().map(|f| f.name).collect();
    names.sort();
    assert_eq!(names, ["abc_code", "other"]);

    let literal = custom_field::search(&pool, "%", Page::all(), &OrderBy::default()).await.expect("search");
    assert_eq!(literal.len(), 1);
    assert_eq!(literal[0].name, "percent");
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn empty_keyword_returns_all_with_paging(pool: PgPool) {
    for i in 0..5 {
        create_field(&pool, &format!("f{i}"), &format!("F{i}"), "text").await;
    }
    let all = custom_field::search(&pool, "", Page::all(), &OrderBy::default()).await.expect("all");
    assert_eq!(all.len(), 5);

    let order = OrderBy::parse(Some("name desc"), ORDERABLE_COLUMNS).expect("order");
    let page = custom_field::search(&pool, "", Page::new(Some(2), Some(1)), &order).await.expect("page");
    let names: Vec<String> = page.into_iter().map(|f| f.name).collect();
    assert_eq!(names, ["f3", "f2"]);
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn list_filters_by_flags(pool: PgPool) {
    create_field(&pool, "kept", "Kept", "text").await;
    let mut hidden = field_input("hidden", "Hidden", "select");
    hidden.active = Some(false);
    custom_field::save(&pool, &hidden).await.expect("insert");

    let active = custom_field::list(&pool, &CustomFieldFilter::active_only(), Page::all(), &OrderBy::default())
        .await
        .expect("list");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "kept");

    let selects = custom_field::list(
        &pool,
        &CustomFieldFilter { field_type: Some(FieldType::Select), ..Default::default() },
        Page::all(),
        &OrderBy::default(),
    )
    .await
    .expect("list");
    assert_eq!(selects.len(), 1);
    assert_eq!(selects[0].name, "hidden");
}

#[sqlx::test(migrator = "appointly::db::MIGRATOR")]
async fn reorder_updates_known_ids_and_skips_unknown(pool: PgPool) {
    let a = create_field(&pool, "a", "A", "text").await;
    let b = create_field(&pool, "b", "B", "text").await;

    let updated = custom_field::reorder(&pool, &[
        SortOrderItem { id: a, sort_order: 1 },
        SortOrderItem { id: b, sort_order: 0 },
        SortOrderItem { id: 9999, sort_order: 2 },
    ])
    .await
    .expect("reorder");
    assert_eq!(updated, 2);

    let fields = custom_field::list(&pool, &CustomFieldFilter::default(), Page::all(), &OrderBy::by_sort_order())
        .await
        .expect("list");
    let names: Vec<String> = fields.into_iter().map(|f| f.name).collect();
    assert_eq!(names, ["b", "a"]);
}
