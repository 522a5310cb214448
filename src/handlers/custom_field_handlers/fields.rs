use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use super::IdRequest;
use crate::auth::csrf;
use crate::errors::AppError;
use crate::models::cast;
use crate::models::custom_field::{self, CustomFieldInput, ORDERABLE_COLUMNS};
use crate::models::custom_field_option;
use crate::models::ordering::{OrderBy, Page, SortOrderItem};

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub custom_field: CustomFieldInput,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default, deserialize_with = "cast::optional_text")]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "cast::optional_int")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "cast::optional_int")]
    pub offset: Option<i64>,
    #[serde(default, deserialize_with = "cast::optional_text")]
    pub order_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FindRequest {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default, alias = "custom_field_id", deserialize_with = "cast::optional_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "cast::flag")]
    pub with_options: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub fields: Vec<SortOrderItem>,
}

/// POST /custom_fields/save - insert or update a definition
pub async fn save(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<SaveRequest>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &body.csrf_token)?;

    let id = custom_field::save(&pool, &body.custom_field).await?;
    log::info!("custom_field.saved id={id}");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id })))
}

/// POST /custom_fields/delete - remove a definition with its options and values
pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<IdRequest>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &body.csrf_token)?;

    let id = body.require_id()?;
    if custom_field::delete(&pool, id).await? {
        log::info!("custom_field.deleted id={id}");
    }

    Ok(HttpResponse::NoContent().finish())
}

/// POST /custom_fields/search - keyword search over name and label
pub async fn search(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<SearchRequest>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &body.csrf_token)?;

    let order = OrderBy::parse(body.order_by.as_deref(), ORDERABLE_COLUMNS)?;
    let page = Page::new(body.limit, body.offset);
    let keyword = body.keyword.as_deref().unwrap_or("");

    let fields = custom_field::search(&pool, keyword, page, &order).await?;
    Ok(HttpResponse::Ok().json(fields))
}

/// POST /custom_fields/find - one definition, optionally with its options
pub async fn find(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<FindRequest>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &body.csrf_token)?;

    let id = body.id.ok_or_else(|| AppError::InvalidInput("id is required".to_string()))?;
    let detail = custom_field::find(&pool, id, body.with_options.unwrap_or(false)).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// POST /custom_fields/get_options - options of one field in sort order
pub async fn get_options(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<IdRequest>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &body.csrf_token)?;

    let id = body.require_id()?;
    let options = custom_field_option::list_by_field(&pool, id).await?;
    Ok(HttpResponse::Ok().json(options))
}

/// POST /custom_fields/sort - persist drag-and-drop order of definitions
pub async fn sort(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<SortRequest>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &body.csrf_token)?;

    let updated = custom_field::reorder(&pool, &body.fields).await?;
    log::info!("custom_field.sorted count={updated}");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": updated })))
}
