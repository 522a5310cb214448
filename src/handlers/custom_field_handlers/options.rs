use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use super::IdRequest;
use crate::auth::csrf;
use crate::errors::AppError;
use crate::models::custom_field_option::{self, FieldOptionInput};
use crate::models::ordering::SortOrderItem;

#[derive(Debug, Deserialize)]
pub struct SaveOptionRequest {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub option: FieldOptionInput,
}

#[derive(Debug, Deserialize)]
pub struct SortOptionsRequest {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub options: Vec<SortOrderItem>,
}

/// POST /custom_fields/save_option
pub async fn save(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<SaveOptionRequest>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &body.csrf_token)?;

    let id = custom_field_option::save(&pool, &body.option).await?;
    log::info!("custom_field_option.saved id={id}");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id })))
}

/// POST /custom_fields/delete_option
pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<IdRequest>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &body.csrf_token)?;

    let id = body.require_id()?;
    if custom_field_option::delete(&pool, id).await? {
        log::info!("custom_field_option.deleted id={id}");
    }

    Ok(HttpResponse::NoContent().finish())
}

/// POST /custom_fields/sort_options
pub async fn sort(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<SortOptionsRequest>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &body.csrf_token)?;

    let updated = custom_field_option::reorder(&pool, &body.options).await?;
    log::info!("custom_field_option.sorted count={updated}");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": updated })))
}
