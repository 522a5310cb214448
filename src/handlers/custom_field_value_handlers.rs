use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::json_guard::require_json_content_type;
use crate::errors::AppError;
use crate::models::cast;
use crate::models::custom_field_value::{self, FieldValueInput};

#[derive(Debug, Deserialize)]
pub struct SaveValueRequest {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub field_value: FieldValueInput,
}

#[derive(Debug, Deserialize)]
pub struct ValueIdRequest {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default, alias = "field_value_id", deserialize_with = "cast::optional_id")]
    pub id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SubjectRequest {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default, alias = "id_users", deserialize_with = "cast::optional_id")]
    pub subject_id: Option<i64>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/custom_field_values")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("/save", web::post().to(save))
            .route("/delete", web::post().to(delete))
            .route("/by_subject", web::post().to(by_subject))
    );
}

/// POST /custom_field_values/save
pub async fn save(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<SaveValueRequest>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &body.csrf_token)?;

    let id = custom_field_value::save(&pool, &body.field_value).await?;
    log::info!("custom_field_value.saved id={id}");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": id })))
}

/// POST /custom_field_values/delete
pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<ValueIdRequest>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &body.csrf_token)?;

    let id = body.id.ok_or_else(|| AppError::InvalidInput("id is required".to_string()))?;
    if custom_field_value::delete(&pool, id).await? {
        log::info!("custom_field_value.deleted id={id}");
    }

    Ok(HttpResponse::NoContent().finish())
}

/// POST /custom_field_values/by_subject
pub async fn by_subject(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<SubjectRequest>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &body.csrf_token)?;

    let subject_id = body
        .subject_id
        .ok_or_else(|| AppError::InvalidInput("subject_id is required".to_string()))?;
    let values = custom_field_value::list_by_subject(&pool, subject_id).await?;
    Ok(HttpResponse::Ok().json(values))
}
