pub mod fields;
pub mod form;
pub mod options;
pub mod page;

use actix_web::web;
use serde::Deserialize;

use crate::auth::json_guard::require_json_content_type;
use crate::errors::AppError;
use crate::models::cast;

/// Body of the id-only endpoints (`delete`, `get_options`, ...).
#[derive(Debug, Deserialize)]
pub struct IdRequest {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default, alias = "custom_field_id", alias = "option_id", deserialize_with = "cast::optional_id")]
    pub id: Option<i64>,
}

impl IdRequest {
    pub fn require_id(&self) -> Result<i64, AppError> {
        self.id.ok_or_else(|| AppError::InvalidInput("id is required".to_string()))
    }
}

/// Register the admin page, the form page and the JSON endpoints.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/custom_fields", web::get().to(page::index));
    cfg.service(
        web::resource("/custom_fields/form")
            .route(web::get().to(form::show))
            .route(web::post().to(form::submit))
    );
    cfg.service(
        web::scope("/custom_fields")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("/save", web::post().to(fields::save))
            .route("/delete", web::post().to(fields::delete))
            .route("/search", web::post().to(fields::search))
            .route("/find", web::post().to(fields::find))
            .route("/get_options", web::post().to(fields::get_options))
            .route("/sort", web::post().to(fields::sort))
            .route("/save_option", web::post().to(options::save))
            .route("/delete_option", web::post().to(options::delete))
            .route("/sort_options", web::post().to(options::sort))
    );
}
