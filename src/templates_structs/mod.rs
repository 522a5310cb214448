// Template context structures for Askama templates, organized by domain.

use actix_session::Session;
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::take_flash;
use crate::models::setting;

/// Common context shared by all pages.
/// Templates access these as `ctx.app_name`, `ctx.csrf_token`, etc.
pub struct PageContext {
    pub app_name: String,
    pub csrf_token: String,
    pub flash: Option<String>,
    pub current_path: String,
}

impl PageContext {
    pub async fn build(session: &Session, pool: &PgPool, current_path: &str) -> Self {
        let flash = take_flash(session);
        let app_name = setting::get_value(pool, "app_name", "Appointly").await;
        let csrf_token = csrf::get_or_create_token(session);
        Self { app_name, csrf_token, flash, current_path: current_path.to_string() }
    }
}

mod custom_field;

pub use self::custom_field::{CustomFieldFormTemplate, CustomFieldsTemplate, TypeOption};
