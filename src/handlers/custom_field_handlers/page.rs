use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::errors::{AppError, render};
use crate::models::custom_field::{self, CustomFieldFilter};
use crate::models::ordering::{OrderBy, Page};
use crate::models::setting;
use crate::templates_structs::{CustomFieldsTemplate, PageContext, TypeOption};

/// GET /custom_fields - admin page; the script drives everything else over JSON.
pub async fn index(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session, &pool, "/custom_fields").await;
    let fields = custom_field::list(
        &pool,
        &CustomFieldFilter::default(),
        Page::all(),
        &OrderBy::by_sort_order(),
    )
    .await?;
    let booking_notice_days = setting::minimum_advance_booking_days(&pool).await;

    let tmpl = CustomFieldsTemplate {
        ctx,
        fields,
        type_options: TypeOption::all(),
        booking_notice_days,
    };
    render(tmpl)
}
