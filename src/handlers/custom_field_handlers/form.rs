use std::collections::HashMap;

use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::set_flash;
use crate::errors::{AppError, render};
use crate::forms::{self, ControlTarget, FormControl, SubjectValues};
use crate::models::cast;
use crate::models::custom_field::{self, CustomField, CustomFieldFilter, FieldType};
use crate::models::custom_field_option::{self, FieldOption};
use crate::models::custom_field_value::{self, FieldValueInput};
use crate::models::ordering::{OrderBy, Page};
use crate::models::setting::{self, LegacyCustomField};
use crate::templates_structs::{CustomFieldFormTemplate, PageContext};

const PATH: &str = "/custom_fields/form";

#[derive(Debug, Deserialize)]
pub struct FormQuery {
    #[serde(default, deserialize_with = "cast::optional_id")]
    pub subject_id: Option<i64>,
}

/// Active fields, their options and the enabled legacy slots.
struct FormSource {
    fields: Vec<CustomField>,
    options: Vec<FieldOption>,
    legacy: Vec<LegacyCustomField>,
}

impl FormSource {
    async fn load(pool: &PgPool) -> Result<Self, AppError> {
        let fields = custom_field::list(
            pool,
            &CustomFieldFilter::active_only(),
            Page::all(),
            &OrderBy::by_sort_order(),
        )
        .await?;
        let select_ids: Vec<i64> = fields
            .iter()
            .filter(|f| f.field_type == FieldType::Select)
            .map(|f| f.id)
            .collect();
        let options = custom_field_option::list_by_fields(pool, &select_ids).await?;
        let legacy = setting::legacy_custom_fields(pool).await?;
        Ok(FormSource { fields, options, legacy })
    }

    fn controls(&self, values: &SubjectValues) -> Vec<FormControl> {
        forms::build_controls(&self.fields, &self.options, &self.legacy, values)
    }
}

async fn stored_values(pool: &PgPool, subject_id: i64) -> Result<SubjectValues, AppError> {
    let mut values = SubjectValues::default();
    // Rows come back in id order, so the latest row per field wins.
    for row in custom_field_value::list_by_subject(pool, subject_id).await? {
        values.fields.insert(row.field_id, row.value);
    }
    values.legacy = custom_field_value::list_legacy_for_subject(pool, subject_id).await?;
    Ok(values)
}

/// GET /custom_fields/form?subject_id=N
pub async fn show(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<FormQuery>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session, &pool, PATH).await;
    let values = match query.subject_id {
        Some(subject_id) => stored_values(&pool, subject_id).await?,
        None => SubjectValues::default(),
    };
    let controls = FormSource::load(&pool).await?.controls(&values);

    let tmpl = CustomFieldFormTemplate {
        ctx,
        subject_id: query.subject_id,
        controls,
        errors: vec![],
    };
    render(tmpl)
}

/// POST /custom_fields/form - save one subject's values
pub async fn submit(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let posted = form.into_inner();
    csrf::validate_csrf(&session, posted.get("csrf_token").map(String::as_str).unwrap_or(""))?;

    let subject_id = posted
        .get("subject_id")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|id| *id > 0);
    let Some(subject_id) = subject_id else {
        let ctx = PageContext::build(&session, &pool, PATH).await;
        let tmpl = CustomFieldFormTemplate {
            ctx,
            subject_id: None,
            controls: vec![],
            errors: vec!["A valid subject ID is required".to_string()],
        };
        return render(tmpl);
    };

    let source = FormSource::load(&pool).await?;
    let values = SubjectValues::from_submission(&source.controls(&SubjectValues::default()), &posted);
    let controls = source.controls(&values);

    let errors = forms::check_submission(&controls);
    if !errors.is_empty() {
        let ctx = PageContext::build(&session, &pool, PATH).await;
        let tmpl = CustomFieldFormTemplate {
            ctx,
            subject_id: Some(subject_id),
            controls,
            errors,
        };
        return render(tmpl);
    }

    for control in &controls {
        match control.target {
            ControlTarget::Field(field_id) => {
                let existing = custom_field_value::find_for_subject(&pool, field_id, subject_id).await?;
                let input = FieldValueInput {
                    id: existing.map(|v| v.id),
                    field_id: Some(field_id),
                    subject_id: Some(subject_id),
                    value: Some(control.value.clone()),
                };
                custom_field_value::save(&pool, &input).await?;
            }
            ControlTarget::Legacy(slot) => {
                custom_field_value::save_legacy(&pool, subject_id, slot, &control.value).await?;
            }
        }
    }
    log::info!("custom_field_value.form_saved subject_id={subject_id} count={}", controls.len());

    set_flash(&session, "Custom fields saved")?;
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("{PATH}?subject_id={subject_id}")))
        .finish())
}
