use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

/// True when a request to a JSON endpoint carries a JSON body.
/// Safe methods carry no body and always pass.
pub fn is_json_request(req: &ServiceRequest) -> bool {
    if req.method().is_safe() {
        return true;
    }
    matches!(
        req.mime_type(),
        Ok(Some(mime)) if mime.type_() == "application" && mime.subtype() == "json"
    )
}

/// Wraps the custom field JSON scopes. The admin script always posts JSON,
/// so a form-encoded body here is a cross-site request and is refused
/// before it reaches a handler.
pub async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if !is_json_request(&req) {
        log::warn!("{} {} rejected: body is not JSON", req.method(), req.path());
        let response = HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Custom field endpoints only accept application/json bodies"
        }));
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}
