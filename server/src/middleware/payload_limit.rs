use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::header::CONTENT_LENGTH,
    middleware::Next,
    web, Error,
};

use crate::config::{ServerConfig, DEFAULT_MAX_BODY_BYTES};
use crate::error::ApiError;

/// Rejects requests whose declared length exceeds the configured ceiling
/// before any route sees them. Bodies without a length are bounded again
/// while they are read.
pub async fn payload_limit_middleware<B: MessageBody>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    let limit = req
        .app_data::<web::Data<ServerConfig>>()
        .map(|config| config.max_body_bytes)
        .unwrap_or(DEFAULT_MAX_BODY_BYTES);

    let declared = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<usize>().ok());

    if let Some(length) = declared.filter(|length| *length > limit) {
        log::warn!(
            "Rejected {} {} with {} byte body (limit {})",
            req.method(),
            req.path(),
            length,
            limit
        );
        return Ok(req
            .error_response(ApiError::PayloadTooLarge(limit))
            .map_into_right_body());
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}
