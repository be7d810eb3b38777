use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, HttpMessage,
};

use crate::error::ApiError;
use crate::session::SessionRegistry;

pub const CHALLENGER_HEADER: &str = "X-CHALLENGER";

/// Session id resolved from `X-CHALLENGER`, available to handlers as
/// `web::ReqData<ChallengerId>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengerId(pub String);

pub fn challenger_header(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(CHALLENGER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub async fn challenger_middleware<B: MessageBody>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    let Some(sessions) = req.app_data::<web::Data<SessionRegistry>>().cloned() else {
        return Ok(req
            .error_response(ApiError::Internal("Session registry not available".to_string()))
            .map_into_right_body());
    };

    let challenger = match challenger_header(&req) {
        Some(id) if sessions.contains(&id) => id,
        Some(id) => {
            log::warn!("Unknown challenger {} on {}", id, req.path());
            return Ok(req
                .error_response(ApiError::Unauthorized(format!(
                    "X-CHALLENGER {} not found",
                    id
                )))
                .map_into_right_body());
        }
        None => {
            return Ok(req
                .error_response(ApiError::Unauthorized(
                    "X-CHALLENGER header required".to_string(),
                ))
                .map_into_right_body());
        }
    };

    req.extensions_mut().insert(ChallengerId(challenger));

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}
