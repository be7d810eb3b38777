use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    middleware::Next,
    web, Error, HttpMessage,
};

use super::challenger::ChallengerId;
use crate::auth_token::bearer_token;
use crate::error::ApiError;
use crate::session::SessionRegistry;

pub const AUTH_TOKEN_HEADER: &str = "X-AUTH-TOKEN";

/// Token presented by the caller, from `X-AUTH-TOKEN` or else an
/// `Authorization: Bearer` header.
pub fn presented_token(req: &ServiceRequest) -> Option<String> {
    let headers = req.headers();

    headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(bearer_token)
        })
        .map(str::to_string)
}

/// Guards secret routes. Runs after the challenger middleware, so the token
/// is checked against the resolved session.
pub async fn auth_middleware<B: MessageBody>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    let challenger = req.extensions().get::<ChallengerId>().cloned();
    let sessions = req.app_data::<web::Data<SessionRegistry>>().cloned();

    let (Some(ChallengerId(challenger)), Some(sessions)) = (challenger, sessions) else {
        return Ok(req
            .error_response(ApiError::Unauthorized(
                "X-CHALLENGER header required".to_string(),
            ))
            .map_into_right_body());
    };

    let Some(token) = presented_token(&req) else {
        return Ok(req
            .error_response(ApiError::Unauthorized(
                "X-AUTH-TOKEN or Bearer token required".to_string(),
            ))
            .map_into_right_body());
    };

    if let Err(err) = sessions.authorize(&challenger, &token) {
        log::warn!("Rejected auth token for challenger {}: {}", challenger, err);
        return Ok(req
            .error_response(ApiError::Forbidden("Invalid X-AUTH-TOKEN".to_string()))
            .map_into_right_body());
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}
