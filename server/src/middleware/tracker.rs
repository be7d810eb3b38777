use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    middleware::Next,
    web, Error, HttpMessage,
};

use super::auth::AUTH_TOKEN_HEADER;
use super::challenger::{challenger_header, CHALLENGER_HEADER};
use super::method_override::MethodOverridden;
use crate::auth_token::bearer_token;
use crate::challenges::{detect, Outcome, RequestFacts, Route};
use crate::error::ErrorMessages;
use crate::session::SessionRegistry;

/// Records challenge completion for the calling session once the response
/// is known. Must run inside the method override so it sees the effective
/// method.
pub async fn challenge_tracker_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let accept = header(ACCEPT.as_str());
    let content_type = header(CONTENT_TYPE.as_str());
    let bearer = header(AUTH_TOKEN_HEADER).is_none()
        && header(AUTHORIZATION.as_str())
            .as_deref()
            .and_then(bearer_token)
            .is_some();
    let filtered = req
        .query_string()
        .split('&')
        .any(|pair| pair.starts_with("doneStatus="));
    let overridden = req.extensions().get::<MethodOverridden>().is_some();
    let method = req.method().clone();
    let route = Route::classify(req.path());
    let request_challenger = challenger_header(&req);
    let sessions = req.app_data::<web::Data<SessionRegistry>>().cloned();

    let res = next.call(req).await?;

    let Some(sessions) = sessions else {
        return Ok(res);
    };

    let response_challenger = res
        .headers()
        .get(CHALLENGER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let Some(challenger) = response_challenger.or(request_challenger) else {
        return Ok(res);
    };

    let facts = RequestFacts {
        method,
        route,
        status: res.status().as_u16(),
        accept,
        content_type,
        overridden,
        bearer,
        filtered,
        errors: res
            .response()
            .extensions()
            .get::<ErrorMessages>()
            .map(|messages| messages.0.clone())
            .unwrap_or_default(),
        outcome: res.response().extensions().get::<Outcome>().copied(),
    };

    let keys = detect(&facts);
    if !keys.is_empty() {
        let completed = sessions.complete_challenges(&challenger, &keys);
        if completed > 0 {
            log::debug!("Challenger {} completed {:?}", challenger, keys);
        }
    }

    Ok(res)
}
