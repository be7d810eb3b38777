use actix_web::{
    http::{header::AUTHORIZATION, StatusCode},
    web, HttpRequest, HttpResponse,
};
use protocol::SecretNote;

use super::respond::{read_document, render, response_representation};
use crate::auth_token::BasicCredentials;
use crate::config::ServerConfig;
use crate::error::{ApiError, Result};
use crate::middleware::{ChallengerId, AUTH_TOKEN_HEADER};
use crate::session::SessionRegistry;

fn unknown_challenger(challenger: &ChallengerId) -> ApiError {
    ApiError::Unauthorized(format!("X-CHALLENGER {} not found", challenger.0))
}

/// `POST /secret/token`: exchanges the basic credentials for an auth token.
pub async fn create_token(
    req: HttpRequest,
    challenger: web::ReqData<ChallengerId>,
    sessions: web::Data<SessionRegistry>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse> {
    let credentials = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(BasicCredentials::parse);

    match credentials {
        Some(credentials) if credentials.matches(&config.auth) => {
            let token = sessions.issue_token(&challenger.0)?;
            Ok(HttpResponse::Created()
                .insert_header((AUTH_TOKEN_HEADER, token))
                .finish())
        }
        Some(credentials) => {
            log::warn!(
                "Rejected credentials for user {} on challenger {}",
                credentials.username,
                challenger.0
            );
            Err(ApiError::Unauthorized("Invalid username or password".to_string()))
        }
        None => Err(ApiError::Unauthorized(
            "Basic authorization required".to_string(),
        )),
    }
}

pub async fn get_note(
    req: HttpRequest,
    challenger: web::ReqData<ChallengerId>,
    sessions: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let representation = response_representation(&req)?;
    let note = sessions
        .with_challenger(&challenger.0, |state| state.vault.note().to_string())
        .ok_or_else(|| unknown_challenger(&challenger))?;

    render(StatusCode::OK, representation, &SecretNote { note })
}

pub async fn update_note(
    req: HttpRequest,
    payload: web::Payload,
    challenger: web::ReqData<ChallengerId>,
    sessions: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let representation = response_representation(&req)?;
    let SecretNote { note } = read_document(&req, payload).await?;

    let note = sessions
        .with_challenger_mut(&challenger.0, |state| state.vault.write(note).to_string())
        .ok_or_else(|| unknown_challenger(&challenger))?;

    render(StatusCode::OK, representation, &SecretNote { note })
}
