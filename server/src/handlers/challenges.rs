use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};

use super::respond::{render, response_representation, set_header};
use crate::challenges::catalogue;
use crate::error::Result;
use crate::middleware::CHALLENGER_HEADER;
use crate::session::SessionRegistry;

/// `GET /challenges`: the catalogue, with status filled in for a known
/// `X-CHALLENGER`.
pub async fn list_challenges(
    req: HttpRequest,
    sessions: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let representation = response_representation(&req)?;
    let challenger = req
        .headers()
        .get(CHALLENGER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim);

    let progress = challenger
        .and_then(|id| sessions.with_challenger(id, |state| state.progress.clone()));

    let mut response = render(StatusCode::OK, representation, &catalogue(progress.as_ref()))?;
    if let (Some(id), Some(_)) = (challenger, &progress) {
        set_header(&mut response, CHALLENGER_HEADER, id);
    }
    Ok(response)
}
