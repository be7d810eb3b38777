use actix_web::{
    http::{header::LOCATION, StatusCode},
    web, HttpRequest, HttpResponse,
};
use protocol::{ChallengerSnapshot, TodoList};

use super::respond::{read_document, read_field_list, render, response_representation, set_header};
use crate::error::{ApiError, Result};
use crate::middleware::CHALLENGER_HEADER;
use crate::session::{RestoreOutcome, SessionRegistry};

fn unknown_challenger(id: &str) -> ApiError {
    ApiError::NotFound(format!("Could not find a challenger with id {}", id))
}

/// `POST /challenger`: starts a new session.
pub async fn create_challenger(sessions: web::Data<SessionRegistry>) -> Result<HttpResponse> {
    let snapshot = sessions.create()?;
    let id = snapshot.x_challenger;

    Ok(HttpResponse::Created()
        .insert_header((CHALLENGER_HEADER, id.as_str()))
        .insert_header((LOCATION, format!("/gui/challenges/{}", id)))
        .finish())
}

/// `GET /challenger/{id}`: the restorable progress of a session.
pub async fn get_progress(
    req: HttpRequest,
    path: web::Path<String>,
    sessions: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let representation = response_representation(&req)?;
    let id = path.into_inner();
    let snapshot = sessions.snapshot(&id).ok_or_else(|| unknown_challenger(&id))?;

    let mut response = render(StatusCode::OK, representation, &snapshot)?;
    set_header(&mut response, CHALLENGER_HEADER, &id);
    Ok(response)
}

/// `PUT /challenger/{id}`: restores progress, creating the session when the
/// id is not in memory.
pub async fn restore_progress(
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Payload,
    sessions: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let representation = response_representation(&req)?;
    let id = path.into_inner();
    let snapshot: ChallengerSnapshot = read_document(&req, payload).await?;

    let (outcome, restored) = sessions.restore(&id, &snapshot)?;
    let status = match outcome {
        RestoreOutcome::Created => StatusCode::CREATED,
        RestoreOutcome::Updated => StatusCode::OK,
    };

    let mut response = render(status, representation, &restored)?;
    set_header(&mut response, CHALLENGER_HEADER, &restored.x_challenger);
    Ok(response)
}

/// `GET /challenger/database/{id}`: every todo of the session, ids included.
pub async fn get_database(
    req: HttpRequest,
    path: web::Path<String>,
    sessions: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let representation = response_representation(&req)?;
    let id = path.into_inner();
    let todos = sessions
        .with_challenger(&id, |state| state.todos.todos().to_vec())
        .ok_or_else(|| unknown_challenger(&id))?;

    let mut response = render(StatusCode::OK, representation, &TodoList::new(todos))?;
    set_header(&mut response, CHALLENGER_HEADER, &id);
    Ok(response)
}

/// `PUT /challenger/database/{id}`: swaps in a whole todo collection.
pub async fn restore_database(
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Payload,
    sessions: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if !sessions.contains(&id) {
        return Err(unknown_challenger(&id));
    }

    let entries = read_field_list(&req, payload).await?;
    sessions
        .with_challenger_mut(&id, |state| state.todos.replace_all(&entries))
        .ok_or_else(|| unknown_challenger(&id))??;

    log::info!("Restored {} todos for challenger {}", entries.len(), id);
    Ok(HttpResponse::NoContent()
        .insert_header((CHALLENGER_HEADER, id.as_str()))
        .finish())
}
