use actix_web::{
    http::{
        header::{ALLOW, CONTENT_TYPE, LOCATION},
        StatusCode,
    },
    web, HttpRequest, HttpResponse,
};
use protocol::{Todo, TodoList, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};
use serde::Deserialize;

use super::respond::{read_fields, render, response_representation, set_header, with_outcome};
use crate::challenges::Outcome;
use crate::error::{ApiError, Result};
use crate::middleware::ChallengerId;
use crate::session::{ChallengerState, SessionRegistry};
use crate::store::validation::{FIELD_DESCRIPTION, FIELD_DONE_STATUS, FIELD_TITLE};
use crate::store::StoreError;

pub const TODOS_ALLOW: &str = "OPTIONS, GET, HEAD, POST";
pub const TODO_ALLOW: &str = "OPTIONS, GET, HEAD, POST, PUT, DELETE";

#[derive(Debug, Deserialize)]
pub struct TodoFilter {
    #[serde(rename = "doneStatus")]
    done_status: Option<String>,
}

impl TodoFilter {
    fn done_status(&self) -> Result<Option<bool>> {
        match self.done_status.as_deref() {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(other) => Err(ApiError::validation(format!(
                "Failed Validation: doneStatus filter should be true or false but was {}",
                other
            ))),
        }
    }
}

fn read_session<R>(
    sessions: &SessionRegistry,
    challenger: &ChallengerId,
    f: impl FnOnce(&ChallengerState) -> R,
) -> Result<R> {
    sessions
        .with_challenger(&challenger.0, f)
        .ok_or_else(|| ApiError::Unauthorized(format!("X-CHALLENGER {} not found", challenger.0)))
}

fn write_session<R>(
    sessions: &SessionRegistry,
    challenger: &ChallengerId,
    f: impl FnOnce(&mut ChallengerState) -> R,
) -> Result<R> {
    sessions
        .with_challenger_mut(&challenger.0, f)
        .ok_or_else(|| ApiError::Unauthorized(format!("X-CHALLENGER {} not found", challenger.0)))
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Could not find an instance with todos/{}", id))
}

fn is_maxed_out(todo: &Todo) -> bool {
    todo.title.chars().count() == MAX_TITLE_LEN
        && todo.description.chars().count() == MAX_DESCRIPTION_LEN
}

pub async fn list_todos(
    req: HttpRequest,
    challenger: web::ReqData<ChallengerId>,
    filter: web::Query<TodoFilter>,
    sessions: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let representation = response_representation(&req)?;
    let done_status = filter.done_status()?;
    let todos = read_session(&sessions, &challenger, |state| state.todos.list(done_status))?;

    render(StatusCode::OK, representation, &TodoList::new(todos))
}

pub async fn head_todos(
    req: HttpRequest,
    challenger: web::ReqData<ChallengerId>,
    sessions: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let representation = response_representation(&req)?;
    read_session(&sessions, &challenger, |_| ())?;

    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, representation.mime()))
        .finish())
}

pub async fn options_todos() -> HttpResponse {
    HttpResponse::Ok().insert_header((ALLOW, TODOS_ALLOW)).finish()
}

pub async fn options_todo() -> HttpResponse {
    HttpResponse::Ok().insert_header((ALLOW, TODO_ALLOW)).finish()
}

pub async fn create_todo(
    req: HttpRequest,
    payload: web::Payload,
    challenger: web::ReqData<ChallengerId>,
    sessions: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let representation = response_representation(&req)?;
    let fields = read_fields(&req, payload).await?;

    let todo = write_session(&sessions, &challenger, |state| state.todos.create(&fields))??;
    log::debug!("Challenger {} created todo {}", challenger.0, todo.id);

    let outcome = is_maxed_out(&todo).then_some(Outcome::MaxedOutContent);
    let mut response = render(StatusCode::CREATED, representation, &todo)?;
    set_header(&mut response, LOCATION.as_str(), &format!("/todos/{}", todo.id));
    Ok(with_outcome(response, outcome))
}

pub async fn get_todo(
    req: HttpRequest,
    path: web::Path<String>,
    challenger: web::ReqData<ChallengerId>,
    sessions: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let representation = response_representation(&req)?;
    let raw_id = path.into_inner();
    let id: u64 = raw_id.parse().map_err(|_| not_found(&raw_id))?;

    let todo = read_session(&sessions, &challenger, |state| state.todos.get(id).cloned())?
        .ok_or_else(|| not_found(&raw_id))?;

    render(StatusCode::OK, representation, &TodoList::new(vec![todo]))
}

/// `POST /todos/{id}`: partial update.
pub async fn amend_todo(
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Payload,
    challenger: web::ReqData<ChallengerId>,
    sessions: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let representation = response_representation(&req)?;
    let raw_id = path.into_inner();
    let no_such = || {
        ApiError::NotFound(format!(
            "No such todo entity instance with id == {} found",
            raw_id
        ))
    };
    let id: u64 = raw_id.parse().map_err(|_| no_such())?;
    let fields = read_fields(&req, payload).await?;

    let todo = write_session(&sessions, &challenger, |state| state.todos.amend(id, &fields))?
        .map_err(|err| match err {
            StoreError::NotFound(_) => no_such(),
            other => other.into(),
        })?;

    render(StatusCode::OK, representation, &todo)
}

/// `PUT /todos/{id}`: full replace of an existing todo.
pub async fn replace_todo(
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Payload,
    challenger: web::ReqData<ChallengerId>,
    sessions: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let representation = response_representation(&req)?;
    let Ok(id) = path.into_inner().parse::<u64>() else {
        return Err(ApiError::validation(
            "Cannot create todo with PUT due to Auto fields id",
        ));
    };
    let fields = read_fields(&req, payload).await?;

    let todo = write_session(&sessions, &challenger, |state| state.todos.replace(id, &fields))??;

    let complete = [FIELD_TITLE, FIELD_DONE_STATUS, FIELD_DESCRIPTION]
        .iter()
        .all(|name| fields.contains(name));
    let outcome = if complete {
        Outcome::FullReplace
    } else {
        Outcome::PartialReplace
    };

    let response = render(StatusCode::OK, representation, &todo)?;
    Ok(with_outcome(response, Some(outcome)))
}

pub async fn delete_todo(
    path: web::Path<String>,
    challenger: web::ReqData<ChallengerId>,
    sessions: web::Data<SessionRegistry>,
) -> Result<HttpResponse> {
    let raw_id = path.into_inner();
    let id: u64 = raw_id.parse().map_err(|_| not_found(&raw_id))?;

    let emptied = write_session(&sessions, &challenger, |state| {
        state.todos.delete(id).map(|_| state.todos.is_empty())
    })??;
    log::debug!("Challenger {} deleted todo {}", challenger.0, id);

    let outcome = emptied.then_some(Outcome::StoreEmptied);
    Ok(with_outcome(HttpResponse::Ok().finish(), outcome))
}
