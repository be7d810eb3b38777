//! Negotiation and body plumbing shared by the handlers.

use actix_web::{
    http::{
        header::{HeaderName, HeaderValue, CONTENT_TYPE},
        StatusCode,
    },
    web, HttpRequest, HttpResponse,
};
use futures_util::StreamExt;
use protocol::{
    decode_document, decode_field_list, decode_fields, encode, select_request, select_response,
    Document, FieldMap, Representation,
};
use serde::de::DeserializeOwned;

use crate::challenges::Outcome;
use crate::config::{ServerConfig, DEFAULT_MAX_BODY_BYTES};
use crate::error::{ApiError, Result};

fn header_text<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}

/// Representation the caller accepts, from `Accept`.
pub fn response_representation(req: &HttpRequest) -> Result<Representation> {
    Ok(select_response(header_text(req, "accept"))?)
}

/// Representation of the request body, from `Content-Type`.
pub fn request_representation(req: &HttpRequest) -> Result<Representation> {
    match req.headers().get(CONTENT_TYPE) {
        None => Ok(select_request(None)?),
        Some(value) => {
            let text = value.to_str().map_err(|_| {
                ApiError::UnsupportedMediaType(String::from_utf8_lossy(value.as_bytes()).into_owned())
            })?;
            Ok(select_request(Some(text))?)
        }
    }
}

fn body_limit(req: &HttpRequest) -> usize {
    req.app_data::<web::Data<ServerConfig>>()
        .map(|config| config.max_body_bytes)
        .unwrap_or(DEFAULT_MAX_BODY_BYTES)
}

/// Reads the whole body, failing as soon as it grows past the ceiling.
pub async fn read_body(req: &HttpRequest, mut payload: web::Payload) -> Result<web::BytesMut> {
    let limit = body_limit(req);
    let mut body = web::BytesMut::new();

    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|err| ApiError::Internal(format!("Failed to read body: {err}")))?;
        if body.len() + chunk.len() > limit {
            log::warn!("Body of {} {} exceeded {} bytes", req.method(), req.path(), limit);
            return Err(ApiError::PayloadTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

pub async fn read_fields(req: &HttpRequest, payload: web::Payload) -> Result<FieldMap> {
    let representation = request_representation(req)?;
    let body = read_body(req, payload).await?;
    Ok(decode_fields(representation, &body)?)
}

pub async fn read_field_list(req: &HttpRequest, payload: web::Payload) -> Result<Vec<FieldMap>> {
    let representation = request_representation(req)?;
    let body = read_body(req, payload).await?;
    Ok(decode_field_list(representation, &body)?)
}

pub async fn read_document<T: DeserializeOwned + Default>(
    req: &HttpRequest,
    payload: web::Payload,
) -> Result<T> {
    let representation = request_representation(req)?;
    let body = read_body(req, payload).await?;
    Ok(decode_document(representation, &body)?)
}

/// Encodes `document` in the negotiated representation.
pub fn render<T: Document>(
    status: StatusCode,
    representation: Representation,
    document: &T,
) -> Result<HttpResponse> {
    let body = encode(representation, document)?;
    Ok(HttpResponse::build(status)
        .content_type(representation.mime())
        .body(body))
}

/// Sets a header on an already rendered response. Values that are not
/// valid header text are skipped.
pub fn set_header(response: &mut HttpResponse, name: &str, value: &str) {
    if let (Ok(name), Ok(value)) = (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    ) {
        response.headers_mut().insert(name, value);
    }
}

/// Attaches an outcome hint for the challenge tracker.
pub fn with_outcome(mut response: HttpResponse, outcome: Option<Outcome>) -> HttpResponse {
    if let Some(outcome) = outcome {
        response.extensions_mut().insert(outcome);
    }
    response
}
