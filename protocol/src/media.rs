//! Representation selection from `Accept` and `Content-Type` headers.

use std::fmt;

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_XML: &str = "application/xml";
const WILDCARD: &str = "*/*";

/// Wire encoding of a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Representation {
    #[default]
    Json,
    Xml,
}

impl Representation {
    /// MIME type sent back in `Content-Type`.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Representation::Json => APPLICATION_JSON,
            Representation::Xml => APPLICATION_XML,
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    #[error("Unrecognised Accept Type")]
    NotAcceptable { accept: String },

    #[error("Unsupported Content Type - {content_type}")]
    UnsupportedMediaType { content_type: String },
}

/// Strips parameters (`;q=0.9`, `;charset=utf-8`) and normalises case.
#[must_use]
pub fn essence(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Picks the response representation from an `Accept` header.
///
/// Entries are considered in listed order and the first recognised one wins;
/// quality parameters are ignored. A missing or blank header means JSON.
pub fn select_response(accept: Option<&str>) -> Result<Representation, NegotiationError> {
    let Some(accept) = accept.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(Representation::Json);
    };

    for entry in accept.split(',') {
        match essence(entry).as_str() {
            APPLICATION_XML => return Ok(Representation::Xml),
            APPLICATION_JSON | WILDCARD | "application/*" => return Ok(Representation::Json),
            _ => {}
        }
    }

    Err(NegotiationError::NotAcceptable {
        accept: accept.to_string(),
    })
}

/// Picks the request decoder from a `Content-Type` header. A missing header
/// is treated as JSON.
pub fn select_request(content_type: Option<&str>) -> Result<Representation, NegotiationError> {
    let Some(content_type) = content_type.map(essence).filter(|value| !value.is_empty()) else {
        return Ok(Representation::Json);
    };

    match content_type.as_str() {
        APPLICATION_JSON => Ok(Representation::Json),
        APPLICATION_XML => Ok(Representation::Xml),
        _ => Err(NegotiationError::UnsupportedMediaType { content_type }),
    }
}
