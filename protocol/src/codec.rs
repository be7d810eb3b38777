//! JSON and XML codec for the todo API documents.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::FieldMap;
use crate::media::Representation;
use crate::message::{
    ChallengeDescriptor, ChallengeList, ChallengerSnapshot, ErrorBody, SecretNote, Todo, TodoList,
};

/// Errors produced while encoding or decoding documents.
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("Failed to parse JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse XML body: {0}")]
    Xml(String),

    #[error("Request body is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Request body must be an object but was {0}")]
    NotAnObject(&'static str),

    #[error("Request body is missing the '{0}' collection")]
    MissingCollection(&'static str),
}

impl CodecError {
    fn xml(err: impl fmt::Display) -> Self {
        CodecError::Xml(err.to_string())
    }
}

/// A document with a JSON and an XML rendering.
///
/// JSON uses the serde field names directly. XML wraps the same fields in
/// [`Document::XML_ROOT`]; collections override [`Document::to_xml`] so each
/// item is rendered as its own element.
pub trait Document: Serialize {
    const XML_ROOT: &'static str;

    fn to_xml(&self) -> Result<String, CodecError> {
        quick_xml::se::to_string_with_root(Self::XML_ROOT, self).map_err(CodecError::xml)
    }
}

impl Document for Todo {
    const XML_ROOT: &'static str = "todo";
}

impl Document for TodoList {
    const XML_ROOT: &'static str = "todos";

    fn to_xml(&self) -> Result<String, CodecError> {
        #[derive(Serialize)]
        struct Items<'a> {
            todo: &'a [Todo],
        }

        quick_xml::se::to_string_with_root(Self::XML_ROOT, &Items { todo: &self.todos })
            .map_err(CodecError::xml)
    }
}

impl Document for SecretNote {
    const XML_ROOT: &'static str = "secretNote";
}

impl Document for ChallengerSnapshot {
    const XML_ROOT: &'static str = "challenger";
}

impl Document for ChallengeList {
    const XML_ROOT: &'static str = "challenges";

    fn to_xml(&self) -> Result<String, CodecError> {
        #[derive(Serialize)]
        struct Items<'a> {
            challenge: &'a [ChallengeDescriptor],
        }

        quick_xml::se::to_string_with_root(
            Self::XML_ROOT,
            &Items {
                challenge: &self.challenges,
            },
        )
        .map_err(CodecError::xml)
    }
}

impl Document for ErrorBody {
    const XML_ROOT: &'static str = "errorMessages";

    fn to_xml(&self) -> Result<String, CodecError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Items<'a> {
            error_message: &'a [String],
        }

        quick_xml::se::to_string_with_root(
            Self::XML_ROOT,
            &Items {
                error_message: &self.error_messages,
            },
        )
        .map_err(CodecError::xml)
    }
}

/// Encodes a document in the requested representation.
pub fn encode<T: Document>(representation: Representation, document: &T) -> Result<String, CodecError> {
    match representation {
        Representation::Json => Ok(serde_json::to_string(document)?),
        Representation::Xml => document.to_xml(),
    }
}

fn body_text(body: &[u8]) -> Result<Option<&str>, CodecError> {
    let text = std::str::from_utf8(body)?;
    if text.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "NULL",
        Value::Bool(_) => "BOOLEAN",
        Value::Number(_) => "NUMERIC",
        Value::String(_) => "STRING",
        Value::Array(_) => "ARRAY",
        Value::Object(_) => "OBJECT",
    }
}

fn json_object(value: Value) -> Result<FieldMap, CodecError> {
    match value {
        Value::Object(map) => Ok(FieldMap::from(map)),
        other => Err(CodecError::NotAnObject(json_kind(&other))),
    }
}

/// Decodes a single object body into loosely typed fields. An empty body
/// decodes to an empty map.
pub fn decode_fields(representation: Representation, body: &[u8]) -> Result<FieldMap, CodecError> {
    let Some(text) = body_text(body)? else {
        return Ok(FieldMap::new());
    };

    match representation {
        Representation::Json => json_object(serde_json::from_str(text)?),
        Representation::Xml => {
            let map: BTreeMap<String, String> =
                quick_xml::de::from_str(text).map_err(CodecError::xml)?;
            Ok(FieldMap::from(map))
        }
    }
}

/// Decodes a `todos` collection body into one field map per entry.
pub fn decode_field_list(
    representation: Representation,
    body: &[u8],
) -> Result<Vec<FieldMap>, CodecError> {
    let Some(text) = body_text(body)? else {
        return Err(CodecError::MissingCollection("todos"));
    };

    match representation {
        Representation::Json => {
            let mut value: Value = serde_json::from_str(text)?;
            let todos = match value.get_mut("todos").map(Value::take) {
                Some(Value::Array(items)) => items,
                Some(_) | None => return Err(CodecError::MissingCollection("todos")),
            };
            todos.into_iter().map(json_object).collect()
        }
        Representation::Xml => {
            #[derive(Deserialize)]
            struct Items {
                #[serde(default)]
                todo: Vec<BTreeMap<String, String>>,
            }

            let items: Items = quick_xml::de::from_str(text).map_err(CodecError::xml)?;
            Ok(items.todo.into_iter().map(FieldMap::from).collect())
        }
    }
}

/// Decodes a strictly typed document such as a snapshot or a note.
pub fn decode_document<T: DeserializeOwned + Default>(
    representation: Representation,
    body: &[u8],
) -> Result<T, CodecError> {
    let Some(text) = body_text(body)? else {
        return Ok(T::default());
    };

    match representation {
        Representation::Json => Ok(serde_json::from_str(text)?),
        Representation::Xml => quick_xml::de::from_str(text).map_err(CodecError::xml),
    }
}
