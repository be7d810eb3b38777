//! Resource documents exchanged with the todo API.
//!
//! Every document has a JSON rendering (camelCase field names) and an XML
//! rendering that mirrors the same fields under a fixed root element.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maximum number of characters allowed in a todo title.
pub const MAX_TITLE_LEN: usize = 50;

/// Maximum number of characters allowed in a todo description.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// A single todo item as it appears on the wire.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub done_status: bool,
    #[serde(default)]
    pub description: String,
}

impl Todo {
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>, done_status: bool, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done_status,
            description: description.into(),
        }
    }
}

/// Collection wrapper used by `GET /todos` and the session database routes.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoList {
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl TodoList {
    #[must_use]
    pub fn new(todos: Vec<Todo>) -> Self {
        Self { todos }
    }
}

/// Body of the secret note routes.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretNote {
    #[serde(default)]
    pub note: String,
}

/// Shared shape of every error response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_messages: Vec<String>,
}

impl ErrorBody {
    #[must_use]
    pub fn new(error_messages: Vec<String>) -> Self {
        Self { error_messages }
    }

    #[must_use]
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            error_messages: vec![message.into()],
        }
    }
}

/// Restorable progress of one challenger session.
///
/// `challengeStatus` is keyed by the stable challenge key, so the XML form
/// uses valid element names.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengerSnapshot {
    #[serde(default)]
    pub x_challenger: String,
    #[serde(default)]
    pub x_auth_token: String,
    #[serde(default)]
    pub secret_note: String,
    #[serde(default)]
    pub challenge_status: BTreeMap<String, bool>,
}

/// One entry of the static challenge catalogue.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChallengeDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChallengeList {
    pub challenges: Vec<ChallengeDescriptor>,
}
