//! Wire model and content negotiation shared by the todo API server and its
//! tests.
//!
//! Documents are rendered as JSON or XML depending on the negotiated
//! [`Representation`]; request bodies decode into loosely typed [`FieldMap`]s
//! so the server can report every field problem at once.

pub mod codec;
pub mod fields;
pub mod media;
pub mod message;

pub use codec::{CodecError, Document, decode_document, decode_field_list, decode_fields, encode};
pub use fields::{FieldMap, FieldValue};
pub use media::{
    APPLICATION_JSON, APPLICATION_XML, NegotiationError, Representation, select_request,
    select_response,
};
pub use message::{
    ChallengeDescriptor, ChallengeList, ChallengerSnapshot, ErrorBody, MAX_DESCRIPTION_LEN,
    MAX_TITLE_LEN, SecretNote, Todo, TodoList,
};

/// Returns the protocol crate version string.
pub fn protocol_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
