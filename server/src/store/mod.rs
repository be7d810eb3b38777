//! Per-session todo collection and its validation rules.

pub mod todos;
pub mod validation;

pub use todos::{StoreError, TodoStore};
pub use validation::{validate, Intent, TodoDraft};
