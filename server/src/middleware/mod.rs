pub mod auth;
pub mod challenger;
pub mod method_override;
pub mod payload_limit;
pub mod tracker;

pub use auth::{auth_middleware, AUTH_TOKEN_HEADER};
pub use challenger::{challenger_middleware, ChallengerId, CHALLENGER_HEADER};
pub use method_override::{effective_method, method_override_middleware, METHOD_OVERRIDE_HEADER};
pub use payload_limit::payload_limit_middleware;
pub use tracker::challenge_tracker_middleware;
