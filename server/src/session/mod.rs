pub mod registry;
pub mod vault;

pub use registry::{ChallengerState, RestoreOutcome, SessionError, SessionRegistry, SessionSettings};
pub use vault::SecretVault;
