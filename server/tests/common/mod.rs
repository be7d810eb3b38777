#![allow(dead_code)]

use actix_web::web;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use server::auth_token::AuthTokenService;
use server::config::ServerConfig;
use server::session::{SessionRegistry, SessionSettings};

pub const TEST_SECRET: &[u8] = b"integration-test-secret-0123456789";

pub fn sessions() -> web::Data<SessionRegistry> {
    let tokens = AuthTokenService::new(TEST_SECRET.to_vec()).expect("valid test secret");
    web::Data::new(SessionRegistry::new(SessionSettings::default(), tokens))
}

pub fn config() -> web::Data<ServerConfig> {
    web::Data::new(ServerConfig::default())
}

/// Registers a challenger directly, returning its id and auth token.
pub fn challenger(sessions: &SessionRegistry) -> (String, String) {
    let snapshot = sessions.create().expect("create challenger");
    (snapshot.x_challenger, snapshot.x_auth_token)
}

pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

pub fn error_messages(body: &serde_json::Value) -> Vec<String> {
    body["errorMessages"]
        .as_array()
        .expect("errorMessages array")
        .iter()
        .map(|message| message.as_str().unwrap_or_default().to_string())
        .collect()
}
