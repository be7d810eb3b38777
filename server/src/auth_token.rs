use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::config::AuthConfig;

type HmacSha256 = Hmac<Sha256>;

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthTokenError {
    #[error("auth token secret is too short (min {MIN_SECRET_LEN} bytes)")]
    SecretTooShort,

    #[error("invalid auth token format")]
    InvalidFormat,

    #[error("auth token signature is invalid")]
    InvalidSignature,

    #[error("failed to decode auth token payload")]
    PayloadDecode,

    #[error("failed to parse auth token payload")]
    PayloadParse,

    #[error("auth token was issued to another challenger")]
    WrongChallenger,
}

/// Claims carried by an auth token. Tokens never expire; they are bound to
/// the challenger that requested them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthTokenClaims {
    pub challenger: String,
    pub issued_at_ms: u64,
    pub nonce: String,
}

#[derive(Clone)]
pub struct AuthTokenService {
    secret: Arc<[u8]>,
}

impl AuthTokenService {
    pub fn new(secret: Vec<u8>) -> Result<Self, AuthTokenError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthTokenError::SecretTooShort);
        }

        Ok(Self {
            secret: Arc::<[u8]>::from(secret),
        })
    }

    /// Service with a random per-process secret.
    pub fn ephemeral() -> Self {
        let secret = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        Self {
            secret: Arc::<[u8]>::from(secret.into_bytes()),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthTokenError> {
        match &config.secret {
            Some(secret) => Self::new(secret.as_bytes().to_vec()),
            None => {
                log::warn!("No auth token secret configured, generating an ephemeral one");
                Ok(Self::ephemeral())
            }
        }
    }

    pub fn issue_for(&self, challenger: &str) -> Result<String, AuthTokenError> {
        let claims = AuthTokenClaims {
            challenger: challenger.to_string(),
            issued_at_ms: now_ms(),
            nonce: Uuid::new_v4().simple().to_string(),
        };
        self.issue(&claims)
    }

    pub fn issue(&self, claims: &AuthTokenClaims) -> Result<String, AuthTokenError> {
        let payload = serde_json::to_vec(claims).map_err(|_| AuthTokenError::PayloadParse)?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload);
        let signature = self.sign(payload_b64.as_bytes())?;
        let signature_b64 = URL_SAFE_NO_PAD.encode(signature);
        Ok(format!("{payload_b64}.{signature_b64}"))
    }

    pub fn verify(&self, token: &str) -> Result<AuthTokenClaims, AuthTokenError> {
        let (payload_b64, signature_b64) = token
            .split_once('.')
            .ok_or(AuthTokenError::InvalidFormat)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthTokenError::InvalidFormat)?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AuthTokenError::InvalidSignature)?;
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthTokenError::InvalidSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthTokenError::PayloadDecode)?;

        serde_json::from_slice(&payload).map_err(|_| AuthTokenError::PayloadParse)
    }

    /// Verifies the token and checks it belongs to `challenger`.
    pub fn verify_for(&self, token: &str, challenger: &str) -> Result<AuthTokenClaims, AuthTokenError> {
        let claims = self.verify(token)?;
        if claims.challenger != challenger {
            return Err(AuthTokenError::WrongChallenger);
        }
        Ok(claims)
    }

    fn sign(&self, bytes: &[u8]) -> Result<Vec<u8>, AuthTokenError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AuthTokenError::InvalidSignature)?;
        mac.update(bytes);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Username/password pair from an `Authorization: Basic ...` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    pub fn parse(header: &str) -> Option<Self> {
        let (scheme, encoded) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;

        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn matches(&self, config: &AuthConfig) -> bool {
        self.username == config.username && self.password == config.password
    }
}

/// Extracts the token from an `Authorization: Bearer ...` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
