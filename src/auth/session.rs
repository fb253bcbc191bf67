//! Signed-cookie sessions.
//!
//! The cookie carries an HS256 JWT whose subject is the logged-in student's id. Nothing is
//! stored server-side; logging out clears the cookie.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: student id.
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued-at time (Unix timestamp).
    pub iat: i64,
}

impl SessionClaims {
    /// The student id carried in the subject, if well formed.
    #[must_use]
    pub fn student_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

/// Issue a session token for the given student.
///
/// # Errors
///
/// Returns an error if JWT encoding fails.
pub fn issue_session_token(student_id: i32, config: &Config) -> anyhow::Result<String> {
    let now = Utc::now().timestamp();
    let ttl = i64::try_from(config.session_ttl_secs).unwrap_or(i64::MAX / 2);

    let claims = SessionClaims {
        sub: student_id.to_string(),
        exp: now.saturating_add(ttl),
        iat: now,
    };

    let key = EncodingKey::from_secret(config.secret_key.as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| anyhow::anyhow!("Failed to encode session token: {e}"))
}

/// Validate a session token and return its claims.
///
/// # Errors
///
/// Returns an error if the token is malformed, forged, or expired.
pub fn validate_session_token(token: &str, secret: &str) -> anyhow::Result<SessionClaims> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<SessionClaims>(token, &key, &validation)
        .map_err(|e| anyhow::anyhow!("Invalid session token: {e}"))?;

    Ok(token_data.claims)
}

/// `Set-Cookie` value establishing a session.
///
/// # Errors
///
/// Returns an error if the token cannot be issued.
pub fn session_cookie(student_id: i32, config: &Config) -> anyhow::Result<HeaderValue> {
    let token = issue_session_token(student_id, config)?;
    let secure = if config.is_production() { "; Secure" } else { "" };
    let cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}{secure}",
        config.session_ttl_secs
    );
    Ok(HeaderValue::from_str(&cookie)?)
}

/// `Set-Cookie` value that removes the session cookie.
#[must_use]
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("session=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}

/// Headers to attach to a response that logs the student in.
///
/// # Errors
///
/// Returns an error if the token cannot be issued.
pub fn login_headers(student_id: i32, config: &Config) -> anyhow::Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, session_cookie(student_id, config)?);
    Ok(headers)
}

/// Read the raw session token from the request's `Cookie` headers.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::net::IpAddr;
    use std::path::PathBuf;

    use super::*;
    use crate::config::Environment;

    fn config(environment: Environment) -> Config {
        Config {
            database_url: String::new(),
            server_host: IpAddr::from([127, 0, 0, 1]),
            server_port: 0,
            environment,
            log_level: "warn".to_string(),
            secret_key: "session-test-secret".to_string(),
            session_ttl_secs: 3600,
            google_client_id: String::new(),
            admin_emails: Vec::new(),
            matches_csv: PathBuf::from("matches.csv"),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = config(Environment::Development);
        let token = issue_session_token(42, &config).unwrap_or_default();
        let claims = validate_session_token(&token, &config.secret_key);
        assert_eq!(claims.ok().and_then(|c| c.student_id()), Some(42));
    }

    #[test]
    fn test_token_signed_with_other_key_is_rejected() {
        let config = config(Environment::Development);
        let token = issue_session_token(42, &config).unwrap_or_default();
        assert!(validate_session_token(&token, "another-secret").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "1".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"session-test-secret"),
        )
        .unwrap_or_default();
        assert!(validate_session_token(&token, "session-test-secret").is_err());
    }

    #[test]
    fn test_cookie_flags() {
        let dev = session_cookie(7, &config(Environment::Development))
            .ok()
            .and_then(|v| v.to_str().map(String::from).ok())
            .unwrap_or_default();
        assert!(dev.starts_with("session="));
        assert!(dev.contains("HttpOnly"));
        assert!(dev.contains("Max-Age=3600"));
        assert!(!dev.contains("Secure"));

        let prod = session_cookie(7, &config(Environment::Production))
            .ok()
            .and_then(|v| v.to_str().map(String::from).ok())
            .unwrap_or_default();
        assert!(prod.ends_with("; Secure"));
    }

    #[test]
    fn test_session_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; session=abc.def.ghi; other=1"),
        );
        assert_eq!(session_token(&headers), Some("abc.def.ghi"));

        let mut empty = HeaderMap::new();
        empty.insert(COOKIE, HeaderValue::from_static("session="));
        assert_eq!(session_token(&empty), None);
        assert_eq!(session_token(&HeaderMap::new()), None);
    }
}
