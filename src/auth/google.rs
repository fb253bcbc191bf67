//! Verification of Google-issued ID tokens.
//!
//! The browser obtains an ID token from Google Identity Services and posts it to
//! `/auth/google`. The token is an RS256 JWT signed with one of Google's rotating keys,
//! published as a JWK set; keys are cached and refetched when an unknown `kid` shows up,
//! at most once per [`MIN_REFETCH_INTERVAL`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use tokio::sync::RwLock;

/// Google's signing keys in JWK format.
pub const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Minimum time between two fetches of the key set.
pub const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(60);

const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Identity asserted by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleIdentity {
    /// Stable subject identifier (`sub`).
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The token is malformed, forged, expired, or issued for another client.
    #[error("invalid identity token: {0}")]
    InvalidToken(String),
    /// Google's key set could not be fetched or parsed.
    #[error("failed to fetch Google signing keys: {0}")]
    KeyFetch(#[from] reqwest::Error),
}

/// Checks an identity token and returns the identity it asserts.
#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<GoogleIdentity, VerifyError>;
}

#[derive(Debug, Deserialize)]
struct GoogleClaims {
    sub: String,
    email: Option<String>,
    email_verified: Option<bool>,
    name: Option<String>,
}

impl GoogleClaims {
    fn into_identity(self) -> Result<GoogleIdentity, VerifyError> {
        let email = self
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| VerifyError::InvalidToken("token carries no email".to_string()))?;

        if self.email_verified == Some(false) {
            return Err(VerifyError::InvalidToken(
                "email address is not verified".to_string(),
            ));
        }

        Ok(GoogleIdentity {
            subject: self.sub,
            email,
            name: self.name.filter(|n| !n.trim().is_empty()),
        })
    }
}

#[derive(Debug, Default)]
struct KeyCache {
    keys: Option<JwkSet>,
    /// Time of the last fetch attempt, successful or not.
    last_fetch: Option<Instant>,
}

impl KeyCache {
    fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.as_ref().and_then(|set| set.find(kid))
    }

    fn fetched_recently(&self) -> bool {
        self.last_fetch
            .is_some_and(|at| at.elapsed() < MIN_REFETCH_INTERVAL)
    }
}

/// Verifies tokens against Google's published keys for one OAuth client id.
#[derive(Debug)]
pub struct GoogleIdTokenVerifier {
    client_id: String,
    certs_url: String,
    http: reqwest::Client,
    cache: RwLock<KeyCache>,
}

impl GoogleIdTokenVerifier {
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            certs_url: GOOGLE_CERTS_URL.to_string(),
            http: reqwest::Client::new(),
            cache: RwLock::new(KeyCache::default()),
        }
    }

    async fn fetch_keys(&self) -> Result<JwkSet, VerifyError> {
        let keys = self
            .http
            .get(&self.certs_url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;
        tracing::debug!(count = keys.keys.len(), "Fetched Google signing keys");
        Ok(keys)
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, VerifyError> {
        let unknown = || VerifyError::InvalidToken(format!("unknown signing key {kid}"));

        {
            let cache = self.cache.read().await;
            if let Some(jwk) = cache.find(kid) {
                return key_from_jwk(jwk);
            }
            if cache.fetched_recently() {
                return Err(unknown());
            }
        }

        // Holding the write lock across the fetch keeps concurrent misses to one request
        let mut cache = self.cache.write().await;
        if let Some(jwk) = cache.find(kid) {
            return key_from_jwk(jwk);
        }
        if cache.fetched_recently() {
            return Err(unknown());
        }

        cache.last_fetch = Some(Instant::now());
        let fresh = self.fetch_keys().await?;
        let key = fresh.find(kid).map(key_from_jwk).transpose()?;
        cache.keys = Some(fresh);

        key.ok_or_else(unknown)
    }
}

fn key_from_jwk(jwk: &Jwk) -> Result<DecodingKey, VerifyError> {
    DecodingKey::from_jwk(jwk).map_err(|e| VerifyError::InvalidToken(e.to_string()))
}

#[async_trait]
impl IdTokenVerifier for GoogleIdTokenVerifier {
    async fn verify(&self, token: &str) -> Result<GoogleIdentity, VerifyError> {
        let header = decode_header(token).map_err(|e| VerifyError::InvalidToken(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(VerifyError::InvalidToken(format!(
                "unexpected signing algorithm {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| VerifyError::InvalidToken("token has no key id".to_string()))?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.client_id.as_str()]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let data = decode::<GoogleClaims>(token, &key, &validation)
            .map_err(|e| VerifyError::InvalidToken(e.to_string()))?;

        data.claims.into_identity()
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    use super::*;

    /// RS256 header with `kid` "rotated-key"; the signature is never checked.
    const ROTATED_KID_TOKEN: &str =
        "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCIsImtpZCI6InJvdGF0ZWQta2V5In0.eyJzdWIiOiIxIn0.c2ln";

    /// A verifier whose key endpoint refuses connections, so any fetch surfaces as `KeyFetch`.
    fn offline_verifier(cache: KeyCache) -> GoogleIdTokenVerifier {
        GoogleIdTokenVerifier {
            client_id: "client-id".to_string(),
            certs_url: "http://127.0.0.1:9/certs".to_string(),
            http: reqwest::Client::new(),
            cache: RwLock::new(cache),
        }
    }

    #[tokio::test]
    async fn test_unknown_kid_after_recent_fetch_is_rejected_without_fetching() {
        let verifier = offline_verifier(KeyCache {
            keys: Some(JwkSet { keys: Vec::new() }),
            last_fetch: Some(Instant::now()),
        });

        for _ in 0..3 {
            let result = verifier.verify(ROTATED_KID_TOKEN).await;
            assert!(
                matches!(&result, Err(VerifyError::InvalidToken(msg)) if msg.contains("rotated-key")),
                "{result:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_retried_immediately() {
        let verifier = offline_verifier(KeyCache::default());

        let first = verifier.verify(ROTATED_KID_TOKEN).await;
        assert!(matches!(first, Err(VerifyError::KeyFetch(_))));

        let second = verifier.verify(ROTATED_KID_TOKEN).await;
        assert!(matches!(second, Err(VerifyError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_rejects_malformed_token() {
        let verifier = GoogleIdTokenVerifier::new("client-id");
        let result = verifier.verify("definitely-not-a-jwt").await;
        assert!(matches!(result, Err(VerifyError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_rejects_symmetric_token_without_fetching_keys() {
        let token = encode(
            &Header::default(),
            &json!({ "sub": "1", "email": "fan@example.com", "exp": 4_102_444_800_i64 }),
            &EncodingKey::from_secret(b"guessable"),
        )
        .unwrap_or_default();

        let verifier = GoogleIdTokenVerifier::new("client-id");
        let result = verifier.verify(&token).await;
        assert!(matches!(result, Err(VerifyError::InvalidToken(msg)) if msg.contains("algorithm")));
    }

    #[test]
    fn test_claims_require_email() {
        let claims = GoogleClaims {
            sub: "123".to_string(),
            email: None,
            email_verified: Some(true),
            name: None,
        };
        assert!(claims.into_identity().is_err());
    }

    #[test]
    fn test_claims_reject_unverified_email() {
        let claims = GoogleClaims {
            sub: "123".to_string(),
            email: Some("fan@example.com".to_string()),
            email_verified: Some(false),
            name: None,
        };
        assert!(claims.into_identity().is_err());
    }

    #[test]
    fn test_claims_into_identity() {
        let claims = GoogleClaims {
            sub: "123".to_string(),
            email: Some("fan@example.com".to_string()),
            email_verified: None,
            name: Some("Fan".to_string()),
        };
        let identity = claims.into_identity().ok();
        assert_eq!(
            identity,
            Some(GoogleIdentity {
                subject: "123".to_string(),
                email: "fan@example.com".to_string(),
                name: Some("Fan".to_string()),
            })
        );
    }
}
