//! Bearer token issuance and verification.
//!
//! Tokens are gateway-local and opaque to clients: a base64url JSON payload
//! carrying subject, domain, and expiry, plus a keyed SHA-256 digest. The
//! format is a boundary detail of this server; nothing in the pipeline
//! depends on it.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use sauti_core::{AccountDomain, Error, Principal, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    dom: AccountDomain,
    exp: i64,
}

/// Signs and verifies bearer tokens with the gateway's startup secret.
pub struct TokenSigner {
    secret: String,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Issue a token for the principal, valid from `now` for the configured
    /// lifetime.
    pub fn issue(&self, principal: &Principal, now: DateTime<Utc>) -> String {
        let claims = Claims {
            sub: principal.username.clone(),
            dom: principal.domain,
            exp: (now + self.ttl).timestamp(),
        };
        let payload =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).expect("claims serialize"));
        let signature = self.sign(&payload);
        format!("{payload}.{signature}")
    }

    /// Verify a presented token. Any defect (shape, signature, expiry)
    /// collapses to `AuthenticationFailed`; callers get no oracle about
    /// which part failed.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Principal> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or(Error::AuthenticationFailed)?;

        if self.sign(payload) != signature {
            return Err(Error::AuthenticationFailed);
        }

        let raw = URL_SAFE_NO_PAD
            .decode(payload.as_bytes())
            .map_err(|_| Error::AuthenticationFailed)?;
        let claims: Claims =
            serde_json::from_slice(&raw).map_err(|_| Error::AuthenticationFailed)?;

        if claims.exp <= now.timestamp() {
            return Err(Error::AuthenticationFailed);
        }

        Ok(Principal {
            username: claims.sub,
            domain: claims.dom,
        })
    }

    fn sign(&self, payload: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b".");
        hasher.update(payload.as_bytes());
        let digest = hasher.finalize();
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal {
            username: "amina".into(),
            domain: AccountDomain::User,
        }
    }

    #[test]
    fn round_trips() {
        let signer = TokenSigner::new("secret", 3600);
        let now = Utc::now();
        let token = signer.issue(&principal(), now);

        let verified = signer.verify(&token, now).expect("valid token");
        assert_eq!(verified, principal());
    }

    #[test]
    fn rejects_tampered_tokens() {
        let signer = TokenSigner::new("secret", 3600);
        let now = Utc::now();
        let token = signer.issue(&principal(), now);

        let mut tampered = token.clone();
        tampered.push('a');
        assert!(signer.verify(&tampered, now).is_err());
        assert!(signer.verify("no-dot-here", now).is_err());
    }

    #[test]
    fn rejects_foreign_secrets_and_expiry() {
        let signer = TokenSigner::new("secret", 3600);
        let other = TokenSigner::new("other", 3600);
        let now = Utc::now();
        let token = signer.issue(&principal(), now);

        assert!(other.verify(&token, now).is_err());
        assert!(signer
            .verify(&token, now + Duration::seconds(3601))
            .is_err());
    }
}
