//! Signed token codec for sessions and OAuth state.
//!
//! Envelope format: `base64url(payload-json) + "." + base64url(hmac-sha256)`.
//! The same envelope carries both [`SessionPayload`] and the OAuth state
//! claim; only the payload type differs.
//!
//! Verification collapses every failure (structure, signature, JSON,
//! version, expiry, empty subject) into a single `None` so callers cannot
//! be used as an oracle for forging tokens.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Only supported session schema version.
pub const SESSION_VERSION: u8 = 1;

/// Claims embedded in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Internal user id the session belongs to.
    pub sub: String,
    /// Expiry as unix seconds; strictly in the future at verification time.
    pub exp: i64,
    /// Schema version, must equal [`SESSION_VERSION`].
    pub v: u8,
}

pub(crate) fn unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

pub(crate) fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

fn mac(secret: &str) -> HmacSha256 {
    // HMAC accepts keys of any length; an empty secret is a programmer
    // error and is rejected up front by `seal`.
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length")
}

/// Serialize and sign a claims value into the two-part envelope.
///
/// # Panics
/// Panics on an empty secret; callers must validate configuration first.
pub(crate) fn seal<T: Serialize>(claims: &T, secret: &str) -> String {
    assert!(!secret.is_empty(), "signing secret must not be empty");
    let json = serde_json::to_vec(claims).expect("claims serialize to JSON");
    let part = URL_SAFE_NO_PAD.encode(json);
    let mut mac = mac(secret);
    mac.update(part.as_bytes());
    let sig = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{part}.{sig}")
}

/// Structural and signature checks shared by session and state tokens.
///
/// Requires exactly one `.` separator with both halves non-empty, then a
/// constant-time signature comparison before the payload is even decoded.
pub(crate) fn open<T: DeserializeOwned>(token: &str, secret: &str) -> Option<T> {
    if secret.is_empty() {
        return None;
    }
    let parts: Vec<&str> = token.split('.').collect();
    let [part, sig] = parts.as_slice() else {
        return None;
    };
    if part.is_empty() || sig.is_empty() {
        return None;
    }
    let sig = URL_SAFE_NO_PAD.decode(sig.as_bytes()).ok()?;
    let mut mac = mac(secret);
    mac.update(part.as_bytes());
    mac.verify_slice(&sig).ok()?;
    let payload = URL_SAFE_NO_PAD.decode(part.as_bytes()).ok()?;
    serde_json::from_slice(&payload).ok()
}

/// Issue a signed session token for `subject` expiring in `ttl_seconds`.
#[must_use]
pub fn issue(subject: &str, secret: &str, ttl_seconds: i64) -> String {
    let payload = SessionPayload {
        sub: subject.to_string(),
        exp: unix_seconds() + ttl_seconds,
        v: SESSION_VERSION,
    };
    seal(&payload, secret)
}

/// Verify a session token; any failure yields `None`.
#[must_use]
pub fn verify(token: &str, secret: &str) -> Option<SessionPayload> {
    let payload: SessionPayload = open(token, secret)?;
    if payload.v != SESSION_VERSION {
        return None;
    }
    if payload.sub.is_empty() {
        return None;
    }
    if payload.exp <= unix_seconds() {
        return None;
    }
    Some(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn round_trip_returns_subject() {
        let token = issue("alice", SECRET, 3600);
        let payload = verify(&token, SECRET).expect("token verifies");
        assert_eq!(payload.sub, "alice");
        assert_eq!(payload.v, SESSION_VERSION);
        assert!(payload.exp > unix_seconds());
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue("alice", SECRET, 3600);
        assert!(verify(&token, "other-secret").is_none());
    }

    #[test]
    fn tampered_signature_rejected() {
        let token = issue("alice", SECRET, 3600);
        let (part, sig) = token.split_once('.').expect("two parts");
        // Flip each signature character in turn; every variant must fail.
        for (i, c) in sig.char_indices() {
            let flipped = if c == 'A' { 'B' } else { 'A' };
            let mut tampered = sig.to_string();
            tampered.replace_range(i..=i, &flipped.to_string());
            if tampered == sig {
                continue;
            }
            assert!(
                verify(&format!("{part}.{tampered}"), SECRET).is_none(),
                "flipping signature byte {i} should invalidate the token"
            );
        }
    }

    #[test]
    fn tampered_payload_rejected() {
        let token = issue("alice", SECRET, 3600);
        let (part, sig) = token.split_once('.').expect("two parts");
        let mut tampered = part.to_string();
        tampered.replace_range(0..1, "x");
        assert!(verify(&format!("{tampered}.{sig}"), SECRET).is_none());
    }

    #[test]
    fn structural_garbage_rejected() {
        assert!(verify("", SECRET).is_none());
        assert!(verify("no-separator", SECRET).is_none());
        assert!(verify(".sig-only", SECRET).is_none());
        assert!(verify("part-only.", SECRET).is_none());
        assert!(verify("a.b.c", SECRET).is_none());
    }

    #[test]
    fn expired_token_rejected_despite_valid_signature() {
        let payload = SessionPayload {
            sub: "alice".to_string(),
            exp: unix_seconds() - 1,
            v: SESSION_VERSION,
        };
        let token = seal(&payload, SECRET);
        assert!(verify(&token, SECRET).is_none());
    }

    #[test]
    fn wrong_version_rejected() {
        let payload = SessionPayload {
            sub: "alice".to_string(),
            exp: unix_seconds() + 3600,
            v: 2,
        };
        let token = seal(&payload, SECRET);
        assert!(verify(&token, SECRET).is_none());
    }

    #[test]
    fn empty_subject_rejected() {
        let token = issue("", SECRET, 3600);
        assert!(verify(&token, SECRET).is_none());
    }

    #[test]
    fn empty_secret_never_verifies() {
        let token = issue("alice", SECRET, 3600);
        assert!(verify(&token, "").is_none());
    }

    #[test]
    #[should_panic(expected = "signing secret must not be empty")]
    fn issue_with_empty_secret_panics() {
        let _ = issue("alice", "", 3600);
    }
}
