//! CSRF binding for the OAuth authorization-code flow.
//!
//! `begin` mints a signed state claim plus a random nonce; the state
//! rides the provider round-trip as the `state` query parameter while the
//! nonce is double-submitted through a short-lived cookie. `complete`
//! accepts the callback only when the signature checks out, the claim is
//! fresh, and the nonce in the claim matches the nonce in the cookie.

use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::token;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Lifetime of the nonce cookie, in seconds.
pub const STATE_COOKIE_TTL_SECONDS: i64 = 600;

/// A state claim older than this is rejected even with a valid signature.
pub const STATE_MAX_AGE_MS: i64 = 600_000;

const NONCE_BYTES: usize = 16;

/// Claims signed into the OAuth `state` parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateClaim {
    /// Post-login return path, already sanitized.
    pub from: String,
    /// Issue time in unix milliseconds.
    pub ts: i64,
    /// Random nonce, double-submitted via cookie.
    pub nonce: String,
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("system randomness unavailable: {0}")]
    Rng(#[from] rand::Error),
}

/// Clamp a user-supplied return path to a safe local path.
///
/// Anything that is not a single-origin absolute path collapses to `/`:
/// empty values, missing leading slash, protocol-relative `//host`, and
/// backslash smuggling.
#[must_use]
pub fn sanitize_return_path(from: Option<&str>) -> String {
    match from {
        Some(path)
            if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

/// Mint a `(state, nonce)` pair for a new authorization round-trip.
///
/// # Errors
/// Fails only when the OS randomness source is unavailable.
pub fn begin(from: &str, secret: &str) -> Result<(String, String), StateError> {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng.try_fill_bytes(&mut bytes)?;
    let nonce = URL_SAFE_NO_PAD.encode(bytes);

    let claim = StateClaim {
        from: from.to_string(),
        ts: token::unix_millis(),
        nonce: nonce.clone(),
    };

    Ok((token::seal(&claim, secret), nonce))
}

/// Validate the returned state against the double-submitted nonce.
///
/// Returns the sanitized return path, or `None` on any mismatch. Callers
/// must not distinguish why a state was rejected.
#[must_use]
pub fn complete(state: &str, cookie_nonce: &str, secret: &str) -> Option<String> {
    if cookie_nonce.is_empty() {
        return None;
    }
    let claim: StateClaim = token::open(state, secret)?;
    let age = token::unix_millis() - claim.ts;
    if !(0..=STATE_MAX_AGE_MS).contains(&age) {
        return None;
    }
    if claim.nonce != cookie_nonce {
        return None;
    }
    Some(sanitize_return_path(Some(&claim.from)))
}
