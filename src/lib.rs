//! # Clube Gateway (Reading Club API Gateway)
//!
//! `clube-gateway` is the public entry point of the reading-club platform.
//! It owns the authentication and session subsystem and forwards the
//! resolved identity to the per-domain services behind it.
//!
//! ## Sessions
//!
//! Sessions are stateless: the cookie carries a compact HMAC-SHA256 signed
//! token (`base64url(payload).signature`) holding the subject, an expiry,
//! and a schema version. The server keeps no session table; logout simply
//! clears the cookie and re-login replaces the token.
//!
//! All token and OAuth-state verification failures collapse to a single
//! "invalid" outcome. Callers never learn which check failed, so a
//! forged-token oracle cannot be built from the responses.
//!
//! ## Google login
//!
//! The OAuth2 authorization-code flow binds the round trip to both a
//! signed, time-boxed state parameter and a nonce held in a cookie scoped
//! to the callback path. An attacker would need to control the redirect
//! URL *and* the victim's cookie jar to forge a callback.
//!
//! ## Trust propagation
//!
//! Downstream services receive the caller identity as an `x-username`
//! header. The header is also honored inbound as a trusted override for
//! intra-cluster calls; the deployment boundary must strip it from
//! untrusted clients.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
