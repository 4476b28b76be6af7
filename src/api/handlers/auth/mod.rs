//! Auth handlers and supporting modules.
//!
//! This module owns the gateway's session and login surface:
//!
//! - **Signed tokens** ([`token`]): stateless HMAC-SHA256 session tokens.
//!   There is no session table; expiry lives inside the token and logout
//!   just clears the cookie.
//! - **Cookies** ([`cookies`]): the `session` cookie (site-wide) and the
//!   `oauth_state` nonce cookie (scoped to the OAuth callback path).
//! - **Identity resolution** ([`identity`]): trusted `x-username` override
//!   for intra-cluster calls, session cookie otherwise.
//! - **Google OAuth** ([`oauth_state`], [`google`], [`oauth`]): the
//!   authorization-code flow, bound to a signed time-boxed state parameter
//!   plus a double-submit nonce cookie.
//! - **Dev login** ([`login`]): username login and user listing for local
//!   development, hard-disabled in production.
//!
//! Verification failures are deliberately indistinguishable from one
//! another: `verify`/`complete` return a bare `None` and the browser only
//! ever sees an opaque `error=<code>` redirect.

pub(crate) mod cookies;
mod error;
pub(crate) mod google;
pub(crate) mod identity;
pub(crate) mod login;
pub(crate) mod oauth;
pub(crate) mod oauth_state;
mod state;
pub(crate) mod token;
pub(crate) mod users;

pub use google::GoogleConfig;
pub use state::{AuthState, GatewayConfig};
