//! API handlers for the gateway.
//!
//! The auth subsystem (sessions, cookies, Google OAuth) lives under
//! [`auth`]; [`me`] is the authenticated passthrough to the users service
//! and [`health`] the service health endpoint.

pub mod auth;
pub mod health;
pub mod me;
