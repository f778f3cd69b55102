//! Session extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the signed-in user from a Bearer session token.
//! - [`calendar_access::CalendarSession`] -- Additionally requires a provider
//!   access token in the session.

pub mod auth;
pub mod calendar_access;
