//! Request guards.
//!
//! - [`admin::RequireAdmin`] -- Requires the configured admin bearer token.
//! - [`rate_limit::enforce`] -- Per-client fixed-window request limit.

pub mod admin;
pub mod rate_limit;
