//! # Lattice API HTTP layer
//!
//! Hands every request under `/v1` to the configured authenticators before
//! it reaches a handler:
//!
//! ```text
//! request ──► authenticate middleware ──► handler
//!               │ Authenticated: AuthenticatedUser in extensions
//!               │ Rejected:      403
//!               └ Anonymous:     401, or through when anonymous is allowed
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod middleware;
pub mod server;

pub use middleware::{authenticate, AuthenticatedUser};
pub use server::ApiServer;
