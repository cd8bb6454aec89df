//! Lattice API authentication layer
//!
//! Maps an incoming request's headers to one of three outcomes:
//! - [`Outcome::Anonymous`]: no credential for the scheme was offered
//! - [`Outcome::Rejected`]: a credential was offered but did not validate
//! - [`Outcome::Authenticated`]: the request acts as a [`User`]
//!
//! Provides:
//! - Bearer tokens checked against a static `token,username` file
//! - A single shared key carried in the `API_KEY` header
//! - An ordered chain of schemes assembled from configuration

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod crypto;
pub mod user;

mod manager;

pub use auth::{
    ApiKeyAuthenticator, Authenticator, AuthenticatorChain, BearerTokenAuthenticator, Outcome,
    Rejection, RejectionKind,
};
pub use manager::AuthManager;
pub use user::{NamedUser, User, LEGACY_API_KEY_USER};
