//! Authentication implementations

use std::fmt;
use std::sync::Arc;

use http::HeaderMap;
use thiserror::Error;

use crate::user::User;

pub mod api_key;
pub mod bearer;
pub mod token_file;

pub use api_key::ApiKeyAuthenticator;
pub use bearer::BearerTokenAuthenticator;

/// Authenticator trait
///
/// Implementations read only request headers, do no I/O, and are safe to
/// call from any number of request threads at once. The only mutation
/// allowed is rewriting the header they consumed, and only when the result
/// is [`Outcome::Authenticated`].
pub trait Authenticator: Send + Sync {
    /// Short scheme name used in logs and metrics
    fn scheme(&self) -> &'static str;

    /// Authenticate the request carrying `headers`
    fn authenticate(&self, headers: &mut HeaderMap) -> Outcome;
}

/// Result of running one authenticator against a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The scheme's header was absent or empty
    Anonymous,
    /// A credential was offered and did not validate
    Rejected(Rejection),
    /// The request acts as this user
    Authenticated(Arc<dyn User>),
}

impl Outcome {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Outcome::Anonymous)
    }

    pub fn user(&self) -> Option<&Arc<dyn User>> {
        match self {
            Outcome::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Outcome::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Label for metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Anonymous => "anonymous",
            Outcome::Rejected(_) => "rejected",
            Outcome::Authenticated(_) => "authenticated",
        }
    }
}

/// Why a presented credential was refused.
///
/// The `Display` text is meant for operator logs. Do not send it to clients.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("empty bearer token")]
    EmptyBearerToken,

    #[error("unknown token")]
    UnknownToken,

    #[error("invalid api key")]
    InvalidApiKey,

    #[error("malformed {header} header")]
    MalformedHeader { header: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// The credential could not be validated at all
    MalformedCredential,
    /// Well formed, but matches no known principal
    UnknownCredential,
}

impl Rejection {
    pub fn kind(self) -> RejectionKind {
        match self {
            Rejection::UnknownToken => RejectionKind::UnknownCredential,
            Rejection::EmptyBearerToken
            | Rejection::InvalidApiKey
            | Rejection::MalformedHeader { .. } => RejectionKind::MalformedCredential,
        }
    }
}

/// Ordered set of authenticators consulted until one of them has an
/// opinion.
///
/// The first non-anonymous outcome wins. Deciding what to do when every
/// scheme answers [`Outcome::Anonymous`] is left to the caller.
#[derive(Clone, Default)]
pub struct AuthenticatorChain {
    authenticators: Vec<Arc<dyn Authenticator>>,
}

impl AuthenticatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.push(authenticator);
        self
    }

    pub fn push(&mut self, authenticator: Arc<dyn Authenticator>) {
        self.authenticators.push(authenticator);
    }

    pub fn is_empty(&self) -> bool {
        self.authenticators.is_empty()
    }

    pub fn len(&self) -> usize {
        self.authenticators.len()
    }

    /// Schemes in the order they are consulted
    pub fn schemes(&self) -> Vec<&'static str> {
        self.authenticators.iter().map(|a| a.scheme()).collect()
    }

    /// Runs the chain and reports which scheme decided, if any did.
    pub fn decide(&self, headers: &mut HeaderMap) -> Option<(&'static str, Outcome)> {
        self.authenticators.iter().find_map(|authenticator| {
            match authenticator.authenticate(headers) {
                Outcome::Anonymous => None,
                outcome => Some((authenticator.scheme(), outcome)),
            }
        })
    }
}

impl Authenticator for AuthenticatorChain {
    fn scheme(&self) -> &'static str {
        "chain"
    }

    fn authenticate(&self, headers: &mut HeaderMap) -> Outcome {
        self.decide(headers)
            .map_or(Outcome::Anonymous, |(_, outcome)| outcome)
    }
}

impl fmt::Debug for AuthenticatorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatorChain")
            .field("schemes", &self.schemes())
            .finish()
    }
}
