//! Legacy `API_KEY` header authentication

use std::sync::Arc;

use http::{HeaderMap, HeaderName};
use tracing::{debug, warn};

use lattice_common::ConfigLoadError;

use super::{Authenticator, Outcome, Rejection};
use crate::crypto::constant_time_eq;
use crate::user::{NamedUser, User, LEGACY_API_KEY_USER};

/// Header carrying the shared key
pub const API_KEY: HeaderName = HeaderName::from_static("api_key");

/// Gates requests on a single shared secret. Every caller presenting the
/// key acts as the same legacy principal.
pub struct ApiKeyAuthenticator {
    api_key: String,
    user: Arc<dyn User>,
}

impl ApiKeyAuthenticator {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigLoadError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ConfigLoadError::EmptyApiKey);
        }

        Ok(Self {
            api_key,
            user: Arc::new(NamedUser::new(LEGACY_API_KEY_USER)),
        })
    }
}

impl Authenticator for ApiKeyAuthenticator {
    fn scheme(&self) -> &'static str {
        "api_key"
    }

    fn authenticate(&self, headers: &mut HeaderMap) -> Outcome {
        let presented = match headers.get(&API_KEY) {
            Some(value) if !value.is_empty() => value.as_bytes(),
            _ => return Outcome::Anonymous,
        };

        if constant_time_eq(presented, self.api_key.as_bytes()) {
            debug!(user = self.user.name(), "API key accepted");
            Outcome::Authenticated(self.user.clone())
        } else {
            warn!(scheme = "api_key", reason = %Rejection::InvalidApiKey, "Authentication rejected");
            Outcome::Rejected(Rejection::InvalidApiKey)
        }
    }
}

impl std::fmt::Debug for ApiKeyAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuthenticator")
            .field("api_key", &"<redacted>")
            .field("user", &self.user.name())
            .finish()
    }
}
