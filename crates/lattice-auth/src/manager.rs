//! Authentication manager implementation

use std::sync::Arc;

use http::HeaderMap;
use tracing::{debug, info, warn};

use lattice_common::config::{AuthConfig, AuthScheme};
use lattice_common::error::Result;
use lattice_common::metrics;

use crate::auth::{ApiKeyAuthenticator, AuthenticatorChain, BearerTokenAuthenticator, Outcome};

/// Owns the configured authenticators and the anonymous-request policy.
pub struct AuthManager {
    chain: AuthenticatorChain,
    allow_anonymous: bool,
}

impl AuthManager {
    pub fn new(chain: AuthenticatorChain, allow_anonymous: bool) -> Self {
        Self {
            chain,
            allow_anonymous,
        }
    }

    /// Build every configured scheme, in configured order.
    ///
    /// A scheme is configured when its setting is present: a token file for
    /// bearer, a non-empty key for the API key. Any load failure aborts
    /// construction.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        info!("Initializing authentication manager");

        let mut chain = AuthenticatorChain::new();
        let mut seen = Vec::new();

        for &scheme in &config.order {
            if seen.contains(&scheme) {
                continue;
            }
            seen.push(scheme);

            match scheme {
                AuthScheme::Bearer => {
                    if let Some(path) = &config.token_file {
                        let bearer = BearerTokenAuthenticator::from_path(path)?;
                        metrics::set_token_table_size(bearer.len());
                        chain.push(Arc::new(bearer));
                    }
                }
                AuthScheme::ApiKey => {
                    if let Some(key) = config.api_key() {
                        chain.push(Arc::new(ApiKeyAuthenticator::new(key)?));
                    }
                }
            }
        }

        if config.token_file.is_some() && !seen.contains(&AuthScheme::Bearer) {
            warn!("token_file is set but bearer is not in auth.order; ignoring it");
        }
        if config.api_key().is_some() && !seen.contains(&AuthScheme::ApiKey) {
            warn!("api_key is set but api_key is not in auth.order; ignoring it");
        }

        if chain.is_empty() {
            warn!("No authentication scheme configured; all requests are anonymous");
        } else {
            info!(schemes = ?chain.schemes(), allow_anonymous = config.allow_anonymous, "Authentication enabled");
        }

        Ok(Self::new(chain, config.allow_anonymous))
    }

    /// Whether any scheme is configured
    pub fn is_enabled(&self) -> bool {
        !self.chain.is_empty()
    }

    /// Whether requests with no credentials may proceed
    pub fn allow_anonymous(&self) -> bool {
        self.allow_anonymous || !self.is_enabled()
    }

    pub fn chain(&self) -> &AuthenticatorChain {
        &self.chain
    }

    /// Authenticate a request, recording the outcome
    pub fn authenticate(&self, headers: &mut HeaderMap) -> Outcome {
        match self.chain.decide(headers) {
            Some((scheme, outcome)) => {
                metrics::record_auth_outcome(scheme, outcome.as_str());
                outcome
            }
            None => {
                debug!("No credentials presented");
                metrics::record_auth_outcome("none", Outcome::Anonymous.as_str());
                Outcome::Anonymous
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::api_key::API_KEY;
    use crate::auth::{Authenticator, Rejection};
    use http::header::AUTHORIZATION;
    use http::HeaderValue;
    use lattice_common::{ConfigLoadError, Error};
    use std::io::Write;

    fn token_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_nothing_configured() {
        let manager = AuthManager::from_config(&AuthConfig::default()).unwrap();
        assert!(!manager.is_enabled());
        assert!(manager.allow_anonymous());

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY, HeaderValue::from_static("anything"));
        assert_eq!(manager.authenticate(&mut headers), Outcome::Anonymous);
    }

    #[test]
    fn test_both_schemes_in_order() {
        let file = token_file("tok1,alice\n");
        let config = AuthConfig {
            api_key: Some("s3cret".to_string()),
            token_file: Some(file.path().to_path_buf()),
            ..AuthConfig::default()
        };

        let manager = AuthManager::from_config(&config).unwrap();
        assert!(manager.is_enabled());
        assert!(!manager.allow_anonymous());
        assert_eq!(manager.chain().schemes(), vec!["bearer", "api_key"]);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok1"));
        headers.insert(API_KEY, HeaderValue::from_static("wrong"));
        let outcome = manager.authenticate(&mut headers);
        assert_eq!(outcome.user().map(|u| u.name()), Some("alice"));

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY, HeaderValue::from_static("s3cret"));
        let outcome = manager.authenticate(&mut headers);
        assert_eq!(outcome.user().map(|u| u.name()), Some("legacyApiKeyUser"));
    }

    #[test]
    fn test_order_is_respected() {
        let file = token_file("tok1,alice\n");
        let config = AuthConfig {
            api_key: Some("s3cret".to_string()),
            token_file: Some(file.path().to_path_buf()),
            order: vec![AuthScheme::ApiKey, AuthScheme::Bearer, AuthScheme::ApiKey],
            ..AuthConfig::default()
        };

        let manager = AuthManager::from_config(&config).unwrap();
        assert_eq!(manager.chain().schemes(), vec!["api_key", "bearer"]);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok1"));
        headers.insert(API_KEY, HeaderValue::from_static("wrong"));
        assert_eq!(
            manager.authenticate(&mut headers),
            Outcome::Rejected(Rejection::InvalidApiKey)
        );
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok1");
    }

    #[test]
    fn test_opaque_basic_header_does_not_stop_the_chain() {
        let file = token_file("tok1,alice\n");
        let config = AuthConfig {
            api_key: Some("s3cret".to_string()),
            token_file: Some(file.path().to_path_buf()),
            ..AuthConfig::default()
        };
        let manager = AuthManager::from_config(&config).unwrap();
        assert_eq!(manager.chain().schemes(), vec!["bearer", "api_key"]);

        let headers = || {
            let mut headers = HeaderMap::new();
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_bytes(b"Basic dXNlcjpw\xe4ss").unwrap(),
            );
            headers.insert(API_KEY, HeaderValue::from_static("s3cret"));
            headers
        };

        let outcome = manager.authenticate(&mut headers());
        assert_eq!(outcome.user().map(|u| u.name()), Some("legacyApiKeyUser"));

        let outcome = manager.chain().authenticate(&mut headers());
        assert_eq!(outcome.user().map(|u| u.name()), Some("legacyApiKeyUser"));
    }

    #[test]
    fn test_scheme_left_out_of_order_is_skipped() {
        let file = token_file("tok1,alice\n");
        let config = AuthConfig {
            token_file: Some(file.path().to_path_buf()),
            order: vec![AuthScheme::ApiKey],
            ..AuthConfig::default()
        };

        let manager = AuthManager::from_config(&config).unwrap();
        assert!(!manager.is_enabled());
    }

    #[test]
    fn test_bad_token_file_fails_construction() {
        let file = token_file("tok1,alice\ntok1,bob\n");
        let config = AuthConfig {
            token_file: Some(file.path().to_path_buf()),
            ..AuthConfig::default()
        };

        let err = AuthManager::from_config(&config).err().unwrap();
        assert!(matches!(
            err,
            Error::ConfigLoad(ConfigLoadError::DuplicateToken { .. })
        ));
    }

    #[test]
    fn test_missing_token_file_fails_construction() {
        let config = AuthConfig {
            token_file: Some("/nonexistent/tokens.csv".into()),
            ..AuthConfig::default()
        };
        assert!(AuthManager::from_config(&config).is_err());
    }
}
