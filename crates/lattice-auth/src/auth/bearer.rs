//! `Authorization: Bearer <token>` authentication

use std::fs::File;
use std::io::Read;
use std::path::Path;

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};
use tracing::{debug, info, warn};

use lattice_common::ConfigLoadError;

use super::token_file::TokenTable;
use super::{Authenticator, Outcome, Rejection};

/// Bearer token authenticator backed by a static token table
pub struct BearerTokenAuthenticator {
    table: TokenTable,
}

impl BearerTokenAuthenticator {
    /// Build from a token file source. Fails without an authenticator if any
    /// record is bad.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigLoadError> {
        let table = TokenTable::read_from(reader)?;
        info!(tokens = table.len(), "Loaded bearer token table");
        Ok(Self { table })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let file = File::open(path.as_ref()).map_err(ConfigLoadError::Read)?;
        Self::from_reader(file)
    }

    /// Number of known tokens
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn trim_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Splits a raw header value into its scheme and credential, on the first
/// run of whitespace. The credential is empty when there is none.
fn split_scheme(value: &[u8]) -> (&[u8], &[u8]) {
    let value = trim_ascii_whitespace(value);
    match value.iter().position(u8::is_ascii_whitespace) {
        Some(i) => (&value[..i], trim_ascii_whitespace(&value[i..])),
        None => (value, &value[..0]),
    }
}

fn is_visible_ascii(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .all(|&b| b == b' ' || b == b'\t' || (0x21..=0x7e).contains(&b))
}

impl Authenticator for BearerTokenAuthenticator {
    fn scheme(&self) -> &'static str {
        "bearer"
    }

    fn authenticate(&self, headers: &mut HeaderMap) -> Outcome {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return Outcome::Anonymous;
        };
        // Only the scheme is inspected before we know the header is ours
        let (scheme, credential) = split_scheme(value.as_bytes());
        if !scheme.eq_ignore_ascii_case(b"bearer") {
            debug!(
                scheme = %String::from_utf8_lossy(scheme),
                "Authorization header is empty or uses another scheme"
            );
            return Outcome::Anonymous;
        }
        if credential.is_empty() {
            warn!(scheme = "bearer", reason = %Rejection::EmptyBearerToken, "Authentication rejected");
            return Outcome::Rejected(Rejection::EmptyBearerToken);
        }
        let credential = match std::str::from_utf8(credential) {
            Ok(credential) if is_visible_ascii(credential.as_bytes()) => credential,
            _ => {
                warn!(scheme = "bearer", "Bearer credential is not visible ASCII");
                return Outcome::Rejected(Rejection::MalformedHeader {
                    header: "authorization",
                });
            }
        };

        match self.table.lookup(credential) {
            Some(user) => {
                let user = user.clone();
                headers.insert(AUTHORIZATION, HeaderValue::from_static(""));
                debug!(user = user.name(), "Bearer token accepted");
                Outcome::Authenticated(user)
            }
            None => {
                warn!(scheme = "bearer", reason = %Rejection::UnknownToken, "Authentication rejected");
                Outcome::Rejected(Rejection::UnknownToken)
            }
        }
    }
}
