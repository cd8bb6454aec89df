//! Static token table loaded from a `token,username` file
//!
//! Format: one record per LF-terminated line, exactly one comma per record.
//! Fields are taken verbatim, surrounding whitespace included. Empty lines
//! (and so a trailing newline) are skipped.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use lattice_common::ConfigLoadError;

use crate::crypto::{constant_time_eq, token_digest};
use crate::user::{NamedUser, User};

struct TokenRecord {
    token: String,
    line: usize,
    user: Arc<dyn User>,
}

/// Immutable mapping from token to principal.
///
/// Keyed by the token's SHA-256 digest; a hit is confirmed with a
/// constant-time comparison of the full token.
pub struct TokenTable {
    records: HashMap<[u8; 32], TokenRecord>,
}

impl TokenTable {
    /// Reads the whole source, then parses it. The reader is dropped before
    /// this returns, whatever the result.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, ConfigLoadError> {
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .map_err(ConfigLoadError::Read)?;
        drop(reader);

        let text = String::from_utf8(buf).map_err(|_| ConfigLoadError::InvalidUtf8)?;
        Self::parse(&text)
    }

    /// Parses the full file contents. Any bad record fails the whole table.
    pub fn parse(text: &str) -> Result<Self, ConfigLoadError> {
        let mut records = HashMap::new();

        for (index, record) in text.split('\n').enumerate() {
            let line = index + 1;
            if record.is_empty() {
                continue;
            }

            let fields: Vec<&str> = record.split(',').collect();
            let [token, username] = fields[..] else {
                return Err(ConfigLoadError::MalformedRecord {
                    line,
                    fields: fields.len(),
                });
            };
            if token.is_empty() || username.is_empty() {
                return Err(ConfigLoadError::EmptyField { line });
            }

            match records.entry(token_digest(token)) {
                Entry::Occupied(existing) => {
                    let existing: &TokenRecord = existing.get();
                    return Err(ConfigLoadError::DuplicateToken {
                        line,
                        first_line: existing.line,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(TokenRecord {
                        token: token.to_string(),
                        line,
                        user: Arc::new(NamedUser::new(username)),
                    });
                }
            }
        }

        Ok(Self { records })
    }

    pub fn lookup(&self, token: &str) -> Option<&Arc<dyn User>> {
        self.records
            .get(&token_digest(token))
            .filter(|record| constant_time_eq(record.token.as_bytes(), token.as_bytes()))
            .map(|record| &record.user)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
