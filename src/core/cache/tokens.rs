//! Run-scoped anonymization tokens
//!
//! A raw sensitive value (e.g. a source address) is replaced by a random hex
//! token the first time it is seen; later occurrences in the same run get the
//! same token so rows stay correlatable. Tokens carry no information about the
//! raw value and a new vault issues unrelated tokens.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::HashMap;

/// Random bytes per token (80 bits, 20 hex characters)
pub const TOKEN_BYTES: usize = 10;

/// Memo of raw value to opaque token
pub struct TokenVault {
    rng: StdRng,
    tokens: HashMap<String, String>,
}

impl TokenVault {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            tokens: HashMap::new(),
        }
    }

    /// Token for `raw`, issuing a new one on first sight
    pub fn tokenize(&mut self, raw: &str) -> String {
        if let Some(token) = self.tokens.get(raw) {
            return token.clone();
        }
        let mut bytes = [0u8; TOKEN_BYTES];
        self.rng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        self.tokens.insert(raw.to_string(), token.clone());
        token
    }

    /// Number of distinct raw values seen
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for TokenVault {
    fn default() -> Self {
        Self::new()
    }
}
