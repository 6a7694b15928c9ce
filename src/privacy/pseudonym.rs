use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use uuid::Builder;

use crate::types::{PseudonymStrategy, HASH_TOKEN_LEN};

/// Replaces direct identifiers with surrogate tokens under one policy per run
#[derive(Debug, Clone)]
pub struct Pseudonymizer {
    strategy: PseudonymStrategy,
    rng: StdRng,
    issued: HashSet<String>,
}

impl Pseudonymizer {
    pub fn new(strategy: PseudonymStrategy, seed: u64) -> Self {
        Self {
            strategy,
            rng: StdRng::seed_from_u64(seed),
            issued: HashSet::new(),
        }
    }

    /// Token for one row's identifier
    pub fn pseudonymize(&mut self, identifier: &str) -> String {
        match &self.strategy {
            PseudonymStrategy::Hash { salt } => hash_token(salt, identifier),
            PseudonymStrategy::Random => loop {
                let token = Builder::from_random_bytes(self.rng.gen())
                    .into_uuid()
                    .simple()
                    .to_string();
                if self.issued.insert(token.clone()) {
                    break token;
                }
            },
        }
    }

    /// Linkage property offered by the current policy
    pub fn linkage_policy(&self) -> &'static str {
        match self.strategy {
            PseudonymStrategy::Random => {
                "random: tokens are a function of (seed, row position) with no relation to identifiers; releases sharing a seed link by row order"
            }
            PseudonymStrategy::Hash { .. } => {
                "hash: truncated salted SHA-256, the same identifier links across runs sharing a salt"
            }
        }
    }
}

fn hash_token(salt: &str, identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(identifier.trim().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..HASH_TOKEN_LEN].to_string()
}
