use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::hasher::{self, Canonical};
use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A sealed batch of transactions. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: f64, // UNIX seconds (UTC), microsecond resolution
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        Self::genesis_at(now_secs())
    }

    /// Genesis block with a fixed timestamp.
    pub fn genesis_at(timestamp: f64) -> Self {
        Self {
            index: 1,
            timestamp,
            transactions: Vec::new(),
            proof: GENESIS_PROOF,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
        }
    }

    /// Seal a block that follows `previous`, stamped with the current time.
    pub fn next(previous: &Block, transactions: Vec<Transaction>, proof: u64) -> Self {
        Self {
            index: previous.index + 1,
            timestamp: now_secs(),
            transactions,
            proof,
            previous_hash: previous.hash(),
        }
    }

    pub fn hash(&self) -> String {
        hasher::digest(self)
    }

    /// The string proofs for the next block are checked against.
    pub fn reference_string(&self) -> String {
        hasher::canonical_string(self)
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 1
            && self.proof == GENESIS_PROOF
            && self.previous_hash == GENESIS_PREVIOUS_HASH
    }
}

impl Canonical for Block {
    fn canonical_value(&self) -> Value {
        let transactions: Vec<Value> = self
            .transactions
            .iter()
            .map(Canonical::canonical_value)
            .collect();
        json!({
            "index": self.index,
            "timestamp": self.timestamp,
            "transactions": transactions,
            "proof": self.proof,
            "previous_hash": self.previous_hash,
        })
    }
}

fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
