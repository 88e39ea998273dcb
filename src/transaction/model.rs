use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::blockchain::hasher::Canonical;
use crate::error::{LedgerError, Result};

/// A value transfer waiting to be (or already) sealed into a block.
/// No balance or signature checks are performed on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

impl Transaction {
    /// Build a transaction, rejecting empty identifiers and non-finite amounts.
    pub fn new(sender: &str, recipient: &str, amount: f64) -> Result<Self> {
        if sender.trim().is_empty() {
            return Err(LedgerError::InvalidTransaction("sender must not be empty"));
        }
        if recipient.trim().is_empty() {
            return Err(LedgerError::InvalidTransaction("recipient must not be empty"));
        }
        if !amount.is_finite() {
            return Err(LedgerError::InvalidTransaction("amount must be a finite number"));
        }
        Ok(Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount,
        })
    }
}

impl Canonical for Transaction {
    fn canonical_value(&self) -> Value {
        json!({
            "sender": self.sender,
            "recipient": self.recipient,
            "amount": self.amount,
        })
    }
}
