use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Ledger};
use crate::transaction::Transaction;

/// Shared application state: the ledger plus this node's identity.
pub struct AppState {
    pub ledger: Ledger,
    pub node_id: String,
}

impl AppState {
    pub fn new(ledger: Ledger, node_id: String) -> Self {
        Self { ledger, node_id }
    }
}

/* ---------- Generic ---------- */

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct LastBlockResponse {
    pub last_block: Block,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: usize,
}

/* ---------- Mining API Models ---------- */

/// Fields are optional so a missing one can be reported with a precise message.
#[derive(Deserialize)]
pub struct MineRequest {
    pub proof: Option<u64>,
    #[serde(rename = "minerIdentity", alias = "id")]
    pub miner_identity: Option<String>,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_block: Option<Block>,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Node ---------- */

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub node_id: String,
}
