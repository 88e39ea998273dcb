use actix_web::{HttpResponse, post, web};
use log::{debug, info};

use super::models::{AppState, MessageResponse, MineRequest, MineResponse};
use crate::blockchain::MineOutcome;
use crate::error::LedgerError;

/// Submit a proof for the current last block. Both acceptance and
/// rejection answer 200; only a malformed request is a 400.
#[post("/mine")]
pub async fn mine_block(
    state: web::Data<AppState>,
    req: web::Json<MineRequest>,
) -> Result<HttpResponse, LedgerError> {
    let MineRequest {
        proof,
        miner_identity,
    } = req.into_inner();

    let Some(proof) = proof else {
        return Ok(HttpResponse::BadRequest().json(MessageResponse::new("Proof not found.")));
    };
    let Some(miner) = miner_identity.filter(|id| !id.trim().is_empty()) else {
        return Ok(HttpResponse::BadRequest().json(MessageResponse::new("Id not found.")));
    };

    let resp = match state.ledger.mine(proof, &miner)? {
        MineOutcome::Sealed(block) => {
            info!(
                "MINER - {miner} forged block #{} with proof {proof}",
                block.index
            );
            MineResponse {
                message: "New Block Forged",
                accepted: true,
                new_block: Some(block),
            }
        }
        MineOutcome::Rejected => {
            debug!("MINER - {miner} submitted invalid proof {proof}");
            MineResponse {
                message: "Proof is invalid or already submitted.",
                accepted: false,
                new_block: None,
            }
        }
    };

    Ok(HttpResponse::Ok().json(resp))
}
