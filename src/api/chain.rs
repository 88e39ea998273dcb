use actix_web::{HttpResponse, get, web};

use super::models::{AppState, ChainResponse, LastBlockResponse, ValidateResponse};
use crate::error::LedgerError;

/// Get the full blockchain.
#[get("/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> Result<HttpResponse, LedgerError> {
    let chain = state.ledger.full_chain()?;
    Ok(HttpResponse::Ok().json(ChainResponse {
        length: chain.len(),
        chain: &chain,
    }))
}

/// Get the most recent block.
#[get("/last_block")]
pub async fn get_last_block(state: web::Data<AppState>) -> Result<HttpResponse, LedgerError> {
    let last_block = state.ledger.last_block()?;
    Ok(HttpResponse::Ok().json(LastBlockResponse { last_block }))
}

/// Validate the whole chain.
#[get("/validate")]
pub async fn validate_chain(state: web::Data<AppState>) -> Result<HttpResponse, LedgerError> {
    let valid = state.ledger.validate_chain()?;
    Ok(HttpResponse::Ok().json(ValidateResponse {
        valid,
        length: state.ledger.height()?,
        difficulty: state.ledger.difficulty(),
    }))
}
