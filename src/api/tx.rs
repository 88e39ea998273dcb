use actix_web::{HttpResponse, get, post, web};
use log::{info, warn};

use super::models::{AppState, MessageResponse, NewTxRequest, NewTxResponse, PendingResponse};
use crate::error::LedgerError;

/// Submit a new transaction into the pool.
#[post("/transactions/new")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> Result<HttpResponse, LedgerError> {
    let NewTxRequest {
        sender: Some(sender),
        recipient: Some(recipient),
        amount: Some(amount),
    } = body.into_inner()
    else {
        warn!("POST /transactions/new - rejected: missing values");
        return Ok(HttpResponse::BadRequest().json(MessageResponse::new("Missing values")));
    };

    let index = state.ledger.submit_transaction(&sender, &recipient, amount)?;
    info!("POST /transactions/new - {sender} -> {recipient} ({amount}) queued for block {index}");

    Ok(HttpResponse::Created().json(NewTxResponse {
        message: format!("Transaction will post to block {index}."),
        index,
    }))
}

/// List transactions waiting for the next block.
#[get("/transactions/pending")]
pub async fn get_pending(state: web::Data<AppState>) -> Result<HttpResponse, LedgerError> {
    let transactions = state.ledger.pending_transactions()?;
    Ok(HttpResponse::Ok().json(PendingResponse {
        size: transactions.len(),
        transactions,
    }))
}
