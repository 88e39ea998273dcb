use thiserror::Error;

/// Faults raised by the ledger. A rejected proof is not one of these;
/// see `MineOutcome::Rejected`.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid transaction: {0}")]
    InvalidTransaction(&'static str),

    #[error("chain invariant violated: {0}")]
    InvariantViolation(String),

    #[error("ledger lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl actix_web::ResponseError for LedgerError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            LedgerError::InvalidTransaction(_) => StatusCode::BAD_REQUEST,
            LedgerError::InvariantViolation(_) | LedgerError::LockPoisoned => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code())
            .json(crate::api::models::MessageResponse::new(self.to_string()))
    }
}
