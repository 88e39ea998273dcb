mod chain;
mod health;
mod mining;
pub mod models;
mod tx;

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::middleware::DefaultHeaders;
use actix_web::web::{JsonConfig, ServiceConfig};
use actix_web::{HttpRequest, HttpResponse};
use log::warn;

pub use models::AppState;
use models::MessageResponse;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(json_error))
        .service(health::health_check)
        .service(chain::get_chain)
        .service(chain::get_last_block)
        .service(chain::validate_chain)
        .service(mining::mine_block)
        .service(tx::post_transaction)
        .service(tx::get_pending);
}

/// Malformed bodies (bad JSON, wrong types, negative proofs) answer with
/// the same `{message}` shape as every other caller error.
fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    warn!("{} {} - rejected body: {message}", req.method(), req.path());
    let resp = HttpResponse::BadRequest().json(MessageResponse::new(message));
    InternalError::from_response(err, resp).into()
}

/// Cross-origin headers attached to every response.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Headers", "Content-Type"))
        .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
}
