mod api;
mod blockchain;
mod config;
mod error;
mod transaction;

use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenvy::dotenv;
use log::info;
use std::io;
use uuid::Uuid;

use api::AppState;
use blockchain::Ledger;
use config::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let cfg = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // Globally unique identity for this node, dashes stripped.
    let node_id = cfg
        .node_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    let ledger = Ledger::new(cfg.difficulty, cfg.block_reward);
    info!(
        "⛓️ Starting ledger node {node_id} at http://{}:{} (difficulty={}, reward={})",
        cfg.host, cfg.port, cfg.difficulty, cfg.block_reward
    );

    let state = web::Data::new(AppState::new(ledger, node_id));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(api::cors_headers())
            .wrap(Logger::default())
            .configure(api::init_routes)
    })
    .bind((cfg.host.as_str(), cfg.port))?
    .run()
    .await
}
