mod api;
mod error;
mod pages;
mod render;
mod static_files;

use std::sync::Arc;

use axum::routing::{any, get};
use axum::Router;
use tower_http::trace::TraceLayer;

use lbe_core::Explorer;

use error::AppError;

// ==============================================================================
// Application State
// ==============================================================================

pub struct AppState {
    pub explorer: Arc<Explorer>,
    /// Coin name shown in page titles.
    pub coin: String,
    /// Ancestors of the best block listed on the index page.
    pub last_blocks: usize,
}

type SharedState = Arc<AppState>;

// ==============================================================================
// Router
// ==============================================================================

pub fn build_router(state: AppState) -> Router {
    let shared = Arc::new(state);

    let page_routes = Router::new()
        .route("/", get(pages::index))
        .route("/block/{hash}", get(pages::block))
        .route("/tx/{hash}", get(pages::tx))
        .route("/static/{*path}", get(static_files::static_file));

    let api_routes = Router::new()
        .route("/api/v1/health", get(api::health))
        .route("/api/v1/blocks", get(api::blocks))
        .route("/api/v1/block/{hash}", get(api::block))
        .route("/api/v1/tx/{hash}", get(api::tx))
        .route("/api", any(api::api_not_found))
        .route("/api/{*path}", any(api::api_not_found));

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .fallback(pages::page_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

// ==============================================================================
// Path Validation
// ==============================================================================

fn parse_block_hash(raw: &str) -> Result<String, AppError> {
    raw.parse::<bitcoin::BlockHash>()
        .map(|hash| hash.to_string())
        .map_err(|_| AppError::BadRequest(format!("invalid block hash: {raw}")))
}

fn parse_txid(raw: &str) -> Result<String, AppError> {
    raw.parse::<bitcoin::Txid>()
        .map(|txid| txid.to_string())
        .map_err(|_| AppError::BadRequest(format!("invalid transaction id: {raw}")))
}
