use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use lbe_core::{Block, SimplifiedTransaction};

use super::error::{map_core_error, AppError};
use super::{parse_block_hash, parse_txid, SharedState};

// ==============================================================================
// JSON API Handlers
// ==============================================================================

#[derive(Serialize)]
pub(super) struct TxResponse {
    #[serde(flatten)]
    tx: SimplifiedTransaction,
    total_in: f64,
    total_out: f64,
    /// Absent for coinbase transactions and when an input is unresolved.
    fee: Option<f64>,
}

impl From<SimplifiedTransaction> for TxResponse {
    fn from(tx: SimplifiedTransaction) -> Self {
        Self {
            total_in: tx.total_in().to_btc(),
            total_out: tx.total_out().to_btc(),
            fee: tx.fee().map(|fee| fee.to_btc()),
            tx,
        }
    }
}

pub(super) async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub(super) async fn blocks(State(state): State<SharedState>) -> Result<Json<Vec<Block>>, AppError> {
    let blocks = state
        .explorer
        .last_n_blocks(state.last_blocks)
        .await
        .map_err(map_core_error)?;
    Ok(Json(blocks))
}

pub(super) async fn block(
    State(state): State<SharedState>,
    Path(hash): Path<String>,
) -> Result<Json<Block>, AppError> {
    let hash = parse_block_hash(&hash)?;
    let block = state.explorer.block(&hash).await.map_err(map_core_error)?;
    Ok(Json(block))
}

pub(super) async fn tx(
    State(state): State<SharedState>,
    Path(txid): Path<String>,
) -> Result<Json<TxResponse>, AppError> {
    let txid = parse_txid(&txid)?;
    let tx = state
        .explorer
        .simplified_transaction(&txid)
        .await
        .map_err(map_core_error)?;
    Ok(Json(tx.into()))
}

pub(super) async fn api_not_found() -> AppError {
    AppError::NotFound("API route not found".to_string())
}
