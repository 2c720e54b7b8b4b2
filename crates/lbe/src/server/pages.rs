use axum::extract::{Path, State};
use axum::response::Html;

use super::error::{map_core_error, PageError};
use super::{parse_block_hash, parse_txid, render, SharedState};

// ==============================================================================
// HTML Page Handlers
// ==============================================================================

pub(super) async fn index(State(state): State<SharedState>) -> Result<Html<String>, PageError> {
    let blocks = state
        .explorer
        .last_n_blocks(state.last_blocks)
        .await
        .map_err(|e| map_core_error(e).into_page(&state.coin))?;
    Ok(Html(render::index_page(&state.coin, &blocks)))
}

pub(super) async fn block(
    State(state): State<SharedState>,
    Path(hash): Path<String>,
) -> Result<Html<String>, PageError> {
    let hash = parse_block_hash(&hash).map_err(|e| e.into_page(&state.coin))?;
    let block = state
        .explorer
        .block(&hash)
        .await
        .map_err(|e| map_core_error(e).into_page(&state.coin))?;
    Ok(Html(render::block_page(&state.coin, &block)))
}

pub(super) async fn tx(
    State(state): State<SharedState>,
    Path(txid): Path<String>,
) -> Result<Html<String>, PageError> {
    let txid = parse_txid(&txid).map_err(|e| e.into_page(&state.coin))?;
    let tx = state
        .explorer
        .simplified_transaction(&txid)
        .await
        .map_err(|e| map_core_error(e).into_page(&state.coin))?;
    Ok(Html(render::tx_page(&state.coin, &tx)))
}

pub(super) async fn page_not_found(State(state): State<SharedState>) -> PageError {
    super::error::AppError::NotFound("page not found".to_string()).into_page(&state.coin)
}
