//! Coin daemon RPC abstraction layer.
//!
//! Defines the [`CoinRpc`] trait and provides an HTTP JSON-RPC
//! implementation ([`HttpRpcClient`]) plus a test mock (`mock::MockRpc`).

mod http_adapter;
#[cfg(test)]
pub mod mock;

pub use http_adapter::{HttpRpcClient, RpcConfig};

use async_trait::async_trait;

use crate::error::CoreError;

/// Untyped JSON-RPC transport to a Bitcoin-derived coin daemon.
///
/// `call` returns the daemon's `result` field as-is. Implementations must
/// report connectivity problems and daemon-side errors as
/// [`CoreError::Rpc`] so callers can tell them apart via
/// [`crate::error::RpcError::kind`]. A failed call is never retried.
#[async_trait]
pub trait CoinRpc: Send + Sync {
    async fn call(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, CoreError>;
}
