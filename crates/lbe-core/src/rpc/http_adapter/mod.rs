//! Native JSON-RPC client for Bitcoin Core compatible coin daemons.
//!
//! Implements [`CoinRpc`](super::CoinRpc) over JSON-RPC 1.0 using `reqwest`,
//! with basic auth (explicit or cookie file), request timeouts and optional
//! outbound rate limiting.

mod client;
mod connection;
mod protocol;

pub use client::{HttpRpcClient, RpcConfig};
