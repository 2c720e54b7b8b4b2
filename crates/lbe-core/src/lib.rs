pub mod cache;
pub mod error;
pub mod explorer;
pub mod rpc;
#[cfg(test)]
mod test_util;
pub mod types;

pub use error::{CoreError, FailureKind, RpcError};
pub use explorer::Explorer;
pub use types::{Block, SimplifiedTransaction, Transaction};
