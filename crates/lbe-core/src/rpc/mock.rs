use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CoreError, RpcError};

use super::CoinRpc;

/// A mock coin daemon for testing. Serves canned `getblock` and transaction
/// data populated via the builder pattern, and counts calls per method.
pub struct MockRpc {
    best_block: Mutex<Option<String>>,
    blocks: HashMap<String, Value>,
    raw_txs: HashMap<String, String>,
    decoded_txs: HashMap<String, Value>,
    errors: HashMap<(String, String), (i64, String)>,
    unreachable: HashSet<(String, String)>,
    offline: bool,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockRpc {
    pub fn builder() -> MockRpcBuilder {
        MockRpcBuilder {
            best_block: None,
            blocks: HashMap::new(),
            raw_txs: HashMap::new(),
            decoded_txs: HashMap::new(),
            errors: HashMap::new(),
            unreachable: HashSet::new(),
            offline: false,
        }
    }

    /// Number of times `method` has been called.
    pub fn calls(&self, method: &str) -> usize {
        self.calls
            .lock()
            .expect("call counter lock poisoned")
            .get(method)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .expect("call counter lock poisoned")
            .values()
            .sum()
    }

    /// Move the chain tip, as if a new block had been mined.
    pub fn set_best_block(&self, hash: &str) {
        *self.best_block.lock().expect("best block lock poisoned") = Some(hash.to_owned());
    }

    fn record(&self, method: &str) {
        *self
            .calls
            .lock()
            .expect("call counter lock poisoned")
            .entry(method.to_owned())
            .or_default() += 1;
    }
}

/// The raw hex the mock hands out for `txid`.
pub fn raw_hex_for(txid: &str) -> String {
    format!("rawtx-{txid}")
}

fn server_error(code: i64, message: &str) -> CoreError {
    RpcError::ServerError {
        code,
        message: message.to_owned(),
    }
    .into()
}

pub struct MockRpcBuilder {
    best_block: Option<String>,
    blocks: HashMap<String, Value>,
    raw_txs: HashMap<String, String>,
    decoded_txs: HashMap<String, Value>,
    errors: HashMap<(String, String), (i64, String)>,
    unreachable: HashSet<(String, String)>,
    offline: bool,
}

impl MockRpcBuilder {
    pub fn with_best_block(mut self, hash: &str) -> Self {
        self.best_block = Some(hash.to_owned());
        self
    }

    /// Register a raw `getblock` result, keyed by its `hash` field.
    pub fn with_block(mut self, block: Value) -> Self {
        let hash = block["hash"].as_str().unwrap_or_default().to_owned();
        self.blocks.insert(hash, block);
        self
    }

    /// Register a decoded transaction, keyed by its `txid` field. The matching
    /// `getrawtransaction` result is [`raw_hex_for`] the txid.
    pub fn with_tx(mut self, decoded: Value) -> Self {
        let txid = decoded["txid"].as_str().unwrap_or_default().to_owned();
        let hex = raw_hex_for(&txid);
        self.raw_txs.insert(txid, hex.clone());
        self.decoded_txs.insert(hex, decoded);
        self
    }

    /// Fail `method` with a daemon error when its first parameter is `param`.
    pub fn with_error(mut self, method: &str, param: &str, code: i64, message: &str) -> Self {
        self.errors.insert(
            (method.to_owned(), param.to_owned()),
            (code, message.to_owned()),
        );
        self
    }

    /// Fail `method` as if the daemon dropped the connection when its first
    /// parameter is `param`. Other calls still succeed.
    pub fn with_transport_error(mut self, method: &str, param: &str) -> Self {
        self.unreachable.insert((method.to_owned(), param.to_owned()));
        self
    }

    /// Every call fails as if the daemon were unreachable.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn build(self) -> MockRpc {
        MockRpc {
            best_block: Mutex::new(self.best_block),
            blocks: self.blocks,
            raw_txs: self.raw_txs,
            decoded_txs: self.decoded_txs,
            errors: self.errors,
            unreachable: self.unreachable,
            offline: self.offline,
            calls: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CoinRpc for MockRpc {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, CoreError> {
        self.record(method);
        if self.offline {
            return Err(RpcError::HttpStatus { status: 503 }.into());
        }

        let first = params
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let key = (method.to_owned(), first.clone());
        if self.unreachable.contains(&key) {
            return Err(RpcError::HttpStatus { status: 503 }.into());
        }
        if let Some((code, message)) = self.errors.get(&key) {
            return Err(server_error(*code, message));
        }

        match method {
            "getbestblockhash" => self
                .best_block
                .lock()
                .expect("best block lock poisoned")
                .clone()
                .map(Value::String)
                .ok_or_else(|| server_error(-1, "no best block")),
            "getblock" => self
                .blocks
                .get(&first)
                .cloned()
                .ok_or_else(|| server_error(-5, "Block not found")),
            "getrawtransaction" => self
                .raw_txs
                .get(&first)
                .cloned()
                .map(Value::String)
                .ok_or_else(|| server_error(-5, "No such mempool or blockchain transaction")),
            "decoderawtransaction" => self
                .decoded_txs
                .get(&first)
                .cloned()
                .ok_or_else(|| server_error(-22, "TX decode failed")),
            _ => Err(server_error(-32601, "Method not found")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::test_util::*;
    use serde_json::json;

    #[tokio::test]
    async fn serves_blocks_and_counts_calls() {
        let rpc = fixture_chain().build();
        let block = rpc
            .call("getblock", vec![json!("b1"), json!(true)])
            .await
            .expect("known block");
        assert_eq!(block["previousblockhash"], json!(GENESIS));
        assert_eq!(rpc.calls("getblock"), 1);
        assert_eq!(rpc.total_calls(), 1);
    }

    #[tokio::test]
    async fn unknown_block_is_protocol_failure() {
        let rpc = fixture_chain().build();
        let err = rpc
            .call("getblock", vec![json!("nope"), json!(true)])
            .await
            .expect_err("unknown block");
        assert_eq!(err.rpc_kind(), Some(FailureKind::Protocol));
    }

    #[tokio::test]
    async fn offline_is_transport_failure() {
        let rpc = MockRpc::builder().offline().build();
        let err = rpc
            .call("getbestblockhash", Vec::new())
            .await
            .expect_err("offline");
        assert_eq!(err.rpc_kind(), Some(FailureKind::Transport));
        assert_eq!(rpc.calls("getbestblockhash"), 1);
    }

    #[tokio::test]
    async fn targeted_transport_error_spares_other_calls() {
        let rpc = fixture_chain()
            .with_transport_error("getrawtransaction", "c0")
            .build();
        let err = rpc
            .call("getrawtransaction", vec![json!("c0")])
            .await
            .expect_err("c0 is unreachable");
        assert_eq!(err.rpc_kind(), Some(FailureKind::Transport));

        rpc.call("getrawtransaction", vec![json!("c1")])
            .await
            .expect("c1 still served");
    }

    #[tokio::test]
    async fn raw_transaction_round_trips_through_decode() {
        let rpc = fixture_chain().build();
        let hex = rpc
            .call("getrawtransaction", vec![json!("c0")])
            .await
            .expect("known tx");
        assert_eq!(hex, json!(raw_hex_for("c0")));
        let decoded = rpc
            .call("decoderawtransaction", vec![hex])
            .await
            .expect("decodable");
        assert_eq!(decoded["txid"], json!("c0"));
    }
}
