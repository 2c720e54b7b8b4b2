//! Shared test helpers for `lbe-core` unit tests.
//!
//! Builders for raw daemon JSON (`getblock` and `decoderawtransaction`
//! results) plus a small fixed chain, so tests across modules share one
//! source of truth for dummy data.

use serde_json::{json, Value};

use crate::rpc::mock::{MockRpc, MockRpcBuilder};

// ==============================================================================
// Raw Daemon Results
// ==============================================================================

/// A verbose `getblock` result with no transactions.
pub fn raw_block(hash: &str, previous: Option<&str>, version: i32) -> Value {
    let mut block = json!({
        "hash": hash,
        "version": version,
        "time": 1_231_006_505,
        "tx": [],
    });
    if let Some(previous) = previous {
        block["previousblockhash"] = json!(previous);
    }
    block
}

fn raw_output(n: usize, address: &str, value_btc: f64) -> Value {
    json!({
        "value": value_btc,
        "n": n,
        "scriptPubKey": {
            "hex": "76a914000000000000000000000000000000000000000088ac",
            "type": "pubkeyhash",
            "addresses": [address],
        },
    })
}

fn raw_outputs(outputs: &[(&str, f64)]) -> Vec<Value> {
    outputs
        .iter()
        .enumerate()
        .map(|(n, (address, value))| raw_output(n, address, *value))
        .collect()
}

/// A decoded coinbase transaction paying `outputs` (address, BTC value).
pub fn raw_coinbase_tx(txid: &str, coinbase_hex: &str, outputs: &[(&str, f64)]) -> Value {
    json!({
        "txid": txid,
        "version": 1,
        "locktime": 0,
        "vin": [{ "coinbase": coinbase_hex, "sequence": 4_294_967_295u32 }],
        "vout": raw_outputs(outputs),
    })
}

/// A decoded transaction spending `inputs` (funding txid, vout).
pub fn raw_spending_tx(txid: &str, inputs: &[(&str, u32)], outputs: &[(&str, f64)]) -> Value {
    let vin: Vec<Value> = inputs
        .iter()
        .map(|(prev_txid, vout)| {
            json!({
                "txid": prev_txid,
                "vout": vout,
                "scriptSig": { "asm": "", "hex": "" },
                "sequence": 4_294_967_294u32,
            })
        })
        .collect();
    json!({
        "txid": txid,
        "version": 2,
        "locktime": 0,
        "vin": vin,
        "vout": raw_outputs(outputs),
    })
}

// ==============================================================================
// Fixture Chain
// ==============================================================================

/// Genesis block hash of [`fixture_chain`].
pub const GENESIS: &str = "b0";
/// Best block hash of [`fixture_chain`].
pub const TIP: &str = "b2";
/// Two-input transaction in the tip block: spends `c0:0` (50) and `c1:0` (50),
/// pays 60 + 39.9, leaving a 0.1 fee.
pub const SPEND_TXID: &str = "t1";

/// Three blocks `b0 <- b1 <- b2`, each with a coinbase, plus [`SPEND_TXID`].
pub fn fixture_chain() -> MockRpcBuilder {
    MockRpc::builder()
        .with_best_block(TIP)
        .with_block(raw_block(GENESIS, None, 1))
        .with_block(raw_block("b1", Some(GENESIS), 536_870_912))
        .with_block(raw_block(TIP, Some("b1"), 536_870_912))
        .with_tx(raw_coinbase_tx("c0", "04ffff001d", &[("addr-a", 50.0)]))
        .with_tx(raw_coinbase_tx("c1", "04ffff001d", &[("addr-b", 50.0)]))
        .with_tx(raw_spending_tx(
            SPEND_TXID,
            &[("c0", 0), ("c1", 0)],
            &[("addr-c", 60.0), ("addr-d", 39.9)],
        ))
}
