//! Domain types for the explorer's block and transaction model.
//!
//! `Block` and `Transaction` mirror the daemon's `getblock` and
//! `decoderawtransaction` results as open records: the fields the explorer
//! reads are named, everything else is kept verbatim in `extra`.
//! `SimplifiedTransaction` is the resolved view rendered on transaction pages.

use bitcoin::Amount;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Rendered in place of an address or value that could not be resolved.
pub const UNRESOLVED_MARKER: &str = "???";

// ==============================================================================
// Block
// ==============================================================================

/// A block as returned by `getblock <hash> true`, plus derived version renderings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    pub version: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    #[serde(
        rename = "previousblockhash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_block_hash: Option<String>,
    #[serde(rename = "nextblockhash", default, skip_serializing_if = "Option::is_none")]
    pub next_block_hash: Option<String>,
    /// Contained transaction ids, in block order.
    #[serde(default)]
    pub tx: Vec<String>,
    #[serde(default)]
    pub version_hex: String,
    #[serde(default)]
    pub version_bin: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Block {
    /// Build a block from a raw `getblock` result and fill in the derived fields.
    pub fn from_rpc(raw: serde_json::Value) -> Result<Self, CoreError> {
        let mut block: Block = serde_json::from_value(raw)
            .map_err(|e| CoreError::InvalidData(format!("invalid getblock result: {e}")))?;
        block.version_hex = version_hex(block.version);
        block.version_bin = version_bin(block.version);
        Ok(block)
    }

    pub fn is_genesis(&self) -> bool {
        self.previous_block_hash.is_none()
    }
}

/// `0x`-prefixed lowercase hex, no zero padding. Negative versions render
/// as their 32-bit two's complement.
pub fn version_hex(version: i32) -> String {
    format!("{version:#x}")
}

/// `0b`-prefixed binary, no zero padding.
pub fn version_bin(version: i32) -> String {
    format!("{version:#b}")
}

// ==============================================================================
// Transaction
// ==============================================================================

/// A decoded transaction as returned by `decoderawtransaction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub txid: String,
    #[serde(default)]
    pub vin: Vec<TxIn>,
    #[serde(default)]
    pub vout: Vec<TxOut>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Transaction {
    pub fn from_rpc(raw: serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(raw)
            .map_err(|e| CoreError::InvalidData(format!("invalid decoderawtransaction result: {e}")))
    }

    /// The hex coinbase payload, when the first input is a coinbase input.
    pub fn coinbase_payload(&self) -> Option<&str> {
        self.vin.first().and_then(|input| input.coinbase.as_deref())
    }
}

/// A transaction input. Coinbase inputs carry `coinbase` and no outpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxIn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vout: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TxIn {
    /// The `(txid, vout)` this input spends, if it references one.
    pub fn outpoint(&self) -> Option<(&str, u32)> {
        Some((self.txid.as_deref()?, self.vout?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxOut {
    #[serde(
        deserialize_with = "deserialize_btc_amount",
        serialize_with = "serialize_btc_amount"
    )]
    pub value: Amount,
    pub n: u32,
    #[serde(rename = "scriptPubKey", default)]
    pub script_pub_key: ScriptPubKey,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptPubKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<String>>,
    /// Single-address form reported by newer daemons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ScriptPubKey {
    /// First entry of `addresses`, falling back to `address`.
    pub fn primary_address(&self) -> Option<&str> {
        self.addresses
            .as_ref()
            .and_then(|addresses| addresses.first())
            .or(self.address.as_ref())
            .map(String::as_str)
    }
}

// ==============================================================================
// Simplified Transaction
// ==============================================================================

/// One side of a value transfer on the transaction page.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedIo {
    Known {
        address: Option<String>,
        value: Amount,
    },
    /// The spent output could not be fetched.
    Unresolved,
}

impl ResolvedIo {
    pub fn from_output(output: &TxOut) -> Self {
        Self::Known {
            address: output.script_pub_key.primary_address().map(str::to_owned),
            value: output.value,
        }
    }

    pub fn value(&self) -> Option<Amount> {
        match self {
            Self::Known { value, .. } => Some(*value),
            Self::Unresolved => None,
        }
    }
}

impl Serialize for ResolvedIo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResolvedIo", 2)?;
        match self {
            Self::Known { address, value } => {
                state.serialize_field("address", address)?;
                state.serialize_field("value", &value.to_btc())?;
            }
            Self::Unresolved => {
                state.serialize_field("address", UNRESOLVED_MARKER)?;
                state.serialize_field("value", UNRESOLVED_MARKER)?;
            }
        }
        state.end()
    }
}

/// A transaction with every input resolved to the output it spends.
#[derive(Debug, Clone, Serialize)]
pub struct SimplifiedTransaction {
    pub txid: String,
    pub is_coinbase: bool,
    /// Hex coinbase payload.
    pub coinbase: Option<String>,
    /// Coinbase payload with bytes >= 128 replaced by `.`.
    pub coinbase_text: Option<String>,
    /// Empty for coinbase transactions, otherwise one entry per input.
    pub vin: Vec<ResolvedIo>,
    pub vout: Vec<ResolvedIo>,
    pub raw_transaction: Transaction,
}

impl SimplifiedTransaction {
    /// Sum of all resolved input values.
    pub fn total_in(&self) -> Amount {
        sum_known(&self.vin)
    }

    pub fn total_out(&self) -> Amount {
        sum_known(&self.vout)
    }

    /// Fee paid, when it can be computed: not coinbase and every input resolved.
    pub fn fee(&self) -> Option<Amount> {
        if self.is_coinbase || self.vin.iter().any(|io| io.value().is_none()) {
            return None;
        }
        self.total_in().checked_sub(self.total_out())
    }
}

fn sum_known(items: &[ResolvedIo]) -> Amount {
    items
        .iter()
        .filter_map(ResolvedIo::value)
        .fold(Amount::ZERO, |acc, value| acc + value)
}

// ==============================================================================
// Amount (de)serialization
// ==============================================================================

/// Parse a BTC-denominated amount from a JSON value.
///
/// Number values are parsed via `Amount::from_float_in` to support scientific
/// notation, while string values are parsed via `Amount::from_str_in`.
pub fn parse_btc_amount(value: &serde_json::Value) -> Result<Amount, CoreError> {
    match value {
        serde_json::Value::Number(n) => {
            let parsed = n
                .as_f64()
                .ok_or_else(|| CoreError::InvalidData(format!("invalid amount `{value}`")))?;
            Amount::from_float_in(parsed, bitcoin::Denomination::Bitcoin)
                .map_err(|e| CoreError::InvalidData(format!("invalid amount `{value}`: {e}")))
        }
        serde_json::Value::String(s) => Amount::from_str_in(s, bitcoin::Denomination::Bitcoin)
            .map_err(|e| CoreError::InvalidData(format!("invalid amount `{s}`: {e}"))),
        _ => Err(CoreError::InvalidData(format!(
            "expected numeric amount, got: {value}"
        ))),
    }
}

fn deserialize_btc_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    parse_btc_amount(&value).map_err(serde::de::Error::custom)
}

fn serialize_btc_amount<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(amount.to_btc())
}
