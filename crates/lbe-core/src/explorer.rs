use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, trace, warn};

use crate::cache::{Cache, CacheKey, MemoryCache, NoopCache};
use crate::error::CoreError;
use crate::rpc::CoinRpc;
use crate::types::{Block, ResolvedIo, SimplifiedTransaction, Transaction, TxIn};

// ==============================================================================
// Explorer
// ==============================================================================

/// Composes daemon RPC calls into explorer views, memoizing each call.
///
/// Every operation issues its daemon calls one after another and returns a
/// fully resolved value. Cache entries are never invalidated here: the best
/// block hash is memoized like any other call, so a live chain needs either
/// a [`NoopCache`] or tolerance for a stale tip.
pub struct Explorer {
    rpc: Arc<dyn CoinRpc>,
    cache: Arc<dyn Cache>,
}

impl Explorer {
    pub fn new(rpc: Arc<dyn CoinRpc>, cache: Arc<dyn Cache>) -> Self {
        Self { rpc, cache }
    }

    /// Explorer backed by an unbounded [`MemoryCache`].
    pub fn with_memory_cache(rpc: Arc<dyn CoinRpc>) -> Self {
        Self::new(rpc, Arc::new(MemoryCache::new()))
    }

    /// Explorer that hits the daemon on every call.
    pub fn without_cache(rpc: Arc<dyn CoinRpc>) -> Self {
        Self::new(rpc, Arc::new(NoopCache))
    }

    /// Memoized daemon call. Failed calls are not stored.
    async fn rpc(&self, method: &str, params: Vec<Value>) -> Result<Value, CoreError> {
        let key = CacheKey::rpc(method, &params);
        if let Some(hit) = self.cache.get(&key).await {
            trace!(cache.key = %key, "cache hit");
            return Ok(hit);
        }

        let result = self.rpc.call(method, params).await?;
        self.cache.set(key, result.clone()).await;
        Ok(result)
    }

    async fn load<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let value = self.cache.get(key).await?;
        match serde_json::from_value(value) {
            Ok(decoded) => {
                trace!(cache.key = %key, "cache hit");
                Some(decoded)
            }
            Err(e) => {
                warn!(cache.key = %key, error = %e, "ignoring undecodable cache entry");
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: CacheKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(encoded) => self.cache.set(key, encoded).await,
            Err(e) => warn!(cache.key = %key, error = %e, "skipping cache store"),
        }
    }

    // ==========================================================================
    // Blocks
    // ==========================================================================

    pub async fn best_block_hash(&self) -> Result<String, CoreError> {
        let raw = self.rpc("getbestblockhash", Vec::new()).await?;
        raw.as_str().map(str::to_owned).ok_or_else(|| {
            CoreError::InvalidData(format!("getbestblockhash returned non-string: {raw}"))
        })
    }

    /// Fetch a block by hash, with `version_hex`/`version_bin` filled in.
    pub async fn block(&self, hash: &str) -> Result<Block, CoreError> {
        let raw = self.rpc("getblock", vec![json!(hash), json!(true)]).await?;
        Block::from_rpc(raw)
    }

    /// The best block followed by up to `limit` of its ancestors,
    /// most recent first.
    ///
    /// The list is memoized under the current best hash, so it is rebuilt
    /// whenever the tip moves while the per-block entries stay shared. A walk
    /// that fails midway stores nothing.
    pub async fn last_n_blocks(&self, limit: usize) -> Result<Vec<Block>, CoreError> {
        let best = self.best_block_hash().await?;
        let key = CacheKey::last_n_blocks(&best, limit);
        if let Some(blocks) = self.load::<Vec<Block>>(&key).await {
            return Ok(blocks);
        }

        let mut blocks = vec![self.block(&best).await?];
        for _ in 0..limit {
            let Some(previous) = blocks.last().and_then(|b| b.previous_block_hash.clone()) else {
                break;
            };
            blocks.push(self.block(&previous).await?);
        }
        debug!(best = %best, limit, fetched = blocks.len(), "walked chain tip");

        self.store(key, &blocks).await;
        Ok(blocks)
    }

    // ==========================================================================
    // Transactions
    // ==========================================================================

    /// Fetch and decode a transaction: `getrawtransaction` then
    /// `decoderawtransaction`, each memoized on its own.
    pub async fn transaction(&self, txid: &str) -> Result<Transaction, CoreError> {
        let raw = self.rpc("getrawtransaction", vec![json!(txid)]).await?;
        let hex = raw.as_str().ok_or_else(|| {
            CoreError::InvalidData(format!("getrawtransaction returned non-string for {txid}"))
        })?;
        let decoded = self.rpc("decoderawtransaction", vec![json!(hex)]).await?;
        Transaction::from_rpc(decoded)
    }

    /// Fetch several transactions, in the order given.
    pub async fn transactions(&self, txids: &[String]) -> Result<Vec<Transaction>, CoreError> {
        let key = CacheKey::transactions(txids);
        if let Some(txs) = self.load::<Vec<Transaction>>(&key).await {
            return Ok(txs);
        }

        let mut txs = Vec::with_capacity(txids.len());
        for txid in txids {
            txs.push(self.transaction(txid).await?);
        }

        self.store(key, &txs).await;
        Ok(txs)
    }

    /// Build the transaction page view for `txid`.
    ///
    /// Coinbase transactions get a decoded payload and no inputs. Otherwise
    /// each input is resolved to the output it spends; an input whose source
    /// cannot be fetched from the daemon becomes [`ResolvedIo::Unresolved`] in
    /// place, and the rest of the transaction still resolves.
    pub async fn simplified_transaction(
        &self,
        txid: &str,
    ) -> Result<SimplifiedTransaction, CoreError> {
        let tx = self.transaction(txid).await?;

        let (coinbase, coinbase_text, vin) = match tx.coinbase_payload() {
            Some(payload) => (
                Some(payload.to_owned()),
                decode_coinbase_text(payload),
                Vec::new(),
            ),
            None => {
                let mut vin = Vec::with_capacity(tx.vin.len());
                for (index, input) in tx.vin.iter().enumerate() {
                    vin.push(self.resolve_input(txid, index, input).await?);
                }
                (None, None, vin)
            }
        };

        let vout = tx.vout.iter().map(ResolvedIo::from_output).collect();

        Ok(SimplifiedTransaction {
            txid: txid.to_owned(),
            is_coinbase: coinbase.is_some(),
            coinbase,
            coinbase_text,
            vin,
            vout,
            raw_transaction: tx,
        })
    }

    /// Daemon failures on the source fetch become [`ResolvedIo::Unresolved`];
    /// a source the daemon returned but that does not decode is an error.
    async fn resolve_input(
        &self,
        txid: &str,
        index: usize,
        input: &TxIn,
    ) -> Result<ResolvedIo, CoreError> {
        let Some((prev_txid, prev_vout)) = input.outpoint() else {
            warn!(txid, input = index, "input has no outpoint");
            return Ok(ResolvedIo::Unresolved);
        };

        let source = match self.transaction(prev_txid).await {
            Ok(source) => source,
            Err(err) if err.rpc_kind().is_some() => {
                warn!(
                    txid,
                    input = index,
                    prev_txid,
                    error = %err,
                    "input source unavailable"
                );
                return Ok(ResolvedIo::Unresolved);
            }
            Err(err) => return Err(err),
        };

        match source.vout.iter().find(|output| output.n == prev_vout) {
            Some(output) => Ok(ResolvedIo::from_output(output)),
            None => {
                warn!(txid, input = index, prev_txid, prev_vout, "spent output missing from source");
                Ok(ResolvedIo::Unresolved)
            }
        }
    }
}

/// Render a hex coinbase payload as text, replacing every byte >= 128 with `.`.
/// Returns `None` if the payload is not valid hex.
pub fn decode_coinbase_text(payload_hex: &str) -> Option<String> {
    match hex::decode(payload_hex) {
        Ok(bytes) => Some(
            bytes
                .into_iter()
                .map(|b| if b < 128 { char::from(b) } else { '.' })
                .collect(),
        ),
        Err(e) => {
            warn!(error = %e, "coinbase payload is not hex");
            None
        }
    }
}
