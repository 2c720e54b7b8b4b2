//! Memoization of daemon calls and derived results.
//!
//! The [`Cache`] trait is injected into the [`Explorer`](crate::explorer::Explorer)
//! at construction. Three stores are provided: [`MemoryCache`] (unbounded,
//! the default), [`BoundedCache`] (capacity-limited) and [`NoopCache`]
//! (memoization disabled, for callers that need live data).

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use tokio::sync::RwLock;

// ==============================================================================
// Cache Key
// ==============================================================================

/// What a cached value was produced by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    /// A single daemon RPC method.
    Rpc(String),
    LastNBlocks,
    Transactions,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rpc(method) => write!(f, "rpc.{method}"),
            Self::LastNBlocks => write!(f, "last_n_blocks"),
            Self::Transactions => write!(f, "transactions"),
        }
    }
}

/// Deterministic key for one memoized call.
///
/// Parameters are stored as their compact JSON array encoding, so string
/// parameters are quoted and escaped and distinct parameter lists never
/// produce the same key. The display form is `"{operation}:{params}"`,
/// e.g. `rpc.getblock:["00ab",true]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: Operation,
    params: String,
}

impl CacheKey {
    pub fn new(operation: Operation, params: &[serde_json::Value]) -> Self {
        // Serializing a slice of `Value` cannot fail.
        let params = serde_json::to_string(params).unwrap_or_default();
        Self { operation, params }
    }

    pub fn rpc(method: &str, params: &[serde_json::Value]) -> Self {
        Self::new(Operation::Rpc(method.to_owned()), params)
    }

    pub fn last_n_blocks(best_block_hash: &str, limit: usize) -> Self {
        Self::new(
            Operation::LastNBlocks,
            &[
                serde_json::json!(best_block_hash),
                serde_json::json!(limit),
            ],
        )
    }

    pub fn transactions(txids: &[String]) -> Self {
        let params: Vec<serde_json::Value> = txids.iter().map(|t| serde_json::json!(t)).collect();
        Self::new(Operation::Transactions, &params)
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operation, self.params)
    }
}

// ==============================================================================
// Cache Trait
// ==============================================================================

/// A keyed store of JSON values.
///
/// Implementations must tolerate concurrent `get`/`set` from many requests.
/// Racing writers may both store a value for the same key; the values are
/// equal because daemon reads are idempotent.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Option<serde_json::Value>;

    async fn set(&self, key: CacheKey, value: serde_json::Value);
}

// ==============================================================================
// Memory Cache
// ==============================================================================

/// Unbounded in-memory cache. Entries live until the process exits.
pub struct MemoryCache {
    entries: RwLock<HashMap<CacheKey, serde_json::Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: CacheKey, value: serde_json::Value) {
        self.entries.write().await.insert(key, value);
    }
}

// ==============================================================================
// Bounded Cache
// ==============================================================================

/// Capacity-limited cache for long-running explorers on busy chains.
pub struct BoundedCache {
    entries: quick_cache::sync::Cache<CacheKey, serde_json::Value>,
}

impl BoundedCache {
    /// `capacity` is the maximum number of entries; zero is clamped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: quick_cache::sync::Cache::new(capacity.max(1)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }
}

#[async_trait]
impl Cache for BoundedCache {
    async fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        self.entries.get(key)
    }

    async fn set(&self, key: CacheKey, value: serde_json::Value) {
        self.entries.insert(key, value);
    }
}

// ==============================================================================
// No-op Cache
// ==============================================================================

/// Stores nothing; every lookup misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

#[async_trait]
impl Cache for NoopCache {
    async fn get(&self, _key: &CacheKey) -> Option<serde_json::Value> {
        None
    }

    async fn set(&self, _key: CacheKey, _value: serde_json::Value) {}
}
