use std::path::PathBuf;

use clap::Parser;

/// Lite block explorer for Bitcoin-derived coin daemons.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Address to bind the web server to.
    #[arg(long, default_value = "127.0.0.1", env = "LBE_BIND")]
    pub bind: String,

    /// Port to listen on.
    #[arg(long, default_value = "5000", env = "LBE_PORT")]
    pub port: u16,

    /// Coin daemon RPC host (bare host or http(s):// URL without port).
    #[arg(long, default_value = "127.0.0.1", env = "LBE_RPC_HOST")]
    pub rpc_host: String,

    /// Coin daemon RPC port.
    #[arg(long, default_value = "8332", env = "LBE_RPC_PORT")]
    pub rpc_port: u16,

    /// RPC username.
    #[arg(long, env = "LBE_RPC_USER")]
    pub rpc_user: Option<String>,

    /// RPC password.
    #[arg(long, env = "LBE_RPC_PASS")]
    pub rpc_pass: Option<String>,

    /// Cookie file with `user:password`, used when no explicit credentials are given.
    #[arg(long, env = "LBE_RPC_COOKIE_FILE")]
    pub rpc_cookie_file: Option<PathBuf>,

    /// Per-request RPC timeout in seconds.
    #[arg(long, default_value = "30", env = "LBE_RPC_TIMEOUT_SECS")]
    pub rpc_timeout_secs: u64,

    /// Limit outbound RPC requests per second.
    #[arg(long, env = "LBE_RPC_REQUESTS_PER_SECOND")]
    pub rpc_requests_per_second: Option<u32>,

    /// Coin name shown in page titles.
    #[arg(long, default_value = "Bitcoin", env = "LBE_COIN")]
    pub coin: String,

    /// Number of ancestors of the best block listed on the index page.
    #[arg(long, default_value = "100", env = "LBE_LAST_BLOCKS")]
    pub last_blocks: usize,

    /// Disable memoization of daemon calls (always show live data).
    #[arg(long, env = "LBE_NO_CACHE")]
    pub no_cache: bool,

    /// Bound the cache to this many entries instead of keeping everything.
    #[arg(long, env = "LBE_CACHE_CAPACITY", conflicts_with = "no_cache")]
    pub cache_capacity: Option<usize>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, env = "LBE_DEBUG")]
    pub debug: bool,
}
