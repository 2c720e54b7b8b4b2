mod cli;
mod server;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eyre::WrapErr;

use lbe_core::cache::{BoundedCache, Cache, MemoryCache, NoopCache};
use lbe_core::rpc::{CoinRpc, HttpRpcClient, RpcConfig};
use lbe_core::Explorer;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let mut rpc_config = RpcConfig::new(args.rpc_host.clone(), args.rpc_port);
    rpc_config.user = args.rpc_user.clone();
    rpc_config.pass = args.rpc_pass.clone();
    rpc_config.cookie_file = args.rpc_cookie_file.clone();
    rpc_config.timeout = Duration::from_secs(args.rpc_timeout_secs);
    rpc_config.requests_per_second = args.rpc_requests_per_second;

    let rpc =
        Arc::new(HttpRpcClient::new(&rpc_config).context("configure coin daemon RPC client")?);
    let rpc_url = rpc.url().to_string();

    // Probe the daemon directly so the startup tip is not memoized. The
    // server still starts when this fails; pages then render the error page.
    match rpc.call("getbestblockhash", Vec::new()).await {
        Ok(best) => tracing::info!(url = %rpc_url, best = %best, "connected to coin daemon"),
        Err(err) => tracing::warn!("{}", format_rpc_connect_error(&rpc_url, &err.to_string())),
    }

    let cache: Arc<dyn Cache> = match (args.no_cache, args.cache_capacity) {
        (true, _) => {
            tracing::info!("daemon call caching disabled");
            Arc::new(NoopCache)
        }
        (false, Some(capacity)) => {
            tracing::info!(capacity, "using bounded daemon call cache");
            Arc::new(BoundedCache::with_capacity(capacity))
        }
        (false, None) => Arc::new(MemoryCache::new()),
    };

    let state = server::AppState {
        explorer: Arc::new(Explorer::new(rpc, cache)),
        coin: args.coin.clone(),
        last_blocks: args.last_blocks,
    };
    let router = server::build_router(state);

    let bind_addr = format!("{}:{}", args.bind, args.port);
    if args.bind == "0.0.0.0" {
        tracing::warn!("server is bound to 0.0.0.0 and reachable from the network");
    }

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context("bind TCP listener")?;

    tracing::info!("{} explorer listening on http://{bind_addr}", args.coin);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("run HTTP server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn format_rpc_connect_error(rpc_url: &str, source_error: &str) -> String {
    let mut lines = vec![
        format!("could not reach coin daemon at `{rpc_url}`"),
        format!("RPC error: {source_error}"),
    ];

    if source_error.contains("dns error") || source_error.contains("Could not resolve host") {
        lines.push("hint: hostname resolution failed; verify --rpc-host".into());
    } else if source_error.contains("401") || source_error.contains("403") {
        lines.push(
            "hint: authentication failed; verify --rpc-user/--rpc-pass or --rpc-cookie-file".into(),
        );
    } else if source_error.contains("error sending request") {
        lines.push(
            "hint: connection failed; verify the daemon is running and --rpc-port matches rpcport"
                .into(),
        );
    } else if source_error.contains("-28") {
        lines.push("hint: the daemon is still warming up; pages will work once it finishes".into());
    }
    lines.push("the explorer will keep serving and show an error page until the daemon answers".into());

    lines.join("\n")
}
