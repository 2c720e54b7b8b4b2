//! HTML rendering for the explorer pages.
//!
//! Pages are plain strings built with `format!`. Every value that came from
//! the daemon passes through [`escape`] before it is interpolated.

use axum::http::StatusCode;
use bitcoin::Amount;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use lbe_core::types::{Block, ResolvedIo, UNRESOLVED_MARKER};
use lbe_core::SimplifiedTransaction;

// ==============================================================================
// Helpers
// ==============================================================================

pub(crate) fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Unix seconds as RFC 3339 UTC, or `-` when missing or out of range.
fn format_time(unix: Option<i64>) -> String {
    unix.and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
        .and_then(|at| at.format(&Rfc3339).ok())
        .unwrap_or_else(|| "-".to_string())
}

fn format_amount(amount: Amount) -> String {
    format!("{:.8}", amount.to_btc())
}

fn block_link(hash: &str) -> String {
    let hash = escape(hash);
    format!(r#"<a class="hash" href="/block/{hash}">{hash}</a>"#)
}

fn tx_link(txid: &str) -> String {
    let txid = escape(txid);
    format!(r#"<a class="hash" href="/tx/{txid}">{txid}</a>"#)
}

fn layout(coin: &str, title: &str, body: &str) -> String {
    let coin = escape(coin);
    let title = escape(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{coin} explorer - {title}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<header><a href="/">{coin} explorer</a></header>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#
    )
}

// ==============================================================================
// Pages
// ==============================================================================

pub(crate) fn index_page(coin: &str, blocks: &[Block]) -> String {
    let mut rows = String::new();
    for block in blocks {
        let height = block
            .height
            .map_or_else(|| "-".to_string(), |h| h.to_string());
        rows.push_str(&format!(
            "<tr><td>{height}</td><td>{link}</td><td>{time}</td><td>{txs}</td><td>{version}</td></tr>\n",
            link = block_link(&block.hash),
            time = format_time(block.time),
            txs = block.tx.len(),
            version = escape(&block.version_hex),
        ));
    }
    let body = format!(
        "<table class=\"blocks\">\n<tr><th>Height</th><th>Hash</th><th>Time</th><th>Transactions</th><th>Version</th></tr>\n{rows}</table>"
    );
    layout(coin, "Latest blocks", &body)
}

pub(crate) fn block_page(coin: &str, block: &Block) -> String {
    let mut rows = String::new();
    let mut row = |name: &str, value: String| {
        rows.push_str(&format!("<tr><th>{}</th><td>{value}</td></tr>\n", escape(name)));
    };

    row("Hash", escape(&block.hash));
    if let Some(height) = block.height {
        row("Height", height.to_string());
    }
    row("Time", format_time(block.time));
    row("Version", block.version.to_string());
    row("Version (hex)", escape(&block.version_hex));
    row("Version (bin)", escape(&block.version_bin));
    row(
        "Previous block",
        block
            .previous_block_hash
            .as_deref()
            .map_or_else(|| "none (genesis)".to_string(), block_link),
    );
    if let Some(next) = block.next_block_hash.as_deref() {
        row("Next block", block_link(next));
    }
    for (name, value) in &block.extra {
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        row(name.as_str(), escape(&text));
    }

    let mut txs = String::new();
    for txid in &block.tx {
        txs.push_str(&format!("<li>{}</li>\n", tx_link(txid)));
    }

    let body = format!(
        "<table class=\"fields\">\n{rows}</table>\n<h2>Transactions ({count})</h2>\n<ul class=\"txs\">\n{txs}</ul>",
        count = block.tx.len(),
    );
    layout(coin, &format!("Block {}", block.hash), &body)
}

fn io_rows(entries: &[ResolvedIo]) -> String {
    let mut rows = String::new();
    for entry in entries {
        let (address, value) = match entry {
            ResolvedIo::Known { address, value } => (
                address
                    .as_deref()
                    .map_or_else(|| "(no address)".to_string(), escape),
                format_amount(*value),
            ),
            ResolvedIo::Unresolved => (
                UNRESOLVED_MARKER.to_string(),
                UNRESOLVED_MARKER.to_string(),
            ),
        };
        rows.push_str(&format!(
            "<tr><td class=\"address\">{address}</td><td class=\"value\">{value}</td></tr>\n"
        ));
    }
    rows
}

pub(crate) fn tx_page(coin: &str, tx: &SimplifiedTransaction) -> String {
    let inputs = if tx.is_coinbase {
        let text = tx.coinbase_text.as_deref().unwrap_or("");
        let payload = tx.coinbase.as_deref().unwrap_or("");
        format!(
            "<h2>Coinbase</h2>\n<pre class=\"coinbase\">{}</pre>\n<p class=\"raw\">{}</p>",
            escape(text),
            escape(payload),
        )
    } else {
        format!(
            "<h2>Inputs ({count})</h2>\n<table class=\"io\">\n{rows}<tr class=\"total\"><td>Total</td><td class=\"value\">{total}</td></tr>\n</table>",
            count = tx.vin.len(),
            rows = io_rows(&tx.vin),
            total = format_amount(tx.total_in()),
        )
    };

    let fee = match tx.fee() {
        Some(fee) => format!("<p class=\"fee\">Fee: {}</p>", format_amount(fee)),
        None => String::new(),
    };

    let body = format!(
        "{inputs}\n<h2>Outputs ({count})</h2>\n<table class=\"io\">\n{rows}<tr class=\"total\"><td>Total</td><td class=\"value\">{total}</td></tr>\n</table>\n{fee}",
        count = tx.vout.len(),
        rows = io_rows(&tx.vout),
        total = format_amount(tx.total_out()),
    );
    layout(coin, &format!("Transaction {}", tx.txid), &body)
}

pub(crate) fn error_page(coin: &str, status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!("<p class=\"error\">{}</p>", escape(message));
    layout(coin, title, &body)
}
