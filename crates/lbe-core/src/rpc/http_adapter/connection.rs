use std::path::Path;

use reqwest::Url;

use crate::error::CoreError;

/// Pick the daemon credentials: an explicit user/password pair wins,
/// otherwise the daemon's cookie file is read, otherwise none.
pub(super) fn resolve_auth(
    user: Option<&str>,
    pass: Option<&str>,
    cookie_file: Option<&Path>,
) -> Result<Option<(String, String)>, CoreError> {
    match (user, pass, cookie_file) {
        (Some(user), Some(pass), _) => Ok(Some((user.to_owned(), pass.to_owned()))),
        (Some(_), None, _) | (None, Some(_), _) => Err(CoreError::Config(
            "daemon RPC user and password must be given together".to_owned(),
        )),
        (None, None, Some(path)) => read_cookie(path).map(Some),
        (None, None, None) => Ok(None),
    }
}

/// Read the `user:password` line the daemon writes to its `.cookie` file.
fn read_cookie(path: &Path) -> Result<(String, String), CoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CoreError::Config(format!("cannot read daemon cookie {}: {e}", path.display()))
    })?;

    content
        .lines()
        .next()
        .map(str::trim)
        .and_then(|line| line.split_once(':'))
        .filter(|(user, pass)| !user.is_empty() && !pass.is_empty())
        .map(|(user, pass)| (user.to_owned(), pass.to_owned()))
        .ok_or_else(|| {
            CoreError::Config(format!(
                "daemon cookie {} does not start with a `user:password` line",
                path.display()
            ))
        })
}

/// Build the daemon endpoint URL from a host and port.
///
/// `host` may carry an explicit `http://` or `https://` scheme; a bare host
/// defaults to plain HTTP, which is what coin daemons serve. Bare IPv6
/// addresses are bracketed. The port always comes from `port`, so a host
/// that already names one is rejected.
pub(super) fn daemon_url(host: &str, port: u16) -> Result<String, CoreError> {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return Err(CoreError::Config("rpc host must not be empty".to_owned()));
    }

    let (scheme, rest) = host.split_once("://").unwrap_or(("http", host));
    let (authority, path) = match rest.find('/') {
        Some(at) => rest.split_at(at),
        None => (rest, ""),
    };
    if authority.is_empty() {
        return Err(CoreError::Config(format!("rpc host `{host}` has no host name")));
    }

    let authority = bracket_ipv6(authority);
    if names_port(&authority) {
        return Err(CoreError::Config(format!(
            "rpc host `{host}` must not include a port; pass the port separately"
        )));
    }

    let candidate = format!("{scheme}://{authority}:{port}{path}");
    let parsed = Url::parse(&candidate).map_err(|e| {
        CoreError::Config(format!(
            "invalid rpc endpoint `{candidate}`: expected host or HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(candidate),
        other => Err(CoreError::Config(format!(
            "unsupported rpc scheme `{other}`; expected http or https"
        ))),
    }
}

/// `::1` becomes `[::1]`; hostnames, IPv4 and bracketed literals pass through.
fn bracket_ipv6(authority: &str) -> String {
    if !authority.starts_with('[') && authority.matches(':').count() > 1 {
        format!("[{authority}]")
    } else {
        authority.to_owned()
    }
}

fn names_port(authority: &str) -> bool {
    let after_literal = match authority.rfind(']') {
        Some(end) => &authority[end + 1..],
        None => authority,
    };
    after_literal.contains(':')
}
