use crate::error::{CoreError, RpcError};

/// Protocol version string sent with every request. Bitcoin Core and its
/// forks answer errors for 1.0 requests with HTTP 500 plus a JSON body.
pub(super) const JSONRPC_VERSION: &str = "1.0";

#[derive(serde::Serialize)]
pub(super) struct JsonRpcRequest<'a> {
    pub(super) jsonrpc: &'static str,
    pub(super) id: u64,
    pub(super) method: &'a str,
    pub(super) params: Vec<serde_json::Value>,
}

#[derive(serde::Deserialize)]
pub(super) struct JsonRpcResponse {
    pub(super) result: Option<serde_json::Value>,
    pub(super) error: Option<serde_json::Value>,
}

/// Turn an HTTP status and body into the call's `result`.
///
/// A body that decodes as a JSON-RPC envelope wins over the status code, so
/// daemon errors reported with HTTP 404/500 still surface as
/// `ServerError`. A non-JSON body with a failing status (e.g. 401 from bad
/// credentials) is reported as `HttpStatus`.
pub(super) fn decode_response(status: u16, body: &str) -> Result<serde_json::Value, CoreError> {
    let decoded: JsonRpcResponse = match serde_json::from_str(body) {
        Ok(decoded) => decoded,
        Err(_) if !(200..300).contains(&status) => {
            return Err(RpcError::HttpStatus { status }.into());
        }
        Err(e) => {
            return Err(RpcError::InvalidResponse(format!(
                "decode JSON-RPC response: {e}; body={body}"
            ))
            .into());
        }
    };

    if let Some(err) = decoded.error {
        return Err(parse_jsonrpc_error(err));
    }

    Ok(decoded.result.unwrap_or(serde_json::Value::Null))
}

/// Parse a JSON-RPC error value into a structured `CoreError`.
///
/// JSON-RPC errors are shaped as `{"code": <int>, "message": <string>}`.
/// If the error value matches that shape, we produce a `ServerError`;
/// otherwise we fall back to `InvalidResponse` with the raw JSON.
pub(super) fn parse_jsonrpc_error(err: serde_json::Value) -> CoreError {
    #[derive(serde::Deserialize)]
    struct JsonRpcError {
        code: i64,
        message: String,
    }

    match serde_json::from_value::<JsonRpcError>(err.clone()) {
        Ok(parsed) => RpcError::ServerError {
            code: parsed.code,
            message: parsed.message,
        }
        .into(),
        Err(_) => RpcError::InvalidResponse(format!("non-standard JSON-RPC error: {err}")).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn decode_response_returns_result() {
        let body = r#"{"result":"00ff","error":null,"id":1}"#;
        let value = decode_response(200, body).expect("should decode");
        assert_eq!(value, serde_json::json!("00ff"));
    }

    #[test]
    fn decode_response_missing_result_is_null() {
        let value = decode_response(200, r#"{"error":null,"id":1}"#).expect("should decode");
        assert!(value.is_null());
    }

    #[test]
    fn decode_response_error_object_on_http_500_is_server_error() {
        let body = r#"{"result":null,"error":{"code":-5,"message":"Block not found"},"id":1}"#;
        let err = decode_response(500, body).expect_err("must fail");
        assert!(matches!(
            err,
            CoreError::Rpc(RpcError::ServerError { code: -5, ref message }) if message == "Block not found"
        ));
        assert_eq!(err.rpc_kind(), Some(FailureKind::Protocol));
    }

    #[test]
    fn decode_response_unauthorized_without_body_is_transport_kind() {
        let err = decode_response(401, "").expect_err("must fail");
        assert!(matches!(
            err,
            CoreError::Rpc(RpcError::HttpStatus { status: 401 })
        ));
        assert_eq!(err.rpc_kind(), Some(FailureKind::Transport));
    }

    #[test]
    fn decode_response_garbage_on_success_is_invalid_response() {
        let err = decode_response(200, "<html>").expect_err("must fail");
        assert!(matches!(err, CoreError::Rpc(RpcError::InvalidResponse(_))));
    }

    #[test]
    fn parse_jsonrpc_error_non_standard_shape() {
        let err = parse_jsonrpc_error(serde_json::json!("boom"));
        assert!(err.to_string().contains("non-standard JSON-RPC error"));
    }
}
