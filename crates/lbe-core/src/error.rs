// ==============================================================================
// Core Error
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("invalid daemon data: {0}")]
    InvalidData(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// The RPC failure kind, if this error came from the daemon boundary.
    pub fn rpc_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Rpc(err) => Some(err.kind()),
            _ => None,
        }
    }
}

// ==============================================================================
// RPC Error
// ==============================================================================

/// Failures crossing the daemon JSON-RPC boundary.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC endpoint returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("RPC server error {code}: {message}")]
    ServerError { code: i64, message: String },

    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),
}

/// Coarse classification of an [`RpcError`].
///
/// `Transport` means the daemon could not be talked to at all; `Protocol`
/// means it answered but rejected or garbled the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Protocol,
}

impl RpcError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) | Self::HttpStatus { .. } => FailureKind::Transport,
            Self::ServerError { .. } | Self::InvalidResponse(_) => FailureKind::Protocol,
        }
    }
}
