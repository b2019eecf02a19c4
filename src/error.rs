use alloy_primitives::TxHash;
use std::fmt;

/// Result type for wyvern-rs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for wyvern-rs
#[derive(Debug)]
pub enum Error {
    /// Input could not be read as a number
    InvalidNumberFormat(String),

    /// An order field is malformed (bad hex, unknown tag, fractional uint, ...)
    MalformedOrderField { field: String, reason: String },

    /// The signer refused to sign
    SigningRejected(String),

    /// No signer (or no account for the requested address) is connected
    SigningUnavailable(String),

    /// Signing failed for another reason
    Signing(String),

    /// Gas estimation reports the call would revert
    EstimationReverted { reason: Option<String> },

    /// The transaction was mined but reported a failed status
    ConfirmationFailed { tx_hash: TxHash, reason: String },

    /// The node could not be reached
    ChainUnreachable(String),

    /// JSON-RPC error object returned by the node
    Rpc { code: i64, message: String },

    /// HTTP request failed
    Http(reqwest::Error),

    /// JSON serialization/deserialization failed
    Json(serde_json::Error),

    /// A computed amount does not fit a uint256
    Decimal(String),

    /// Invalid configuration
    Config(String),

    /// WebSocket connection error
    WebSocket(String),

    /// WebSocket connection closed
    ConnectionClosed,
}

impl Error {
    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedOrderField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidNumberFormat(input) => write!(f, "Invalid number format: {:?}", input),
            Error::MalformedOrderField { field, reason } => {
                write!(f, "Malformed order field `{}`: {}", field, reason)
            }
            Error::SigningRejected(msg) => write!(f, "Signing rejected: {}", msg),
            Error::SigningUnavailable(msg) => write!(f, "Signer unavailable: {}", msg),
            Error::Signing(msg) => write!(f, "Signing error: {}", msg),
            Error::EstimationReverted { reason } => match reason {
                Some(reason) => write!(f, "Gas estimation reverted: {}", reason),
                None => write!(f, "Gas estimation reverted"),
            },
            Error::ConfirmationFailed { tx_hash, reason } => {
                write!(f, "Transaction {} failed: {}", tx_hash, reason)
            }
            Error::ChainUnreachable(msg) => write!(f, "Chain unreachable: {}", msg),
            Error::Rpc { code, message } => write!(f, "RPC error ({}): {}", code, message),
            Error::Http(e) => write!(f, "HTTP error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::Decimal(msg) => write!(f, "Decimal error: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::WebSocket(msg) => write!(f, "WebSocket error: {}", msg),
            Error::ConnectionClosed => write!(f, "WebSocket connection closed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::ChainUnreachable(err.to_string())
        } else {
            Error::Http(err)
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<alloy_signer::Error> for Error {
    fn from(err: alloy_signer::Error) -> Self {
        Error::Signing(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::ChainUnreachable(err.to_string())
    }
}
