//! Unified application error type.
//! All modules (core, queue, bridge, store) return AppError to keep the error
//! handling consistent and easy to manage. Bridge failures arrive as an
//! already-classified BridgeError so downstream code never has to probe raw
//! payloads again.

use serde::Deserialize;
use thiserror::Error;

/// Closed taxonomy for failures reported by the backend bridge.
///
/// Classification happens exactly once, at the boundary where the RPC call is
/// wrapped. The rest of the crate only ever matches on these variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("operation blocked: {0}")]
    Blocked(String),

    #[error("network failure: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("runtime unavailable: {0}")]
    Runtime(String),
}

/// Structured payload some bridge errors carry as a JSON-encoded string.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
}

impl BridgeError {
    /// Classify a raw error string coming off the bridge.
    ///
    /// Tries the structured JSON shape first, then falls back to substring
    /// heuristics over the (Portuguese) backend messages. Anything
    /// unrecognized is a runtime failure.
    pub fn classify(raw: &str) -> Self {
        if let Ok(payload) = serde_json::from_str::<ErrorPayload>(raw) {
            let message = payload.message.unwrap_or_else(|| raw.to_string());
            match payload.kind.as_deref() {
                Some("blocked") => return BridgeError::Blocked(message),
                Some("network") => return BridgeError::Network(message),
                Some("auth") => return BridgeError::Auth(message),
                Some("invalid_operation") => return BridgeError::InvalidOperation(message),
                Some("runtime") => return BridgeError::Runtime(message),
                _ => {}
            }
        }

        let lower = raw.to_lowercase();
        if lower.contains("bloqueado") || lower.contains("horário permitido") {
            BridgeError::Blocked(raw.to_string())
        } else if lower.contains("conexão") || lower.contains("network") {
            BridgeError::Network(raw.to_string())
        } else if lower.contains("operação inválida") || lower.contains("invalid operation") {
            BridgeError::InvalidOperation(raw.to_string())
        } else {
            BridgeError::Runtime(raw.to_string())
        }
    }

    /// Stable kind tag, useful for logging and UI dispatch.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::Blocked(_) => "blocked",
            BridgeError::Network(_) => "network",
            BridgeError::Auth(_) => "auth",
            BridgeError::InvalidOperation(_) => "invalid_operation",
            BridgeError::Runtime(_) => "runtime",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            BridgeError::Blocked(m)
            | BridgeError::Network(m)
            | BridgeError::Auth(m)
            | BridgeError::InvalidOperation(m)
            | BridgeError::Runtime(m) => m,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Bridge boundary
    // ---------------------------
    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),

    // ---------------------------
    // Task queue
    // ---------------------------
    #[error("task '{key}' failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        key: String,
        attempts: u32,
        #[source]
        source: Box<AppError>,
    },

    #[error("task '{0}' cancelled before completion")]
    TaskCancelled(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid punch type code: {0}")]
    InvalidPunchType(u8),

    #[error("Invalid operation code: {0}")]
    InvalidOperation(u8),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// The bridge failure behind this error, if any, unwrapping
    /// exhausted-retry wrappers.
    pub fn as_bridge(&self) -> Option<&BridgeError> {
        match self {
            AppError::Bridge(e) => Some(e),
            AppError::RetriesExhausted { source, .. } => source.as_bridge(),
            _ => None,
        }
    }

    /// Stable bridge kind tag, when the failure originated at the bridge.
    pub fn bridge_kind(&self) -> Option<&'static str> {
        self.as_bridge().map(BridgeError::kind)
    }
}
