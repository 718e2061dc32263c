use bytes::Bytes;
use thiserror::Error;

/// Broker error taxonomy.
///
/// Per-message and per-connection failures are contained to that
/// message/connection; only startup-time structural failures (base directory
/// creation) are allowed to terminate the process.
#[derive(Error, Debug)]
pub enum BrokerError {
    /// Spool write or rename failed during publish. Carries the original
    /// payload so the caller can retry.
    #[error("write error, {source}")]
    Write { source: std::io::Error, payload: Bytes },

    #[error("invalid id: {0:?}")]
    InvalidId(String),

    #[error("session unknown: {0}")]
    SessionUnknown(String),

    #[error("channel {channel} is not writable for session {session}")]
    NotWritable { session: String, channel: String },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),

    #[error("{0}")]
    Msg(String),
}

impl BrokerError {
    #[inline]
    pub fn write(source: std::io::Error, payload: &[u8]) -> Self {
        BrokerError::Write { source, payload: Bytes::copy_from_slice(payload) }
    }

    /// The original payload of a failed publish, if this is a write error.
    #[inline]
    pub fn payload(&self) -> Option<&Bytes> {
        match self {
            BrokerError::Write { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

impl From<String> for BrokerError {
    #[inline]
    fn from(e: String) -> Self {
        BrokerError::Msg(e)
    }
}

impl From<&str> for BrokerError {
    #[inline]
    fn from(e: &str) -> Self {
        BrokerError::Msg(e.to_string())
    }
}
