use crate::shared::types::EventKind;
use thiserror::Error;

/// Reasons an inbound frame is dropped by the [`EventRouter`](crate::EventRouter).
///
/// None of these are fatal: the frame is logged and the connection keeps reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("malformed envelope: {0}")]
    Malformed(String),

    #[error("invalid {kind} payload: {reason}")]
    InvalidPayload { kind: EventKind, reason: String },
}

impl DispatchError {
    /// Determine if the envelope parsed but its payload did not match the tag's shape.
    pub fn is_shape_error(&self) -> bool {
        matches!(self, DispatchError::InvalidPayload { .. })
    }
}

/// Errors resolving the [`DashboardConfig`](crate::DashboardConfig) at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid url {value}: {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("url {0} has no host")]
    MissingHost(String),

    #[error("invalid number for {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },
}
