//! Error taxonomy for workspace provisioning.
//!
//! Every failure reaches the caller; nothing is retried internally. On top of
//! the typed variants, [`ProvisionError::hint`] picks troubleshooting text by
//! looking for well-known phrases in the rendered message. The matching is a
//! plain substring heuristic meant for operators reading pipeline logs.

use crate::credential::AuthError;
use crate::transport::TransportError;
use fabric_messages::MESSAGES;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProvisionError>;

#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Token issuance failed. Aborts the whole operation.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A required identifier is missing or points at nothing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The server rejected the request payload.
    #[error("{0}")]
    Validation(String),

    /// The calling principal lacks rights for the operation.
    #[error("{0}")]
    Permission(String),

    /// The server answered outside its documented contract.
    #[error("Fabric API contract violated: {0}")]
    RemoteInvariant(String),

    /// Any other non-success status. `detail` is at most 500 characters.
    #[error("{operation} failed. Status: {status}, Response: {detail}")]
    RemoteQuery {
        operation: String,
        status: u16,
        detail: String,
    },

    #[error("Network error during {operation}: {message}")]
    Network { operation: String, message: String },

    #[error("Request to Fabric API timed out while {operation}")]
    Timeout { operation: String },
}

impl ProvisionError {
    /// Attach the operation description to a transport failure.
    pub fn from_transport(err: TransportError, operation: &str) -> Self {
        match err {
            TransportError::Timeout => Self::Timeout {
                operation: operation.to_string(),
            },
            TransportError::Network(message) => Self::Network {
                operation: operation.to_string(),
                message,
            },
        }
    }

    /// HTTP status that caused the error, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteQuery { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Errors after which continuing with other work is pointless.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::RemoteInvariant(_))
    }

    /// Troubleshooting text for this error, if any phrase matches.
    pub fn hint(&self) -> Option<&'static str> {
        hint_for(&self.to_string())
    }

    /// Message followed by troubleshooting steps when a hint applies.
    pub fn user_friendly(&self) -> String {
        match self.hint() {
            Some(hint) => format!("{self}\n\n{}\n{hint}", MESSAGES.hints.header),
            None => self.to_string(),
        }
    }
}

/// Pick troubleshooting text for an arbitrary error message.
pub fn hint_for(message: &str) -> Option<&'static str> {
    if message.contains("workspace creation permissions") {
        Some(MESSAGES.hints.workspace_permissions)
    } else if message.to_lowercase().contains("capacity") {
        Some(MESSAGES.hints.capacity)
    } else if message.contains("Object ID") {
        Some(MESSAGES.hints.object_id)
    } else {
        None
    }
}
