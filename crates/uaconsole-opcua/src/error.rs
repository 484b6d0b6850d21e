// SPDX-License-Identifier: MIT
// Copyright (c) 2025 UAConsole contributors.

//! Error types for OPC UA client operations.
//!
//! Errors are grouped by the phase of a browse run they belong to:
//!
//! ```text
//! UaError
//! ├── Connection    - Endpoint and session establishment (fatal)
//! ├── Attribute     - Per-node attribute reads (non-fatal, subtree-local)
//! ├── Browse        - Reference enumeration (non-fatal, children-local)
//! ├── Configuration - Invalid settings or node identifier text
//! └── Io            - Output sink failures
//! ```
//!
//! Only connection and sink failures abort a run; everything else is
//! swallowed by the traversal engine at the node where it occurred.

use thiserror::Error;

// =============================================================================
// UaError - Main Error Type
// =============================================================================

/// Result type alias for OPC UA client operations.
pub type UaResult<T> = Result<T, UaError>;

/// The main error type for OPC UA client operations.
#[derive(Debug, Error)]
pub enum UaError {
    /// Connection and session establishment errors.
    #[error("{0}")]
    Connection(#[from] ConnectionError),

    /// Per-node attribute read errors.
    #[error("{0}")]
    Attribute(#[from] AttributeError),

    /// Reference enumeration errors.
    #[error("{0}")]
    Browse(#[from] BrowseError),

    /// Invalid configuration or identifier text.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// Output sink write errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UaError {
    /// Creates a connection error.
    #[inline]
    pub fn connection(error: ConnectionError) -> Self {
        Self::Connection(error)
    }

    /// Creates an attribute read error.
    #[inline]
    pub fn attribute(error: AttributeError) -> Self {
        Self::Attribute(error)
    }

    /// Creates a browse error.
    #[inline]
    pub fn browse(error: BrowseError) -> Self {
        Self::Browse(error)
    }

    /// Creates a configuration error.
    #[inline]
    pub fn configuration(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }

    /// Returns `true` if this error should abort the whole run.
    ///
    /// Attribute and browse failures are scoped to a single node and are
    /// handled inside the traversal; they never answer `true` here.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Io(_))
    }
}

// =============================================================================
// ConnectionError
// =============================================================================

/// Errors establishing or using the server session.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The endpoint URL is not usable.
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The offending endpoint URL.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Endpoint discovery returned nothing usable.
    #[error("no suitable endpoint found at '{endpoint}'")]
    NoSuitableEndpoint {
        /// The server URL that was queried.
        endpoint: String,
    },

    /// The server refused or dropped the connection.
    #[error("connection refused by '{endpoint}'")]
    Refused {
        /// The server URL.
        endpoint: String,
    },

    /// An operation was attempted without an established session.
    #[error("not connected")]
    NotConnected,
}

impl ConnectionError {
    /// Creates an invalid-endpoint error.
    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Creates a no-suitable-endpoint error.
    pub fn no_suitable_endpoint(endpoint: impl Into<String>) -> Self {
        Self::NoSuitableEndpoint {
            endpoint: endpoint.into(),
        }
    }

    /// Creates a connection-refused error.
    pub fn refused(endpoint: impl Into<String>) -> Self {
        Self::Refused {
            endpoint: endpoint.into(),
        }
    }
}

// =============================================================================
// AttributeError
// =============================================================================

/// Errors reading a single node attribute.
#[derive(Debug, Error)]
pub enum AttributeError {
    /// The read service call failed or returned a bad status.
    #[error("reading {attribute} of {node_id} failed: {reason}")]
    ReadFailed {
        /// Text form of the node that was read.
        node_id: String,
        /// Which attribute was requested.
        attribute: &'static str,
        /// Underlying failure description.
        reason: String,
    },
}

impl AttributeError {
    /// Creates a read-failed error.
    pub fn read_failed(
        node_id: impl Into<String>,
        attribute: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::ReadFailed {
            node_id: node_id.into(),
            attribute,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// BrowseError
// =============================================================================

/// Errors enumerating a node's references.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// The browse service call failed.
    #[error("browsing {node_id} failed: {reason}")]
    BrowseFailed {
        /// Text form of the node that was browsed.
        node_id: String,
        /// Underlying failure description.
        reason: String,
    },
}

impl BrowseError {
    /// Creates a browse-failed error.
    pub fn browse_failed(node_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BrowseFailed {
            node_id: node_id.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// ConfigurationError
// =============================================================================

/// Errors in client configuration or identifier text.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A configuration value was rejected.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// A node identifier string could not be parsed.
    #[error("invalid node id '{input}': {reason}")]
    InvalidNodeId {
        /// The text that failed to parse.
        input: String,
        /// Why it failed.
        reason: String,
    },
}

impl ConfigurationError {
    /// Creates a generic invalid-configuration error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    /// Creates an invalid-node-id error.
    pub fn invalid_node_id(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNodeId {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality() {
        let conn = UaError::connection(ConnectionError::refused("opc.tcp://localhost:4840"));
        assert!(conn.is_fatal());

        let attr = UaError::attribute(AttributeError::read_failed("i=85", "NodeClass", "bad"));
        assert!(!attr.is_fatal());

        let browse = UaError::browse(BrowseError::browse_failed("i=85", "timeout"));
        assert!(!browse.is_fatal());
    }

    #[test]
    fn test_display_carries_context() {
        let err = UaError::attribute(AttributeError::read_failed(
            "ns=2;s=Pump",
            "BrowseName",
            "status 0x80340000",
        ));
        let text = err.to_string();
        assert!(text.contains("ns=2;s=Pump"));
        assert!(text.contains("BrowseName"));
    }
}
