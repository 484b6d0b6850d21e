// SPDX-License-Identifier: MIT
// Copyright (c) 2025 UAConsole contributors.

//! Session/transport abstraction.
//!
//! The traversal engine consumes the server session through the
//! [`UaTransport`] trait only, which keeps the engine testable against a
//! scripted mock and keeps the protocol stack swappable. The production
//! implementation lives in [`real_transport`](super::real_transport) behind
//! the `real-transport` feature.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::UaResult;
use crate::types::{NodeClass, NodeId, QualifiedName};

/// Status code with only the severity-bad bit set, used when a read fails
/// without the server supplying a more specific code.
pub const STATUS_BAD: u32 = 0x8000_0000;

// =============================================================================
// TransportState
// =============================================================================

/// Connection state of the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    /// Transport is not connected.
    #[default]
    Disconnected,

    /// Transport is establishing connection.
    Connecting,

    /// Transport is connected and ready.
    Connected,

    /// Transport connection has failed.
    Failed,
}

impl TransportState {
    /// Returns `true` if the transport is connected.
    #[inline]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

// =============================================================================
// UaVariant
// =============================================================================

/// Decoded OPC UA variant: the scalar kinds a value attribute can carry.
///
/// Rendering decodes only a closed subset of these to value text; every
/// other kind is displayed as its type name (see
/// [`render::variant_text`](crate::render::variant_text)).
#[derive(Debug, Clone, PartialEq)]
pub enum UaVariant {
    /// Boolean value.
    Boolean(bool),
    /// Signed byte.
    SByte(i8),
    /// Unsigned byte.
    Byte(u8),
    /// 16-bit signed integer.
    Int16(i16),
    /// 16-bit unsigned integer.
    UInt16(u16),
    /// 32-bit signed integer.
    Int32(i32),
    /// 32-bit unsigned integer.
    UInt32(u32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit unsigned integer.
    UInt64(u64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit double.
    Double(f64),
    /// String value.
    String(String),
    /// Date/time value.
    DateTime(chrono::DateTime<chrono::Utc>),
    /// GUID value.
    Guid(uuid::Uuid),
    /// Byte string.
    ByteString(Vec<u8>),
    /// Array of values.
    Array(Vec<UaVariant>),
    /// Any other (structured) kind, carrying its declared type name.
    Other(String),
    /// Empty variant.
    Null,
}

impl UaVariant {
    /// Returns the OPC UA type name of this variant.
    ///
    /// Total over every kind; this is what the renderer falls back to for
    /// kinds it does not decode.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Boolean(_) => "Boolean",
            Self::SByte(_) => "SByte",
            Self::Byte(_) => "Byte",
            Self::Int16(_) => "Int16",
            Self::UInt16(_) => "UInt16",
            Self::Int32(_) => "Int32",
            Self::UInt32(_) => "UInt32",
            Self::Int64(_) => "Int64",
            Self::UInt64(_) => "UInt64",
            Self::Float(_) => "Float",
            Self::Double(_) => "Double",
            Self::String(_) => "String",
            Self::DateTime(_) => "DateTime",
            Self::Guid(_) => "Guid",
            Self::ByteString(_) => "ByteString",
            Self::Array(_) => "Array",
            Self::Other(name) => name.as_str(),
            Self::Null => "Null",
        }
    }

    /// Returns `true` if this is the empty variant.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Default for UaVariant {
    fn default() -> Self {
        Self::Null
    }
}

// =============================================================================
// ReadOutcome
// =============================================================================

/// Outcome of a value read: either a variant or the raw status code that
/// explains its absence.
#[derive(Debug, Clone)]
pub struct ReadOutcome {
    /// The value read, when the read succeeded.
    pub value: Option<UaVariant>,

    /// Raw OPC UA status code of the read.
    pub status_code: u32,
}

impl ReadOutcome {
    /// Creates a successful outcome.
    pub fn success(value: UaVariant) -> Self {
        Self {
            value: Some(value),
            status_code: 0,
        }
    }

    /// Creates a failed outcome carrying the raw status code.
    pub fn failure(status_code: u32) -> Self {
        Self {
            value: None,
            status_code,
        }
    }

    /// Returns `true` if the read succeeded.
    #[inline]
    pub fn is_good(&self) -> bool {
        self.status_code == 0
    }

    /// Returns `true` if the severity-bad bit is set.
    #[inline]
    pub fn is_bad(&self) -> bool {
        self.status_code & 0x8000_0000 != 0
    }
}

// =============================================================================
// UaReference
// =============================================================================

/// One reference (edge) returned by a browse round trip.
///
/// Carries exactly what the traversal needs: the target's identity and the
/// edge direction. Target attributes are always re-read per node, so a
/// stale browse result can never leak wrong metadata into the tree.
#[derive(Debug, Clone)]
pub struct UaReference {
    /// The target node.
    pub node_id: NodeId,

    /// `true` for a forward (hierarchy-defining) reference. Only forward
    /// references are descended.
    pub is_forward: bool,
}

// =============================================================================
// UaTransport Trait
// =============================================================================

/// Abstract session/transport for OPC UA communication.
///
/// Every method is one blocking round trip from the traversal's point of
/// view: the walk awaits each call to completion before issuing the next,
/// so implementations see strictly serial access. Timeout behavior belongs
/// to the implementation; callers only react to surfaced failures.
#[async_trait]
pub trait UaTransport: Send + Sync {
    /// Establishes the session with the server.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the session cannot be established.
    /// This is the only failure the browse run treats as fatal.
    async fn connect(&mut self) -> UaResult<()>;

    /// Closes the session.
    async fn disconnect(&mut self) -> UaResult<()>;

    /// Returns `true` if the transport is currently connected.
    fn is_connected(&self) -> bool;

    /// Returns the current transport state.
    fn state(&self) -> TransportState;

    /// Reads the node class attribute of one node.
    async fn read_node_class(&self, node_id: &NodeId) -> UaResult<NodeClass>;

    /// Reads the browse name attribute of one node.
    async fn read_browse_name(&self, node_id: &NodeId) -> UaResult<QualifiedName>;

    /// Reads the value attribute of one node.
    ///
    /// A bad per-node status is NOT an `Err`: it comes back as a
    /// [`ReadOutcome::failure`] so the caller can render the raw status
    /// inline. `Err` is reserved for transport-level failures.
    async fn read_value(&self, node_id: &NodeId) -> UaResult<ReadOutcome>;

    /// Enumerates the references of one node in server order.
    ///
    /// A single round trip returns identity and direction for every
    /// reference, both forward and inverse.
    async fn browse(&self, node_id: &NodeId) -> UaResult<Vec<UaReference>>;

    /// Returns the server endpoint URL.
    fn endpoint(&self) -> &str;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_state() {
        assert!(TransportState::Connected.is_connected());
        assert!(!TransportState::Disconnected.is_connected());
        assert!(!TransportState::Failed.is_connected());
    }

    #[test]
    fn test_read_outcome() {
        let ok = ReadOutcome::success(UaVariant::Float(3.5));
        assert!(ok.is_good());
        assert!(!ok.is_bad());

        let bad = ReadOutcome::failure(0x8001_0000);
        assert!(!bad.is_good());
        assert!(bad.is_bad());
        assert_eq!(bad.status_code, 0x8001_0000);
    }

    #[test]
    fn test_variant_type_names() {
        assert_eq!(UaVariant::Boolean(true).type_name(), "Boolean");
        assert_eq!(UaVariant::Int32(-1).type_name(), "Int32");
        assert_eq!(UaVariant::String("x".into()).type_name(), "String");
        assert_eq!(UaVariant::Array(vec![]).type_name(), "Array");
        assert_eq!(
            UaVariant::Other("LocalizedText".into()).type_name(),
            "LocalizedText"
        );
        assert_eq!(UaVariant::Null.type_name(), "Null");
        assert!(UaVariant::Null.is_null());
    }
}
