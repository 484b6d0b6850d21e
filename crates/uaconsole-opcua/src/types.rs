// SPDX-License-Identifier: MIT
// Copyright (c) 2025 UAConsole contributors.

//! Core OPC UA address-space types.
//!
//! - **NodeId**: all four OPC UA node identifier kinds with parsing and
//!   display forms
//! - **NodeClass**: node category with the display labels used in tree
//!   output
//! - **QualifiedName**: namespace-qualified browse name
//! - **ClientConfig**: connection settings with a validating builder
//!
//! # Examples
//!
//! ```
//! use uaconsole_opcua::types::NodeId;
//!
//! let node: NodeId = "ns=2;s=Plant.Line1.Temperature".parse().unwrap();
//! assert_eq!(node.to_bracket_string(), "[ns=2;s=Plant.Line1.Temperature]");
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConfigurationError, UaError};

// =============================================================================
// NodeId
// =============================================================================

/// OPC UA node identifier: a namespace index plus an identifier of one of
/// four kinds.
///
/// Immutable value type; structurally comparable and hashable.
///
/// # Examples
///
/// ```
/// use uaconsole_opcua::types::NodeId;
///
/// let numeric = NodeId::numeric(0, 85);
/// let string = NodeId::string(2, "Device.Temperature");
/// let parsed: NodeId = "ns=2;i=1001".parse().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    /// Namespace index (0 = OPC UA standard namespace).
    pub namespace_index: u16,

    /// The node identifier.
    pub identifier: NodeIdentifier,
}

/// The identifier part of a [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeIdentifier {
    /// Numeric identifier.
    Numeric(u32),
    /// String identifier.
    String(String),
    /// GUID identifier.
    Guid(Uuid),
    /// Opaque (byte string) identifier.
    Opaque(Vec<u8>),
}

impl NodeId {
    /// Creates a numeric node ID.
    #[inline]
    pub fn numeric(namespace_index: u16, value: u32) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Numeric(value),
        }
    }

    /// Creates a string node ID.
    #[inline]
    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::String(value.into()),
        }
    }

    /// Creates a GUID node ID.
    #[inline]
    pub fn guid(namespace_index: u16, value: Uuid) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Guid(value),
        }
    }

    /// Creates an opaque (byte string) node ID.
    #[inline]
    pub fn opaque(namespace_index: u16, value: Vec<u8>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Opaque(value),
        }
    }

    // =========================================================================
    // Standard Node IDs
    // =========================================================================

    /// Root folder node (ns=0, i=84).
    pub const ROOT_FOLDER: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(84),
    };

    /// Objects folder node (ns=0, i=85) — the default browse root.
    pub const OBJECTS_FOLDER: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(85),
    };

    /// Types folder node (ns=0, i=86).
    pub const TYPES_FOLDER: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(86),
    };

    /// Views folder node (ns=0, i=87).
    pub const VIEWS_FOLDER: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(87),
    };

    // =========================================================================
    // Display forms
    // =========================================================================

    /// Converts to the OPC UA wire-text form, `ns=<n>;<tag>=<id>`, with the
    /// `ns=` part omitted for namespace 0. This is the form [`FromStr`]
    /// accepts back.
    pub fn to_opc_string(&self) -> String {
        let id_str = match &self.identifier {
            NodeIdentifier::Numeric(v) => format!("i={}", v),
            NodeIdentifier::String(v) => format!("s={}", v),
            NodeIdentifier::Guid(v) => format!("g={}", v),
            NodeIdentifier::Opaque(v) => format!("b={}", BASE64.encode(v)),
        };

        if self.namespace_index == 0 {
            id_str
        } else {
            format!("ns={};{}", self.namespace_index, id_str)
        }
    }

    /// Converts to the bracketed tree-display form,
    /// `[ns=<n>;<tag>=<id>]`, with the namespace always present.
    ///
    /// Total: every identifier kind has a text form, so this never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use uaconsole_opcua::types::NodeId;
    ///
    /// assert_eq!(NodeId::numeric(0, 85).to_bracket_string(), "[ns=0;i=85]");
    /// assert_eq!(
    ///     NodeId::string(2, "Pump").to_bracket_string(),
    ///     "[ns=2;s=Pump]"
    /// );
    /// ```
    pub fn to_bracket_string(&self) -> String {
        let id_str = match &self.identifier {
            NodeIdentifier::Numeric(v) => format!("i={}", v),
            NodeIdentifier::String(v) => format!("s={}", v),
            NodeIdentifier::Guid(v) => format!("g={}", v),
            NodeIdentifier::Opaque(v) => format!("b={}", BASE64.encode(v)),
        };
        format!("[ns={};{}]", self.namespace_index, id_str)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_opc_string())
    }
}

impl FromStr for NodeId {
    type Err = UaError;

    /// Parses a NodeId from OPC UA wire-text form.
    ///
    /// Supported inputs: `ns=2;i=1001`, `ns=2;s=MyNode`,
    /// `ns=2;g=<uuid>`, `ns=2;b=<base64>`, and the same without the
    /// `ns=` part for namespace 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| {
            UaError::configuration(ConfigurationError::invalid_node_id(s, reason))
        };

        let (namespace_index, rest) = match s.strip_prefix("ns=") {
            Some(tail) => {
                let (ns, rest) = tail
                    .split_once(';')
                    .ok_or_else(|| invalid("missing ';' after namespace"))?;
                let ns = ns
                    .parse::<u16>()
                    .map_err(|_| invalid("namespace is not a u16"))?;
                (ns, rest)
            }
            None => (0, s),
        };

        let (tag, value) = rest
            .split_once('=')
            .ok_or_else(|| invalid("missing identifier tag"))?;

        let identifier = match tag {
            "i" => NodeIdentifier::Numeric(
                value
                    .parse::<u32>()
                    .map_err(|_| invalid("numeric identifier is not a u32"))?,
            ),
            "s" => NodeIdentifier::String(value.to_string()),
            "g" => NodeIdentifier::Guid(
                Uuid::parse_str(value).map_err(|_| invalid("identifier is not a GUID"))?,
            ),
            "b" => NodeIdentifier::Opaque(
                BASE64
                    .decode(value)
                    .map_err(|_| invalid("identifier is not base64"))?,
            ),
            _ => return Err(invalid("unknown identifier tag")),
        };

        Ok(Self {
            namespace_index,
            identifier,
        })
    }
}

// =============================================================================
// NodeClass
// =============================================================================

/// OPC UA node class.
///
/// Determines the display label and whether the traversal reads a value
/// (`Variable`) or descends into children (`Object`, `View`). Class codes
/// the server reports that we do not recognize map to [`NodeClass::Unknown`]
/// rather than failing the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    /// Object node.
    Object,
    /// Variable node.
    Variable,
    /// Method node.
    Method,
    /// Object type node.
    ObjectType,
    /// Variable type node.
    VariableType,
    /// Reference type node.
    ReferenceType,
    /// Data type node.
    DataType,
    /// View node.
    View,
    /// Unrecognized class code.
    Unknown,
}

impl NodeClass {
    /// Creates from the OPC UA node class code.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Object,
            2 => Self::Variable,
            4 => Self::Method,
            8 => Self::ObjectType,
            16 => Self::VariableType,
            32 => Self::ReferenceType,
            64 => Self::DataType,
            128 => Self::View,
            _ => Self::Unknown,
        }
    }

    /// Returns the display label used in tree output.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Variable => "Variable",
            Self::Method => "Method",
            Self::ObjectType => "ObjectType",
            Self::VariableType => "VariableType",
            Self::ReferenceType => "ReferenceType",
            Self::DataType => "DataType",
            Self::View => "View",
            Self::Unknown => "Unknown",
        }
    }

    /// Returns `true` if nodes of this class carry a value attribute.
    #[inline]
    pub const fn has_value(&self) -> bool {
        matches!(self, Self::Variable)
    }

    /// Returns `true` if the traversal descends into this node's children.
    #[inline]
    pub const fn is_browsable(&self) -> bool {
        matches!(self, Self::Object | Self::View)
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// QualifiedName
// =============================================================================

/// OPC UA qualified name (namespace index + name). Display only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Namespace index.
    pub namespace_index: u16,

    /// The name string.
    pub name: String,
}

impl QualifiedName {
    /// Creates a new qualified name.
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }

    /// Creates a qualified name in namespace 0.
    pub fn standard(name: impl Into<String>) -> Self {
        Self::new(0, name)
    }
}

// =============================================================================
// ClientConfig
// =============================================================================

/// Connection settings for the OPC UA client.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use uaconsole_opcua::types::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .endpoint("opc.tcp://10.0.0.128:4840")
///     .connect_timeout(Duration::from_millis(5000))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server endpoint URL (`opc.tcp://host:port`).
    pub endpoint: String,

    /// Timeout applied to connection establishment and requests.
    pub connect_timeout: Duration,

    /// Application name announced to the server.
    pub application_name: String,
}

impl ClientConfig {
    /// Returns a builder with defaults.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Application URI derived from the application name.
    pub fn application_uri(&self) -> String {
        format!("urn:{}", self.application_name.to_lowercase())
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    endpoint: Option<String>,
    connect_timeout: Duration,
    application_name: String,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            endpoint: None,
            connect_timeout: Duration::from_millis(5000),
            application_name: "UAConsole".to_string(),
        }
    }
}

impl ClientConfigBuilder {
    /// Sets the server endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the announced application name.
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = name.into();
        self
    }

    /// Validates the settings and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the endpoint is missing or does
    /// not use the `opc.tcp://` scheme, or when the timeout is zero.
    pub fn build(self) -> Result<ClientConfig, UaError> {
        let endpoint = self.endpoint.ok_or_else(|| {
            UaError::configuration(ConfigurationError::invalid("endpoint is required"))
        })?;

        if !endpoint.starts_with("opc.tcp://") {
            return Err(UaError::configuration(ConfigurationError::invalid(
                format!("endpoint '{}' must use the opc.tcp:// scheme", endpoint),
            )));
        }

        if self.connect_timeout.is_zero() {
            return Err(UaError::configuration(ConfigurationError::invalid(
                "connect timeout must be positive",
            )));
        }

        Ok(ClientConfig {
            endpoint,
            connect_timeout: self.connect_timeout,
            application_name: self.application_name,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_string_all_kinds() {
        assert_eq!(NodeId::numeric(0, 85).to_bracket_string(), "[ns=0;i=85]");
        assert_eq!(
            NodeId::string(2, "Pump.Speed").to_bracket_string(),
            "[ns=2;s=Pump.Speed]"
        );

        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            NodeId::guid(3, uuid).to_bracket_string(),
            "[ns=3;g=550e8400-e29b-41d4-a716-446655440000]"
        );

        assert_eq!(
            NodeId::opaque(1, b"Hi".to_vec()).to_bracket_string(),
            "[ns=1;b=SGk=]"
        );
    }

    #[test]
    fn test_bracket_string_is_deterministic() {
        let node = NodeId::string(7, "A/B C");
        assert_eq!(node.to_bracket_string(), node.to_bracket_string());
    }

    #[test]
    fn test_opc_string_omits_standard_namespace() {
        assert_eq!(NodeId::numeric(0, 85).to_opc_string(), "i=85");
        assert_eq!(NodeId::numeric(2, 1001).to_opc_string(), "ns=2;i=1001");
    }

    #[test]
    fn test_parse_round_trip() {
        for text in ["i=85", "ns=2;i=1001", "ns=2;s=Device.Temp", "ns=1;b=SGk="] {
            let node: NodeId = text.parse().unwrap();
            assert_eq!(node.to_opc_string(), text);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<NodeId>().is_err());
        assert!("ns=2".parse::<NodeId>().is_err());
        assert!("ns=xx;i=1".parse::<NodeId>().is_err());
        assert!("x=1".parse::<NodeId>().is_err());
        assert!("i=notanumber".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_node_class_codes() {
        assert_eq!(NodeClass::from_code(1), NodeClass::Object);
        assert_eq!(NodeClass::from_code(2), NodeClass::Variable);
        assert_eq!(NodeClass::from_code(128), NodeClass::View);
        assert_eq!(NodeClass::from_code(0), NodeClass::Unknown);
        assert_eq!(NodeClass::from_code(3), NodeClass::Unknown);
    }

    #[test]
    fn test_node_class_predicates() {
        assert!(NodeClass::Variable.has_value());
        assert!(!NodeClass::Object.has_value());
        assert!(NodeClass::Object.is_browsable());
        assert!(NodeClass::View.is_browsable());
        assert!(!NodeClass::Variable.is_browsable());
        assert!(!NodeClass::Unknown.is_browsable());
    }

    #[test]
    fn test_config_builder_validation() {
        assert!(ClientConfig::builder().build().is_err());

        assert!(ClientConfig::builder()
            .endpoint("http://localhost:4840")
            .build()
            .is_err());

        assert!(ClientConfig::builder()
            .endpoint("opc.tcp://localhost:4840")
            .connect_timeout(Duration::ZERO)
            .build()
            .is_err());

        let config = ClientConfig::builder()
            .endpoint("opc.tcp://localhost:4840")
            .build()
            .unwrap();
        assert_eq!(config.connect_timeout, Duration::from_millis(5000));
        assert_eq!(config.application_name, "UAConsole");
    }
}
