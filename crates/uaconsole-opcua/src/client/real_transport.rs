// SPDX-License-Identifier: MIT
// Copyright (c) 2025 UAConsole contributors.

//! Production transport backed by the `opcua` crate.
//!
//! Connects with security mode None and an anonymous identity — this is a
//! read-only diagnostic session, not a control channel. No retries
//! anywhere: a failed connect or read is final for the run.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, trace};

use opcua::client::prelude::*;
use opcua::sync::RwLock as OpcUaRwLock;

use crate::client::transport::{
    ReadOutcome, TransportState, UaReference, UaTransport, UaVariant, STATUS_BAD,
};
use crate::error::{AttributeError, BrowseError, ConnectionError, UaError, UaResult};
use crate::types::{ClientConfig, NodeClass, NodeId, NodeIdentifier, QualifiedName};

// =============================================================================
// RealUaTransport
// =============================================================================

/// OPC UA transport over a real server session.
pub struct RealUaTransport {
    /// Connection settings.
    config: ClientConfig,

    /// Current connection state.
    state: RwLock<TransportState>,

    /// The underlying session, present while connected.
    session: RwLock<Option<Arc<OpcUaRwLock<Session>>>>,
}

impl RealUaTransport {
    /// Creates a disconnected transport with the given configuration.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            state: RwLock::new(TransportState::Disconnected),
            session: RwLock::new(None),
        }
    }

    /// Builds the OPC UA client from configuration.
    fn build_client(&self) -> UaResult<Client> {
        ClientBuilder::new()
            .application_name(&self.config.application_name)
            .application_uri(&self.config.application_uri())
            .session_retry_limit(0)
            .session_timeout(self.config.connect_timeout.as_millis() as u32)
            .trust_server_certs(true)
            .create_sample_keypair(false)
            .client()
            .ok_or_else(|| {
                UaError::connection(ConnectionError::invalid_endpoint(
                    &self.config.endpoint,
                    "failed to build OPC UA client",
                ))
            })
    }

    /// Converts our NodeId to the wire NodeId.
    fn to_opcua_node_id(node_id: &NodeId) -> opcua::types::NodeId {
        match &node_id.identifier {
            NodeIdentifier::Numeric(v) => opcua::types::NodeId::new(node_id.namespace_index, *v),
            NodeIdentifier::String(v) => {
                opcua::types::NodeId::new(node_id.namespace_index, v.clone())
            }
            NodeIdentifier::Guid(v) => {
                opcua::types::NodeId::new(node_id.namespace_index, opcua::types::Guid::from(*v))
            }
            NodeIdentifier::Opaque(v) => opcua::types::NodeId::new(
                node_id.namespace_index,
                opcua::types::ByteString::from(v.as_slice()),
            ),
        }
    }

    /// Converts a wire NodeId to our NodeId.
    fn from_opcua_node_id(node_id: &opcua::types::NodeId) -> NodeId {
        let namespace_index = node_id.namespace;
        match &node_id.identifier {
            opcua::types::Identifier::Numeric(v) => NodeId::numeric(namespace_index, *v),
            opcua::types::Identifier::String(v) => NodeId::string(namespace_index, v.as_ref()),
            opcua::types::Identifier::Guid(v) => {
                NodeId::guid(namespace_index, uuid::Uuid::from_bytes(*v.as_bytes()))
            }
            opcua::types::Identifier::ByteString(v) => {
                NodeId::opaque(namespace_index, v.value.clone().unwrap_or_default())
            }
        }
    }

    /// Converts a wire variant to our variant.
    fn from_opcua_variant(variant: &opcua::types::Variant) -> UaVariant {
        use opcua::types::Variant;

        match variant {
            Variant::Empty => UaVariant::Null,
            Variant::Boolean(v) => UaVariant::Boolean(*v),
            Variant::SByte(v) => UaVariant::SByte(*v),
            Variant::Byte(v) => UaVariant::Byte(*v),
            Variant::Int16(v) => UaVariant::Int16(*v),
            Variant::UInt16(v) => UaVariant::UInt16(*v),
            Variant::Int32(v) => UaVariant::Int32(*v),
            Variant::UInt32(v) => UaVariant::UInt32(*v),
            Variant::Int64(v) => UaVariant::Int64(*v),
            Variant::UInt64(v) => UaVariant::UInt64(*v),
            Variant::Float(v) => UaVariant::Float(*v),
            Variant::Double(v) => UaVariant::Double(*v),
            Variant::String(v) => UaVariant::String(v.as_ref().to_string()),
            Variant::DateTime(v) => {
                let dt = chrono::DateTime::from_timestamp(
                    v.as_chrono().timestamp(),
                    v.as_chrono().timestamp_subsec_nanos(),
                )
                .unwrap_or_default();
                UaVariant::DateTime(dt)
            }
            Variant::Guid(v) => UaVariant::Guid(uuid::Uuid::from_bytes(*v.as_bytes())),
            Variant::ByteString(v) => UaVariant::ByteString(v.value.clone().unwrap_or_default()),
            Variant::Array(arr) => {
                UaVariant::Array(arr.values.iter().map(Self::from_opcua_variant).collect())
            }
            // Structured kinds are never decoded, only named in output.
            Variant::StatusCode(_) => UaVariant::Other("StatusCode".to_string()),
            Variant::XmlElement(_) => UaVariant::Other("XmlElement".to_string()),
            Variant::QualifiedName(_) => UaVariant::Other("QualifiedName".to_string()),
            Variant::LocalizedText(_) => UaVariant::Other("LocalizedText".to_string()),
            Variant::NodeId(_) => UaVariant::Other("NodeId".to_string()),
            Variant::ExpandedNodeId(_) => UaVariant::Other("ExpandedNodeId".to_string()),
            Variant::ExtensionObject(_) => UaVariant::Other("ExtensionObject".to_string()),
            _ => UaVariant::Other("Variant".to_string()),
        }
    }

    /// Gets the session, failing if not connected.
    async fn get_session(&self) -> UaResult<Arc<OpcUaRwLock<Session>>> {
        let session_guard = self.session.read().await;
        session_guard
            .clone()
            .ok_or_else(|| UaError::connection(ConnectionError::NotConnected))
    }

    async fn set_state(&self, new_state: TransportState) {
        let mut state = self.state.write().await;
        *state = new_state;
    }

    /// Reads one attribute of one node via the Read service.
    async fn read_attribute(
        &self,
        node_id: &NodeId,
        attribute_id: AttributeId,
        attribute_name: &'static str,
    ) -> UaResult<opcua::types::DataValue> {
        let session = self.get_session().await?;
        let read_value_id = ReadValueId {
            node_id: Self::to_opcua_node_id(node_id),
            attribute_id: attribute_id as u32,
            index_range: opcua::types::UAString::null(),
            data_encoding: opcua::types::QualifiedName::null(),
        };

        trace!(node_id = %node_id, attribute = attribute_name, "reading attribute");

        let mut results = {
            let session_locked = session.read();
            session_locked
                .read(&[read_value_id], TimestampsToReturn::Neither, 0.0)
                .map_err(|status| {
                    UaError::attribute(AttributeError::read_failed(
                        node_id.to_string(),
                        attribute_name,
                        format!("read service failed: {:?}", status),
                    ))
                })?
        };

        if results.is_empty() {
            return Err(UaError::attribute(AttributeError::read_failed(
                node_id.to_string(),
                attribute_name,
                "empty read response",
            )));
        }
        Ok(results.remove(0))
    }
}

#[async_trait]
impl UaTransport for RealUaTransport {
    async fn connect(&mut self) -> UaResult<()> {
        self.set_state(TransportState::Connecting).await;
        info!(endpoint = %self.config.endpoint, "connecting to OPC UA server");

        let result: UaResult<Arc<OpcUaRwLock<Session>>> = async {
            let client = self.build_client()?;

            let endpoints = client
                .get_server_endpoints_from_url(&self.config.endpoint)
                .map_err(|_| {
                    UaError::connection(ConnectionError::refused(&self.config.endpoint))
                })?;

            // Diagnostic session: security None, anonymous identity.
            let endpoint = endpoints
                .iter()
                .find(|e| {
                    e.security_policy_uri.as_ref() == SecurityPolicy::None.to_uri()
                        && e.security_mode == opcua::types::MessageSecurityMode::None
                })
                .cloned()
                .ok_or_else(|| {
                    UaError::connection(ConnectionError::no_suitable_endpoint(
                        &self.config.endpoint,
                    ))
                })?;

            debug!(
                endpoint_url = %endpoint.endpoint_url,
                "found matching endpoint"
            );

            let mut client = client;
            client
                .connect_to_endpoint(endpoint, IdentityToken::Anonymous)
                .map_err(|_| UaError::connection(ConnectionError::refused(&self.config.endpoint)))
        }
        .await;

        match result {
            Ok(session) => {
                {
                    let mut session_guard = self.session.write().await;
                    *session_guard = Some(session);
                }
                self.set_state(TransportState::Connected).await;
                info!(endpoint = %self.config.endpoint, "connected to OPC UA server");
                Ok(())
            }
            Err(err) => {
                self.set_state(TransportState::Failed).await;
                Err(err)
            }
        }
    }

    async fn disconnect(&mut self) -> UaResult<()> {
        let session_opt = {
            let mut session_guard = self.session.write().await;
            session_guard.take()
        };

        if let Some(session) = session_opt {
            let session_locked = session.read();
            session_locked.disconnect();
        }

        self.set_state(TransportState::Disconnected).await;
        info!("disconnected from OPC UA server");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    fn state(&self) -> TransportState {
        if let Ok(state) = self.state.try_read() {
            *state
        } else {
            TransportState::Disconnected
        }
    }

    async fn read_node_class(&self, node_id: &NodeId) -> UaResult<NodeClass> {
        let data_value = self
            .read_attribute(node_id, AttributeId::NodeClass, "NodeClass")
            .await?;

        let status = data_value.status.map(|s| s.bits()).unwrap_or(0);
        match data_value.value {
            Some(opcua::types::Variant::Int32(code)) if status & STATUS_BAD == 0 => {
                Ok(NodeClass::from_code(code as u32))
            }
            _ => Err(UaError::attribute(AttributeError::read_failed(
                node_id.to_string(),
                "NodeClass",
                format!("status 0x{:08X}", status),
            ))),
        }
    }

    async fn read_browse_name(&self, node_id: &NodeId) -> UaResult<QualifiedName> {
        let data_value = self
            .read_attribute(node_id, AttributeId::BrowseName, "BrowseName")
            .await?;

        let status = data_value.status.map(|s| s.bits()).unwrap_or(0);
        match data_value.value {
            Some(opcua::types::Variant::QualifiedName(name)) if status & STATUS_BAD == 0 => {
                Ok(QualifiedName::new(
                    name.namespace_index,
                    name.name.as_ref(),
                ))
            }
            _ => Err(UaError::attribute(AttributeError::read_failed(
                node_id.to_string(),
                "BrowseName",
                format!("status 0x{:08X}", status),
            ))),
        }
    }

    async fn read_value(&self, node_id: &NodeId) -> UaResult<ReadOutcome> {
        let data_value = self
            .read_attribute(node_id, AttributeId::Value, "Value")
            .await?;

        let status = data_value.status.map(|s| s.bits()).unwrap_or(0);
        match data_value.value {
            Some(ref variant) if status == 0 => {
                Ok(ReadOutcome::success(Self::from_opcua_variant(variant)))
            }
            // An absent value with a good status still renders the raw
            // status inline, same as any bad read.
            _ => Ok(ReadOutcome::failure(status)),
        }
    }

    async fn browse(&self, node_id: &NodeId) -> UaResult<Vec<UaReference>> {
        let session = self.get_session().await?;

        // Hierarchical references, both directions, so each edge arrives
        // with its direction in the one round trip.
        let browse_description = BrowseDescription {
            node_id: Self::to_opcua_node_id(node_id),
            browse_direction: BrowseDirection::Both,
            reference_type_id: ReferenceTypeId::HierarchicalReferences.into(),
            include_subtypes: true,
            node_class_mask: 0,
            result_mask: BrowseDescriptionResultMask::all().bits(),
        };

        trace!(node_id = %node_id, "browsing references");

        let browse_results = {
            let session_locked = session.read();
            session_locked.browse(&[browse_description]).map_err(|status| {
                UaError::browse(BrowseError::browse_failed(
                    node_id.to_string(),
                    format!("browse service failed: {:?}", status),
                ))
            })?
        };

        let browse_results = browse_results.ok_or_else(|| {
            UaError::browse(BrowseError::browse_failed(
                node_id.to_string(),
                "no browse results returned",
            ))
        })?;

        let references = browse_results
            .first()
            .and_then(|result| result.references.as_ref())
            .map(|refs| {
                refs.iter()
                    .map(|r| UaReference {
                        node_id: Self::from_opcua_node_id(&r.node_id.node_id),
                        is_forward: r.is_forward,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(references)
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}
