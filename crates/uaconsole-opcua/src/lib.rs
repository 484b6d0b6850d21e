// SPDX-License-Identifier: MIT
// Copyright (c) 2025 UAConsole contributors.

//! OPC UA client layer for UAConsole.
//!
//! This crate walks an OPC UA server's address space depth-first from a
//! root node and renders each reachable node as one line of an indented
//! tree: browse name, node identifier, class, and — for Variable nodes —
//! the current value.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  TreeWalker (walk)                      │
//! │      depth-first descent, one line per node             │
//! └─────────────────────────────────────────────────────────┘
//!            │                              │
//!            ▼                              ▼
//! ┌──────────────────────┐      ┌──────────────────────────┐
//! │  UaTransport (trait) │      │     render (pure text)   │
//! │  per-node round trips│      │  node ids, variants,     │
//! └──────────────────────┘      │  read errors             │
//!            │                  └──────────────────────────┘
//!            ▼
//! ┌──────────────────────┐
//! │   RealUaTransport    │   (feature `real-transport`)
//! │    `opcua` session   │
//! └──────────────────────┘
//! ```
//!
//! # Fault model
//!
//! Only session establishment is fatal. A node whose attributes cannot be
//! read vanishes with its subtree; a Variable whose value cannot be read
//! renders the raw status code inline; unsupported value kinds render as
//! their type name. The walk always completes.
//!
//! # Example
//!
//! ```rust,ignore
//! use uaconsole_opcua::client::RealUaTransport;
//! use uaconsole_opcua::types::{ClientConfig, NodeId};
//! use uaconsole_opcua::walk::{TreeWalker, WalkOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .endpoint("opc.tcp://localhost:4840")
//!         .build()?;
//!
//!     let mut transport = RealUaTransport::new(config);
//!     transport.connect().await?;
//!
//!     let mut out = std::io::stdout();
//!     let options = WalkOptions::default();
//!     TreeWalker::walk(&transport, &NodeId::OBJECTS_FOLDER, &options, &mut out).await?;
//!
//!     transport.disconnect().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod error;
pub mod render;
pub mod types;
pub mod walk;

/// Crate version, surfaced by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used types
pub use error::{
    AttributeError, BrowseError, ConfigurationError, ConnectionError, UaError, UaResult,
};

pub use types::{ClientConfig, ClientConfigBuilder, NodeClass, NodeId, NodeIdentifier, QualifiedName};

pub use client::{ReadOutcome, TransportState, UaReference, UaTransport, UaVariant};

#[cfg(feature = "real-transport")]
pub use client::RealUaTransport;

pub use walk::{TreeWalker, WalkContext, WalkOptions, WalkStats};
