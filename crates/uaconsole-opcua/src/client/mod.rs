// SPDX-License-Identifier: MIT
// Copyright (c) 2025 UAConsole contributors.

//! Client-side transport layer.
//!
//! [`transport`] defines the abstract session seam the traversal engine
//! consumes; [`real_transport`] implements it over the `opcua` crate when
//! the `real-transport` feature is enabled.

pub mod transport;

#[cfg(feature = "real-transport")]
pub mod real_transport;

pub use transport::{
    ReadOutcome, TransportState, UaReference, UaTransport, UaVariant, STATUS_BAD,
};

#[cfg(feature = "real-transport")]
pub use real_transport::RealUaTransport;
