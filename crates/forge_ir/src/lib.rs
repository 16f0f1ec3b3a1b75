//! ForgeIR: the in-memory model of a system under integration.
//!
//! This crate defines [`Port`], [`Component`], [`System`], [`EndpointRef`],
//! [`Connection`], and the [`ProtocolRegistry`] of wiring protocols. A
//! [`System`] is built once by the loader and treated as read-only by the
//! resolution and emission stages.

#![warn(missing_docs)]

pub mod component;
pub mod endpoint;
pub mod error;
pub mod port;
pub mod protocol;
pub mod system;

pub use component::{Component, ParamValue};
pub use endpoint::{Connection, EndpointRef, TOP_INSTANCE};
pub use error::IntegrationError;
pub use port::{ports_compatible, Direction, InterfacePort, Port, PortKind, Role, SignalPort};
pub use protocol::{Flow, ProtocolDescriptor, ProtocolRegistry, ProtocolSignal, AXI_STREAM};
pub use system::System;
