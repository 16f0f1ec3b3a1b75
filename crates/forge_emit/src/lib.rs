//! Top-module emission for integrated systems.
//!
//! Consumes a [`System`](forge_ir::System) together with the
//! [`ConnectionPlan`](forge_connect::ConnectionPlan) built for it and writes a
//! single SystemVerilog module: the port header, interconnect wire
//! declarations, one instantiation per component, and any top-level
//! feedthrough assignments. The underlying module name of each component is
//! supplied by a [`ModuleNameResolver`].

#![warn(missing_docs)]

pub mod names;
pub mod systemverilog;

pub use names::ModuleNameResolver;
pub use systemverilog::{emit_top_module, EmitOptions};
