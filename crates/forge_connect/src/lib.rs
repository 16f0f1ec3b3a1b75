//! Connection resolution and interconnect synthesis.
//!
//! Turns a loaded [`System`](forge_ir::System) into a [`ConnectionPlan`]:
//! every endpoint is bound to a concrete port, every connection is checked
//! and classified, component-to-component links get synthesized interconnect
//! wires, and each instance receives a map from its port signals to the
//! external signals they bind to. The plan is everything the emitter needs.

#![warn(missing_docs)]

pub mod classify;
pub mod errors;
pub mod resolve;
pub mod synth;
pub mod width;

pub use classify::{plan_connections, ConnectionPlan, Feedthrough, PairKind, SignalMap};
pub use resolve::{bind, resolve, resolve_connections, ResolvedConnection, ResolvedEndpoint};
pub use synth::{InterconnectSignal, InterconnectSynthesizer};
pub use width::resolve_width;
