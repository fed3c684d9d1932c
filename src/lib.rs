//! beachhead library
//!
//! Exposes the agent's modules for use by the `beachhead` and
//! `beachhead-probe` binaries.

pub mod beacon;
pub mod config;
pub mod emitter;
pub mod responder;
