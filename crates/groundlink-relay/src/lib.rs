//! GroundLink relay worker library.
//!
//! This crate wires the config layer, the relay state machine, and the
//! metrics registry into the worker the host process drives. It is intended
//! to be consumed by the binary (`main.rs`) and by integration tests.

pub mod config;
pub mod obs;
pub mod relay;
