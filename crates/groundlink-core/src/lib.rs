//! GroundLink core: transport-agnostic packet protocol and point-cloud types.
//!
//! This crate defines the wire-level contracts shared by the relay worker and
//! any tooling that speaks the ground-robot telemetry protocol: the fixed
//! 48-byte packet header, datagram validation/framing, and the point-cloud
//! decode capability. It intentionally carries no transport or runtime
//! dependencies so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `GroundLinkError`/`Result` so the relay
//! never crashes on a malformed or hostile datagram.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod cloud;
pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{GroundLinkError, Result};
