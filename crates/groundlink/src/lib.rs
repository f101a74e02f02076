//! Top-level facade crate for GroundLink.
//!
//! Re-exports the protocol core and the relay worker so hosts can depend on a
//! single crate.

pub mod core {
    pub use groundlink_core::*;
}

pub mod relay {
    pub use groundlink_relay::*;
}
