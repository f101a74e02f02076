use serde::Deserialize;

use groundlink_core::error::{GroundLinkError, Result};
use groundlink_core::protocol::header::{HEADER_LEN, MAX_DATAGRAM_LEN};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    pub version: u32,

    #[serde(default)]
    pub relay: RelaySection,
}

impl RelayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GroundLinkError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        self.relay.validate()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelaySection {
    /// Default receive port; the host may override via `Relay::start`.
    #[serde(default = "default_recv_port")]
    pub recv_port: u16,

    #[serde(default = "default_dest_host")]
    pub dest_host: String,

    #[serde(default = "default_dest_port")]
    pub dest_port: u16,

    #[serde(default)]
    pub decoder: DecoderKind,

    #[serde(default = "default_recv_buffer_bytes")]
    pub recv_buffer_bytes: usize,
}

impl Default for RelaySection {
    fn default() -> Self {
        Self {
            recv_port: default_recv_port(),
            dest_host: default_dest_host(),
            dest_port: default_dest_port(),
            decoder: DecoderKind::default(),
            recv_buffer_bytes: default_recv_buffer_bytes(),
        }
    }
}

impl RelaySection {
    pub fn validate(&self) -> Result<()> {
        if self.dest_host.is_empty() {
            return Err(GroundLinkError::Config(
                "relay.dest_host must not be empty".into(),
            ));
        }
        if self.dest_port == 0 {
            return Err(GroundLinkError::Config(
                "relay.dest_port must be nonzero".into(),
            ));
        }
        if !(HEADER_LEN..=MAX_DATAGRAM_LEN).contains(&self.recv_buffer_bytes) {
            return Err(GroundLinkError::Config(format!(
                "relay.recv_buffer_bytes must be between {HEADER_LEN} and {MAX_DATAGRAM_LEN}"
            )));
        }
        Ok(())
    }
}

/// Point-cloud decode capability selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderKind {
    /// Real decoder over the compressed wire format.
    #[default]
    Wire,
    /// No decode capability: forward header + frontier with an empty cloud.
    None,
}

fn default_recv_port() -> u16 {
    14700
}
fn default_dest_host() -> String {
    "127.0.0.1".into()
}
fn default_dest_port() -> u16 {
    14701
}
fn default_recv_buffer_bytes() -> usize {
    MAX_DATAGRAM_LEN
}
