//! Fixed 48-byte packet header codec (panic-free).
//!
//! Parsing rules:
//! - Never index (`buf[0]`) — always use `Buf` and length checks.
//! - Never `unwrap()` / `expect()` / `panic!()` in production paths.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{GroundLinkError, Result};

/// Exact header size on the wire. Interoperability contract with the sender
/// and receiver; must never change without a protocol version bump.
pub const HEADER_LEN: usize = 48;

/// Maximum accepted datagram size (one UDP receive buffer). Any header
/// declaring a total beyond this is rejected before further processing.
pub const MAX_DATAGRAM_LEN: usize = 65536;

/// Telemetry packet header.
///
/// The two length fields travel big-endian (network order). The ten floats
/// are copied byte-for-byte in the sender's native order — the deployed
/// sender does not byte-swap them, so this codec must not either. On a
/// big-endian host the pose fields would read garbled; the length framing
/// still holds. Cross-endianness deployments need a protocol revision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacketHeader {
    /// Robot position estimate.
    pub odom: [f32; 3],
    /// Robot orientation.
    pub quaternion: [f32; 4],
    /// Remote-control goal position.
    pub rcgoal: [f32; 3],
    /// Byte length of the compressed point-cloud region after the header.
    pub point_cloud_len: u32,
    /// Byte length of the opaque frontier region after the point cloud.
    pub frontier_len: u32,
}

impl PacketHeader {
    /// Decode a header from the front of a datagram.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(GroundLinkError::Format(format!(
                "header too short: got {} bytes, need {HEADER_LEN}",
                data.len()
            )));
        }

        let mut buf = data;
        let mut odom = [0f32; 3];
        for v in &mut odom {
            *v = buf.get_f32_ne();
        }
        let mut quaternion = [0f32; 4];
        for v in &mut quaternion {
            *v = buf.get_f32_ne();
        }
        let mut rcgoal = [0f32; 3];
        for v in &mut rcgoal {
            *v = buf.get_f32_ne();
        }
        let point_cloud_len = buf.get_u32();
        let frontier_len = buf.get_u32();

        Ok(Self {
            odom,
            quaternion,
            rcgoal,
            point_cloud_len,
            frontier_len,
        })
    }

    /// Append exactly [`HEADER_LEN`] bytes to `out`.
    pub fn encode_into(&self, out: &mut BytesMut) {
        out.reserve(HEADER_LEN);
        for v in self.odom {
            out.put_f32_ne(v);
        }
        for v in self.quaternion {
            out.put_f32_ne(v);
        }
        for v in self.rcgoal {
            out.put_f32_ne(v);
        }
        out.put_u32(self.point_cloud_len);
        out.put_u32(self.frontier_len);
    }

    /// Total datagram length this header declares (wide, overflow-safe).
    pub fn expected_datagram_len(&self) -> u64 {
        HEADER_LEN as u64 + u64::from(self.point_cloud_len) + u64::from(self.frontier_len)
    }
}
