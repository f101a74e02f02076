//! Datagram validation and framing.
//!
//! Inbound: check the received length against the header's declared region
//! lengths and hand out borrowed slices of both regions, interpreting
//! neither. Outbound: assemble a new datagram whose length fields are the
//! actual buffer lengths — output is always exactly
//! `48 + cloud.len() + frontier.len()` bytes, no padding, no truncation.

use bytes::{Bytes, BytesMut};

use crate::error::{GroundLinkError, Result};
use crate::protocol::header::{PacketHeader, HEADER_LEN, MAX_DATAGRAM_LEN};

/// A validated inbound datagram, split into its regions.
#[derive(Debug)]
pub struct InboundFrame<'a> {
    pub header: PacketHeader,
    /// Compressed point-cloud region (exactly `point_cloud_len` bytes).
    pub cloud: &'a [u8],
    /// Opaque frontier region (exactly `frontier_len` bytes).
    pub frontier: &'a [u8],
}

/// Validate a received datagram and slice out its two payload regions.
///
/// Trailing bytes beyond the declared total are tolerated and ignored; a
/// datagram shorter than the declared total is rejected as `Format`.
pub fn split_datagram(datagram: &[u8]) -> Result<InboundFrame<'_>> {
    let header = PacketHeader::decode(datagram)?;

    let expected = header.expected_datagram_len();
    if expected > MAX_DATAGRAM_LEN as u64 {
        return Err(GroundLinkError::Format(format!(
            "declared lengths exceed {MAX_DATAGRAM_LEN}-byte datagram limit: {expected}"
        )));
    }
    if (datagram.len() as u64) < expected {
        return Err(GroundLinkError::Format(format!(
            "length mismatch: expect={expected} got={}",
            datagram.len()
        )));
    }

    let cloud_end = HEADER_LEN + header.point_cloud_len as usize;
    let frontier_end = cloud_end + header.frontier_len as usize;
    let cloud = datagram
        .get(HEADER_LEN..cloud_end)
        .ok_or_else(|| GroundLinkError::Format("point-cloud region out of bounds".into()))?;
    let frontier = datagram
        .get(cloud_end..frontier_end)
        .ok_or_else(|| GroundLinkError::Format("frontier region out of bounds".into()))?;

    Ok(InboundFrame {
        header,
        cloud,
        frontier,
    })
}

/// Assemble an outbound datagram from a header template and two buffers.
///
/// Pose fields are taken from `template`; the length fields are overwritten
/// with the actual buffer lengths in network order.
pub fn assemble_datagram(template: &PacketHeader, cloud: &[u8], frontier: &[u8]) -> Result<Bytes> {
    let point_cloud_len = u32::try_from(cloud.len())
        .map_err(|_| GroundLinkError::Format("point-cloud buffer exceeds u32 length".into()))?;
    let frontier_len = u32::try_from(frontier.len())
        .map_err(|_| GroundLinkError::Format("frontier buffer exceeds u32 length".into()))?;

    let header = PacketHeader {
        point_cloud_len,
        frontier_len,
        ..*template
    };

    let mut out = BytesMut::with_capacity(HEADER_LEN + cloud.len() + frontier.len());
    header.encode_into(&mut out);
    out.extend_from_slice(cloud);
    out.extend_from_slice(frontier);
    Ok(out.freeze())
}
