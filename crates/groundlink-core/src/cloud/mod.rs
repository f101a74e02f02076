//! Point-cloud decode capability.
//!
//! The compression format is isolated behind [`PointCloudDecoder`] so it can
//! be swapped without touching the framing logic; this module is the only
//! place that understands the codec's point/attribute model. Two
//! implementations exist, selected at configuration time:
//!
//! - [`WireDecoder`] — the real decoder over the [`codec`] stream format.
//! - [`NullDecoder`] — stand-in when no decode capability is available;
//!   always yields an empty position buffer so the header and frontier are
//!   still forwarded.

pub mod codec;
pub mod model;

pub use model::{AttributeKind, DataType, PointAttribute, PointCloud};

use crate::error::{GroundLinkError, Result};

/// Black-box capability turning a compressed byte region into a flat
/// `num_points x 3` position buffer.
pub trait PointCloudDecoder: Send + Sync {
    fn decode(&self, compressed: &[u8]) -> Result<Vec<f32>>;
}

/// Real decoder: decompress, then extract positions.
pub struct WireDecoder;

impl PointCloudDecoder for WireDecoder {
    fn decode(&self, compressed: &[u8]) -> Result<Vec<f32>> {
        let pc = codec::decode_point_cloud(compressed)?;
        positions_to_floats(&pc)
    }
}

/// No-op decoder: always an empty position buffer, never an error.
pub struct NullDecoder;

impl PointCloudDecoder for NullDecoder {
    fn decode(&self, _compressed: &[u8]) -> Result<Vec<f32>> {
        Ok(Vec::new())
    }
}

/// Extract the position attribute into a flat buffer, point order.
///
/// Requires a Position attribute with exactly 3 f32 components; any other
/// layout is a `Decode` error with no partial output. Lookup goes through the
/// attribute's index map because storage order and point order may differ.
pub fn positions_to_floats(pc: &PointCloud) -> Result<Vec<f32>> {
    let pos = pc
        .named_attribute(AttributeKind::Position)
        .ok_or_else(|| GroundLinkError::Decode("no position attribute".into()))?;
    if pos.data_type != DataType::F32 || pos.components != 3 {
        tracing::warn!(
            data_type = ?pos.data_type,
            components = pos.components,
            "unsupported position attribute layout"
        );
        return Err(GroundLinkError::Decode(format!(
            "unsupported position layout: {:?} x {}",
            pos.data_type, pos.components
        )));
    }

    let n = pc.num_points as usize;
    let mut out = Vec::with_capacity(n * 3);
    for point in 0..n {
        let idx = pos
            .mapped_index(point)
            .ok_or_else(|| GroundLinkError::Decode("index map shorter than point count".into()))?;
        for component in 0..3 {
            let v = pos
                .f32_component(idx, component)
                .ok_or_else(|| GroundLinkError::Decode("attribute value out of range".into()))?;
            out.push(v);
        }
    }
    Ok(out)
}
