//! Compressed point-cloud wire codec (panic-free).
//!
//! Layout of a compressed stream:
//!
//! ```text
//! magic      4B   "GPC1"
//! num_points u32  big-endian
//! attr_count u8
//! per attribute:
//!   kind u8, data_type u8, components u8, flags u8
//!   if flags & 0x01 (explicit index map): num_points x u32 big-endian
//!   values_len u32 big-endian, then values_len bytes of little-endian scalars
//! ```
//!
//! Decoding never trusts a declared length without a `remaining()` check, and
//! never returns a cloud whose index map points outside its value array.
//! Encoding exists so simulators and tests can produce streams; the relay
//! itself only decodes.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::cloud::model::{AttributeKind, DataType, PointAttribute, PointCloud};
use crate::error::{GroundLinkError, Result};

const MAGIC: [u8; 4] = *b"GPC1";

const FLAG_INDEX_MAP: u8 = 0x01;

fn kind_from_wire(b: u8) -> Result<AttributeKind> {
    match b {
        0 => Ok(AttributeKind::Position),
        1 => Ok(AttributeKind::Normal),
        2 => Ok(AttributeKind::Color),
        3 => Ok(AttributeKind::Generic),
        other => Err(GroundLinkError::Decode(format!(
            "unknown attribute kind: {other}"
        ))),
    }
}

fn kind_to_wire(kind: AttributeKind) -> u8 {
    match kind {
        AttributeKind::Position => 0,
        AttributeKind::Normal => 1,
        AttributeKind::Color => 2,
        AttributeKind::Generic => 3,
    }
}

fn data_type_from_wire(b: u8) -> Result<DataType> {
    match b {
        0 => Ok(DataType::F32),
        1 => Ok(DataType::U8),
        2 => Ok(DataType::U16),
        3 => Ok(DataType::U32),
        other => Err(GroundLinkError::Decode(format!(
            "unknown attribute data type: {other}"
        ))),
    }
}

fn data_type_to_wire(dt: DataType) -> u8 {
    match dt {
        DataType::F32 => 0,
        DataType::U8 => 1,
        DataType::U16 => 2,
        DataType::U32 => 3,
    }
}

/// Decode a compressed stream into a point cloud.
pub fn decode_point_cloud(data: &[u8]) -> Result<PointCloud> {
    let mut buf = data;

    if buf.remaining() < MAGIC.len() + 5 {
        return Err(GroundLinkError::Decode(format!(
            "stream too short: {} bytes",
            data.len()
        )));
    }
    let mut magic = [0u8; 4];
    buf.copy_to_slice(&mut magic);
    if magic != MAGIC {
        return Err(GroundLinkError::Decode("bad magic".into()));
    }

    let num_points = buf.get_u32();
    let attr_count = buf.get_u8();

    let mut attributes = Vec::with_capacity(attr_count as usize);
    for _ in 0..attr_count {
        if buf.remaining() < 4 {
            return Err(GroundLinkError::Decode("truncated attribute header".into()));
        }
        let kind = kind_from_wire(buf.get_u8())?;
        let data_type = data_type_from_wire(buf.get_u8())?;
        let components = buf.get_u8();
        let flags = buf.get_u8();
        if components == 0 {
            return Err(GroundLinkError::Decode("zero-component attribute".into()));
        }

        let index_map = if flags & FLAG_INDEX_MAP != 0 {
            let entries = num_points as usize;
            let map_len = entries
                .checked_mul(4)
                .ok_or_else(|| GroundLinkError::Decode("index map length overflow".into()))?;
            if buf.remaining() < map_len {
                return Err(GroundLinkError::Decode("truncated index map".into()));
            }
            let mut map = Vec::with_capacity(entries);
            for _ in 0..entries {
                map.push(buf.get_u32());
            }
            Some(map)
        } else {
            None
        };

        if buf.remaining() < 4 {
            return Err(GroundLinkError::Decode("truncated values length".into()));
        }
        let values_len = buf.get_u32() as usize;
        if buf.remaining() < values_len {
            return Err(GroundLinkError::Decode("truncated value array".into()));
        }
        let values = Bytes::copy_from_slice(
            buf.get(..values_len)
                .ok_or_else(|| GroundLinkError::Decode("truncated value array".into()))?,
        );
        buf.advance(values_len);

        let stride = data_type.size() * components as usize;
        if values_len % stride != 0 {
            return Err(GroundLinkError::Decode(format!(
                "value array length {values_len} not a multiple of stride {stride}"
            )));
        }
        let num_values = values_len / stride;

        match &index_map {
            Some(map) => {
                if map.iter().any(|&i| i as usize >= num_values) {
                    return Err(GroundLinkError::Decode(
                        "index map entry out of range".into(),
                    ));
                }
            }
            None => {
                if num_values != num_points as usize {
                    return Err(GroundLinkError::Decode(format!(
                        "value count {num_values} does not match point count {num_points}"
                    )));
                }
            }
        }

        attributes.push(PointAttribute {
            kind,
            data_type,
            components,
            values,
            index_map,
        });
    }

    Ok(PointCloud {
        num_points,
        attributes,
    })
}

/// Encode a point cloud into a compressed stream (inverse of decode).
pub fn encode_point_cloud(pc: &PointCloud) -> Result<Bytes> {
    let mut out = BytesMut::new();
    out.put_slice(&MAGIC);
    out.put_u32(pc.num_points);
    let attr_count = u8::try_from(pc.attributes.len())
        .map_err(|_| GroundLinkError::Decode("too many attributes".into()))?;
    out.put_u8(attr_count);

    for attr in &pc.attributes {
        let stride = attr.data_type.size() * attr.components as usize;
        if attr.components == 0 || attr.values.len() % stride != 0 {
            return Err(GroundLinkError::Decode(
                "attribute value array does not match its layout".into(),
            ));
        }
        if let Some(map) = &attr.index_map {
            if map.len() != pc.num_points as usize {
                return Err(GroundLinkError::Decode(
                    "index map length does not match point count".into(),
                ));
            }
        } else if attr.num_values() != pc.num_points as usize {
            return Err(GroundLinkError::Decode(
                "value count does not match point count".into(),
            ));
        }

        out.put_u8(kind_to_wire(attr.kind));
        out.put_u8(data_type_to_wire(attr.data_type));
        out.put_u8(attr.components);
        out.put_u8(if attr.index_map.is_some() {
            FLAG_INDEX_MAP
        } else {
            0
        });
        if let Some(map) = &attr.index_map {
            for &i in map {
                out.put_u32(i);
            }
        }
        let values_len = u32::try_from(attr.values.len())
            .map_err(|_| GroundLinkError::Decode("value array exceeds u32 length".into()))?;
        out.put_u32(values_len);
        out.put_slice(&attr.values);
    }

    Ok(out.freeze())
}
