//! Decoded point-cloud model.
//!
//! Mirrors the compressor's point/attribute split: attribute values are
//! stored in their own array, and each point resolves to a value through an
//! optional index map. Storage order and point order may differ, so every
//! per-point read must go through [`PointAttribute::mapped_index`].

use bytes::Bytes;

/// Semantic role of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Position,
    Normal,
    Color,
    Generic,
}

/// Scalar type of an attribute component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    F32,
    U8,
    U16,
    U32,
}

impl DataType {
    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            DataType::F32 | DataType::U32 => 4,
            DataType::U16 => 2,
            DataType::U8 => 1,
        }
    }
}

/// One attribute of a decoded point cloud.
#[derive(Debug, Clone)]
pub struct PointAttribute {
    pub kind: AttributeKind,
    pub data_type: DataType,
    /// Components per value (3 for an xyz position).
    pub components: u8,
    /// Stored values, `components` little-endian scalars per value index.
    pub values: Bytes,
    /// Point index → value index. Identity when absent.
    pub index_map: Option<Vec<u32>>,
}

impl PointAttribute {
    /// Number of distinct stored values.
    pub fn num_values(&self) -> usize {
        let stride = self.data_type.size() * self.components as usize;
        if stride == 0 {
            0
        } else {
            self.values.len() / stride
        }
    }

    /// Resolve a point index to its value index.
    pub fn mapped_index(&self, point: usize) -> Option<usize> {
        match &self.index_map {
            Some(map) => map.get(point).map(|i| *i as usize),
            None => Some(point),
        }
    }

    /// Read one f32 component of the value at `value_index`.
    ///
    /// Returns `None` for non-f32 attributes or out-of-range access.
    pub fn f32_component(&self, value_index: usize, component: usize) -> Option<f32> {
        if self.data_type != DataType::F32 || component >= self.components as usize {
            return None;
        }
        let stride = self.components as usize * 4;
        let off = value_index.checked_mul(stride)?.checked_add(component * 4)?;
        let raw = self.values.get(off..off + 4)?;
        Some(f32::from_le_bytes(raw.try_into().ok()?))
    }
}

/// A decoded point cloud. Ephemeral: built for one relay cycle, then dropped.
#[derive(Debug, Clone)]
pub struct PointCloud {
    pub num_points: u32,
    pub attributes: Vec<PointAttribute>,
}

impl PointCloud {
    /// First attribute with the given semantic kind.
    pub fn named_attribute(&self, kind: AttributeKind) -> Option<&PointAttribute> {
        self.attributes.iter().find(|a| a.kind == kind)
    }
}
