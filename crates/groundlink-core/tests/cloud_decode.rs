//! Point-cloud codec and decode-capability tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bytes::Bytes;

use groundlink_core::cloud::{
    codec, positions_to_floats, AttributeKind, DataType, NullDecoder, PointAttribute, PointCloud,
    PointCloudDecoder, WireDecoder,
};

fn f32_values(floats: &[f32]) -> Bytes {
    let mut out = Vec::with_capacity(floats.len() * 4);
    for v in floats {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.into()
}

fn position_cloud(points: &[[f32; 3]]) -> PointCloud {
    let flat: Vec<f32> = points.iter().flatten().copied().collect();
    PointCloud {
        num_points: points.len() as u32,
        attributes: vec![PointAttribute {
            kind: AttributeKind::Position,
            data_type: DataType::F32,
            components: 3,
            values: f32_values(&flat),
            index_map: None,
        }],
    }
}

#[test]
fn codec_roundtrip_extracts_n_by_3_floats() {
    let points = [[1.0, 2.0, 3.0], [-4.5, 0.25, 7.0], [0.0, -1.0, 100.0]];
    let stream = codec::encode_point_cloud(&position_cloud(&points)).unwrap();

    let decoded = codec::decode_point_cloud(&stream).unwrap();
    assert_eq!(decoded.num_points, 3);

    let flat = positions_to_floats(&decoded).unwrap();
    assert_eq!(flat.len(), 9);
    assert_eq!(flat, [1.0, 2.0, 3.0, -4.5, 0.25, 7.0, 0.0, -1.0, 100.0]);
}

#[test]
fn index_map_reorders_points() {
    // Values stored as [a, b, c]; the map visits them as c, a, b.
    let mut pc = position_cloud(&[[1.0, 1.0, 1.0], [2.0, 2.0, 2.0], [3.0, 3.0, 3.0]]);
    pc.attributes[0].index_map = Some(vec![2, 0, 1]);

    let stream = codec::encode_point_cloud(&pc).unwrap();
    let flat = positions_to_floats(&codec::decode_point_cloud(&stream).unwrap()).unwrap();
    assert_eq!(flat, [3.0, 3.0, 3.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
}

#[test]
fn index_map_allows_shared_values() {
    // Two points resolving to the same stored value.
    let mut pc = PointCloud {
        num_points: 2,
        attributes: vec![PointAttribute {
            kind: AttributeKind::Position,
            data_type: DataType::F32,
            components: 3,
            values: f32_values(&[9.0, 8.0, 7.0]),
            index_map: Some(vec![0, 0]),
        }],
    };
    let stream = codec::encode_point_cloud(&pc).unwrap();
    let flat = positions_to_floats(&codec::decode_point_cloud(&stream).unwrap()).unwrap();
    assert_eq!(flat, [9.0, 8.0, 7.0, 9.0, 8.0, 7.0]);

    // Out-of-range entry must be rejected at decode time.
    pc.attributes[0].index_map = Some(vec![0, 5]);
    let stream = codec::encode_point_cloud(&pc).unwrap();
    let err = codec::decode_point_cloud(&stream).expect_err("bad map must fail");
    assert_eq!(err.kind().as_str(), "DECODE");
}

#[test]
fn unsupported_layouts_are_rejected() {
    // 2-component position.
    let two_comp = PointCloud {
        num_points: 1,
        attributes: vec![PointAttribute {
            kind: AttributeKind::Position,
            data_type: DataType::F32,
            components: 2,
            values: f32_values(&[1.0, 2.0]),
            index_map: None,
        }],
    };
    let err = positions_to_floats(&two_comp).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "DECODE");

    // Non-f32 position.
    let u16_pos = PointCloud {
        num_points: 1,
        attributes: vec![PointAttribute {
            kind: AttributeKind::Position,
            data_type: DataType::U16,
            components: 3,
            values: vec![0u8; 6].into(),
            index_map: None,
        }],
    };
    let err = positions_to_floats(&u16_pos).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "DECODE");

    // No position attribute at all.
    let no_pos = PointCloud {
        num_points: 1,
        attributes: vec![PointAttribute {
            kind: AttributeKind::Color,
            data_type: DataType::U8,
            components: 3,
            values: vec![0u8; 3].into(),
            index_map: None,
        }],
    };
    let err = positions_to_floats(&no_pos).expect_err("must fail");
    assert_eq!(err.kind().as_str(), "DECODE");
}

#[test]
fn corrupt_streams_are_rejected() {
    let good = codec::encode_point_cloud(&position_cloud(&[[1.0, 2.0, 3.0]])).unwrap();

    // Bad magic.
    let mut bad_magic = good.to_vec();
    bad_magic[0] ^= 0xFF;
    assert_eq!(
        codec::decode_point_cloud(&bad_magic).unwrap_err().kind().as_str(),
        "DECODE"
    );

    // Every truncation point must fail, never panic.
    for len in 0..good.len() {
        let err = codec::decode_point_cloud(&good[..len]).expect_err("truncation must fail");
        assert_eq!(err.kind().as_str(), "DECODE", "truncated at {len}");
    }
}

#[test]
fn wire_decoder_decodes_and_null_decoder_is_empty() {
    let points = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
    let stream = codec::encode_point_cloud(&position_cloud(&points)).unwrap();

    let flat = WireDecoder.decode(&stream).unwrap();
    assert_eq!(flat.len(), 6);

    // NullDecoder ignores even garbage input.
    assert!(NullDecoder.decode(&stream).unwrap().is_empty());
    assert!(NullDecoder.decode(b"garbage").unwrap().is_empty());

    // WireDecoder on garbage is a decode error, not a partial result.
    let err = WireDecoder.decode(b"garbage").expect_err("must fail");
    assert_eq!(err.kind().as_str(), "DECODE");
}
