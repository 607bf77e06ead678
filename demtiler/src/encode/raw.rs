//! Raw little-endian float tiles.

use super::error::check_dimensions;
use super::{EncodeContext, EncodeError, TileEncoder, TileFormat};

/// Samples as consecutive little-endian `f32`, no header.
pub fn encode_raw_heightmap(data: &[f32]) -> Vec<u8> {
    data.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Lossless float encoder for intermediate and debug output.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFloatEncoder;

impl RawFloatEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl TileEncoder for RawFloatEncoder {
    fn encode(
        &self,
        data: &[f32],
        width: u32,
        height: u32,
        _ctx: &EncodeContext,
    ) -> Result<Vec<u8>, EncodeError> {
        check_dimensions(data, width, height)?;
        Ok(encode_raw_heightmap(data))
    }

    fn expected_size(&self, width: u32, height: u32) -> Option<usize> {
        Some(width as usize * height as usize * 4)
    }

    fn format(&self) -> TileFormat {
        TileFormat::RawFloat
    }

    fn name(&self) -> &str {
        "Raw float32 (LE)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn test_layout_is_little_endian() {
        let bytes = encode_raw_heightmap(&[1.0]);
        assert_eq!(bytes, vec![0x00, 0x00, 0x80, 0x3f]);
    }

    #[test]
    fn test_empty_input() {
        assert!(encode_raw_heightmap(&[]).is_empty());
    }

    #[test]
    fn test_encoder_checks_dimensions() {
        let ctx = EncodeContext::new(
            crate::coord::GeoBounds::new(0.0, 0.0, 1.0, 1.0).unwrap(),
            0.0,
            1.0,
        );
        let encoder = RawFloatEncoder::new();
        assert!(encoder.encode(&[0.0; 3], 2, 2, &ctx).is_err());

        let bytes = encoder.encode(&[0.0; 4], 2, 2, &ctx).unwrap();
        assert_eq!(Some(bytes.len()), encoder.expected_size(2, 2));
    }

    proptest! {
        #[test]
        fn test_decodes_to_original_samples(
            data in prop::collection::vec(
                any::<f32>().prop_filter("finite", |v| v.is_finite()),
                0..300,
            )
        ) {
            let bytes = encode_raw_heightmap(&data);
            prop_assert_eq!(bytes.len(), data.len() * 4);
            prop_assert_eq!(decode(&bytes), data);
        }
    }
}
