//! Dithering of reconstructed 8x8 blocks.
//!
//! The pattern bytes are centred on 128; each one is descaled by 16 (with
//! rounding) and added to the matching pixel.

use crate::common::transform::clip_8b;
use crate::config::DspConfig;

const DITHER_AMP_CENTER: i32 = 1 << 7;
const DITHER_DESCALE: i32 = 4;
const DITHER_DESCALE_ROUNDER: i32 = 1 << (DITHER_DESCALE - 1);

/// Adds `pattern` (8 rows of 8) to the 8x8 block at the start of `dst`.
pub fn dither_combine_8x8(pattern: &[u8; 64], dst: &mut [u8], stride: usize) {
    for (row, dither) in dst.chunks_mut(stride).zip(pattern.chunks_exact(8)) {
        for (p, &d) in row[..8].iter_mut().zip(dither) {
            let delta = (i32::from(d) - DITHER_AMP_CENTER + DITHER_DESCALE_ROUNDER) >> DITHER_DESCALE;
            *p = clip_8b(i32::from(*p) + delta);
        }
    }
}

/// Applies [`dither_combine_8x8`] through the dispatch table when
/// `config.dithering` is set; otherwise leaves `dst` alone.
pub fn dither_block(config: &DspConfig, pattern: &[u8; 64], dst: &mut [u8], stride: usize) {
    if config.dithering {
        (crate::dsp::get().dither_combine)(pattern, dst, stride);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_pattern_is_neutral() {
        let pattern = [128u8; 64];
        let mut dst: Vec<u8> = (0..16 * 8).map(|i| i as u8).collect();
        let orig = dst.clone();
        dither_combine_8x8(&pattern, &mut dst, 16);
        assert_eq!(dst, orig);
    }

    #[test]
    fn test_delta_rounding() {
        // (255 - 128 + 8) >> 4 == 8, (0 - 128 + 8) >> 4 == -8, (135 - 128 + 8) >> 4 == 0
        let mut pattern = [128u8; 64];
        pattern[0] = 255;
        pattern[1] = 0;
        pattern[2] = 135;
        pattern[3] = 136;
        let mut dst = vec![100u8; 8 * 8];
        dither_combine_8x8(&pattern, &mut dst, 8);
        assert_eq!(&dst[..5], &[108, 92, 100, 101, 100]);
    }

    #[test]
    fn test_clips_and_respects_stride() {
        let pattern = [255u8; 64];
        let stride = 12;
        let mut dst = vec![250u8; stride * 8];
        dither_combine_8x8(&pattern, &mut dst, stride);
        for row in dst.chunks(stride) {
            assert_eq!(&row[..8], &[255; 8]);
            assert_eq!(&row[8..], &[250; 4]);
        }
    }

    #[test]
    fn test_dither_block_honours_config() {
        let pattern = [255u8; 64];
        let mut dst = vec![10u8; 64];

        dither_block(&DspConfig::default(), &pattern, &mut dst, 8);
        assert!(dst.iter().all(|&p| p == 10));

        dither_block(&DspConfig::default().dithering(true), &pattern, &mut dst, 8);
        assert!(dst.iter().all(|&p| p == 18));
    }
}
