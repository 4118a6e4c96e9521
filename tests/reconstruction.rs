//! Prediction + residual reconstruction through the public kernel table.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use zenwebp_dsp::common::prediction::{BPS, LUMA4_PREDICTORS};
use zenwebp_dsp::common::transform::{
    reconstruct_block, reconstruct_uv, transform, transform_wht, TransformKind,
};
use zenwebp_dsp::{dsp, DspError, IntraMode, ModeKind, PredictionMode};

/// Work buffer with a border row and column filled from `rng`.
fn bordered_buffer(rng: &mut StdRng, rows: usize) -> Vec<u8> {
    let mut buf = vec![0u8; BPS * rows];
    for x in 0..BPS {
        buf[x] = rng.gen();
    }
    for y in 1..rows {
        buf[y * BPS] = rng.gen();
    }
    buf
}

/// Sparse coefficients shaped like real residuals: a DC term and a few low
/// frequencies, sometimes nothing at all.
fn random_coeffs(rng: &mut StdRng) -> [i16; 16] {
    let mut coeffs = [0i16; 16];
    match rng.gen_range(0..4) {
        0 => {}
        1 => coeffs[0] = rng.gen_range(-600..600),
        2 => {
            coeffs[0] = rng.gen_range(-600..600);
            coeffs[1] = rng.gen_range(-200..200);
            coeffs[4] = rng.gen_range(-200..200);
        }
        _ => {
            for c in coeffs.iter_mut() {
                if rng.gen_bool(0.4) {
                    *c = rng.gen_range(-300..300);
                }
            }
        }
    }
    coeffs
}

#[test]
fn luma_macroblock_with_wht_matches_full_transform() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0001);
    let dsp = dsp::get();

    for _ in 0..50 {
        let mut y2 = [0i16; 16];
        for c in y2.iter_mut() {
            *c = rng.gen_range(-2000..2000);
        }
        let mut coeffs = [0i16; 256];
        for block in coeffs.chunks_exact_mut(16) {
            let ac = random_coeffs(&mut rng);
            block[1..].copy_from_slice(&ac[1..]);
        }
        transform_wht(&y2, &mut coeffs);

        let base = bordered_buffer(&mut rng, 17);
        let mode = PredictionMode::ALL[rng.gen_range(0..PredictionMode::ALL.len())];

        let mut fast = base.clone();
        dsp.predict_luma16(mode, &mut fast, 1, 1, BPS);
        let mut reference = fast.clone();

        for (n, block) in coeffs.chunks_exact(16).enumerate() {
            let block: &[i16; 16] = block.try_into().unwrap();
            let offset = (1 + 4 * (n / 4)) * BPS + 1 + 4 * (n % 4);
            reconstruct_block(block, &mut fast[offset..], BPS);
            transform(block, &mut reference[offset..], BPS, false);
        }
        assert_eq!(fast, reference, "mode {:?}", mode);
    }
}

#[test]
fn every_4x4_mode_reconstructs_through_the_table() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0002);
    let dsp = dsp::get();

    for raw in 0u8..10 {
        let mode = IntraMode::try_from(raw).unwrap();
        assert_eq!(mode.index(), usize::from(raw));

        let mut buf = bordered_buffer(&mut rng, 5);
        // top-right pixels for VE/LD/VL
        for x in 5..9 {
            buf[x] = rng.gen();
        }
        let coeffs = random_coeffs(&mut rng);

        let mut via_table = buf.clone();
        dsp.predict_luma4(mode, &mut via_table, 1, 1, BPS);
        TransformKind::classify(&coeffs).apply(&coeffs, &mut via_table[BPS + 1..], BPS);

        let mut direct = buf.clone();
        LUMA4_PREDICTORS[usize::from(raw)](&mut direct, 1, 1, BPS);
        transform(&coeffs, &mut direct[BPS + 1..], BPS, false);

        assert_eq!(via_table, direct, "mode {:?}", mode);
    }
}

#[test]
fn raw_mode_indices_are_checked() {
    assert_eq!(
        IntraMode::try_from(10),
        Err(DspError::InvalidMode {
            kind: ModeKind::Luma4,
            index: 10
        })
    );
    let err = PredictionMode::try_from(7).unwrap_err();
    assert_eq!(
        err,
        DspError::InvalidMode {
            kind: ModeKind::Luma16OrChroma,
            index: 7
        }
    );
    assert_eq!(err.to_string(), "Invalid 16x16 luma / chroma prediction mode: 7");
    assert_eq!(PredictionMode::try_from(6), Ok(PredictionMode::DcNoTopLeft));
}

#[test]
fn frame_corner_dc_prediction() {
    let dsp = dsp::get();
    let mut buf = vec![0u8; BPS * 17];
    for x in 0..BPS {
        buf[x] = 255;
    }
    for y in 1..17 {
        buf[y * BPS] = 255;
    }

    // macroblock (0, 0) has no neighbours at all
    let mode = PredictionMode::DC.for_position(0, 0);
    assert_eq!(mode, PredictionMode::DcNoTopLeft);
    dsp.predict_luma16(mode, &mut buf, 1, 1, BPS);
    for y in 1..17 {
        assert!(buf[y * BPS + 1..y * BPS + 17].iter().all(|&p| p == 128));
    }

    // interior macroblock averages both edges
    dsp.predict_luma16(PredictionMode::DC.for_position(3, 2), &mut buf, 1, 1, BPS);
    for y in 1..17 {
        assert!(buf[y * BPS + 1..y * BPS + 17].iter().all(|&p| p == 255));
    }
}

#[test]
fn chroma_reconstruction_picks_exact_path() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0003);
    let dsp = dsp::get();

    for _ in 0..40 {
        let mut coeffs = [0i16; 64];
        for block in coeffs.chunks_exact_mut(16) {
            block.copy_from_slice(&random_coeffs(&mut rng));
        }
        if rng.gen_bool(0.5) {
            // DC-only chroma is common enough to exercise on its own
            for block in coeffs.chunks_exact_mut(16) {
                block[1..].fill(0);
            }
        }

        let base = bordered_buffer(&mut rng, 9);
        let mode = PredictionMode::ALL[rng.gen_range(0..PredictionMode::ALL.len())];
        let mut predicted = base.clone();
        dsp.predict_chroma8(mode, &mut predicted, 1, 1, BPS);

        let mut selected = predicted.clone();
        reconstruct_uv(&coeffs, &mut selected[BPS + 1..], BPS);

        let mut reference = predicted.clone();
        (dsp.transform_uv)(&coeffs, &mut reference[BPS + 1..], BPS);

        assert_eq!(selected, reference);
    }
}
