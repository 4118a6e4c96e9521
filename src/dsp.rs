//! Process-wide table of the pixel kernels.
//!
//! Callers on a hot path fetch the table once with [`get`] and call through
//! its slots. The table is filled the first time it is requested and never
//! changes afterwards.

use once_cell::sync::OnceCell;

use crate::common::prediction::{self, PredFn};
use crate::common::transform;
use crate::common::types::{IntraMode, PredictionMode, NUM_BMODES, NUM_B_DC_MODES};
use crate::decoder::dither;
use crate::decoder::loop_filter_dispatch::{
    self as lf, ChromaFilterFn, LumaFilterFn, SimpleFilterFn,
};

/// Full inverse DCT: `(coeffs, dst, stride, do_two)`.
pub type TransformFn = fn(&[i16], &mut [u8], usize, bool);
/// Single-block fast path: `(coeffs, dst, stride)`.
pub type TransformBlockFn = fn(&[i16], &mut [u8], usize);
/// Four chroma sub-blocks: `(coeffs, dst, stride)`.
pub type TransformUvFn = fn(&[i16; 64], &mut [u8], usize);
/// Inverse Walsh-Hadamard of the luma DC block.
pub type TransformWhtFn = fn(&[i16; 16], &mut [i16; 256]);
/// Dither combiner: `(pattern, dst, stride)`.
pub type DitherFn = fn(&[u8; 64], &mut [u8], usize);

/// Implementation family the table was filled from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Backend {
    /// Portable scalar kernels.
    Scalar,
}

/// One slot per pixel operation.
#[derive(Clone, Copy)]
pub struct DspFunctions {
    /// Full inverse DCT, optionally two blocks side by side.
    pub transform: TransformFn,
    /// DC-only inverse DCT.
    pub transform_dc: TransformBlockFn,
    /// Inverse DCT for blocks with only coefficients 0, 1 and 4.
    pub transform_ac3: TransformBlockFn,
    /// Full inverse DCT of the four chroma sub-blocks.
    pub transform_uv: TransformUvFn,
    /// DC-only inverse DCT of the four chroma sub-blocks.
    pub transform_dc_uv: TransformUvFn,
    /// Inverse Walsh-Hadamard transform of the luma DC block.
    pub transform_wht: TransformWhtFn,

    /// Indexed by [`IntraMode::index`].
    pub pred_luma4: [PredFn; NUM_BMODES],
    /// Indexed by [`PredictionMode::index`].
    pub pred_luma16: [PredFn; NUM_B_DC_MODES],
    /// Indexed by [`PredictionMode::index`].
    pub pred_chroma8: [PredFn; NUM_B_DC_MODES],

    /// Simple filter, horizontal macroblock edge.
    pub simple_v_filter16: SimpleFilterFn,
    /// Simple filter, vertical macroblock edge.
    pub simple_h_filter16: SimpleFilterFn,
    /// Simple filter, the three inner horizontal edges.
    pub simple_v_filter16i: SimpleFilterFn,
    /// Simple filter, the three inner vertical edges.
    pub simple_h_filter16i: SimpleFilterFn,
    /// Luma horizontal macroblock edge.
    pub v_filter16: LumaFilterFn,
    /// Luma vertical macroblock edge.
    pub h_filter16: LumaFilterFn,
    /// Luma inner horizontal edges.
    pub v_filter16i: LumaFilterFn,
    /// Luma inner vertical edges.
    pub h_filter16i: LumaFilterFn,
    /// Chroma horizontal macroblock edge (U and V).
    pub v_filter8: ChromaFilterFn,
    /// Chroma vertical macroblock edge (U and V).
    pub h_filter8: ChromaFilterFn,
    /// Chroma inner horizontal edge (U and V).
    pub v_filter8i: ChromaFilterFn,
    /// Chroma inner vertical edge (U and V).
    pub h_filter8i: ChromaFilterFn,

    /// Adds an 8x8 dither pattern to a block.
    pub dither_combine: DitherFn,

    /// Where the kernels came from.
    pub backend: Backend,
}

impl DspFunctions {
    /// The portable reference table.
    pub const fn scalar() -> Self {
        Self {
            transform: transform::transform,
            transform_dc: transform::transform_dc,
            transform_ac3: transform::transform_ac3,
            transform_uv: transform::transform_uv,
            transform_dc_uv: transform::transform_dc_uv,
            transform_wht: transform::transform_wht,

            pred_luma4: prediction::LUMA4_PREDICTORS,
            pred_luma16: prediction::LUMA16_PREDICTORS,
            pred_chroma8: prediction::CHROMA8_PREDICTORS,

            simple_v_filter16: lf::simple_v_filter16,
            simple_h_filter16: lf::simple_h_filter16,
            simple_v_filter16i: lf::simple_v_filter16i,
            simple_h_filter16i: lf::simple_h_filter16i,
            v_filter16: lf::v_filter16,
            h_filter16: lf::h_filter16,
            v_filter16i: lf::v_filter16i,
            h_filter16i: lf::h_filter16i,
            v_filter8: lf::v_filter8,
            h_filter8: lf::h_filter8,
            v_filter8i: lf::v_filter8i,
            h_filter8i: lf::h_filter8i,

            dither_combine: dither::dither_combine_8x8,

            backend: Backend::Scalar,
        }
    }

    /// Runs the 4x4 predictor for `mode` on the block at `(x0, y0)`.
    #[inline]
    pub fn predict_luma4(
        &self,
        mode: IntraMode,
        buf: &mut [u8],
        x0: usize,
        y0: usize,
        stride: usize,
    ) {
        (self.pred_luma4[mode.index()])(buf, x0, y0, stride);
    }

    /// Runs the 16x16 predictor for `mode` on the block at `(x0, y0)`.
    #[inline]
    pub fn predict_luma16(
        &self,
        mode: PredictionMode,
        buf: &mut [u8],
        x0: usize,
        y0: usize,
        stride: usize,
    ) {
        (self.pred_luma16[mode.index()])(buf, x0, y0, stride);
    }

    /// Runs the 8x8 predictor for `mode` on the block at `(x0, y0)`.
    #[inline]
    pub fn predict_chroma8(
        &self,
        mode: PredictionMode,
        buf: &mut [u8],
        x0: usize,
        y0: usize,
        stride: usize,
    ) {
        (self.pred_chroma8[mode.index()])(buf, x0, y0, stride);
    }
}

impl Default for DspFunctions {
    fn default() -> Self {
        Self::scalar()
    }
}

impl core::fmt::Debug for DspFunctions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DspFunctions")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

static DSP: OnceCell<DspFunctions> = OnceCell::new();

/// Fills the table if that has not happened yet and returns it.
///
/// Safe to call from any number of threads; all of them get the same table.
pub fn init() -> &'static DspFunctions {
    DSP.get_or_init(|| {
        let table = DspFunctions::scalar();
        log::debug!("dsp table initialized with {:?} backend", table.backend);
        table
    })
}

/// The kernel table, initialized on first use.
#[inline]
pub fn get() -> &'static DspFunctions {
    match DSP.get() {
        Some(table) => table,
        None => init(),
    }
}
