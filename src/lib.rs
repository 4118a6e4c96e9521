//! Pixel reconstruction kernels for VP8 (the lossy WebP codec)
//!
//! This crate contains the block-level arithmetic a VP8 decoder runs after
//! entropy decoding: inverse transforms, intra prediction, the deblocking
//! loop filter, dithering, and the final YUV 4:2:0 to RGB conversion. It does
//! not parse bitstreams; callers hand it prediction modes, coefficient blocks
//! and finished planes.
//!
//! # Reconstructing a block
//!
//! Kernels are reached through a table that is filled once per process:
//!
//! ```rust
//! use zenwebp_dsp::common::prediction::BPS;
//! use zenwebp_dsp::PredictionMode;
//!
//! let dsp = zenwebp_dsp::dsp::get();
//! let mut work = [0u8; BPS * 17];
//! dsp.predict_luma16(PredictionMode::DcNoTopLeft, &mut work, 1, 1, BPS);
//!
//! let mut coeffs = [0i16; 16];
//! coeffs[0] = 80;
//! (dsp.transform_dc)(&coeffs, &mut work[BPS + 1..], BPS);
//! assert_eq!(work[BPS + 1], 128 + 10);
//! ```
//!
//! # Converting a frame
//!
//! ```rust
//! use zenwebp_dsp::{convert_yuv420, DspConfig, PixelLayout, YuvPlanes};
//!
//! let (y, u, v) = ([128u8; 16], [128u8; 4], [128u8; 4]);
//! let planes = YuvPlanes::packed(&y, &u, &v, 4, 4);
//! let mut rgba = vec![0u8; 4 * 4 * 4];
//! convert_yuv420(&DspConfig::default(), &planes, PixelLayout::Rgba, &mut rgba)?;
//! assert_eq!(&rgba[..4], &[130, 130, 130, 255]);
//! # Ok::<(), zenwebp_dsp::DspError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
// Enable nightly benchmark functionality if "_benchmarks" feature is enabled.
#![cfg_attr(all(test, feature = "_benchmarks"), feature(test))]

#[cfg(all(test, feature = "_benchmarks"))]
extern crate test;

// Core modules
pub mod common;
pub mod config;
pub mod decoder;
pub mod dsp;
pub mod error;

pub use common::types::{FilterParams, FilterType, IntraMode, PredictionMode};
pub use config::{DspConfig, UpsamplingMethod};
pub use decoder::{
    convert_yuv420, dither_block, filter_macroblock, FilterPlanes, PixelLayout, YuvPlanes,
};
pub use dsp::{Backend, DspFunctions};
pub use error::{DspError, ModeKind};
