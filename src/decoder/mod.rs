//! Post-prediction stages: deblocking, dithering and colorspace conversion

pub mod dither;
pub mod loop_filter;
pub mod loop_filter_dispatch;
pub mod upsampling;
pub mod yuv;

pub use dither::{dither_block, dither_combine_8x8};
pub use loop_filter_dispatch::{filter_macroblock, FilterPlanes};
pub use upsampling::{convert_yuv420, line_pair_converter, LinePairConverter, YuvPlanes};
pub use yuv::{PixelFormat, PixelLayout};
