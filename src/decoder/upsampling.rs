//! Line-pair and whole-frame YUV 4:2:0 to RGB conversion
//!
//! The y plane is the same size as the output so that maps 1-1, but the u and v
//! planes are half the size in each direction so they need to be scaled up.
//!
//! The simple way is to take each u/v value and associate it with the 4 pixels
//! around it. Fancy upsampling, the libwebp default, instead interpolates u and
//! v between the 4 nearest samples:
//! ```text
//! [a b]    ([9*a + 3*b + 3*c +   d    3*a + 9*b + 3*c +   d] + [8 8]) / 16
//! [c d]    ([3*a +   b + 9*c + 3*d      a + 3*b + 3*c + 9*d]   [8 8]) / 16
//! ```
//! with the samples mirrored at the frame edges.

use crate::config::{DspConfig, UpsamplingMethod};
use crate::decoder::yuv::formats::{Argb, Bgr, Bgra, Rgb, Rgb565, Rgba, Rgba4444};
use crate::decoder::yuv::{PixelFormat, PixelLayout};
use crate::error::DspError;

/// Fancy line-pair converter: `(top_y, bottom, top_u, top_v, cur_u, cur_v, top_dst, len)`.
///
/// `bottom` is the optional second luma row and its destination.
pub type FancyLinePairFn =
    fn(&[u8], Option<(&[u8], &mut [u8])>, &[u8], &[u8], &[u8], &[u8], &mut [u8], usize);

/// Point-sampling line-pair converter: `(top_y, bottom, u, v, top_dst, len)`.
pub type SampleLinePairFn = fn(&[u8], Option<(&[u8], &mut [u8])>, &[u8], &[u8], &mut [u8], usize);

/// A line-pair converter selected for one layout and upsampling method.
#[derive(Clone, Copy)]
pub enum LinePairConverter {
    /// Bilinear chroma interpolation between two chroma rows.
    Fancy(FancyLinePairFn),
    /// Each chroma sample covers a 2x2 pixel quad.
    Simple(SampleLinePairFn),
}

impl core::fmt::Debug for LinePairConverter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinePairConverter::Fancy(_) => f.write_str("LinePairConverter::Fancy"),
            LinePairConverter::Simple(_) => f.write_str("LinePairConverter::Simple"),
        }
    }
}

// u and v are processed together, stashed into the two 16 bit halves of a u32.
#[inline(always)]
fn load_uv(u: u8, v: u8) -> u32 {
    u32::from(u) | (u32::from(v) << 16)
}

#[inline(always)]
fn emit<L: PixelFormat>(y: u8, uv: u32, dst: &mut [u8], x: usize) {
    L::write(y, (uv & 0xff) as u8, (uv >> 16) as u8, &mut dst[x * L::BPP..]);
}

/// Converts one or two luma rows with bilinear chroma upsampling.
///
/// `top_u`/`top_v` is the chroma row above the pair and `cur_u`/`cur_v` the
/// one below; the top output row sits nearer `top_*` and the bottom row nearer
/// `cur_*`. For the first and last row of a frame pass the same chroma row
/// twice. `len` is the row width in pixels.
#[allow(clippy::too_many_arguments)]
pub fn upsample_line_pair_fancy<L: PixelFormat>(
    top_y: &[u8],
    mut bottom: Option<(&[u8], &mut [u8])>,
    top_u: &[u8],
    top_v: &[u8],
    cur_u: &[u8],
    cur_v: &[u8],
    top_dst: &mut [u8],
    len: usize,
) {
    if len == 0 {
        return;
    }
    let last_pixel_pair = (len - 1) >> 1;
    let mut tl_uv = load_uv(top_u[0], top_v[0]);
    let mut l_uv = load_uv(cur_u[0], cur_v[0]);

    let uv0 = (3 * tl_uv + l_uv + 0x0002_0002) >> 2;
    emit::<L>(top_y[0], uv0, top_dst, 0);
    if let Some((bottom_y, bottom_dst)) = bottom.as_mut() {
        let uv0 = (3 * l_uv + tl_uv + 0x0002_0002) >> 2;
        emit::<L>(bottom_y[0], uv0, bottom_dst, 0);
    }

    for x in 1..=last_pixel_pair {
        let t_uv = load_uv(top_u[x], top_v[x]);
        let uv = load_uv(cur_u[x], cur_v[x]);
        // precompute invariant values associated with first and second diagonals
        let avg = tl_uv + t_uv + l_uv + uv + 0x0008_0008;
        let diag_12 = (avg + 2 * (t_uv + l_uv)) >> 3;
        let diag_03 = (avg + 2 * (tl_uv + uv)) >> 3;

        let uv0 = (diag_12 + tl_uv) >> 1;
        let uv1 = (diag_03 + t_uv) >> 1;
        emit::<L>(top_y[2 * x - 1], uv0, top_dst, 2 * x - 1);
        emit::<L>(top_y[2 * x], uv1, top_dst, 2 * x);

        if let Some((bottom_y, bottom_dst)) = bottom.as_mut() {
            let uv0 = (diag_03 + l_uv) >> 1;
            let uv1 = (diag_12 + uv) >> 1;
            emit::<L>(bottom_y[2 * x - 1], uv0, bottom_dst, 2 * x - 1);
            emit::<L>(bottom_y[2 * x], uv1, bottom_dst, 2 * x);
        }
        tl_uv = t_uv;
        l_uv = uv;
    }

    if len & 1 == 0 {
        let uv0 = (3 * tl_uv + l_uv + 0x0002_0002) >> 2;
        emit::<L>(top_y[len - 1], uv0, top_dst, len - 1);
        if let Some((bottom_y, bottom_dst)) = bottom.as_mut() {
            let uv0 = (3 * l_uv + tl_uv + 0x0002_0002) >> 2;
            emit::<L>(bottom_y[len - 1], uv0, bottom_dst, len - 1);
        }
    }
}

/// Converts one or two luma rows sharing one chroma row, without
/// interpolation: pixels `2x` and `2x + 1` of both rows use chroma sample `x`.
pub fn sample_line_pair_simple<L: PixelFormat>(
    top_y: &[u8],
    mut bottom: Option<(&[u8], &mut [u8])>,
    u: &[u8],
    v: &[u8],
    top_dst: &mut [u8],
    len: usize,
) {
    for x in 0..len {
        let (cu, cv) = (u[x / 2], v[x / 2]);
        L::write(top_y[x], cu, cv, &mut top_dst[x * L::BPP..]);
        if let Some((bottom_y, bottom_dst)) = bottom.as_mut() {
            L::write(bottom_y[x], cu, cv, &mut bottom_dst[x * L::BPP..]);
        }
    }
}

/// Picks the line-pair converter for `layout` and `method`.
pub fn line_pair_converter(layout: PixelLayout, method: UpsamplingMethod) -> LinePairConverter {
    fn select<L: PixelFormat>(method: UpsamplingMethod) -> LinePairConverter {
        match method {
            UpsamplingMethod::Bilinear => LinePairConverter::Fancy(upsample_line_pair_fancy::<L>),
            UpsamplingMethod::Simple => LinePairConverter::Simple(sample_line_pair_simple::<L>),
        }
    }

    match layout {
        PixelLayout::Rgb => select::<Rgb>(method),
        PixelLayout::Bgr => select::<Bgr>(method),
        PixelLayout::Rgba | PixelLayout::RgbaPremultiplied => select::<Rgba>(method),
        PixelLayout::Bgra | PixelLayout::BgraPremultiplied => select::<Bgra>(method),
        PixelLayout::Argb | PixelLayout::ArgbPremultiplied => select::<Argb>(method),
        PixelLayout::Rgba4444 | PixelLayout::Rgba4444Premultiplied => select::<Rgba4444>(method),
        PixelLayout::Rgb565 => select::<Rgb565>(method),
    }
}

/// Borrowed 4:2:0 planes of one decoded frame.
#[derive(Clone, Copy, Debug)]
pub struct YuvPlanes<'a> {
    /// Luma plane, `height` rows of `y_stride` bytes.
    pub y: &'a [u8],
    /// Cb plane, `(height + 1) / 2` rows of `uv_stride` bytes.
    pub u: &'a [u8],
    /// Cr plane, same geometry as `u`.
    pub v: &'a [u8],
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Luma bytes per row.
    pub y_stride: usize,
    /// Chroma bytes per row.
    pub uv_stride: usize,
}

impl<'a> YuvPlanes<'a> {
    /// Planes with tightly packed rows.
    pub fn packed(y: &'a [u8], u: &'a [u8], v: &'a [u8], width: usize, height: usize) -> Self {
        Self {
            y,
            u,
            v,
            width,
            height,
            y_stride: width,
            uv_stride: width.div_ceil(2),
        }
    }

    fn y_row(&self, row: usize) -> &'a [u8] {
        &self.y[row * self.y_stride..][..self.width]
    }

    fn uv_rows(&self, row: usize) -> (&'a [u8], &'a [u8]) {
        let uv_width = self.width.div_ceil(2);
        (
            &self.u[row * self.uv_stride..][..uv_width],
            &self.v[row * self.uv_stride..][..uv_width],
        )
    }

    fn validate(&self) -> Result<(), DspError> {
        let uv_width = self.width.div_ceil(2);
        let uv_height = self.height.div_ceil(2);
        if self.width == 0 || self.height == 0 || self.y_stride < self.width || self.uv_stride < uv_width
        {
            return Err(DspError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let y_needed = (self.height - 1) * self.y_stride + self.width;
        let uv_needed = (uv_height - 1) * self.uv_stride + uv_width;
        for (needed, actual) in [
            (y_needed, self.y.len()),
            (uv_needed, self.u.len()),
            (uv_needed, self.v.len()),
        ] {
            if actual < needed {
                return Err(DspError::BufferTooSmall { needed, actual });
            }
        }
        Ok(())
    }
}

/// Converts a whole frame into `out` (tightly packed rows of
/// `width * layout.bytes_per_pixel()` bytes), upsampling chroma with
/// `config.upsampling`.
pub fn convert_yuv420(
    config: &DspConfig,
    planes: &YuvPlanes<'_>,
    layout: PixelLayout,
    out: &mut [u8],
) -> Result<(), DspError> {
    planes.validate()?;
    let row_bytes = planes.width * layout.bytes_per_pixel();
    let needed = row_bytes * planes.height;
    if out.len() < needed {
        return Err(DspError::BufferTooSmall {
            needed,
            actual: out.len(),
        });
    }

    let converter = line_pair_converter(layout, config.upsampling);
    log::debug!(
        "converting {}x{} frame to {:?} with {:?}",
        planes.width,
        planes.height,
        layout,
        converter
    );

    let (width, height) = (planes.width, planes.height);
    let out = &mut out[..needed];
    match converter {
        LinePairConverter::Fancy(upsample) => {
            // first row only has the chroma row below it
            let (first, rest) = out.split_at_mut(row_bytes);
            let (u, v) = planes.uv_rows(0);
            upsample(planes.y_row(0), None, u, v, u, v, first, width);

            let mut pairs = rest.chunks_exact_mut(2 * row_bytes);
            let mut row = 1;
            for pair in &mut pairs {
                let (top_dst, bottom_dst) = pair.split_at_mut(row_bytes);
                let (top_u, top_v) = planes.uv_rows((row - 1) / 2);
                let (cur_u, cur_v) = planes.uv_rows((row + 1) / 2);
                upsample(
                    planes.y_row(row),
                    Some((planes.y_row(row + 1), bottom_dst)),
                    top_u,
                    top_v,
                    cur_u,
                    cur_v,
                    top_dst,
                    width,
                );
                row += 2;
            }

            // even heights end on a row with only the chroma row above it
            let last = pairs.into_remainder();
            if !last.is_empty() {
                debug_assert_eq!(row, height - 1);
                let (u, v) = planes.uv_rows(row / 2);
                upsample(planes.y_row(row), None, u, v, u, v, last, width);
            }
        }
        LinePairConverter::Simple(sample) => {
            for (pair_index, pair) in out.chunks_mut(2 * row_bytes).enumerate() {
                let row = 2 * pair_index;
                let (u, v) = planes.uv_rows(pair_index);
                if pair.len() > row_bytes {
                    let (top_dst, bottom_dst) = pair.split_at_mut(row_bytes);
                    let bottom = Some((planes.y_row(row + 1), bottom_dst));
                    sample(planes.y_row(row), bottom, u, v, top_dst, width);
                } else {
                    sample(planes.y_row(row), None, u, v, pair, width);
                }
            }
        }
    }
    Ok(())
}
