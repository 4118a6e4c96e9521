//! Per-pixel Y'CbCr (BT.601) <-> RGB conversion
//!
//! The fixed-point YUV -> RGB implementation is:
//! ```text
//! R = (19077 . y             + 26149 . v - 14234) >> 6
//! G = (19077 . y -  6419 . u - 13320 . v +  8708) >> 6
//! B = (19077 . y + 33050 . u             - 17685) >> 6
//! ```
//! where `a . b = (a * b) >> 8` (the `_mm_mulhi_epu16` form on `a << 8`),
//! keeping 8 bits of fractional precision before the final descale.

/// Fixed-point precision of the RGB -> YUV direction.
pub const YUV_FIX: i32 = 16;
/// Rounding term for [`rgb_to_y`] (`0.5` in `YUV_FIX` precision).
pub const YUV_HALF: i32 = 1 << (YUV_FIX - 1);
/// Fixed-point precision of the YUV -> RGB direction.
const YUV_FIX2: i32 = 6;

/// `_mm_mulhi_epu16` emulation
#[inline(always)]
fn mulhi(v: u8, coeff: u16) -> i32 {
    ((u32::from(v) * u32::from(coeff)) >> 8) as i32
}

/// Based on [src/dsp/yuv.h](https://github.com/webmproject/libwebp/blob/8534f53960befac04c9631e6e50d21dcb42dfeaf/src/dsp/yuv.h#L79)
/// from the libwebp source.
/// ```text
/// const YUV_MASK2: i32 = (256 << YUV_FIX2) - 1;
/// fn clip(v: i32) -> u8 {
///     if (v & !YUV_MASK2) == 0 {
///         (v >> YUV_FIX2) as u8
///     } else if v < 0 {
///         0
///     } else {
///         255
///     }
/// }
/// ```
#[inline(always)]
fn clip(v: i32) -> u8 {
    (v >> YUV_FIX2).clamp(0, 255) as u8
}

#[inline(always)]
pub(crate) fn yuv_to_r(y: u8, v: u8) -> u8 {
    clip(mulhi(y, 19077) + mulhi(v, 26149) - 14234)
}

#[inline(always)]
pub(crate) fn yuv_to_g(y: u8, u: u8, v: u8) -> u8 {
    clip(mulhi(y, 19077) - mulhi(u, 6419) - mulhi(v, 13320) + 8708)
}

#[inline(always)]
pub(crate) fn yuv_to_b(y: u8, u: u8) -> u8 {
    clip(mulhi(y, 19077) + mulhi(u, 33050) - 17685)
}

/// Writes `R, G, B`.
pub fn yuv_to_rgb(y: u8, u: u8, v: u8, rgb: &mut [u8; 3]) {
    rgb[0] = yuv_to_r(y, v);
    rgb[1] = yuv_to_g(y, u, v);
    rgb[2] = yuv_to_b(y, u);
}

/// Writes `B, G, R`.
pub fn yuv_to_bgr(y: u8, u: u8, v: u8, bgr: &mut [u8; 3]) {
    bgr[0] = yuv_to_b(y, u);
    bgr[1] = yuv_to_g(y, u, v);
    bgr[2] = yuv_to_r(y, v);
}

/// Writes `R, G, B, 0xff`.
pub fn yuv_to_rgba(y: u8, u: u8, v: u8, rgba: &mut [u8; 4]) {
    rgba[0] = yuv_to_r(y, v);
    rgba[1] = yuv_to_g(y, u, v);
    rgba[2] = yuv_to_b(y, u);
    rgba[3] = 0xff;
}

/// Writes `B, G, R, 0xff`.
pub fn yuv_to_bgra(y: u8, u: u8, v: u8, bgra: &mut [u8; 4]) {
    bgra[0] = yuv_to_b(y, u);
    bgra[1] = yuv_to_g(y, u, v);
    bgra[2] = yuv_to_r(y, v);
    bgra[3] = 0xff;
}

/// Writes `0xff, R, G, B`.
pub fn yuv_to_argb(y: u8, u: u8, v: u8, argb: &mut [u8; 4]) {
    argb[0] = 0xff;
    argb[1] = yuv_to_r(y, v);
    argb[2] = yuv_to_g(y, u, v);
    argb[3] = yuv_to_b(y, u);
}

/// Packs to 5-6-5 bits: `RRRRRGGG GGGBBBBB`.
pub fn yuv_to_rgb565(y: u8, u: u8, v: u8, out: &mut [u8; 2]) {
    let r = yuv_to_r(y, v);
    let g = yuv_to_g(y, u, v);
    let b = yuv_to_b(y, u);
    out[0] = (r & 0xf8) | (g >> 5);
    out[1] = ((g << 3) & 0xe0) | (b >> 3);
}

/// Packs to 4-4-4-4 bits with an opaque alpha nibble: `RRRRGGGG BBBB1111`.
pub fn yuv_to_rgba4444(y: u8, u: u8, v: u8, out: &mut [u8; 2]) {
    let r = yuv_to_r(y, v);
    let g = yuv_to_g(y, u, v);
    let b = yuv_to_b(y, u);
    out[0] = (r & 0xf0) | (g >> 4);
    out[1] = (b & 0xf0) | 0x0f;
}

/// Output pixel layouts of the colorspace converter.
///
/// VP8 output is opaque, so each premultiplied layout produces the same bytes
/// as its straight-alpha counterpart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// 3 bytes: R, G, B.
    Rgb,
    /// 3 bytes: B, G, R.
    Bgr,
    /// 4 bytes: R, G, B, A.
    Rgba,
    /// 4 bytes: B, G, R, A.
    Bgra,
    /// 4 bytes: A, R, G, B.
    Argb,
    /// 2 bytes: 4 bits per channel, alpha in the low nibble of the second byte.
    Rgba4444,
    /// 2 bytes: 5 bits red, 6 bits green, 5 bits blue.
    Rgb565,
    /// [`PixelLayout::Rgba`] with premultiplied alpha.
    RgbaPremultiplied,
    /// [`PixelLayout::Bgra`] with premultiplied alpha.
    BgraPremultiplied,
    /// [`PixelLayout::Argb`] with premultiplied alpha.
    ArgbPremultiplied,
    /// [`PixelLayout::Rgba4444`] with premultiplied alpha.
    Rgba4444Premultiplied,
}

impl PixelLayout {
    /// Every layout, straight-alpha ones first.
    pub const ALL: [PixelLayout; 11] = [
        PixelLayout::Rgb,
        PixelLayout::Bgr,
        PixelLayout::Rgba,
        PixelLayout::Bgra,
        PixelLayout::Argb,
        PixelLayout::Rgba4444,
        PixelLayout::Rgb565,
        PixelLayout::RgbaPremultiplied,
        PixelLayout::BgraPremultiplied,
        PixelLayout::ArgbPremultiplied,
        PixelLayout::Rgba4444Premultiplied,
    ];

    /// The straight-alpha layout with the same byte order.
    pub const fn straight(self) -> Self {
        match self {
            PixelLayout::RgbaPremultiplied => PixelLayout::Rgba,
            PixelLayout::BgraPremultiplied => PixelLayout::Bgra,
            PixelLayout::ArgbPremultiplied => PixelLayout::Argb,
            PixelLayout::Rgba4444Premultiplied => PixelLayout::Rgba4444,
            other => other,
        }
    }

    /// Whether alpha is stored premultiplied.
    pub const fn is_premultiplied(self) -> bool {
        matches!(
            self,
            PixelLayout::RgbaPremultiplied
                | PixelLayout::BgraPremultiplied
                | PixelLayout::ArgbPremultiplied
                | PixelLayout::Rgba4444Premultiplied
        )
    }

    /// Number of bytes one pixel occupies.
    pub const fn bytes_per_pixel(self) -> usize {
        match self.straight() {
            PixelLayout::Rgb | PixelLayout::Bgr => 3,
            PixelLayout::Rgba4444 | PixelLayout::Rgb565 => 2,
            _ => 4,
        }
    }

    /// Whether the layout carries an alpha channel (always opaque here).
    pub const fn has_alpha(self) -> bool {
        !matches!(self, PixelLayout::Rgb | PixelLayout::Bgr | PixelLayout::Rgb565)
    }
}

/// Compile-time pixel layout, used to monomorphize the line converters.
pub trait PixelFormat {
    /// Bytes per pixel.
    const BPP: usize;
    /// The matching runtime layout.
    const LAYOUT: PixelLayout;
    /// Converts one pixel into `out[..Self::BPP]`.
    fn write(y: u8, u: u8, v: u8, out: &mut [u8]);
}

macro_rules! pixel_format {
    ($(#[$doc:meta])* $name:ident, $bpp:literal, $func:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl PixelFormat for $name {
            const BPP: usize = $bpp;
            const LAYOUT: PixelLayout = PixelLayout::$name;

            #[inline(always)]
            fn write(y: u8, u: u8, v: u8, out: &mut [u8]) {
                let out: &mut [u8; $bpp] = (&mut out[..$bpp]).try_into().unwrap();
                $func(y, u, v, out);
            }
        }
    };
}

/// Marker types for [`PixelFormat`], one per straight-alpha [`PixelLayout`].
pub mod formats {
    use super::*;

    pixel_format!(
        /// R, G, B.
        Rgb, 3, yuv_to_rgb
    );
    pixel_format!(
        /// B, G, R.
        Bgr, 3, yuv_to_bgr
    );
    pixel_format!(
        /// R, G, B, A.
        Rgba, 4, yuv_to_rgba
    );
    pixel_format!(
        /// B, G, R, A.
        Bgra, 4, yuv_to_bgra
    );
    pixel_format!(
        /// A, R, G, B.
        Argb, 4, yuv_to_argb
    );
    pixel_format!(
        /// Packed 4-4-4-4.
        Rgba4444, 2, yuv_to_rgba4444
    );
    pixel_format!(
        /// Packed 5-6-5.
        Rgb565, 2, yuv_to_rgb565
    );
}

// values come from libwebp
// Y = 0.2568 * R + 0.5041 * G + 0.0979 * B + 16
// U = -0.1482 * R - 0.2910 * G + 0.4392 * B + 128
// V = 0.4392 * R - 0.3678 * G - 0.0714 * B + 128

// this is converted to 16 bit fixed point by multiplying by 2^16
// and shifting back

/// Luma of one pixel. `rounding` is normally [`YUV_HALF`].
pub fn rgb_to_y(r: u8, g: u8, b: u8, rounding: i32) -> u8 {
    let luma = 16839 * i32::from(r) + 33059 * i32::from(g) + 6420 * i32::from(b);
    ((luma + rounding + (16 << YUV_FIX)) >> YUV_FIX) as u8
}

fn clip_uv(uv: i32, rounding: i32) -> u8 {
    let uv = (uv + rounding + (128 << (YUV_FIX + 2))) >> (YUV_FIX + 2);
    uv.clamp(0, 255) as u8
}

/// Cb of a 2x2 quad. `r`, `g` and `b` are the sums over the four pixels;
/// `rounding` is normally `YUV_HALF << 2`.
pub fn rgb_to_u(r: i32, g: i32, b: i32, rounding: i32) -> u8 {
    clip_uv(-9719 * r - 19081 * g + 28800 * b, rounding)
}

/// Cr of a 2x2 quad, see [`rgb_to_u`].
pub fn rgb_to_v(r: i32, g: i32, b: i32, rounding: i32) -> u8 {
    clip_uv(28800 * r - 24116 * g - 4684 * b, rounding)
}
