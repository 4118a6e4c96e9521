//! Inverse transforms (RFC 6386 section 14).
//!
//! Every inverse DCT variant adds its output straight into the prediction
//! block and clips to `[0, 255]`, so reconstruction is `predict` followed by
//! one of these calls.

/// 16 bit fixed point version of cos(PI/8) * sqrt(2) - 1
const CONST1: i64 = 20091;
/// 16 bit fixed point version of sin(PI/8) * sqrt(2)
const CONST2: i64 = 35468;

// The intermediate products may overflow 32 bits for out-of-range input,
// so the multiply is stretched to 64 bits. The result always fits again.
#[inline(always)]
fn mul1(a: i32) -> i32 {
    ((i64::from(a) * CONST1) >> 16) as i32 + a
}

#[inline(always)]
fn mul2(a: i32) -> i32 {
    ((i64::from(a) * CONST2) >> 16) as i32
}

#[inline(always)]
pub(crate) fn clip_8b(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

#[inline(always)]
fn store(dst: &mut [u8], x: usize, y: usize, stride: usize, v: i32) {
    let p = &mut dst[y * stride + x];
    *p = clip_8b(i32::from(*p) + (v >> 3));
}

#[inline(always)]
fn store_row(dst: &mut [u8], y: usize, stride: usize, dc: i32, d: i32, c: i32) {
    store(dst, 0, y, stride, dc + d);
    store(dst, 1, y, stride, dc + c);
    store(dst, 2, y, stride, dc - c);
    store(dst, 3, y, stride, dc - d);
}

/// Full inverse DCT of one 4x4 block, added into `dst`.
fn transform_one(coeffs: &[i16], dst: &mut [u8], stride: usize) {
    assert!(coeffs.len() >= 16);
    assert!(dst.len() > 3 * stride + 3);

    let mut tmp = [0i32; 16];
    // vertical pass, transposed into tmp
    for i in 0usize..4 {
        let in0 = i32::from(coeffs[i]);
        let in4 = i32::from(coeffs[4 + i]);
        let in8 = i32::from(coeffs[8 + i]);
        let in12 = i32::from(coeffs[12 + i]);

        let a = in0 + in8;
        let b = in0 - in8;
        let c = mul2(in4) - mul1(in12);
        let d = mul1(in4) + mul2(in12);

        tmp[4 * i] = a + d;
        tmp[4 * i + 1] = b + c;
        tmp[4 * i + 2] = b - c;
        tmp[4 * i + 3] = a - d;
    }

    // horizontal pass, one output row per iteration
    for y in 0usize..4 {
        let dc = tmp[y] + 4;
        let a = dc + tmp[8 + y];
        let b = dc - tmp[8 + y];
        let c = mul2(tmp[4 + y]) - mul1(tmp[12 + y]);
        let d = mul1(tmp[4 + y]) + mul2(tmp[12 + y]);

        store(dst, 0, y, stride, a + d);
        store(dst, 1, y, stride, b + c);
        store(dst, 2, y, stride, b - c);
        store(dst, 3, y, stride, a - d);
    }
}

/// Inverse DCT of one block (`coeffs[0..16]`), or of two horizontally adjacent
/// blocks when `do_two` is set (`coeffs[16..32]` lands 4 columns to the right).
pub fn transform(coeffs: &[i16], dst: &mut [u8], stride: usize, do_two: bool) {
    transform_one(coeffs, dst, stride);
    if do_two {
        transform_one(&coeffs[16..], &mut dst[4..], stride);
    }
}

/// DC-only inverse DCT: adds `(coeffs[0] + 4) >> 3` to every pixel of the block.
/// AC positions are ignored.
pub fn transform_dc(coeffs: &[i16], dst: &mut [u8], stride: usize) {
    let dc = i32::from(coeffs[0]) + 4;
    for y in 0usize..4 {
        for x in 0usize..4 {
            store(dst, x, y, stride, dc);
        }
    }
}

/// Inverse DCT for blocks where only `coeffs[0]`, `coeffs[1]` and `coeffs[4]`
/// are non-zero. Other positions are ignored.
pub fn transform_ac3(coeffs: &[i16], dst: &mut [u8], stride: usize) {
    let a = i32::from(coeffs[0]) + 4;
    let c4 = mul2(i32::from(coeffs[4]));
    let d4 = mul1(i32::from(coeffs[4]));
    let c1 = mul2(i32::from(coeffs[1]));
    let d1 = mul1(i32::from(coeffs[1]));

    store_row(dst, 0, stride, a + d4, d1, c1);
    store_row(dst, 1, stride, a + c4, d1, c1);
    store_row(dst, 2, stride, a - c4, d1, c1);
    store_row(dst, 3, stride, a - d4, d1, c1);
}

/// Full inverse DCT of the four chroma sub-blocks of an 8x8 block (2x2 layout).
pub fn transform_uv(coeffs: &[i16; 64], dst: &mut [u8], stride: usize) {
    transform(&coeffs[..32], dst, stride, true);
    transform(&coeffs[32..], &mut dst[4 * stride..], stride, true);
}

/// DC-only inverse DCT of the four chroma sub-blocks; sub-blocks with a zero
/// DC are left untouched.
pub fn transform_dc_uv(coeffs: &[i16; 64], dst: &mut [u8], stride: usize) {
    const OFFSETS: [(usize, usize); 4] = [(0, 0), (4, 0), (0, 4), (4, 4)];
    for (n, (x, y)) in OFFSETS.into_iter().enumerate() {
        let block = &coeffs[n * 16..];
        if block[0] != 0 {
            transform_dc(block, &mut dst[y * stride + x..], stride);
        }
    }
}

// 14.3 inverse walsh-hadamard transform, used in decoding
/// Inverse WHT of the second-order luma block. The 16 outputs are the DC
/// coefficients of the 16 luma sub-blocks, written to `out[16 * n]`.
pub fn transform_wht(input: &[i16; 16], out: &mut [i16; 256]) {
    let mut tmp = [0i32; 16];

    for i in 0usize..4 {
        let a1 = i32::from(input[i]) + i32::from(input[12 + i]);
        let b1 = i32::from(input[4 + i]) + i32::from(input[8 + i]);
        let c1 = i32::from(input[4 + i]) - i32::from(input[8 + i]);
        let d1 = i32::from(input[i]) - i32::from(input[12 + i]);

        tmp[i] = a1 + b1;
        tmp[4 + i] = c1 + d1;
        tmp[8 + i] = a1 - b1;
        tmp[12 + i] = d1 - c1;
    }

    for (row, (tmp, out)) in tmp.chunks_exact(4).zip(out.chunks_exact_mut(64)).enumerate() {
        debug_assert!(row < 4);
        let dc = tmp[0] + 3;
        let a1 = dc + tmp[3];
        let b1 = tmp[1] + tmp[2];
        let c1 = tmp[1] - tmp[2];
        let d1 = dc - tmp[3];

        out[0] = ((a1 + b1) >> 3) as i16;
        out[16] = ((d1 + c1) >> 3) as i16;
        out[32] = ((a1 - b1) >> 3) as i16;
        out[48] = ((d1 - c1) >> 3) as i16;
    }
}

/// Cheapest exact inverse transform for a 4x4 coefficient block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformKind {
    /// All coefficients are zero; nothing to add.
    None,
    /// Only the DC coefficient is set.
    Dc,
    /// Only coefficients 0, 1 and 4 may be set.
    Ac3,
    /// Anything else.
    Full,
}

impl TransformKind {
    /// Picks the transform for a block by looking at which coefficients are non-zero.
    pub fn classify(coeffs: &[i16; 16]) -> Self {
        let mut mask = 0u16;
        for (i, &c) in coeffs.iter().enumerate() {
            if c != 0 {
                mask |= 1 << i;
            }
        }
        match mask {
            0 => TransformKind::None,
            0b1 => TransformKind::Dc,
            m if m & !0b1_0011 == 0 => TransformKind::Ac3,
            _ => TransformKind::Full,
        }
    }

    /// Runs the selected transform, adding the residual into `dst`.
    pub fn apply(self, coeffs: &[i16; 16], dst: &mut [u8], stride: usize) {
        match self {
            TransformKind::None => {}
            TransformKind::Dc => transform_dc(coeffs, dst, stride),
            TransformKind::Ac3 => transform_ac3(coeffs, dst, stride),
            TransformKind::Full => transform(coeffs, dst, stride, false),
        }
    }
}

/// Classifies and reconstructs one luma sub-block.
pub fn reconstruct_block(coeffs: &[i16; 16], dst: &mut [u8], stride: usize) {
    TransformKind::classify(coeffs).apply(coeffs, dst, stride);
}

/// Reconstructs an 8x8 chroma block from its four sub-blocks.
///
/// The AC3 shortcut is never used for chroma: either every sub-block is DC-only
/// and goes through [`transform_dc_uv`], or all four get the full transform.
pub fn reconstruct_uv(coeffs: &[i16; 64], dst: &mut [u8], stride: usize) {
    let mut any_dc = false;
    let mut any_ac = false;
    for block in coeffs.chunks_exact(16) {
        any_dc |= block[0] != 0;
        any_ac |= block[1..].iter().any(|&c| c != 0);
    }
    if any_ac {
        transform_uv(coeffs, dst, stride);
    } else if any_dc {
        transform_dc_uv(coeffs, dst, stride);
    }
}
