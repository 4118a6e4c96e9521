//! Intra prediction (RFC 6386 section 12).
//!
//! Every predictor has the same shape, `fn(buf, x0, y0, stride)`: it fills the
//! block whose top-left pixel is at `(x0, y0)` from the row above it and the
//! column to its left. Both must exist, so `x0` and `y0` are at least 1.
//! Nothing below or to the right of the block is read, apart from the four
//! top-right pixels used by the 4x4 VE, LD and VL modes.

use byteorder_lite::{ByteOrder, LittleEndian};

use crate::common::transform::clip_8b;

/// Stride of the reconstruction work buffer (matches libwebp `BPS`).
/// Layout: 1 border pixel + 16 luma pixels + 4 top-right + padding to 32.
pub const BPS: usize = 32;

/// Signature shared by every intra predictor: `(buf, x0, y0, stride)`.
pub type PredFn = fn(&mut [u8], usize, usize, usize);

fn avg3(left: u8, this: u8, right: u8) -> u8 {
    let avg = (u16::from(left) + 2 * u16::from(this) + u16::from(right) + 2) >> 2;
    avg as u8
}

fn avg2(this: u8, right: u8) -> u8 {
    let avg = (u16::from(this) + u16::from(right) + 1) >> 1;
    avg as u8
}

fn fill_block(a: &mut [u8], size: usize, x0: usize, y0: usize, stride: usize, v: u8) {
    for chunk in a.chunks_mut(stride).skip(y0).take(size) {
        chunk[x0..][..size].fill(v);
    }
}

fn predict_vpred(a: &mut [u8], size: usize, x0: usize, y0: usize, stride: usize) {
    // This pass copies the top row to the rows below it.
    let (above, curr) = a.split_at_mut(stride * y0);
    let above_slice = &above[(y0 - 1) * stride + x0..][..size];

    for curr_chunk in curr.chunks_mut(stride).take(size) {
        curr_chunk[x0..][..size].copy_from_slice(above_slice);
    }
}

fn predict_hpred(a: &mut [u8], size: usize, x0: usize, y0: usize, stride: usize) {
    // This pass copies the first value of a row to the values right of it.
    for chunk in a.chunks_mut(stride).skip(y0).take(size) {
        let left = chunk[x0 - 1];
        chunk[x0..][..size].fill(left);
    }
}

/// DC prediction over `size` top and/or left neighbours. With neither edge
/// the block is filled with 128.
fn predict_dcpred(
    a: &mut [u8],
    size: usize,
    x0: usize,
    y0: usize,
    stride: usize,
    above: bool,
    left: bool,
) {
    let mut sum = 0u32;
    // log2(size) - 1, one more per edge used
    let mut shf = size.trailing_zeros() - 1;

    if left {
        for y in 0usize..size {
            sum += u32::from(a[(y0 + y) * stride + x0 - 1]);
        }
        shf += 1;
    }

    if above {
        for &p in &a[(y0 - 1) * stride + x0..][..size] {
            sum += u32::from(p);
        }
        shf += 1;
    }

    let dcval = if !left && !above {
        128u8
    } else {
        ((sum + (1 << (shf - 1))) >> shf) as u8
    };

    fill_block(a, size, x0, y0, stride, dcval);
}

fn predict_tmpred(a: &mut [u8], size: usize, x0: usize, y0: usize, stride: usize) {
    // The formula for tmpred is:
    // X_ij = L_i + A_j - P (i, j=0, 1, 2, 3)
    //
    // |-----|-----|-----|-----|-----|
    // | P   | A0  | A1  | A2  | A3  |
    // |-----|-----|-----|-----|-----|
    // | L0  | X00 | X01 | X02 | X03 |
    // |-----|-----|-----|-----|-----|
    // | L1  | X10 | X11 | X12 | X13 |
    // |-----|-----|-----|-----|-----|
    // | L2  | X20 | X21 | X22 | X23 |
    // |-----|-----|-----|-----|-----|
    // | L3  | X30 | X31 | X32 | X33 |
    // |-----|-----|-----|-----|-----|
    // Diagram from p. 52 of RFC 6386

    // Split at L0
    let (above, x_block) = a.split_at_mut(y0 * stride + (x0 - 1));
    let p = i32::from(above[(y0 - 1) * stride + x0 - 1]);
    let above_slice = &above[(y0 - 1) * stride + x0..][..size];

    for y in 0usize..size {
        let left_minus_p = i32::from(x_block[y * stride]) - p;

        // Add 1 to skip over L0 byte
        x_block[y * stride + 1..][..size]
            .iter_mut()
            .zip(above_slice)
            .for_each(|(cur, &abv)| *cur = clip_8b(left_minus_p + i32::from(abv)));
    }
}

// 16x16 luma

/// 16x16 DC prediction from the 16 top and 16 left neighbours.
pub fn predict_dc16(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_dcpred(a, 16, x0, y0, stride, true, true);
}

/// 16x16 DC prediction from the left column only.
pub fn predict_dc16_no_top(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_dcpred(a, 16, x0, y0, stride, false, true);
}

/// 16x16 DC prediction from the top row only.
pub fn predict_dc16_no_left(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_dcpred(a, 16, x0, y0, stride, true, false);
}

/// 16x16 block filled with 128.
pub fn predict_dc16_no_top_left(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_dcpred(a, 16, x0, y0, stride, false, false);
}

/// 16x16 true motion prediction.
pub fn predict_tm16(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_tmpred(a, 16, x0, y0, stride);
}

/// 16x16 vertical prediction.
pub fn predict_ve16(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_vpred(a, 16, x0, y0, stride);
}

/// 16x16 horizontal prediction.
pub fn predict_he16(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_hpred(a, 16, x0, y0, stride);
}

// 8x8 chroma

/// 8x8 DC prediction from the 8 top and 8 left neighbours.
pub fn predict_dc8(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_dcpred(a, 8, x0, y0, stride, true, true);
}

/// 8x8 DC prediction from the left column only.
pub fn predict_dc8_no_top(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_dcpred(a, 8, x0, y0, stride, false, true);
}

/// 8x8 DC prediction from the top row only.
pub fn predict_dc8_no_left(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_dcpred(a, 8, x0, y0, stride, true, false);
}

/// 8x8 block filled with 128.
pub fn predict_dc8_no_top_left(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_dcpred(a, 8, x0, y0, stride, false, false);
}

/// 8x8 true motion prediction.
pub fn predict_tm8(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_tmpred(a, 8, x0, y0, stride);
}

/// 8x8 vertical prediction.
pub fn predict_ve8(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_vpred(a, 8, x0, y0, stride);
}

/// 8x8 horizontal prediction.
pub fn predict_he8(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_hpred(a, 8, x0, y0, stride);
}

// 4x4 luma

fn topleft_pixel(a: &[u8], x0: usize, y0: usize, stride: usize) -> u8 {
    a[(y0 - 1) * stride + x0 - 1]
}

fn top_pixels(a: &[u8], x0: usize, y0: usize, stride: usize) -> [u8; 8] {
    let pos = (y0 - 1) * stride + x0;
    let mut top = [0u8; 8];
    top.copy_from_slice(&a[pos..pos + 8]);
    top
}

fn left_pixels(a: &[u8], x0: usize, y0: usize, stride: usize) -> [u8; 4] {
    core::array::from_fn(|i| a[(y0 + i) * stride + x0 - 1])
}

/// The 9 pixels bordering the block, from bottom-left `L3` up through the
/// corner `P` and along the top to `A3`: `[L3, L2, L1, L0, P, A0, A1, A2, A3]`.
fn edge_pixels(a: &[u8], x0: usize, y0: usize, stride: usize) -> [u8; 9] {
    let pos = (y0 - 1) * stride + x0 - 1;
    let top = &a[pos..=pos + 4];
    [
        a[pos + 4 * stride],
        a[pos + 3 * stride],
        a[pos + 2 * stride],
        a[pos + stride],
        top[0],
        top[1],
        top[2],
        top[3],
        top[4],
    ]
}

/// 4x4 DC prediction: `(sum(top) + sum(left) + 4) >> 3`.
pub fn predict_dc4(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let mut v = 4;

    a[(y0 - 1) * stride + x0..][..4]
        .iter()
        .for_each(|&a| v += u32::from(a));

    for i in 0usize..4 {
        v += u32::from(a[(y0 + i) * stride + x0 - 1]);
    }

    fill_block(a, 4, x0, y0, stride, (v >> 3) as u8);
}

/// 4x4 true motion prediction.
pub fn predict_tm4(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    predict_tmpred(a, 4, x0, y0, stride);
}

/// 4x4 vertical prediction, smoothed along the top row (reads `A4`).
pub fn predict_ve4(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let p = topleft_pixel(a, x0, y0, stride);
    let [a0, a1, a2, a3, a4, ..] = top_pixels(a, x0, y0, stride);
    let avg = [
        avg3(p, a0, a1),
        avg3(a0, a1, a2),
        avg3(a1, a2, a3),
        avg3(a2, a3, a4),
    ];

    for chunk in a.chunks_mut(stride).skip(y0).take(4) {
        chunk[x0..][..4].copy_from_slice(&avg);
    }
}

/// 4x4 horizontal prediction, smoothed down the left column.
pub fn predict_he4(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let p = topleft_pixel(a, x0, y0, stride);
    let [l0, l1, l2, l3] = left_pixels(a, x0, y0, stride);

    let avgs = [
        avg3(p, l0, l1),
        avg3(l0, l1, l2),
        avg3(l1, l2, l3),
        avg3(l2, l3, l3),
    ];

    for (chunk, avg) in a.chunks_mut(stride).skip(y0).zip(avgs) {
        LittleEndian::write_u32(&mut chunk[x0..x0 + 4], 0x0101_0101 * u32::from(avg));
    }
}

/// 4x4 diagonal down-right prediction.
pub fn predict_rd4(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let [e0, e1, e2, e3, e4, e5, e6, e7, e8] = edge_pixels(a, x0, y0, stride);

    let avgs = [
        avg3(e0, e1, e2),
        avg3(e1, e2, e3),
        avg3(e2, e3, e4),
        avg3(e3, e4, e5),
        avg3(e4, e5, e6),
        avg3(e5, e6, e7),
        avg3(e6, e7, e8),
    ];

    for (i, chunk) in a.chunks_mut(stride).skip(y0).take(4).enumerate() {
        chunk[x0..][..4].copy_from_slice(&avgs[3 - i..7 - i]);
    }
}

/// 4x4 vertical-right prediction.
pub fn predict_vr4(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let [_, e1, e2, e3, e4, e5, e6, e7, e8] = edge_pixels(a, x0, y0, stride);
    let at = |x: usize, y: usize| (y0 + y) * stride + x0 + x;

    a[at(0, 3)] = avg3(e1, e2, e3);
    a[at(0, 2)] = avg3(e2, e3, e4);
    a[at(1, 3)] = avg3(e3, e4, e5);
    a[at(0, 1)] = avg3(e3, e4, e5);
    a[at(1, 2)] = avg2(e4, e5);
    a[at(0, 0)] = avg2(e4, e5);
    a[at(2, 3)] = avg3(e4, e5, e6);
    a[at(1, 1)] = avg3(e4, e5, e6);
    a[at(2, 2)] = avg2(e5, e6);
    a[at(1, 0)] = avg2(e5, e6);
    a[at(3, 3)] = avg3(e5, e6, e7);
    a[at(2, 1)] = avg3(e5, e6, e7);
    a[at(3, 2)] = avg2(e6, e7);
    a[at(2, 0)] = avg2(e6, e7);
    a[at(3, 1)] = avg3(e6, e7, e8);
    a[at(3, 0)] = avg2(e7, e8);
}

/// 4x4 diagonal down-left prediction (reads the top-right pixels).
pub fn predict_ld4(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let [a0, a1, a2, a3, a4, a5, a6, a7] = top_pixels(a, x0, y0, stride);

    let avgs = [
        avg3(a0, a1, a2),
        avg3(a1, a2, a3),
        avg3(a2, a3, a4),
        avg3(a3, a4, a5),
        avg3(a4, a5, a6),
        avg3(a5, a6, a7),
        avg3(a6, a7, a7),
    ];

    for (i, chunk) in a.chunks_mut(stride).skip(y0).take(4).enumerate() {
        chunk[x0..][..4].copy_from_slice(&avgs[i..i + 4]);
    }
}

/// 4x4 vertical-left prediction (reads the top-right pixels).
pub fn predict_vl4(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let [a0, a1, a2, a3, a4, a5, a6, a7] = top_pixels(a, x0, y0, stride);
    let at = |x: usize, y: usize| (y0 + y) * stride + x0 + x;

    a[at(0, 0)] = avg2(a0, a1);
    a[at(0, 1)] = avg3(a0, a1, a2);
    a[at(0, 2)] = avg2(a1, a2);
    a[at(1, 0)] = avg2(a1, a2);
    a[at(1, 1)] = avg3(a1, a2, a3);
    a[at(0, 3)] = avg3(a1, a2, a3);
    a[at(1, 2)] = avg2(a2, a3);
    a[at(2, 0)] = avg2(a2, a3);
    a[at(1, 3)] = avg3(a2, a3, a4);
    a[at(2, 1)] = avg3(a2, a3, a4);
    a[at(2, 2)] = avg2(a3, a4);
    a[at(3, 0)] = avg2(a3, a4);
    a[at(2, 3)] = avg3(a3, a4, a5);
    a[at(3, 1)] = avg3(a3, a4, a5);
    // last two do not follow the avg2/avg3 alternation (RFC 6386 12.3)
    a[at(3, 2)] = avg3(a4, a5, a6);
    a[at(3, 3)] = avg3(a5, a6, a7);
}

/// 4x4 horizontal-down prediction.
pub fn predict_hd4(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let [e0, e1, e2, e3, e4, e5, e6, e7, _] = edge_pixels(a, x0, y0, stride);
    let at = |x: usize, y: usize| (y0 + y) * stride + x0 + x;

    a[at(0, 3)] = avg2(e0, e1);
    a[at(1, 3)] = avg3(e0, e1, e2);
    a[at(0, 2)] = avg2(e1, e2);
    a[at(2, 3)] = avg2(e1, e2);
    a[at(1, 2)] = avg3(e1, e2, e3);
    a[at(3, 3)] = avg3(e1, e2, e3);
    a[at(2, 2)] = avg2(e2, e3);
    a[at(0, 1)] = avg2(e2, e3);
    a[at(3, 2)] = avg3(e2, e3, e4);
    a[at(1, 1)] = avg3(e2, e3, e4);
    a[at(2, 1)] = avg2(e3, e4);
    a[at(0, 0)] = avg2(e3, e4);
    a[at(3, 1)] = avg3(e3, e4, e5);
    a[at(1, 0)] = avg3(e3, e4, e5);
    a[at(2, 0)] = avg3(e4, e5, e6);
    a[at(3, 0)] = avg3(e5, e6, e7);
}

/// 4x4 horizontal-up prediction (left column only).
pub fn predict_hu4(a: &mut [u8], x0: usize, y0: usize, stride: usize) {
    let [l0, l1, l2, l3] = left_pixels(a, x0, y0, stride);
    let at = |x: usize, y: usize| (y0 + y) * stride + x0 + x;

    a[at(0, 0)] = avg2(l0, l1);
    a[at(1, 0)] = avg3(l0, l1, l2);
    a[at(2, 0)] = avg2(l1, l2);
    a[at(0, 1)] = avg2(l1, l2);
    a[at(3, 0)] = avg3(l1, l2, l3);
    a[at(1, 1)] = avg3(l1, l2, l3);
    a[at(2, 1)] = avg2(l2, l3);
    a[at(0, 2)] = avg2(l2, l3);
    a[at(3, 1)] = avg3(l2, l3, l3);
    a[at(1, 2)] = avg3(l2, l3, l3);
    a[at(2, 2)] = l3;
    a[at(3, 2)] = l3;
    a[at(0, 3)] = l3;
    a[at(1, 3)] = l3;
    a[at(2, 3)] = l3;
    a[at(3, 3)] = l3;
}

/// 4x4 predictors in [`IntraMode`](crate::common::types::IntraMode) order.
pub const LUMA4_PREDICTORS: [PredFn; 10] = [
    predict_dc4,
    predict_tm4,
    predict_ve4,
    predict_he4,
    predict_rd4,
    predict_vr4,
    predict_ld4,
    predict_vl4,
    predict_hd4,
    predict_hu4,
];

/// 16x16 predictors in [`PredictionMode`](crate::common::types::PredictionMode) order.
pub const LUMA16_PREDICTORS: [PredFn; 7] = [
    predict_dc16,
    predict_tm16,
    predict_ve16,
    predict_he16,
    predict_dc16_no_top,
    predict_dc16_no_left,
    predict_dc16_no_top_left,
];

/// 8x8 predictors in [`PredictionMode`](crate::common::types::PredictionMode) order.
pub const CHROMA8_PREDICTORS: [PredFn; 7] = [
    predict_dc8,
    predict_tm8,
    predict_ve8,
    predict_he8,
    predict_dc8_no_top,
    predict_dc8_no_left,
    predict_dc8_no_top_left,
];
