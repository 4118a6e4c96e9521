//! Edge-level loop filters and the per-macroblock edge sequencing.
//!
//! The `v_*` functions filter a horizontal edge (taps run vertically) and the
//! `h_*` functions a vertical edge. `point` is the offset of the first pixel
//! past the edge: the top-left pixel of the macroblock for the outer edges,
//! which is also the origin the inner (`*i`) variants step from.

use super::loop_filter::{filter_loop24, filter_loop26, simple_filter_loop};
use crate::common::types::{FilterParams, FilterType};

/// Simple filter over one luma edge: `(buf, point, stride, edge_limit)`.
pub type SimpleFilterFn = fn(&mut [u8], usize, usize, u8);
/// Normal filter over one luma edge: `(buf, point, stride, params)`.
pub type LumaFilterFn = fn(&mut [u8], usize, usize, FilterParams);
/// Normal filter over the same edge of both chroma planes: `(u, v, point, stride, params)`.
pub type ChromaFilterFn = fn(&mut [u8], &mut [u8], usize, usize, FilterParams);

/// Simple filter across the horizontal edge above `point`, 16 columns.
pub fn simple_v_filter16(buf: &mut [u8], point: usize, stride: usize, edge_limit: u8) {
    simple_filter_loop(buf, point, stride, 1, 16, edge_limit);
}

/// Simple filter across the vertical edge left of `point`, 16 rows.
pub fn simple_h_filter16(buf: &mut [u8], point: usize, stride: usize, edge_limit: u8) {
    simple_filter_loop(buf, point, 1, stride, 16, edge_limit);
}

/// Simple filter across the three inner horizontal edges (rows 4, 8, 12).
pub fn simple_v_filter16i(buf: &mut [u8], point: usize, stride: usize, edge_limit: u8) {
    for k in 1usize..4 {
        simple_v_filter16(buf, point + 4 * k * stride, stride, edge_limit);
    }
}

/// Simple filter across the three inner vertical edges (columns 4, 8, 12).
pub fn simple_h_filter16i(buf: &mut [u8], point: usize, stride: usize, edge_limit: u8) {
    for k in 1usize..4 {
        simple_h_filter16(buf, point + 4 * k, stride, edge_limit);
    }
}

/// Macroblock filter across the top luma edge.
pub fn v_filter16(buf: &mut [u8], point: usize, stride: usize, params: FilterParams) {
    filter_loop26(buf, point, stride, 1, 16, params);
}

/// Macroblock filter across the left luma edge.
pub fn h_filter16(buf: &mut [u8], point: usize, stride: usize, params: FilterParams) {
    filter_loop26(buf, point, 1, stride, 16, params);
}

/// Sub-block filter across the inner horizontal luma edges.
pub fn v_filter16i(buf: &mut [u8], point: usize, stride: usize, params: FilterParams) {
    for k in 1usize..4 {
        filter_loop24(buf, point + 4 * k * stride, stride, 1, 16, params);
    }
}

/// Sub-block filter across the inner vertical luma edges.
pub fn h_filter16i(buf: &mut [u8], point: usize, stride: usize, params: FilterParams) {
    for k in 1usize..4 {
        filter_loop24(buf, point + 4 * k, 1, stride, 16, params);
    }
}

/// Macroblock filter across the top chroma edge of both planes.
pub fn v_filter8(u: &mut [u8], v: &mut [u8], point: usize, stride: usize, params: FilterParams) {
    filter_loop26(u, point, stride, 1, 8, params);
    filter_loop26(v, point, stride, 1, 8, params);
}

/// Macroblock filter across the left chroma edge of both planes.
pub fn h_filter8(u: &mut [u8], v: &mut [u8], point: usize, stride: usize, params: FilterParams) {
    filter_loop26(u, point, 1, stride, 8, params);
    filter_loop26(v, point, 1, stride, 8, params);
}

/// Sub-block filter across the inner horizontal chroma edge (row 4).
pub fn v_filter8i(u: &mut [u8], v: &mut [u8], point: usize, stride: usize, params: FilterParams) {
    filter_loop24(u, point + 4 * stride, stride, 1, 8, params);
    filter_loop24(v, point + 4 * stride, stride, 1, 8, params);
}

/// Sub-block filter across the inner vertical chroma edge (column 4).
pub fn h_filter8i(u: &mut [u8], v: &mut [u8], point: usize, stride: usize, params: FilterParams) {
    filter_loop24(u, point + 4, 1, stride, 8, params);
    filter_loop24(v, point + 4, 1, stride, 8, params);
}

/// Reconstructed planes of a frame, as seen by the loop filter.
pub struct FilterPlanes<'a> {
    /// Luma plane.
    pub y: &'a mut [u8],
    /// Cb plane.
    pub u: &'a mut [u8],
    /// Cr plane.
    pub v: &'a mut [u8],
    /// Luma bytes per row.
    pub y_stride: usize,
    /// Chroma bytes per row (shared by both planes).
    pub uv_stride: usize,
}

/// Filters every edge owned by macroblock `(mbx, mby)`.
///
/// `params` carries the macroblock's filter level in `edge_limit` (see
/// [`FilterParams::from_level`]); the macroblock and sub-block edge limits are
/// derived from it. A level of 0 disables filtering. Edges are processed left
/// edge, inner vertical edges, top edge, inner horizontal edges; the left and
/// top edges are skipped on the frame boundary. Inner edges are only filtered
/// when `inner` is set. The simple filter touches luma only.
pub fn filter_macroblock(
    planes: &mut FilterPlanes<'_>,
    mbx: usize,
    mby: usize,
    filter: FilterType,
    params: FilterParams,
    inner: bool,
) {
    if params.edge_limit == 0 {
        return;
    }

    let dsp = crate::dsp::get();
    let mb_edge = params.macroblock_edge();
    let sub_edge = params.subblock_edge();
    let y_point = mby * 16 * planes.y_stride + mbx * 16;
    let uv_point = mby * 8 * planes.uv_stride + mbx * 8;

    log::trace!(
        "loop filter mb ({}, {}): {:?}, mb edge {:?}, sub edge {:?}, inner {}",
        mbx,
        mby,
        filter,
        mb_edge,
        sub_edge,
        inner
    );

    let (y_stride, uv_stride) = (planes.y_stride, planes.uv_stride);
    match filter {
        FilterType::Simple => {
            if mbx > 0 {
                (dsp.simple_h_filter16)(planes.y, y_point, y_stride, mb_edge.edge_limit);
            }
            if inner {
                (dsp.simple_h_filter16i)(planes.y, y_point, y_stride, sub_edge.edge_limit);
            }
            if mby > 0 {
                (dsp.simple_v_filter16)(planes.y, y_point, y_stride, mb_edge.edge_limit);
            }
            if inner {
                (dsp.simple_v_filter16i)(planes.y, y_point, y_stride, sub_edge.edge_limit);
            }
        }
        FilterType::Normal => {
            if mbx > 0 {
                (dsp.h_filter16)(planes.y, y_point, y_stride, mb_edge);
                (dsp.h_filter8)(planes.u, planes.v, uv_point, uv_stride, mb_edge);
            }
            if inner {
                (dsp.h_filter16i)(planes.y, y_point, y_stride, sub_edge);
                (dsp.h_filter8i)(planes.u, planes.v, uv_point, uv_stride, sub_edge);
            }
            if mby > 0 {
                (dsp.v_filter16)(planes.y, y_point, y_stride, mb_edge);
                (dsp.v_filter8)(planes.u, planes.v, uv_point, uv_stride, mb_edge);
            }
            if inner {
                (dsp.v_filter16i)(planes.y, y_point, y_stride, sub_edge);
                (dsp.v_filter8i)(planes.u, planes.v, uv_point, uv_stride, sub_edge);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Y_STRIDE: usize = 32;
    const UV_STRIDE: usize = 16;

    struct Frame {
        y: Vec<u8>,
        u: Vec<u8>,
        v: Vec<u8>,
    }

    impl Frame {
        /// 2x2 macroblocks; each macroblock is a flat value so every
        /// macroblock edge is a step.
        fn blocky() -> Self {
            let y = (0..Y_STRIDE * 32)
                .map(|i| {
                    let (x, y) = (i % Y_STRIDE, i / Y_STRIDE);
                    100 + 8 * (x / 16) as u8 + 4 * (y / 16) as u8
                })
                .collect();
            let uv = |base: u8| {
                (0..UV_STRIDE * 16)
                    .map(|i| {
                        let (x, y) = (i % UV_STRIDE, i / UV_STRIDE);
                        base + 6 * (x / 8) as u8 + 3 * (y / 8) as u8
                    })
                    .collect::<Vec<u8>>()
            };
            Self {
                y,
                u: uv(90),
                v: uv(150),
            }
        }

        fn planes(&mut self) -> FilterPlanes<'_> {
            FilterPlanes {
                y: &mut self.y,
                u: &mut self.u,
                v: &mut self.v,
                y_stride: Y_STRIDE,
                uv_stride: UV_STRIDE,
            }
        }
    }

    #[test]
    fn test_edge_filters_leave_flat_gray_unchanged() {
        let params = FilterParams::new(100, 63, 2);
        let mut y = vec![128u8; Y_STRIDE * 24];
        let mut u = vec![128u8; UV_STRIDE * 16];
        let mut v = vec![128u8; UV_STRIDE * 16];
        let point = 4 * Y_STRIDE + 4;
        let uv_point = 4 * UV_STRIDE + 4;

        simple_v_filter16(&mut y, point, Y_STRIDE, 127);
        simple_h_filter16(&mut y, point, Y_STRIDE, 127);
        simple_v_filter16i(&mut y, point, Y_STRIDE, 127);
        simple_h_filter16i(&mut y, point, Y_STRIDE, 127);
        v_filter16(&mut y, point, Y_STRIDE, params);
        h_filter16(&mut y, point, Y_STRIDE, params);
        v_filter16i(&mut y, point, Y_STRIDE, params);
        h_filter16i(&mut y, point, Y_STRIDE, params);
        v_filter8(&mut u, &mut v, uv_point, UV_STRIDE, params);
        h_filter8(&mut u, &mut v, uv_point, UV_STRIDE, params);
        v_filter8i(&mut u, &mut v, uv_point, UV_STRIDE, params);
        h_filter8i(&mut u, &mut v, uv_point, UV_STRIDE, params);

        assert!(y.iter().chain(&u).chain(&v).all(|&p| p == 128));
    }

    #[test]
    fn test_top_left_macroblock_without_inner_is_untouched() {
        let mut frame = Frame::blocky();
        let before = (frame.y.clone(), frame.u.clone(), frame.v.clone());
        let params = FilterParams::from_level(30, 0);
        filter_macroblock(&mut frame.planes(), 0, 0, FilterType::Normal, params, false);
        assert_eq!((frame.y, frame.u, frame.v), before);
    }

    #[test]
    fn test_level_zero_disables_filtering() {
        let mut frame = Frame::blocky();
        let before = frame.y.clone();
        let params = FilterParams::from_level(0, 0);
        filter_macroblock(&mut frame.planes(), 1, 1, FilterType::Normal, params, true);
        assert_eq!(frame.y, before);
    }

    #[test]
    fn test_normal_filter_smooths_left_and_top_edges() {
        let mut frame = Frame::blocky();
        let params = FilterParams::from_level(30, 0);
        filter_macroblock(&mut frame.planes(), 1, 1, FilterType::Normal, params, false);

        // left edge of mb (1, 1) sits between columns 15 and 16, rows 16..32
        let row = 20 * Y_STRIDE;
        assert!(frame.y[row + 15] > 104, "p0 should move up, got {}", frame.y[row + 15]);
        assert!(frame.y[row + 16] < 112, "q0 should move down, got {}", frame.y[row + 16]);

        // chroma left edge between columns 7 and 8, below the reach of the top edge
        let uv_row = 12 * UV_STRIDE;
        assert!(frame.u[uv_row + 7] > 93);
        assert!(frame.v[uv_row + 8] < 159);
    }

    #[test]
    fn test_simple_filter_is_luma_only() {
        let mut frame = Frame::blocky();
        let before_u = frame.u.clone();
        let before_v = frame.v.clone();
        let before_y = frame.y.clone();
        let params = FilterParams::from_level(30, 0);
        filter_macroblock(&mut frame.planes(), 1, 1, FilterType::Simple, params, true);
        assert_eq!(frame.u, before_u);
        assert_eq!(frame.v, before_v);
        assert_ne!(frame.y, before_y);
    }

    #[test]
    fn test_filter_macroblock_edge_order() {
        let params = FilterParams::from_level(40, 3);
        let mut frame = Frame::blocky();
        filter_macroblock(&mut frame.planes(), 1, 1, FilterType::Normal, params, true);

        let mut expected = Frame::blocky();
        let y_point = 16 * Y_STRIDE + 16;
        let uv_point = 8 * UV_STRIDE + 8;
        let (mb, sub) = (params.macroblock_edge(), params.subblock_edge());
        h_filter16(&mut expected.y, y_point, Y_STRIDE, mb);
        h_filter8(&mut expected.u, &mut expected.v, uv_point, UV_STRIDE, mb);
        h_filter16i(&mut expected.y, y_point, Y_STRIDE, sub);
        h_filter8i(&mut expected.u, &mut expected.v, uv_point, UV_STRIDE, sub);
        v_filter16(&mut expected.y, y_point, Y_STRIDE, mb);
        v_filter8(&mut expected.u, &mut expected.v, uv_point, UV_STRIDE, mb);
        v_filter16i(&mut expected.y, y_point, Y_STRIDE, sub);
        v_filter8i(&mut expected.u, &mut expected.v, uv_point, UV_STRIDE, sub);

        assert_eq!(frame.y, expected.y);
        assert_eq!(frame.u, expected.u);
        assert_eq!(frame.v, expected.v);
    }
}
