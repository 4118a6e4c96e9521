//! Scalar loop filter primitives (RFC 6386 section 15).
//!
//! Every function works on one filtering position: `point` is the offset of
//! `q0`, the first pixel past the edge, and `step` is the distance between
//! taps across the edge (1 for a vertical edge, the stride for a horizontal
//! one). `p3..p0` lie before `point`, `q0..q3` at and after it.

use crate::common::types::FilterParams;

/// Signed clamp to `[-128, 127]`.
#[inline(always)]
fn sclip1(v: i32) -> i32 {
    v.clamp(-128, 127)
}

/// Signed clamp to `[-16, 15]`.
#[inline(always)]
fn sclip2(v: i32) -> i32 {
    v.clamp(-16, 15)
}

#[inline(always)]
fn clip1(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

#[inline(always)]
fn tap(buf: &[u8], point: usize, step: usize, k: isize) -> i32 {
    let idx = point as isize + k * step as isize;
    i32::from(buf[idx as usize])
}

/// `4 * |p0 - q0| + |p1 - q1| <= t`, where `t` is the doubled edge threshold
/// `2 * edge_limit + 1`.
#[inline]
pub fn needs_filter(buf: &[u8], point: usize, step: usize, t: i32) -> bool {
    let p1 = tap(buf, point, step, -2);
    let p0 = tap(buf, point, step, -1);
    let q0 = tap(buf, point, step, 0);
    let q1 = tap(buf, point, step, 1);
    4 * (p0 - q0).abs() + (p1 - q1).abs() <= t
}

/// [`needs_filter`] plus every interior difference on both sides within `it`.
#[inline]
pub fn needs_filter2(buf: &[u8], point: usize, step: usize, t: i32, it: i32) -> bool {
    let p3 = tap(buf, point, step, -4);
    let p2 = tap(buf, point, step, -3);
    let p1 = tap(buf, point, step, -2);
    let p0 = tap(buf, point, step, -1);
    let q0 = tap(buf, point, step, 0);
    let q1 = tap(buf, point, step, 1);
    let q2 = tap(buf, point, step, 2);
    let q3 = tap(buf, point, step, 3);

    if 4 * (p0 - q0).abs() + (p1 - q1).abs() > t {
        return false;
    }
    (p3 - p2).abs() <= it
        && (p2 - p1).abs() <= it
        && (p1 - p0).abs() <= it
        && (q3 - q2).abs() <= it
        && (q2 - q1).abs() <= it
        && (q1 - q0).abs() <= it
}

/// High edge variance: `|p1 - p0| > thresh || |q1 - q0| > thresh`.
#[inline]
pub fn hev(buf: &[u8], point: usize, step: usize, thresh: i32) -> bool {
    let p1 = tap(buf, point, step, -2);
    let p0 = tap(buf, point, step, -1);
    let q0 = tap(buf, point, step, 0);
    let q1 = tap(buf, point, step, 1);
    (p1 - p0).abs() > thresh || (q1 - q0).abs() > thresh
}

/// Adjusts `p0` and `q0` using the outer `p1 - q1` term.
#[inline]
pub fn do_filter2(buf: &mut [u8], point: usize, step: usize) {
    let p1 = tap(buf, point, step, -2);
    let p0 = tap(buf, point, step, -1);
    let q0 = tap(buf, point, step, 0);
    let q1 = tap(buf, point, step, 1);

    let a = 3 * (q0 - p0) + sclip1(p1 - q1);
    let a1 = sclip2((a + 4) >> 3);
    let a2 = sclip2((a + 3) >> 3);

    buf[point - step] = clip1(p0 + a2);
    buf[point] = clip1(q0 - a1);
}

/// Adjusts `p1..q1` (4 pixels) without the outer term.
#[inline]
pub fn do_filter4(buf: &mut [u8], point: usize, step: usize) {
    let p1 = tap(buf, point, step, -2);
    let p0 = tap(buf, point, step, -1);
    let q0 = tap(buf, point, step, 0);
    let q1 = tap(buf, point, step, 1);

    let a = 3 * (q0 - p0);
    let a1 = sclip2((a + 4) >> 3);
    let a2 = sclip2((a + 3) >> 3);
    let a3 = (a1 + 1) >> 1;

    buf[point - 2 * step] = clip1(p1 + a3);
    buf[point - step] = clip1(p0 + a2);
    buf[point] = clip1(q0 - a1);
    buf[point + step] = clip1(q1 - a3);
}

/// Adjusts `p2..q2` (6 pixels) with the 27/18/9 macroblock edge weights.
#[inline]
pub fn do_filter6(buf: &mut [u8], point: usize, step: usize) {
    let p2 = tap(buf, point, step, -3);
    let p1 = tap(buf, point, step, -2);
    let p0 = tap(buf, point, step, -1);
    let q0 = tap(buf, point, step, 0);
    let q1 = tap(buf, point, step, 1);
    let q2 = tap(buf, point, step, 2);

    let a = sclip1(3 * (q0 - p0) + sclip1(p1 - q1));
    // a is in [-128, 127]
    let a1 = (27 * a + 63) >> 7;
    let a2 = (18 * a + 63) >> 7;
    let a3 = (9 * a + 63) >> 7;

    buf[point - 3 * step] = clip1(p2 + a3);
    buf[point - 2 * step] = clip1(p1 + a2);
    buf[point - step] = clip1(p0 + a1);
    buf[point] = clip1(q0 - a1);
    buf[point + step] = clip1(q1 - a2);
    buf[point + 2 * step] = clip1(q2 - a3);
}

/// Simple filter along `size` positions: `hstride` crosses the edge,
/// `vstride` walks along it.
pub fn simple_filter_loop(
    buf: &mut [u8],
    mut point: usize,
    hstride: usize,
    vstride: usize,
    size: usize,
    edge_limit: u8,
) {
    let t = 2 * i32::from(edge_limit) + 1;
    for _ in 0..size {
        if needs_filter(buf, point, hstride, t) {
            do_filter2(buf, point, hstride);
        }
        point += vstride;
    }
}

/// Normal filter for macroblock edges: HEV positions get the 2-pixel filter,
/// the rest the 6-pixel one.
pub fn filter_loop26(
    buf: &mut [u8],
    mut point: usize,
    hstride: usize,
    vstride: usize,
    size: usize,
    params: FilterParams,
) {
    let t = 2 * i32::from(params.edge_limit) + 1;
    let it = i32::from(params.interior_limit);
    let hev_thresh = i32::from(params.hev_threshold);
    for _ in 0..size {
        if needs_filter2(buf, point, hstride, t, it) {
            if hev(buf, point, hstride, hev_thresh) {
                do_filter2(buf, point, hstride);
            } else {
                do_filter6(buf, point, hstride);
            }
        }
        point += vstride;
    }
}

/// Normal filter for inner sub-block edges: HEV positions get the 2-pixel
/// filter, the rest the 4-pixel one.
pub fn filter_loop24(
    buf: &mut [u8],
    mut point: usize,
    hstride: usize,
    vstride: usize,
    size: usize,
    params: FilterParams,
) {
    let t = 2 * i32::from(params.edge_limit) + 1;
    let it = i32::from(params.interior_limit);
    let hev_thresh = i32::from(params.hev_threshold);
    for _ in 0..size {
        if needs_filter2(buf, point, hstride, t, it) {
            if hev(buf, point, hstride, hev_thresh) {
                do_filter2(buf, point, hstride);
            } else {
                do_filter4(buf, point, hstride);
            }
        }
        point += vstride;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference simple filter in the RFC 6386 form, used to cross-check the
    /// doubled-threshold arithmetic.
    fn scalar_simple_filter(p1: u8, p0: u8, q0: u8, q1: u8, edge_limit: i32) -> (u8, u8) {
        let diff_p0_q0 = (p0 as i32 - q0 as i32).abs();
        let diff_p1_q1 = (p1 as i32 - q1 as i32).abs();
        if diff_p0_q0 * 2 + diff_p1_q1 / 2 > edge_limit {
            return (p0, q0);
        }

        let p1s = p1 as i32 - 128;
        let p0s = p0 as i32 - 128;
        let q0s = q0 as i32 - 128;
        let q1s = q1 as i32 - 128;

        let a = (p1s - q1s).clamp(-128, 127) + 3 * (q0s - p0s);
        let a = a.clamp(-128, 127);
        let a_plus_4 = (a + 4).clamp(-128, 127) >> 3;
        let a_plus_3 = (a + 3).clamp(-128, 127) >> 3;

        let new_q0 = (q0s - a_plus_4).clamp(-128, 127) + 128;
        let new_p0 = (p0s + a_plus_3).clamp(-128, 127) + 128;

        (new_p0 as u8, new_q0 as u8)
    }

    #[test]
    fn test_simple_filter_matches_rfc_form() {
        let samples = [0u8, 1, 20, 63, 100, 110, 127, 128, 140, 150, 200, 254, 255];
        for &p1 in &samples {
            for &p0 in &samples {
                for &q0 in &samples {
                    for &q1 in &samples {
                        for edge_limit in [0u8, 5, 40, 127] {
                            let mut buf = [p1, p0, q0, q1];
                            simple_filter_loop(&mut buf, 2, 1, 1, 1, edge_limit);
                            let expected =
                                scalar_simple_filter(p1, p0, q0, q1, i32::from(edge_limit));
                            assert_eq!(
                                (buf[1], buf[2]),
                                expected,
                                "p1={} p0={} q0={} q1={} limit={}",
                                p1,
                                p0,
                                q0,
                                q1,
                                edge_limit
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_needs_filter_threshold() {
        let buf = [100u8, 110, 140, 150];
        // 4 * 30 + 50 == 170
        assert!(needs_filter(&buf, 2, 1, 170));
        assert!(!needs_filter(&buf, 2, 1, 169));
    }

    #[test]
    fn test_needs_filter2_interior() {
        let mut buf = [100u8, 100, 100, 100, 104, 104, 104, 104];
        assert!(needs_filter2(&buf, 4, 1, 100, 0));
        buf[0] = 90;
        assert!(!needs_filter2(&buf, 4, 1, 100, 9));
        assert!(needs_filter2(&buf, 4, 1, 100, 10));
    }

    #[test]
    fn test_hev() {
        let buf = [100u8, 105, 120, 121];
        assert!(hev(&buf, 2, 1, 4));
        assert!(!hev(&buf, 2, 1, 5));
    }

    #[test]
    fn test_filters_leave_flat_gray_unchanged() {
        let stride = 8;
        let mut buf = vec![128u8; stride * 8];
        let params = FilterParams::new(63, 63, 2);
        filter_loop26(&mut buf, 4, 1, stride, 8, params);
        filter_loop24(&mut buf, 4 * stride, stride, 1, 8, params);
        simple_filter_loop(&mut buf, 4, 1, stride, 8, 127);
        assert!(buf.iter().all(|&p| p == 128));
    }

    #[test]
    fn test_do_filter6_step() {
        // a = sclip1(3 * 40 + sclip1(-40)) = 80
        let mut buf = [100u8, 100, 100, 100, 140, 140, 140, 140];
        do_filter6(&mut buf, 4, 1);
        // a1 = (27*80 + 63) >> 7 = 17, a2 = 11, a3 = 6
        assert_eq!(buf, [100, 106, 111, 117, 123, 129, 134, 140]);
    }

    #[test]
    fn test_do_filter4_step() {
        let mut buf = [100u8, 100, 100, 100, 120, 120, 120, 120];
        do_filter4(&mut buf, 4, 1);
        // a = 60, a1 = 8, a2 = 7, a3 = 4
        assert_eq!(buf, [100, 100, 104, 107, 112, 116, 120, 120]);
    }

    #[test]
    fn test_loop_selects_filter2_on_hev() {
        let params = FilterParams::new(127, 127, 0);
        let mut buf = [100u8, 100, 100, 104, 120, 120, 120, 120];
        let mut expected = buf;
        do_filter2(&mut expected, 4, 1);
        filter_loop26(&mut buf, 4, 1, 1, 1, params);
        assert_eq!(buf, expected);
        // p2 and q2 are untouched by the 2-pixel filter
        assert_eq!(buf[1], 100);
        assert_eq!(buf[6], 120);
    }
}
