//! Shape rasterization for drag gestures.
//!
//! Each function maps a start and end cell to the set of grid coordinates the
//! shape covers. The plain functions are unclipped: coordinates may fall
//! outside the grid and callers drop those before writing. The `*_within`
//! forms only visit cells inside a [`Clip`], so their cost follows the grid
//! size rather than the drag extent.
//!
//! Arithmetic runs in `i64` (and `i128` for line stepping), so any pair of
//! `i32` corners is accepted.

use crate::models::Coord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Normalized-distance cutoff for ellipse membership.
///
/// Slightly above 1.0 so small ellipses come out as solid blobs instead of
/// broken rings.
pub const ELLIPSE_THRESHOLD: f64 = 1.1;

/// The shape a drag gesture produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    #[serde(alias = "rect")]
    Rectangle,
    #[serde(alias = "circle")]
    Ellipse,
}

/// Inclusive row and column limits for rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clip {
    top: i64,
    bottom: i64,
    left: i64,
    right: i64,
}

impl Clip {
    /// Every coordinate a [`Coord`] can hold.
    pub const UNBOUNDED: Clip = Clip {
        top: i32::MIN as i64,
        bottom: i32::MAX as i64,
        left: i32::MIN as i64,
        right: i32::MAX as i64,
    };

    /// The cells of a `rows x cols` grid. Empty if either dimension is zero.
    pub fn grid(rows: usize, cols: usize) -> Clip {
        let last = |n: usize| i64::try_from(n).unwrap_or(i64::MAX).min(i64::from(i32::MAX) + 1) - 1;
        Clip { top: 0, bottom: last(rows), left: 0, right: last(cols) }
    }

    pub fn contains(&self, (r, c): Coord) -> bool {
        let (r, c) = (i64::from(r), i64::from(c));
        r >= self.top && r <= self.bottom && c >= self.left && c <= self.right
    }

    fn rows(&self, top: i64, bottom: i64) -> RangeInclusive<i64> {
        top.max(self.top)..=bottom.min(self.bottom)
    }

    fn cols(&self, left: i64, right: i64) -> RangeInclusive<i64> {
        left.max(self.left)..=right.min(self.right)
    }
}

/// Rasterize `kind` between two corner cells.
///
/// # Examples
///
/// ```
/// use charmatrix::shapes::{rasterize, ShapeKind};
///
/// let cells = rasterize(ShapeKind::Rectangle, (1, 1), (2, 3));
/// assert_eq!(cells.len(), 6);
/// ```
pub fn rasterize(kind: ShapeKind, start: Coord, end: Coord) -> HashSet<Coord> {
    rasterize_within(kind, start, end, Clip::UNBOUNDED)
}

/// Rasterize `kind` between two corner cells, keeping only cells inside `clip`.
///
/// The shape is the same as [`rasterize`] would produce; only the visited
/// region shrinks.
///
/// # Examples
///
/// ```
/// use charmatrix::shapes::{rasterize_within, Clip, ShapeKind};
///
/// let cells = rasterize_within(ShapeKind::Rectangle, (0, 0), (100_000, 100_000), Clip::grid(2, 2));
/// assert_eq!(cells.len(), 4);
/// ```
pub fn rasterize_within(kind: ShapeKind, start: Coord, end: Coord, clip: Clip) -> HashSet<Coord> {
    match kind {
        ShapeKind::Line => line_within(start, end, clip),
        ShapeKind::Rectangle => rect_within(start, end, clip),
        ShapeKind::Ellipse => ellipse_within(start, end, clip),
    }
}

/// Rasterize a line in the manner of Bresenham's algorithm.
///
/// The result is 8-connected, one cell wide, and includes both endpoints.
/// Endpoints are put in a canonical order first, so swapping `start` and
/// `end` yields the same cells.
///
/// # Examples
///
/// ```
/// use charmatrix::shapes::rasterize_line;
///
/// let cells = rasterize_line((0, 0), (3, 3));
/// assert_eq!(cells.len(), 4);
/// assert!(cells.contains(&(0, 0)));
/// assert!(cells.contains(&(3, 3)));
/// ```
pub fn rasterize_line(start: Coord, end: Coord) -> HashSet<Coord> {
    line_within(start, end, Clip::UNBOUNDED)
}

/// Rasterize the filled axis-aligned box spanned by two corners.
///
/// # Examples
///
/// ```
/// use charmatrix::shapes::rasterize_rect;
///
/// let cells = rasterize_rect((2, 3), (1, 1));
/// assert_eq!(cells.len(), 6);
/// assert!(cells.contains(&(1, 1)));
/// assert!(cells.contains(&(2, 3)));
/// ```
pub fn rasterize_rect(start: Coord, end: Coord) -> HashSet<Coord> {
    rect_within(start, end, Clip::UNBOUNDED)
}

/// Rasterize a filled ellipse inscribed in the box spanned by two corners.
///
/// A cell is included when its normalized distance from the box center is at
/// most [`ELLIPSE_THRESHOLD`]. If the box is flat in either direction no cells
/// are produced.
///
/// # Examples
///
/// ```
/// use charmatrix::shapes::rasterize_ellipse;
///
/// let cells = rasterize_ellipse((0, 0), (4, 4));
/// assert!(cells.contains(&(2, 2)));
/// assert!(cells.contains(&(2, 0)));
/// assert!(!cells.contains(&(0, 0)));
/// ```
pub fn rasterize_ellipse(start: Coord, end: Coord) -> HashSet<Coord> {
    ellipse_within(start, end, Clip::UNBOUNDED)
}

/// Offset along the minor axis at major step `i` of `n`, rounded to nearest
/// with ties toward positive.
fn minor_offset(i: i64, delta: i64, n: i64) -> i64 {
    if n == 0 {
        return 0;
    }
    let (i, delta, n) = (i128::from(i), i128::from(delta), i128::from(n));
    (2 * i * delta + n).div_euclid(2 * n) as i64
}

/// Steps `i` in `0..=n` for which `origin + i * step` lies in `lo..=hi`.
fn steps_inside(origin: i64, step: i64, n: i64, lo: i64, hi: i64) -> RangeInclusive<i64> {
    let (first, last) = match step {
        1 => (lo - origin, hi - origin),
        -1 => (origin - hi, origin - lo),
        _ if (lo..=hi).contains(&origin) => (0, 0),
        _ => (1, 0),
    };
    first.max(0)..=last.min(n)
}

fn line_within(start: Coord, end: Coord, clip: Clip) -> HashSet<Coord> {
    let mut cells = HashSet::new();

    let ((r0, c0), (r1, c1)) = if start <= end { (start, end) } else { (end, start) };
    let (r0, c0, r1, c1) = (i64::from(r0), i64::from(c0), i64::from(r1), i64::from(c1));
    let (dr, dc) = (r1 - r0, c1 - c0);

    if dc.abs() >= dr.abs() {
        // One cell per column
        let n = dc.abs();
        for i in steps_inside(c0, dc.signum(), n, clip.left, clip.right) {
            let r = r0 + minor_offset(i, dr, n);
            let c = c0 + i * dc.signum();
            if r >= clip.top && r <= clip.bottom {
                cells.insert((r as i32, c as i32));
            }
        }
    } else {
        // One cell per row
        let n = dr.abs();
        for i in steps_inside(r0, dr.signum(), n, clip.top, clip.bottom) {
            let r = r0 + i * dr.signum();
            let c = c0 + minor_offset(i, dc, n);
            if c >= clip.left && c <= clip.right {
                cells.insert((r as i32, c as i32));
            }
        }
    }

    cells
}

fn rect_within(start: Coord, end: Coord, clip: Clip) -> HashSet<Coord> {
    let (top, bottom) = (i64::from(start.0.min(end.0)), i64::from(start.0.max(end.0)));
    let (left, right) = (i64::from(start.1.min(end.1)), i64::from(start.1.max(end.1)));

    let mut cells = HashSet::new();
    for r in clip.rows(top, bottom) {
        for c in clip.cols(left, right) {
            cells.insert((r as i32, c as i32));
        }
    }
    cells
}

fn ellipse_within(start: Coord, end: Coord, clip: Clip) -> HashSet<Coord> {
    let mut cells = HashSet::new();

    let (top, bottom) = (i64::from(start.0.min(end.0)), i64::from(start.0.max(end.0)));
    let (left, right) = (i64::from(start.1.min(end.1)), i64::from(start.1.max(end.1)));

    let rad_r = (bottom - top) as f64 / 2.0;
    let rad_c = (right - left) as f64 / 2.0;
    if rad_r == 0.0 || rad_c == 0.0 {
        return cells;
    }

    let mid_r = (top + bottom) as f64 / 2.0;
    let mid_c = (left + right) as f64 / 2.0;

    for r in clip.rows(top, bottom) {
        for c in clip.cols(left, right) {
            let nr = (r as f64 - mid_r) / rad_r;
            let nc = (c as f64 - mid_c) / rad_c;
            if nr * nr + nc * nc <= ELLIPSE_THRESHOLD {
                cells.insert((r as i32, c as i32));
            }
        }
    }

    cells
}
