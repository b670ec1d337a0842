//! N-dimensional points and axis-aligned windows

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, Sub};

/// A point in n-dimensional space
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    coordinates: Vec<f64>,
}

impl Point {
    /// Create a point from its coordinates
    pub fn new(coordinates: Vec<f64>) -> Self {
        Self { coordinates }
    }

    /// The origin of an n-dimensional space
    pub fn zeros(dim: usize) -> Self {
        Self::new(vec![0.0; dim])
    }

    /// Number of coordinates
    pub fn dim(&self) -> usize {
        self.coordinates.len()
    }

    /// Coordinates as a slice
    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    /// Euclidean norm of the point taken as a vector
    pub fn magnitude(&self) -> f64 {
        self.coordinates.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Lexicographic comparison of coordinates
    ///
    /// NaN coordinates compare as equal to everything.
    pub fn lex_cmp(&self, other: &Point) -> Ordering {
        for (a, b) in self.coordinates.iter().zip(&other.coordinates) {
            match a.partial_cmp(b) {
                Some(Ordering::Equal) | None => continue,
                Some(ord) => return ord,
            }
        }
        self.dim().cmp(&other.dim())
    }

    /// Subtract another point, failing if the dimensions differ
    pub fn try_sub(&self, other: &Point) -> Result<Point> {
        if self.dim() != other.dim() {
            return Err(Error::dimension_mismatch(self.dim(), other.dim()));
        }
        Ok(Point::new(
            self.coordinates
                .iter()
                .zip(&other.coordinates)
                .map(|(a, b)| a - b)
                .collect(),
        ))
    }
}

impl From<Vec<f64>> for Point {
    fn from(coordinates: Vec<f64>) -> Self {
        Self::new(coordinates)
    }
}

impl<const N: usize> From<[f64; N]> for Point {
    fn from(coordinates: [f64; N]) -> Self {
        Self::new(coordinates.to_vec())
    }
}

impl Index<usize> for Point {
    type Output = f64;

    fn index(&self, axis: usize) -> &f64 {
        &self.coordinates[axis]
    }
}

impl Sub for &Point {
    type Output = Point;

    /// Panics when the dimensions differ; use [`Point::try_sub`] otherwise.
    fn sub(self, rhs: &Point) -> Point {
        assert_eq!(self.dim(), rhs.dim(), "point dimension mismatch");
        Point::new(
            self.coordinates
                .iter()
                .zip(&rhs.coordinates)
                .map(|(a, b)| a - b)
                .collect(),
        )
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, x) in self.coordinates.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{x}")?;
        }
        write!(f, ")")
    }
}

/// An axis-aligned box in n dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    start: Point,
    end: Point,
}

impl Window {
    /// Create a window from its lower and upper corners
    pub fn new(start: Point, end: Point) -> Result<Self> {
        if start.dim() != end.dim() {
            return Err(Error::dimension_mismatch(start.dim(), end.dim()));
        }
        Ok(Self { start, end })
    }

    /// Create a window from two coordinate arrays
    pub fn from_bounds<const N: usize>(start: [f64; N], end: [f64; N]) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// A window starting at `start` and reaching `sizes[axis]` along each axis
    ///
    /// Panics if `sizes` does not have one entry per axis of `start`.
    pub fn spanning(start: Point, sizes: &[f64]) -> Self {
        assert_eq!(start.dim(), sizes.len(), "window size dimension mismatch");
        let end = Point::new(
            start
                .coordinates
                .iter()
                .zip(sizes)
                .map(|(s, d)| s + d)
                .collect(),
        );
        Self { start, end }
    }

    /// The smallest window enclosing every point
    pub fn smallest_enclosing(points: &[Point]) -> Result<Self> {
        let first = points.first().ok_or_else(Error::empty_input)?;
        let dim = first.dim();
        let mut lo = first.coordinates.clone();
        let mut hi = first.coordinates.clone();

        for p in &points[1..] {
            if p.dim() != dim {
                return Err(Error::dimension_mismatch(dim, p.dim()));
            }
            for (axis, &x) in p.coordinates.iter().enumerate() {
                lo[axis] = lo[axis].min(x);
                hi[axis] = hi[axis].max(x);
            }
        }

        Ok(Self {
            start: Point::new(lo),
            end: Point::new(hi),
        })
    }

    pub fn start(&self) -> &Point {
        &self.start
    }

    pub fn end(&self) -> &Point {
        &self.end
    }

    pub fn dim(&self) -> usize {
        self.start.dim()
    }

    /// Length of the window along one axis
    pub fn extent(&self, axis: usize) -> f64 {
        self.end[axis] - self.start[axis]
    }

    /// True if any axis has a non-positive (or NaN) extent
    pub fn is_degenerate(&self) -> bool {
        self.dim() == 0 || (0..self.dim()).any(|axis| !(self.extent(axis) > 0.0))
    }

    /// Inclusive containment test
    pub fn contains(&self, point: &Point) -> bool {
        point.dim() == self.dim()
            && (0..self.dim())
                .all(|axis| point[axis] >= self.start[axis] && point[axis] <= self.end[axis])
    }

    pub fn centroid(&self) -> Point {
        Point::new(
            (0..self.dim())
                .map(|axis| 0.5 * (self.start[axis] + self.end[axis]))
                .collect(),
        )
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} -> {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_point_ops() {
        let a = Point::from([3.0, 4.0]);
        let b = Point::from([1.0, 1.0]);
        assert_relative_eq!(a.magnitude(), 5.0);
        assert_eq!(&a - &b, Point::from([2.0, 3.0]));
        assert!(a.try_sub(&Point::from([1.0])).is_err());
        assert_eq!(a.to_string(), "(3, 4)");
    }

    #[test]
    fn test_lexicographic_order() {
        let a = Point::from([1.0, 5.0]);
        let b = Point::from([2.0, 0.0]);
        let c = Point::from([1.0, 6.0]);
        assert_eq!(a.lex_cmp(&b), Ordering::Less);
        assert_eq!(c.lex_cmp(&a), Ordering::Greater);
        assert_eq!(a.lex_cmp(&a), Ordering::Equal);
    }

    #[test]
    fn test_smallest_enclosing() {
        let points = vec![
            Point::from([1.0, -2.0]),
            Point::from([-3.0, 4.0]),
            Point::from([0.5, 0.5]),
        ];
        let window = Window::smallest_enclosing(&points).unwrap();
        assert_eq!(window.start(), &Point::from([-3.0, -2.0]));
        assert_eq!(window.end(), &Point::from([1.0, 4.0]));
        for p in &points {
            assert!(window.contains(p));
        }
        assert!(!window.contains(&Point::from([2.0, 0.0])));
    }

    #[test]
    fn test_smallest_enclosing_rejects_bad_input() {
        assert!(matches!(
            Window::smallest_enclosing(&[]),
            Err(Error::InsufficientData { .. })
        ));
        let mixed = vec![Point::from([1.0, 2.0]), Point::from([1.0])];
        assert!(matches!(
            Window::smallest_enclosing(&mixed),
            Err(Error::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_degenerate_window() {
        assert!(!Window::from_bounds([0.0, 0.0], [1.0, 1.0]).is_degenerate());
        assert!(Window::from_bounds([0.0, 0.0], [1.0, 0.0]).is_degenerate());
        assert!(Window::from_bounds([0.0], [f64::NAN]).is_degenerate());
        assert!(Window::new(Point::from([0.0]), Point::from([1.0, 1.0])).is_err());
    }

    #[test]
    fn test_window_serde_roundtrip() {
        let window = Window::from_bounds([0.0, -1.0], [10.0, 1.0]);
        let json = serde_json::to_string(&window).unwrap();
        let back: Window = serde_json::from_str(&json).unwrap();
        assert_eq!(window, back);
        assert_eq!(back.centroid(), Point::from([5.0, 0.0]));
    }

    proptest! {
        // Property: the enclosing window contains every input and touches
        // the extremes on each axis
        #[test]
        fn prop_smallest_enclosing_contains_inputs(
            coords in prop::collection::vec(prop::collection::vec(-1e6f64..1e6, 3), 1..50)
        ) {
            let points: Vec<Point> = coords.into_iter().map(Point::new).collect();
            let window = Window::smallest_enclosing(&points).unwrap();
            for p in &points {
                prop_assert!(window.contains(p));
            }
            for axis in 0..3 {
                prop_assert!(points.iter().any(|p| p[axis] == window.start()[axis]));
                prop_assert!(points.iter().any(|p| p[axis] == window.end()[axis]));
            }
        }
    }
}
