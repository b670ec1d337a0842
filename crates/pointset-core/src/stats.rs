//! Summary statistics over point sets

use crate::geometry::Point;
use crate::{Error, Result};

/// Coordinate-wise mean of a point set
pub fn mean(points: &[Point]) -> Result<Point> {
    let first = points.first().ok_or_else(Error::empty_input)?;
    let dim = first.dim();
    let mut sum = vec![0.0; dim];

    for p in points {
        if p.dim() != dim {
            return Err(Error::dimension_mismatch(dim, p.dim()));
        }
        for (acc, x) in sum.iter_mut().zip(p.coordinates()) {
            *acc += x;
        }
    }

    let n = points.len() as f64;
    Ok(Point::new(sum.into_iter().map(|s| s / n).collect()))
}

/// Mean squared Euclidean distance from the point-set mean
pub fn variance(points: &[Point]) -> Result<f64> {
    let m = mean(points)?;
    let sum: f64 = points
        .iter()
        .map(|p| {
            let d = (p - &m).magnitude();
            d * d
        })
        .sum();
    Ok(sum / points.len() as f64)
}
