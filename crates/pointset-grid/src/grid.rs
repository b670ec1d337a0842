//! Sparse n-dimensional grid with a mark per touched cell
//!
//! A [`SparseGrid`] maps continuous coordinates onto integer [`Cell`]
//! addresses by per-axis floor division and stores an arbitrary mark for
//! every cell that has been set. Only touched cells consume memory; the full
//! dense cell range of the window is available on demand through
//! [`SparseGrid::dense_cells`].

use pointset_core::{Error, Point, Result, Window};
use std::collections::hash_map::{DefaultHasher, Entry};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

/// Integer address of a grid cell
///
/// Ordering is lexicographic over the coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    coordinates: Vec<i64>,
}

impl Cell {
    pub fn new(coordinates: Vec<i64>) -> Self {
        Self { coordinates }
    }

    pub fn dim(&self) -> usize {
        self.coordinates.len()
    }

    pub fn coordinates(&self) -> &[i64] {
        &self.coordinates
    }
}

impl<const N: usize> From<[i64; N]> for Cell {
    fn from(coordinates: [i64; N]) -> Self {
        Self::new(coordinates.to_vec())
    }
}

impl Index<usize> for Cell {
    type Output = i64;

    fn index(&self, axis: usize) -> &i64 {
        &self.coordinates[axis]
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell{{")?;
        for (i, c) in self.coordinates.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, "}}")
    }
}

/// A gridded n-dimensional space with an optional mark at each cell
///
/// The configuration (window, origin, per-axis resolution) is fixed at
/// construction; only the sparse cell-to-mark map mutates afterwards.
#[derive(Debug, Clone)]
pub struct SparseGrid<M> {
    window: Window,
    origin: Point,
    resolutions: Vec<f64>,
    marks: HashMap<Cell, M>,
}

impl<M> SparseGrid<M> {
    /// Create a grid over `window` whose cell `[0, .., 0]` starts at `origin`
    ///
    /// Fails if the window has a non-positive extent on any axis, any
    /// resolution is not a positive finite number, or the dimensions of the
    /// window, origin and resolutions disagree.
    pub fn new(window: Window, origin: Point, resolutions: Vec<f64>) -> Result<Self> {
        let dim = window.dim();
        if origin.dim() != dim || resolutions.len() != dim {
            return Err(Error::InvalidConfiguration(format!(
                "window has {dim} dimensions but origin has {} and resolutions have {}",
                origin.dim(),
                resolutions.len()
            )));
        }
        if dim == 0 {
            return Err(Error::InvalidConfiguration(
                "grid must have at least one dimension".to_string(),
            ));
        }
        for axis in 0..dim {
            let extent = window.extent(axis);
            if !(extent > 0.0) {
                return Err(Error::degenerate_window(axis, extent));
            }
            let res = resolutions[axis];
            if !(res > 0.0 && res.is_finite()) {
                return Err(Error::InvalidConfiguration(format!(
                    "resolution along axis {axis} must be positive and finite, got {res}"
                )));
            }
        }

        Ok(Self {
            window,
            origin,
            resolutions,
            marks: HashMap::new(),
        })
    }

    /// Create a grid with the same resolution on every axis and its origin
    /// at the window start
    pub fn uniform(window: Window, resolution: f64) -> Result<Self> {
        let origin = window.start().clone();
        let resolutions = vec![resolution; window.dim()];
        Self::new(window, origin, resolutions)
    }

    /// Create a grid with the same resolution on every axis and a custom origin
    pub fn with_origin(window: Window, origin: Point, resolution: f64) -> Result<Self> {
        let resolutions = vec![resolution; origin.dim()];
        Self::new(window, origin, resolutions)
    }

    /// An empty grid of another mark type with this grid's configuration
    pub fn copy_structure<N>(&self) -> SparseGrid<N> {
        SparseGrid {
            window: self.window.clone(),
            origin: self.origin.clone(),
            resolutions: self.resolutions.clone(),
            marks: HashMap::new(),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn origin(&self) -> &Point {
        &self.origin
    }

    /// Cell size along each axis
    pub fn resolutions(&self) -> &[f64] {
        &self.resolutions
    }

    pub fn dim(&self) -> usize {
        self.origin.dim()
    }

    /// True if both grids share window, origin and resolutions
    pub fn same_structure<N>(&self, other: &SparseGrid<N>) -> bool {
        self.origin == other.origin
            && self.resolutions == other.resolutions
            && self.window == other.window
    }

    /// The cell containing `point`
    ///
    /// Panics if the point's dimension differs from the grid's; use
    /// [`SparseGrid::try_cell`] for untrusted input.
    pub fn cell(&self, point: &Point) -> Cell {
        assert_eq!(
            point.dim(),
            self.dim(),
            "point dimension does not match grid dimension"
        );
        self.cell_unchecked(point)
    }

    /// The cell containing `point`, or an error on dimension mismatch or a
    /// non-finite coordinate
    pub fn try_cell(&self, point: &Point) -> Result<Cell> {
        if point.dim() != self.dim() {
            return Err(Error::dimension_mismatch(self.dim(), point.dim()));
        }
        if let Some(x) = point.coordinates().iter().find(|x| !x.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "cannot bin point {point} with non-finite coordinate {x}"
            )));
        }
        Ok(self.cell_unchecked(point))
    }

    fn cell_unchecked(&self, point: &Point) -> Cell {
        Cell::new(
            point
                .coordinates()
                .iter()
                .zip(self.origin.coordinates())
                .zip(&self.resolutions)
                .map(|((x, o), r)| ((x - o) / r).floor() as i64)
                .collect(),
        )
    }

    /// The box covered by a cell
    pub fn region(&self, cell: &Cell) -> Window {
        assert_eq!(
            cell.dim(),
            self.dim(),
            "cell dimension does not match grid dimension"
        );
        let start = Point::new(
            cell.coordinates
                .iter()
                .zip(self.origin.coordinates())
                .zip(&self.resolutions)
                .map(|((&c, o), r)| c as f64 * r + o)
                .collect(),
        );
        Window::spanning(start, &self.resolutions)
    }

    /// The box covered by the cell containing `point`
    pub fn region_at(&self, point: &Point) -> Window {
        self.region(&self.cell(point))
    }

    pub fn mark(&self, cell: &Cell) -> Option<&M> {
        self.marks.get(cell)
    }

    pub fn mark_mut(&mut self, cell: &Cell) -> Option<&mut M> {
        self.marks.get_mut(cell)
    }

    pub fn mark_at(&self, point: &Point) -> Option<&M> {
        self.marks.get(&self.cell(point))
    }

    /// Set the mark of a cell, returning the previous one
    pub fn set(&mut self, cell: Cell, mark: M) -> Option<M> {
        self.marks.insert(cell, mark)
    }

    pub fn set_at(&mut self, point: &Point, mark: M) -> Option<M> {
        let cell = self.cell(point);
        self.set(cell, mark)
    }

    /// Remove the mark of a cell
    pub fn clear(&mut self, cell: &Cell) -> Option<M> {
        self.marks.remove(cell)
    }

    pub fn clear_at(&mut self, point: &Point) -> Option<M> {
        let cell = self.cell(point);
        self.clear(&cell)
    }

    /// Remove every mark, keeping the configuration
    pub fn clear_all(&mut self) {
        self.marks.clear();
    }

    pub(crate) fn entry(&mut self, cell: Cell) -> Entry<'_, Cell, M> {
        self.marks.entry(cell)
    }

    /// Number of marked cells
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Marked cells with their marks, in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&Cell, &M)> {
        self.marks.iter()
    }

    /// Marked cells, in unspecified order
    pub fn marked_cells(&self) -> impl Iterator<Item = &Cell> {
        self.marks.keys()
    }

    /// Marked cells collected into a vector, in unspecified order
    pub fn all_marked_cells(&self) -> Vec<Cell> {
        self.marks.keys().cloned().collect()
    }

    /// Lazily enumerate every cell between the cells of the window's start
    /// and end corners (inclusive), last axis varying fastest
    ///
    /// The enumeration covers the full cartesian product of the window,
    /// which grows as `(extent / resolution)^dim`.
    pub fn dense_cells(&self) -> DenseCells {
        DenseCells::new(
            self.cell(self.window.start()),
            self.cell(self.window.end()),
        )
    }

    /// Every cell of the window collected into a vector
    ///
    /// Be careful: this materializes the full dense range and can be huge
    /// for fine resolutions or many dimensions.
    pub fn all_cells(&self) -> Vec<Cell> {
        self.dense_cells().collect()
    }
}

impl<M: Hash> SparseGrid<M> {
    /// Hash of the sparse map, independent of insertion order
    ///
    /// Equal grids hash equally; the configuration is not hashed, so grids
    /// that differ only in configuration collide.
    pub fn signature_hash(&self) -> u64 {
        let mut entries: Vec<(&Cell, &M)> = self.marks.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        let mut hasher = DefaultHasher::new();
        entries.len().hash(&mut hasher);
        for (cell, mark) in entries {
            cell.hash(&mut hasher);
            mark.hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl<M: PartialEq> PartialEq for SparseGrid<M> {
    fn eq(&self, other: &Self) -> bool {
        self.same_structure(other) && self.marks == other.marks
    }
}

/// Iterator over the dense cell range of a grid window
///
/// Produced by [`SparseGrid::dense_cells`].
#[derive(Debug, Clone)]
pub struct DenseCells {
    min: Vec<i64>,
    max: Vec<i64>,
    next: Option<Vec<i64>>,
    remaining: usize,
}

impl DenseCells {
    fn new(min: Cell, max: Cell) -> Self {
        let empty = min
            .coordinates
            .iter()
            .zip(&max.coordinates)
            .any(|(lo, hi)| lo > hi);
        // saturates at usize::MAX
        let remaining = if empty {
            0
        } else {
            min.coordinates
                .iter()
                .zip(&max.coordinates)
                .map(|(&lo, &hi)| {
                    usize::try_from(i128::from(hi) - i128::from(lo) + 1).unwrap_or(usize::MAX)
                })
                .fold(1usize, |acc, n| acc.saturating_mul(n))
        };
        Self {
            next: (!empty).then(|| min.coordinates.clone()),
            min: min.coordinates,
            max: max.coordinates,
            remaining,
        }
    }
}

impl Iterator for DenseCells {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        let current = self.next.take()?;
        self.remaining = self.remaining.saturating_sub(1);

        let mut succ = current.clone();
        let mut axis = succ.len();
        let advanced = loop {
            if axis == 0 {
                break false;
            }
            axis -= 1;
            if succ[axis] < self.max[axis] {
                succ[axis] += 1;
                break true;
            }
            succ[axis] = self.min[axis];
        };
        if advanced {
            self.next = Some(succ);
        }

        Some(Cell::new(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for DenseCells {}
