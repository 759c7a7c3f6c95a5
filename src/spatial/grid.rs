//! Generic grid for landscape data

use serde::{Deserialize, Serialize};

use crate::core::types::{Position, Shape};

/// Generic row-major 2D grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T: Clone + Default> {
    shape: Shape,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            data: vec![T::default(); shape.cell_count()],
        }
    }

    pub fn filled(shape: Shape, value: T) -> Self {
        Self {
            shape,
            data: vec![value; shape.cell_count()],
        }
    }

    /// Build a grid from equally long rows; returns None for ragged input
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        let shape = Shape::new(rows.len(), cols);
        let data = rows.into_iter().flatten().collect();
        Some(Self { shape, data })
    }

    pub fn from_fn(shape: Shape, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(shape.cell_count());
        for y in 0..shape.rows {
            for x in 0..shape.cols {
                data.push(f(x, y));
            }
        }
        Self { shape, data }
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.shape.cols && y < self.shape.rows {
            self.data.get(y * self.shape.cols + x)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x < self.shape.cols && y < self.shape.rows {
            self.data.get_mut(y * self.shape.cols + x)
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if let Some(cell) = self.get_mut(x, y) {
            *cell = value;
        }
    }

    /// Value at a signed position, None outside the grid
    #[inline]
    pub fn at(&self, pos: Position) -> Option<&T> {
        if self.shape.contains(pos) {
            self.get(pos.x as usize, pos.y as usize)
        } else {
            None
        }
    }

    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// Iterate the cells of a window in row-major order
    pub fn region(&self, bounds: RegionBounds) -> impl Iterator<Item = &T> + '_ {
        let cols = self.shape.cols;
        (bounds.y_start..bounds.y_end).flat_map(move |y| {
            let row = y * cols;
            self.data[row + bounds.x_start..row + bounds.x_end].iter()
        })
    }

    /// Apply `f` to every cell of a window
    pub fn region_mut(&mut self, bounds: RegionBounds, mut f: impl FnMut(&mut T)) {
        let cols = self.shape.cols;
        for y in bounds.y_start..bounds.y_end {
            let row = y * cols;
            for cell in &mut self.data[row + bounds.x_start..row + bounds.x_end] {
                f(cell);
            }
        }
    }
}

/// Half-open rectangular window already clamped to a grid's shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub x_start: usize,
    pub x_end: usize,
    pub y_start: usize,
    pub y_end: usize,
}

impl RegionBounds {
    /// Square window of side `side` around `center`, intersected with `shape`
    ///
    /// The window spans `[c - side/2, c - side/2 + side)` on each axis, so an
    /// unclamped window holds exactly `side * side` cells. A center far outside
    /// the grid yields an empty window.
    pub fn square(center: Position, side: usize, shape: Shape) -> Self {
        let half = (side / 2) as i64;
        let (x_start, x_end) = clamp_span(center.x - half, side as i64, shape.cols);
        let (y_start, y_end) = clamp_span(center.y - half, side as i64, shape.rows);
        Self { x_start, x_end, y_start, y_end }
    }

    pub fn width(&self) -> usize {
        self.x_end - self.x_start
    }

    pub fn height(&self) -> usize {
        self.y_end - self.y_start
    }

    pub fn cell_count(&self) -> usize {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }
}

fn clamp_span(start: i64, len: i64, limit: usize) -> (usize, usize) {
    let limit = limit as i64;
    let lo = start.clamp(0, limit);
    let hi = start.saturating_add(len).clamp(0, limit);
    (lo as usize, hi.max(lo) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_get_set() {
        let mut grid: Grid<f64> = Grid::new(Shape::new(3, 4));
        grid.set(3, 2, 0.5);
        assert_eq!(grid.get(3, 2), Some(&0.5));
        assert_eq!(grid.get(4, 2), None);
        assert_eq!(grid.at(Position::new(-1, 0)), None);
        assert_eq!(grid.at(Position::new(3, 2)), Some(&0.5));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Grid::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_none());
        let grid = Grid::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(grid.shape(), Shape::new(2, 2));
        assert_eq!(grid.get(0, 1), Some(&3.0));
    }

    #[test]
    fn test_square_window_unclamped() {
        let bounds = RegionBounds::square(Position::new(5, 5), 3, Shape::new(10, 10));
        assert_eq!((bounds.x_start, bounds.x_end), (4, 7));
        assert_eq!((bounds.y_start, bounds.y_end), (4, 7));
        assert_eq!(bounds.cell_count(), 9);
    }

    #[test]
    fn test_square_window_clamped_at_edges() {
        let bounds = RegionBounds::square(Position::new(0, 9), 4, Shape::new(10, 10));
        assert_eq!((bounds.x_start, bounds.x_end), (0, 2));
        assert_eq!((bounds.y_start, bounds.y_end), (7, 10));
    }

    #[test]
    fn test_square_window_outside_is_empty() {
        let bounds = RegionBounds::square(Position::new(50, 50), 4, Shape::new(10, 10));
        assert!(bounds.is_empty());
        let bounds = RegionBounds::square(Position::new(-20, 3), 4, Shape::new(10, 10));
        assert!(bounds.is_empty());
    }

    #[test]
    fn test_region_iteration_and_mutation() {
        let mut grid = Grid::from_fn(Shape::new(4, 4), |x, y| (x + 4 * y) as f64);
        let bounds = RegionBounds::square(Position::new(1, 1), 2, grid.shape());
        let cells: Vec<f64> = grid.region(bounds).copied().collect();
        assert_eq!(cells, vec![0.0, 1.0, 4.0, 5.0]);

        grid.region_mut(bounds, |v| *v = -1.0);
        assert_eq!(grid.get(1, 1), Some(&-1.0));
        assert_eq!(grid.get(2, 2), Some(&10.0));
    }
}
