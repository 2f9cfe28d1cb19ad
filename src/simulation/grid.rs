use std::fmt;
use std::sync::Arc;

use serde::de::{Deserialize, Deserializer, Error as _};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::config::NEIGHBOR_COUNT;
use crate::error::ValidationError;

/// Immutable matrix of alive-probabilities.
///
/// Cells live in a shared row-major buffer; cloning a grid is an `Arc` bump
/// and a new generation is always a new buffer.
#[derive(Clone, PartialEq)]
pub struct ProbabilityGrid {
    rows: usize,
    cols: usize,
    cells: Arc<[f64]>,
}

/// (row, col) position in a grid
pub type Position = (usize, usize);

impl ProbabilityGrid {
    /// Build a grid from rows, checking shape and range.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ValidationError> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || cols == 0 {
            return Err(ValidationError::EmptyGrid);
        }

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(ValidationError::NonRectangular {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ValidationError::OutOfRange {
                        row: i,
                        col: j,
                        value,
                    });
                }
                cells.push(value);
            }
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            cells: cells.into(),
        })
    }

    /// Build a grid from a row-major buffer produced by the engine.
    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<f64>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        debug_assert!(cells.iter().all(|p| (0.0..=1.0).contains(p)));
        Self {
            rows,
            cols,
            cells: cells.into(),
        }
    }

    /// A grid with every cell at `probability`
    pub fn filled(rows: usize, cols: usize, probability: f64) -> Result<Self, ValidationError> {
        Self::from_rows(vec![vec![probability; cols]; rows])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, (i, j): Position) -> f64 {
        self.cells[i * self.cols + j]
    }

    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.cells[i * self.cols..(i + 1) * self.cols]
    }

    pub fn position(&self, index: usize) -> Position {
        (index / self.cols, index % self.cols)
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }

    pub fn mean(&self) -> f64 {
        self.cells.iter().sum::<f64>() / self.cells.len() as f64
    }

    /// Toroidal Moore neighbors of `(i, j)` in row-major offset order:
    /// (-1,-1) (-1,0) (-1,+1) (0,-1) (0,+1) (+1,-1) (+1,0) (+1,+1).
    pub fn neighbor_positions(&self, (i, j): Position) -> [Position; NEIGHBOR_COUNT] {
        let [up, _, down] = wrap_axis(i, self.rows);
        let [left, _, right] = wrap_axis(j, self.cols);
        [
            (up, left),
            (up, j),
            (up, right),
            (i, left),
            (i, right),
            (down, left),
            (down, j),
            (down, right),
        ]
    }

    pub fn neighbor_probabilities(&self, position: Position) -> [f64; NEIGHBOR_COUNT] {
        self.neighbor_positions(position).map(|p| self.get(p))
    }
}

/// [previous, current, next] index on an axis of length `n`, wrapping both ways
fn wrap_axis(i: usize, n: usize) -> [usize; 3] {
    [(i + n - 1) % n, i, (i + 1) % n]
}

impl fmt::Debug for ProbabilityGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbabilityGrid")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("cells", &self.to_rows())
            .finish()
    }
}

impl Serialize for ProbabilityGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows))?;
        for i in 0..self.rows {
            seq.serialize_element(self.row(i))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ProbabilityGrid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<f64>>::deserialize(deserializer)?;
        Self::from_rows(rows).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(rows: usize, cols: usize) -> ProbabilityGrid {
        let total = (rows * cols) as f64;
        let cells = (0..rows)
            .map(|i| (0..cols).map(|j| (i * cols + j) as f64 / total).collect())
            .collect();
        ProbabilityGrid::from_rows(cells).unwrap()
    }

    #[test]
    fn test_grid_creation() {
        let grid = numbered(3, 5);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.len(), 15);
        assert_eq!(grid.get((1, 2)), 7.0 / 15.0);
        assert_eq!(grid.position(7), (1, 2));
        assert_eq!(grid.to_rows()[2].len(), 5);
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = ProbabilityGrid::from_rows(vec![vec![0.1, 0.2], vec![0.3]]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonRectangular {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_rejects_out_of_range_and_nan() {
        let err = ProbabilityGrid::from_rows(vec![vec![0.5, 1.5]]).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { row: 0, col: 1, .. }));

        let err = ProbabilityGrid::from_rows(vec![vec![f64::NAN]]).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));

        assert!(ProbabilityGrid::from_rows(vec![vec![-0.0, 1.0]]).is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            ProbabilityGrid::from_rows(vec![]).unwrap_err(),
            ValidationError::EmptyGrid
        );
        assert_eq!(
            ProbabilityGrid::from_rows(vec![vec![]]).unwrap_err(),
            ValidationError::EmptyGrid
        );
    }

    #[test]
    fn test_corner_neighbors_wrap_both_axes() {
        // 4 rows x 6 cols, asymmetric on purpose
        let grid = numbered(4, 6);
        assert_eq!(
            grid.neighbor_positions((0, 0)),
            [(3, 5), (3, 0), (3, 1), (0, 5), (0, 1), (1, 5), (1, 0), (1, 1)]
        );
        assert_eq!(
            grid.neighbor_positions((3, 5)),
            [(2, 4), (2, 5), (2, 0), (3, 4), (3, 0), (0, 4), (0, 5), (0, 0)]
        );
    }

    #[test]
    fn test_edge_neighbors_wrap() {
        let grid = numbered(4, 6);
        // top edge wraps to the bottom row only
        assert_eq!(
            grid.neighbor_positions((0, 3)),
            [(3, 2), (3, 3), (3, 4), (0, 2), (0, 4), (1, 2), (1, 3), (1, 4)]
        );
        // right edge wraps to the first column only
        assert_eq!(
            grid.neighbor_positions((2, 5)),
            [(1, 4), (1, 5), (1, 0), (2, 4), (2, 0), (3, 4), (3, 5), (3, 0)]
        );
    }

    #[test]
    fn test_neighbor_probabilities_follow_positions() {
        let grid = numbered(4, 6);
        let probs = grid.neighbor_probabilities((0, 0));
        assert_eq!(probs[0], grid.get((3, 5)));
        assert_eq!(probs[7], grid.get((1, 1)));
    }

    #[test]
    fn test_single_cell_is_its_own_neighbor() {
        let grid = ProbabilityGrid::from_rows(vec![vec![0.25]]).unwrap();
        assert_eq!(grid.neighbor_positions((0, 0)), [(0, 0); 8]);
    }

    #[test]
    fn test_clone_shares_buffer() {
        let grid = numbered(2, 2);
        let copy = grid.clone();
        assert!(Arc::ptr_eq(&grid.cells, &copy.cells));
        assert_eq!(grid, copy);
    }

    #[test]
    fn test_json_shape() {
        let grid = ProbabilityGrid::from_rows(vec![vec![0.0, 0.5], vec![1.0, 0.25]]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[[0.0,0.5],[1.0,0.25]]");

        let bad: Result<ProbabilityGrid, _> = serde_json::from_str("[[0.0,2.0]]");
        assert!(bad.is_err());
    }
}
