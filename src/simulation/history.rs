use serde::de::{Deserialize, Deserializer, Error as _};
use serde::{Serialize, Serializer};

use crate::error::ValidationError;
use crate::simulation::ProbabilityGrid;

/// Append-only record of every generation; entry 0 is the initial grid.
#[derive(Clone, Debug, PartialEq)]
pub struct History {
    grids: Vec<ProbabilityGrid>,
}

impl History {
    pub fn new(initial: ProbabilityGrid) -> Self {
        Self {
            grids: vec![initial],
        }
    }

    /// Rebuild a history read from disk; every generation must share the
    /// first one's dimensions.
    pub fn from_grids(grids: Vec<ProbabilityGrid>) -> Result<Self, ValidationError> {
        let first = grids.first().ok_or(ValidationError::EmptyHistory)?;
        let (rows, cols) = (first.rows(), first.cols());
        for (turn, grid) in grids.iter().enumerate() {
            if grid.rows() != rows || grid.cols() != cols {
                return Err(ValidationError::DimensionMismatch {
                    turn,
                    rows,
                    cols,
                    found_rows: grid.rows(),
                    found_cols: grid.cols(),
                });
            }
        }
        Ok(Self { grids })
    }

    pub(crate) fn push(&mut self, grid: ProbabilityGrid) {
        debug_assert_eq!(
            (grid.rows(), grid.cols()),
            (self.grids[0].rows(), self.grids[0].cols())
        );
        self.grids.push(grid);
    }

    /// Number of stored generations (turns + 1)
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn turns(&self) -> usize {
        self.grids.len() - 1
    }

    pub fn get(&self, turn: usize) -> Option<&ProbabilityGrid> {
        self.grids.get(turn)
    }

    pub fn initial(&self) -> &ProbabilityGrid {
        &self.grids[0]
    }

    pub fn latest(&self) -> &ProbabilityGrid {
        &self.grids[self.grids.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProbabilityGrid> {
        self.grids.iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a ProbabilityGrid;
    type IntoIter = std::slice::Iter<'a, ProbabilityGrid>;

    fn into_iter(self) -> Self::IntoIter {
        self.grids.iter()
    }
}

impl Serialize for History {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.grids.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for History {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let grids = Vec::<ProbabilityGrid>::deserialize(deserializer)?;
        Self::from_grids(grids).map_err(D::Error::custom)
    }
}
