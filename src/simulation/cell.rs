use crate::config::NEIGHBOR_COUNT;
use crate::error::ValidationError;
use crate::simulation::grid::{Position, ProbabilityGrid};

/// Everything one cell's update needs: its own probability and its
/// neighbors' probabilities in Moore offset order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellJob {
    pub current: f64,
    pub neighbors: [f64; NEIGHBOR_COUNT],
}

impl CellJob {
    pub fn new(current: f64, neighbors: &[f64]) -> Result<Self, ValidationError> {
        let neighbors: [f64; NEIGHBOR_COUNT] = neighbors
            .try_into()
            .map_err(|_| ValidationError::NeighborCount(neighbors.len()))?;
        check_probability(current)?;
        for &p in &neighbors {
            check_probability(p)?;
        }
        Ok(Self { current, neighbors })
    }

    /// Snapshot a cell and its toroidal neighborhood from `grid`.
    pub fn from_grid(grid: &ProbabilityGrid, position: Position) -> Self {
        Self {
            current: grid.get(position),
            neighbors: grid.neighbor_probabilities(position),
        }
    }
}

fn check_probability(p: f64) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(ValidationError::InvalidProbability(p))
    }
}

/// Life-like transition rule over (currently alive, alive neighbor count).
pub trait TransitionRule: Send + Sync {
    fn next_alive(&self, alive: bool, neighbors: u8) -> bool;

    /// Output toggles that realize this rule on a circuit. `current: None`
    /// means the toggle fires whatever the cell's own state.
    fn toggles(&self) -> Vec<RuleToggle> {
        (0..=NEIGHBOR_COUNT as u8)
            .filter_map(|count| {
                match (self.next_alive(false, count), self.next_alive(true, count)) {
                    (true, true) => Some(RuleToggle { current: None, count }),
                    (false, true) => Some(RuleToggle { current: Some(true), count }),
                    (true, false) => Some(RuleToggle { current: Some(false), count }),
                    (false, false) => None,
                }
            })
            .collect()
    }
}

/// One multi-controlled toggle of the output signal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleToggle {
    pub current: Option<bool>,
    pub count: u8,
}

/// B3/S23
#[derive(Clone, Copy, Debug, Default)]
pub struct ConwayRule;

impl TransitionRule for ConwayRule {
    fn next_alive(&self, alive: bool, neighbors: u8) -> bool {
        matches!((alive, neighbors), (true, 2) | (_, 3))
    }
}
