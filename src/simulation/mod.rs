mod cell;
mod engine;
mod grid;
mod history;

pub use cell::{CellJob, ConwayRule, RuleToggle, TransitionRule};
pub use engine::UpdateEngine;
pub use grid::{Position, ProbabilityGrid};
pub use history::History;
