use std::num::NonZeroUsize;
use std::thread;

/// Number of shots drawn per cell per turn
pub const DEFAULT_SHOTS: usize = 1000;

/// Width of the alive-neighbor counter (holds 0..=15, enough for 8 neighbors)
pub const COUNTER_BITS: usize = 4;

/// Moore neighborhood size
pub const NEIGHBOR_COUNT: usize = 8;

/// Signals in a cell circuit: output + current cell + counter + neighbors
pub const CELL_SIGNALS: usize = 2 + COUNTER_BITS + NEIGHBOR_COUNT;

/// Largest circuit the shot sampler accepts (one bit of state per signal)
pub const SAMPLER_CAPACITY: usize = 64;

/// Most encoded signals the exact backend will enumerate (2^20 assignments)
pub const EXACT_MAX_ENCODINGS: usize = 20;

// ============================================
// Rendering
// ============================================

/// Delay between GIF frames
pub const FRAME_DELAY_MS: u32 = 500;

/// Color stops for the fixed [0, 1] scale, evenly spaced (yellow-green-blue)
pub const COLOR_RAMP: [[u8; 3]; 9] = [
    [255, 255, 217],
    [237, 248, 177],
    [199, 233, 180],
    [127, 205, 187],
    [65, 182, 196],
    [29, 145, 192],
    [34, 94, 168],
    [37, 52, 148],
    [8, 29, 88],
];

/// Which backend evaluates cell circuits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// Monte Carlo shot sampling
    Sampler,
    /// Exhaustive enumeration of encoded inputs
    Exact,
}

/// Runtime knobs for a simulation run
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub shots: usize,
    pub workers: usize,
    /// Fixed run seed; `None` draws one from OS entropy
    pub seed: Option<u64>,
    /// Extra attempts for a failed cell before the turn is abandoned
    pub max_retries: u32,
    pub backend: BackendKind,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            workers: default_workers(),
            seed: None,
            max_retries: 0,
            backend: BackendKind::Sampler,
        }
    }
}

/// Leave one core for the main thread: max(1, available_parallelism - 1)
pub fn default_workers() -> usize {
    let available = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    available.saturating_sub(1).max(1)
}
