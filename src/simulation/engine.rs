use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::backend::{self, Backend};
use crate::circuit::cell_circuit;
use crate::config::SimulationConfig;
use crate::error::{BackendError, QgolError, Result};
use crate::simulation::{CellJob, ConwayRule, History, ProbabilityGrid, TransitionRule};

/// Advances probability grids one generation at a time.
///
/// Every cell of a generation is evaluated independently on the engine's
/// worker pool, reading only the previous grid, and the next grid is built
/// only once all of them have finished.
pub struct UpdateEngine {
    backend: Box<dyn Backend>,
    rule: Box<dyn TransitionRule>,
    pool: ThreadPool,
    seed: u64,
    max_retries: u32,
    /// Generations computed so far, folded into every cell seed
    generation: AtomicU64,
}

impl UpdateEngine {
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        let backend = backend::from_config(config)?;
        Self::with_backend(backend, config)
    }

    pub fn with_backend(backend: Box<dyn Backend>, config: &SimulationConfig) -> Result<Self> {
        let workers = config.workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("qgol-worker-{}", i))
            .build()?;
        let seed = config.seed.unwrap_or_else(rand::random);

        log::debug!(
            "Engine ready: backend={} workers={} seed={} retries={}",
            backend.name(),
            workers,
            seed,
            config.max_retries
        );

        Ok(Self {
            backend,
            rule: Box::new(ConwayRule),
            pool,
            seed,
            max_retries: config.max_retries,
            generation: AtomicU64::new(0),
        })
    }

    /// Swap the transition rule (Conway by default)
    pub fn with_rule(mut self, rule: impl TransitionRule + 'static) -> Self {
        self.rule = Box::new(rule);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Threads in the worker pool
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Compute the generation after `grid`.
    ///
    /// Fails as a whole if any cell fails; no partial grid is returned.
    pub fn next(&self, grid: &ProbabilityGrid) -> Result<ProbabilityGrid> {
        self.advance(grid, 1)
    }

    /// Apply `next` `turns` times, returning every generation including the
    /// initial grid.
    pub fn run(&self, initial: ProbabilityGrid, turns: usize) -> Result<History> {
        log::info!(
            "Simulating {} turns on a {}x{} grid ({} backend)",
            turns,
            initial.rows(),
            initial.cols(),
            self.backend.name()
        );

        let mut history = History::new(initial);
        for turn in 1..=turns {
            let started = Instant::now();
            let grid = self.advance(history.latest(), turn)?;
            log::info!(
                "Turn {}/{}: {:.2?}, mean alive-probability {:.4}",
                turn,
                turns,
                started.elapsed(),
                grid.mean()
            );
            history.push(grid);
        }
        Ok(history)
    }

    /// One generation; `turn` is only used to label failures.
    fn advance(&self, grid: &ProbabilityGrid, turn: usize) -> Result<ProbabilityGrid> {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let cells = self.pool.install(|| {
            (0..grid.len())
                .into_par_iter()
                .map(|index| self.evaluate_cell(grid, index, generation, turn))
                .collect::<Result<Vec<f64>>>()
        })?;
        Ok(ProbabilityGrid::from_cells(grid.rows(), grid.cols(), cells))
    }

    fn evaluate_cell(
        &self,
        grid: &ProbabilityGrid,
        index: usize,
        generation: u64,
        turn: usize,
    ) -> Result<f64> {
        let position = grid.position(index);
        let job = CellJob::from_grid(grid, position);
        let circuit = cell_circuit(&job, self.rule.as_ref());

        let mut attempt = 0;
        loop {
            let mut rng = StdRng::seed_from_u64(cell_seed(self.seed, generation, index, attempt));
            let outcome = self
                .backend
                .alive_probability(&circuit, &mut rng)
                .and_then(|p| {
                    if (0.0..=1.0).contains(&p) {
                        Ok(p)
                    } else {
                        Err(BackendError::Malformed(format!(
                            "{} backend returned probability {}",
                            self.backend.name(),
                            p
                        )))
                    }
                });
            match outcome {
                Ok(p) => return Ok(p),
                Err(err) if attempt < self.max_retries => {
                    log::warn!(
                        "Cell {:?} failed on attempt {}, retrying: {}",
                        position,
                        attempt + 1,
                        err
                    );
                    attempt += 1;
                }
                Err(err) => {
                    return Err(QgolError::CellFailed {
                        turn,
                        row: position.0,
                        col: position.1,
                        source: err,
                    })
                }
            }
        }
    }
}

/// Independent stream per (run, generation, cell, attempt), so seeded runs
/// do not depend on how cells are scheduled across workers.
fn cell_seed(seed: u64, generation: u64, index: usize, attempt: u32) -> u64 {
    [generation, index as u64, attempt as u64]
        .into_iter()
        .fold(splitmix64(seed), |acc, word| splitmix64(acc ^ word))
}

fn splitmix64(input: u64) -> u64 {
    let mut z = input.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
