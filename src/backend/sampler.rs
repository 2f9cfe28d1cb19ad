use rand::{Rng, RngCore};

use crate::backend::Backend;
use crate::circuit::Circuit;
use crate::config::SAMPLER_CAPACITY;
use crate::error::{BackendError, ValidationError};

/// Result of one shot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotOutcome {
    Zero,
    One,
}

impl From<bool> for ShotOutcome {
    fn from(bit: bool) -> Self {
        if bit {
            ShotOutcome::One
        } else {
            ShotOutcome::Zero
        }
    }
}

/// Monte Carlo backend: every shot re-samples each encoded signal and
/// records the measured bit.
#[derive(Clone, Copy, Debug)]
pub struct ShotSampler {
    shots: usize,
}

impl ShotSampler {
    pub fn new(shots: usize) -> Result<Self, ValidationError> {
        if shots == 0 {
            return Err(ValidationError::ZeroShots);
        }
        Ok(Self { shots })
    }

    /// Run `circuit` for every shot
    pub fn run(
        &self,
        circuit: &Circuit,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ShotOutcome>, BackendError> {
        let measured = circuit.validate(SAMPLER_CAPACITY)?;
        Ok((0..self.shots)
            .map(|_| {
                ShotOutcome::from(
                    circuit.execute(measured, |_, encoding| rng.gen_bool(encoding.probability())),
                )
            })
            .collect())
    }
}

impl Backend for ShotSampler {
    fn name(&self) -> &'static str {
        "sampler"
    }

    fn alive_probability(
        &self,
        circuit: &Circuit,
        rng: &mut dyn RngCore,
    ) -> Result<f64, BackendError> {
        let outcomes = self.run(circuit, rng)?;
        let ones = outcomes.iter().filter(|&&o| o == ShotOutcome::One).count();
        Ok(ones as f64 / self.shots as f64)
    }
}
