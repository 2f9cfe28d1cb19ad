mod exact;
mod sampler;

pub use exact::ExactBackend;
pub use sampler::{ShotOutcome, ShotSampler};

use rand::RngCore;

use crate::circuit::Circuit;
use crate::config::{BackendKind, SimulationConfig};
use crate::error::{BackendError, ValidationError};

/// Something that can turn a cell circuit into an alive-probability.
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Probability that the measured signal reads 1, in [0, 1]
    fn alive_probability(
        &self,
        circuit: &Circuit,
        rng: &mut dyn RngCore,
    ) -> Result<f64, BackendError>;
}

/// Pick the backend named by `config`
pub fn from_config(config: &SimulationConfig) -> Result<Box<dyn Backend>, ValidationError> {
    let backend: Box<dyn Backend> = match config.backend {
        BackendKind::Sampler => Box::new(ShotSampler::new(config.shots)?),
        BackendKind::Exact => Box::new(ExactBackend::new()),
    };
    Ok(backend)
}
