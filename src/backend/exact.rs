use rand::RngCore;

use crate::backend::Backend;
use crate::circuit::Circuit;
use crate::config::{EXACT_MAX_ENCODINGS, SAMPLER_CAPACITY};
use crate::error::BackendError;

/// Computes the measured probability exactly by running the circuit once
/// for every assignment of its encoded signals and summing the weights of
/// the assignments that read 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactBackend;

impl ExactBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for ExactBackend {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn alive_probability(
        &self,
        circuit: &Circuit,
        _rng: &mut dyn RngCore,
    ) -> Result<f64, BackendError> {
        let measured = circuit.validate(SAMPLER_CAPACITY)?;
        let probabilities: Vec<f64> = circuit.encodings().map(|e| e.probability()).collect();
        if probabilities.len() > EXACT_MAX_ENCODINGS {
            return Err(BackendError::CapacityExceeded {
                signals: probabilities.len(),
                capacity: EXACT_MAX_ENCODINGS,
            });
        }

        let mut total = 0.0_f64;
        for assignment in 0u32..1 << probabilities.len() {
            let weight: f64 = probabilities
                .iter()
                .enumerate()
                .map(|(k, &p)| if assignment >> k & 1 == 1 { p } else { 1.0 - p })
                .product();
            if weight == 0.0 {
                continue;
            }
            if circuit.execute(measured, |k, _| assignment >> k & 1 == 1) {
                total += weight;
            }
        }
        Ok(total.clamp(0.0, 1.0))
    }
}
