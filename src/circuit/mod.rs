//! Circuit programs for one cell update.
//!
//! A circuit is a straight-line list of gates over numbered binary signals.
//! Every signal starts at 0. `Encode` places a signal in the state
//! √(1−p)|0⟩ + √p|1⟩; all other gates are multi-controlled toggles, which
//! only permute basis states. Measuring after a sequence of permutations is
//! the same as sampling the encoded signals first and running the toggles
//! on plain bits, so backends execute circuits on a bit vector.

mod builder;
mod increment;

pub use builder::{build_cell_circuit, cell_circuit, CellLayout};
pub use increment::increment;

use crate::error::BackendError;

/// Index of a binary signal within a circuit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signal(pub usize);

/// Self-inverse real amplitude transform for one probability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmplitudeEncoding {
    probability: f64,
}

impl AmplitudeEncoding {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Rows [√(1−p), √p] and [√p, −√(1−p)]
    pub fn matrix(&self) -> [[f64; 2]; 2] {
        let a = (1.0 - self.probability).sqrt();
        let b = self.probability.sqrt();
        [[a, b], [b, -a]]
    }

    /// Probability of reading 1 after applying the transform to |0⟩
    pub fn one_probability(&self) -> f64 {
        let amplitude = self.matrix()[1][0];
        amplitude * amplitude
    }
}

/// A required value on a control signal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Control {
    pub signal: Signal,
    pub value: bool,
}

impl Control {
    pub fn on(signal: Signal) -> Self {
        Self { signal, value: true }
    }

    pub fn off(signal: Signal) -> Self {
        Self { signal, value: false }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Gate {
    Encode {
        target: Signal,
        encoding: AmplitudeEncoding,
    },
    /// Flip `target` when every control holds its required value
    Toggle {
        controls: Vec<Control>,
        target: Signal,
    },
}

/// An immutable, re-runnable program with a single measured signal.
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    signals: usize,
    gates: Vec<Gate>,
    measured: Option<Signal>,
}

impl Circuit {
    pub fn builder(signals: usize) -> CircuitBuilder {
        CircuitBuilder {
            circuit: Circuit {
                signals,
                gates: Vec::new(),
                measured: None,
            },
        }
    }

    pub fn signals(&self) -> usize {
        self.signals
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn measured(&self) -> Option<Signal> {
        self.measured
    }

    /// Encode gates in program order
    pub fn encodings(&self) -> impl Iterator<Item = &AmplitudeEncoding> {
        self.gates.iter().filter_map(|gate| match gate {
            Gate::Encode { encoding, .. } => Some(encoding),
            Gate::Toggle { .. } => None,
        })
    }

    /// Check the circuit can run on a bit-vector backend with `capacity`
    /// signals, returning the measured signal.
    pub fn validate(&self, capacity: usize) -> Result<Signal, BackendError> {
        if self.signals > capacity {
            return Err(BackendError::CapacityExceeded {
                signals: self.signals,
                capacity,
            });
        }
        let in_range = |Signal(s): Signal| {
            if s < self.signals {
                Ok(())
            } else {
                Err(BackendError::Malformed(format!(
                    "signal {} out of range for {} signals",
                    s, self.signals
                )))
            }
        };

        let mut touched = vec![false; self.signals];
        for (index, gate) in self.gates.iter().enumerate() {
            match gate {
                Gate::Encode { target, encoding } => {
                    in_range(*target)?;
                    if touched[target.0] {
                        return Err(BackendError::Malformed(format!(
                            "gate {}: encoding onto signal {} which is no longer fresh",
                            index, target.0
                        )));
                    }
                    let p = encoding.probability();
                    if !(0.0..=1.0).contains(&p) {
                        return Err(BackendError::Malformed(format!(
                            "gate {}: probability {} outside [0, 1]",
                            index, p
                        )));
                    }
                    touched[target.0] = true;
                }
                Gate::Toggle { controls, target } => {
                    in_range(*target)?;
                    for control in controls {
                        in_range(control.signal)?;
                        if control.signal == *target {
                            return Err(BackendError::Malformed(format!(
                                "gate {}: signal {} controls itself",
                                index, target.0
                            )));
                        }
                    }
                    touched[target.0] = true;
                }
            }
        }

        let measured = self
            .measured
            .ok_or_else(|| BackendError::Malformed("no measured signal".to_string()))?;
        in_range(measured)?;
        Ok(measured)
    }

    /// Run the circuit once on plain bits. `sample(k, encoding)` supplies the
    /// value of the k-th encoded signal. Callers must have validated the
    /// circuit against a capacity of at most 64.
    pub fn execute<F>(&self, measured: Signal, mut sample: F) -> bool
    where
        F: FnMut(usize, &AmplitudeEncoding) -> bool,
    {
        let mut state: u64 = 0;
        let mut encoded = 0;
        for gate in &self.gates {
            match gate {
                Gate::Encode { target, encoding } => {
                    if sample(encoded, encoding) {
                        state |= 1 << target.0;
                    }
                    encoded += 1;
                }
                Gate::Toggle { controls, target } => {
                    let fires = controls
                        .iter()
                        .all(|c| (state >> c.signal.0 & 1 == 1) == c.value);
                    if fires {
                        state ^= 1 << target.0;
                    }
                }
            }
        }
        state >> measured.0 & 1 == 1
    }
}

/// Appends gates to a circuit under construction.
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    pub fn encode(&mut self, target: Signal, probability: f64) -> &mut Self {
        self.circuit.gates.push(Gate::Encode {
            target,
            encoding: AmplitudeEncoding::new(probability),
        });
        self
    }

    pub fn toggle(&mut self, controls: Vec<Control>, target: Signal) -> &mut Self {
        self.circuit.gates.push(Gate::Toggle { controls, target });
        self
    }

    /// Controlled NOT
    pub fn cx(&mut self, control: Signal, target: Signal) -> &mut Self {
        self.toggle(vec![Control::on(control)], target)
    }

    pub fn measure(&mut self, signal: Signal) -> &mut Self {
        self.circuit.measured = Some(signal);
        self
    }

    pub fn build(&mut self) -> Circuit {
        self.circuit.clone()
    }
}
