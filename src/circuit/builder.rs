use crate::circuit::{increment, Circuit, Control, Signal};
use crate::config::{CELL_SIGNALS, COUNTER_BITS, NEIGHBOR_COUNT};
use crate::error::ValidationError;
use crate::simulation::{CellJob, TransitionRule};

/// Signal assignment for a cell circuit
pub struct CellLayout;

impl CellLayout {
    pub const OUTPUT: Signal = Signal(0);
    pub const CURRENT: Signal = Signal(1);

    /// Counter bits, least significant first
    pub fn counter() -> [Signal; COUNTER_BITS] {
        std::array::from_fn(|bit| Signal(2 + bit))
    }

    pub fn neighbor(k: usize) -> Signal {
        debug_assert!(k < NEIGHBOR_COUNT);
        Signal(2 + COUNTER_BITS + k)
    }
}

/// Build the circuit for one cell from raw probabilities.
pub fn build_cell_circuit(
    current: f64,
    neighbors: &[f64],
    rule: &dyn TransitionRule,
) -> Result<Circuit, ValidationError> {
    let job = CellJob::new(current, neighbors)?;
    Ok(cell_circuit(&job, rule))
}

/// Output reads 1 exactly when `rule` says the cell is alive next turn,
/// given independently encoded cell and neighbor states.
pub fn cell_circuit(job: &CellJob, rule: &dyn TransitionRule) -> Circuit {
    let counter = CellLayout::counter();
    let mut builder = Circuit::builder(CELL_SIGNALS);

    builder
        .encode(CellLayout::CURRENT, job.current)
        .cx(CellLayout::CURRENT, CellLayout::OUTPUT);

    for (k, &p) in job.neighbors.iter().enumerate() {
        let neighbor = CellLayout::neighbor(k);
        builder.encode(neighbor, p);
        increment(&mut builder, neighbor, &counter);
    }

    for toggle in rule.toggles() {
        let mut controls: Vec<Control> = counter
            .iter()
            .enumerate()
            .map(|(bit, &signal)| Control {
                signal,
                value: toggle.count >> bit & 1 == 1,
            })
            .collect();
        if let Some(alive) = toggle.current {
            controls.insert(
                0,
                Control {
                    signal: CellLayout::CURRENT,
                    value: alive,
                },
            );
        }
        builder.toggle(controls, CellLayout::OUTPUT);
    }

    // cancel the baseline copy so only the rule result remains
    builder
        .cx(CellLayout::CURRENT, CellLayout::OUTPUT)
        .measure(CellLayout::OUTPUT)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Gate;
    use crate::simulation::ConwayRule;

    fn run_certain(current: bool, alive_neighbors: &[usize]) -> bool {
        let mut neighbors = [0.0; 8];
        for &k in alive_neighbors {
            neighbors[k] = 1.0;
        }
        let circuit =
            build_cell_circuit(if current { 1.0 } else { 0.0 }, &neighbors, &ConwayRule).unwrap();
        let measured = circuit.validate(64).unwrap();
        circuit.execute(measured, |_, e| e.probability() == 1.0)
    }

    #[test]
    fn test_certain_inputs_follow_conway() {
        for mask in 0u16..256 {
            let alive: Vec<usize> = (0..8).filter(|k| mask >> k & 1 == 1).collect();
            let count = alive.len();
            assert_eq!(run_certain(false, &alive), count == 3, "dead, mask {:08b}", mask);
            assert_eq!(
                run_certain(true, &alive),
                count == 2 || count == 3,
                "alive, mask {:08b}",
                mask
            );
        }
    }

    #[test]
    fn test_circuit_structure() {
        let circuit = build_cell_circuit(0.5, &[0.5; 8], &ConwayRule).unwrap();
        assert_eq!(circuit.signals(), 14);
        assert_eq!(circuit.measured(), Some(CellLayout::OUTPUT));
        assert_eq!(circuit.encodings().count(), 9);
        // encode + copy, 8 x (encode + 4 increment toggles), 2 rule toggles, cancel
        assert_eq!(circuit.gates().len(), 2 + 8 * 5 + 2 + 1);

        let first = &circuit.gates()[1];
        let last = circuit.gates().last().unwrap();
        assert_eq!(first, last);
        assert!(matches!(
            last,
            Gate::Toggle { controls, target } if controls.len() == 1 && *target == CellLayout::OUTPUT
        ));
    }

    #[test]
    fn test_rule_toggle_controls() {
        let circuit = build_cell_circuit(0.5, &[0.5; 8], &ConwayRule).unwrap();
        let gates = circuit.gates();
        let survival = &gates[gates.len() - 3];
        let birth = &gates[gates.len() - 2];

        let counter = CellLayout::counter();
        let expected_survival = vec![
            Control::on(CellLayout::CURRENT),
            Control::off(counter[0]),
            Control::on(counter[1]),
            Control::off(counter[2]),
            Control::off(counter[3]),
        ];
        let expected_birth = vec![
            Control::on(counter[0]),
            Control::on(counter[1]),
            Control::off(counter[2]),
            Control::off(counter[3]),
        ];
        assert_eq!(
            survival,
            &Gate::Toggle { controls: expected_survival, target: CellLayout::OUTPUT }
        );
        assert_eq!(
            birth,
            &Gate::Toggle { controls: expected_birth, target: CellLayout::OUTPUT }
        );
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert_eq!(
            build_cell_circuit(0.5, &[0.5; 9], &ConwayRule).unwrap_err(),
            ValidationError::NeighborCount(9)
        );
        assert!(build_cell_circuit(f64::NAN, &[0.5; 8], &ConwayRule).is_err());
    }

    #[test]
    fn test_rebuild_is_identical() {
        let a = build_cell_circuit(0.3, &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8], &ConwayRule);
        let b = build_cell_circuit(0.3, &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8], &ConwayRule);
        assert_eq!(a.unwrap(), b.unwrap());
    }
}
