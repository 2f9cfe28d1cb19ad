use crate::circuit::{CircuitBuilder, Control, Signal};

/// Controlled increment: when `control` is 1, `counter` (little-endian)
/// becomes counter + 1 mod 2^len, otherwise it is unchanged.
///
/// Ripple carry from the top bit down, so each bit flips only when every
/// lower bit was still 1 before this call.
pub fn increment(builder: &mut CircuitBuilder, control: Signal, counter: &[Signal]) {
    for bit in (0..counter.len()).rev() {
        let controls = std::iter::once(control)
            .chain(counter[..bit].iter().copied())
            .map(Control::on)
            .collect();
        builder.toggle(controls, counter[bit]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Circuit;

    /// Counter in signals 0..4, one control per entry in `pattern` after it.
    fn count_with(pattern: &[bool], start: u8, read_bit: usize) -> bool {
        let counter: Vec<Signal> = (0..4).map(Signal).collect();
        let mut builder = Circuit::builder(4 + pattern.len());
        for (bit, &signal) in counter.iter().enumerate() {
            if start >> bit & 1 == 1 {
                builder.toggle(vec![], signal);
            }
        }
        for (k, &alive) in pattern.iter().enumerate() {
            let control = Signal(4 + k);
            builder.encode(control, if alive { 1.0 } else { 0.0 });
            increment(&mut builder, control, &counter);
        }
        let circuit = builder.measure(counter[read_bit]).build();
        let measured = circuit.validate(64).unwrap();
        circuit.execute(measured, |_, e| e.probability() == 1.0)
    }

    fn read_counter(pattern: &[bool], start: u8) -> u8 {
        (0..4).fold(0, |acc, bit| acc | (count_with(pattern, start, bit) as u8) << bit)
    }

    #[test]
    fn test_counts_every_neighbor_pattern() {
        for mask in 0u16..256 {
            let pattern: Vec<bool> = (0..8).map(|k| mask >> k & 1 == 1).collect();
            assert_eq!(read_counter(&pattern, 0), mask.count_ones() as u8, "mask {:08b}", mask);
        }
    }

    #[test]
    fn test_zero_control_leaves_counter() {
        for start in 0..16 {
            assert_eq!(read_counter(&[false], start), start);
        }
    }

    #[test]
    fn test_wraps_modulo_sixteen() {
        for start in 0..16 {
            assert_eq!(read_counter(&[true], start), (start + 1) % 16);
        }
        assert_eq!(read_counter(&[true, true], 15), 1);
    }

    #[test]
    fn test_gate_shape() {
        let mut builder = Circuit::builder(5);
        let counter: Vec<Signal> = (1..5).map(Signal).collect();
        increment(&mut builder, Signal(0), &counter);
        let circuit = builder.measure(Signal(1)).build();
        let control_counts: Vec<usize> = circuit
            .gates()
            .iter()
            .map(|g| match g {
                crate::circuit::Gate::Toggle { controls, .. } => controls.len(),
                _ => 0,
            })
            .collect();
        assert_eq!(control_counts, vec![4, 3, 2, 1]);
    }
}
