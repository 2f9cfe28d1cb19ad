use std::path::Path;
use std::time::Instant;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::simulation::UpdateEngine;
use crate::{io, render};

/// Load the initial grid, simulate `turns` generations and write the history.
pub fn simulate(input: &Path, output: &Path, turns: usize, config: &SimulationConfig) -> Result<()> {
    let grid = io::load_grid(input)?;
    let engine = UpdateEngine::new(config)?;
    log::info!(
        "Backend: {}, shots: {}, workers: {}, seed: {}",
        engine.backend_name(),
        config.shots,
        engine.workers(),
        engine.seed()
    );

    let started = Instant::now();
    let history = engine.run(grid, turns)?;
    log::info!("Simulation finished in {:.2?}", started.elapsed());

    io::write_history(output, &history)
}

/// Turn a history file into an animated GIF.
pub fn render(history_path: &Path, output: &Path) -> Result<()> {
    let history = io::read_history(history_path)?;
    log::info!(
        "Rendering {} generations of {}x{}",
        history.len(),
        history.initial().rows(),
        history.initial().cols()
    );
    render::export_gif(&history, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QgolError;
    use std::fs;
    use tempfile::tempdir;

    fn seeded() -> SimulationConfig {
        SimulationConfig {
            workers: 2,
            seed: Some(2024),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_simulate_then_render() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("glider.txt");
        let history_path = dir.path().join("history.json");
        let gif = dir.path().join("history.gif");
        let mut text = String::from("0 1 0 0 0 0 0 0\n0 0 1 0 0 0 0 0\n1 1 1 0 0 0 0 0\n");
        text.push_str(&"0 0 0 0 0 0 0 0\n".repeat(5));
        fs::write(&input, text).unwrap();

        simulate(&input, &history_path, 4, &seeded()).unwrap();
        let history = io::read_history(&history_path).unwrap();
        assert_eq!(history.len(), 5);
        assert_eq!(history.initial(), &io::load_grid(&input).unwrap());
        // a glider on a torus keeps exactly five live cells
        for grid in &history {
            assert_eq!(grid.cells().iter().sum::<f64>(), 5.0);
        }

        render(&history_path, &gif).unwrap();
        assert!(fs::metadata(&gif).unwrap().len() > 0);
    }

    #[test]
    fn test_invalid_input_stops_before_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.txt");
        let output = dir.path().join("history.json");
        fs::write(&input, "0.5 0.5\n0.5 1.5\n").unwrap();

        let err = simulate(&input, &output, 3, &seeded()).unwrap_err();
        assert!(matches!(err, QgolError::Validation(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_zero_shots_rejected() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("grid.txt");
        let output = dir.path().join("history.json");
        fs::write(&input, "0.5 0.5\n").unwrap();

        let config = SimulationConfig {
            shots: 0,
            ..seeded()
        };
        let err = simulate(&input, &output, 1, &config).unwrap_err();
        assert!(matches!(err, QgolError::Validation(_)));
    }
}
