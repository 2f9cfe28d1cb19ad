//! Grid input and history files.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nom::character::complete::space1;
use nom::combinator::all_consuming;
use nom::multi::separated_list1;
use nom::number::complete::double;
use nom::{IResult, Parser};

use crate::error::{QgolError, Result, ValidationError};
use crate::simulation::{History, ProbabilityGrid};

fn read_row(input: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(separated_list1(space1, double)).parse(input)
}

/// Parse one row of whitespace-separated probabilities per line.
/// Blank lines are skipped.
pub fn parse_grid(input: &str) -> Result<ProbabilityGrid, ValidationError> {
    let mut rows = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (_, row) = read_row(line).map_err(|err| {
            let near = match err {
                nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
                nom::Err::Incomplete(_) => "",
            };
            ValidationError::Parse {
                line: index + 1,
                message: format!("expected whitespace-separated numbers, stopped at {:?}", near),
            }
        })?;
        rows.push(row);
    }
    ProbabilityGrid::from_rows(rows)
}

pub fn load_grid(path: &Path) -> Result<ProbabilityGrid> {
    let text = fs::read_to_string(path).map_err(|e| QgolError::io(path, e))?;
    let grid = parse_grid(&text)?;
    log::info!(
        "Loaded {}x{} grid from {}",
        grid.rows(),
        grid.cols(),
        path.display()
    );
    Ok(grid)
}

/// Write the history as a pretty-printed JSON array of matrices.
pub fn write_history(path: &Path, history: &History) -> Result<()> {
    let file = File::create(path).map_err(|e| QgolError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, history)?;
    writer.flush().map_err(|e| QgolError::io(path, e))?;
    log::info!("Wrote {} generations to {}", history.len(), path.display());
    Ok(())
}

pub fn read_history(path: &Path) -> Result<History> {
    let file = File::open(path).map_err(|e| QgolError::io(path, e))?;
    let history = serde_json::from_reader(BufReader::new(file))?;
    Ok(history)
}
