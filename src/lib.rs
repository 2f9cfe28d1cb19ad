//! Probabilistic Game of Life.
//!
//! Each cell holds the probability that it is alive. A generation is computed
//! by building a small circuit per cell that encodes the cell and its eight
//! toroidal neighbors, counts live neighbors and applies the life rule to an
//! output signal, then estimating the output's probability by sampling shots.

pub mod app;
pub mod backend;
pub mod circuit;
pub mod config;
pub mod error;
pub mod io;
pub mod render;
pub mod simulation;
