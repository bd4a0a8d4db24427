// src/lib.rs

pub mod config;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod sim;

use crate::config::SimulationOptions;
use crate::errors::Result;
use crate::graph::PageGraph;
use crate::sim::{LoadSimulator, SimulationResult};

/// Estimate the total load time of `graph` under `options`.
///
/// High-level entry point: wires the graph and options into a
/// [`LoadSimulator`], runs the simulation to completion and returns the
/// predicted elapsed milliseconds plus the per-node timeline. The
/// estimation is pure and deterministic: identical inputs produce
/// bit-identical outputs.
pub fn estimate(graph: &PageGraph, options: &SimulationOptions) -> Result<SimulationResult> {
    let simulator = LoadSimulator::new(graph, options.clone());
    simulator.simulate()
}
