// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::graph::NodeId;

#[derive(Error, Debug)]
pub enum LoadcastError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cycle detected in request graph: {0}")]
    GraphCycle(String),

    #[error("Node {0} is not a network request; only network nodes can occupy a connection")]
    UnsupportedNodeKind(NodeId),

    #[error("Simulation did not settle after {0} iterations; the graph likely contains a cycle or the network profile cannot make progress")]
    SimulationDivergence(usize),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LoadcastError>;
