// src/sim/mod.rs

//! Page-load simulation.
//!
//! - [`connection`] models a single TCP/TLS connection: handshakes,
//!   slow-start window growth and deadline-bounded transfer time.
//! - [`scheduler`] steps the dependency graph through the discrete-event
//!   loop and produces the total elapsed time plus a per-node timeline.
//! - [`node_progress`] holds in-flight bookkeeping and the public
//!   [`NodeTiming`] view.

pub mod connection;
pub mod node_progress;
pub mod scheduler;

pub use connection::{Connection, DownloadTiming, INITIAL_CONGESTION_WINDOW, TCP_SEGMENT_SIZE};
pub use node_progress::NodeTiming;
pub use scheduler::{LoadSimulator, SimulationResult, MAX_SIMULATION_ITERATIONS};
