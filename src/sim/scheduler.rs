// src/sim/scheduler.rs

//! Discrete-event simulation of a page load.
//!
//! The loop steps the dependency graph through time: admit queued nodes
//! subject to the global and per-connection limits, split throughput across
//! in-flight requests, advance the clock to the next completion and commit
//! incremental progress to everything else. The per-transfer arithmetic
//! lives in [`Connection`]; this module owns all mutable state and drives
//! the two-phase query protocol (estimate without a deadline, advance with
//! one) that keeps whole-round-trip window growth consistent with
//! fractional step lengths.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::config::SimulationOptions;
use crate::errors::{LoadcastError, Result};
use crate::graph::{NetworkRecord, NodeId, NodeKind, PageGraph};
use crate::sim::connection::Connection;
use crate::sim::node_progress::{NodeProgress, NodeTiming};

/// Iteration backstop. A well-formed simulation completes at least one node
/// every few iterations, so reaching this many means a cycle in the graph or
/// a profile under which no request can be admitted.
pub const MAX_SIMULATION_ITERATIONS: usize = 10_000;

/// Result of a finished simulation.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Predicted total page-load time in milliseconds.
    pub total_elapsed_ms: f64,

    /// Start/end of every completed node, keyed by node id.
    pub timeline: BTreeMap<NodeId, NodeTiming>,
}

/// Discrete-event simulator for one graph + options pair.
///
/// The simulator borrows the graph and owns everything else: connections,
/// working sets and per-node progress. [`simulate`](Self::simulate) consumes
/// the simulator; re-estimating means constructing a fresh one (connections
/// live exactly as long as one simulation).
pub struct LoadSimulator<'a> {
    graph: &'a PageGraph,
    options: SimulationOptions,
    maximum_concurrent_requests: usize,

    connections: HashMap<String, Connection>,

    // Insertion-ordered working sets: the Vecs carry the deterministic
    // order, the companion set answers membership. Plain hash iteration
    // would make replays non-reproducible.
    ready: Vec<NodeId>,
    queued: HashSet<NodeId>,
    in_flight: Vec<NodeId>,
    cpu_in_flight: Option<NodeId>,
    completed: HashSet<NodeId>,
    connections_in_use: HashSet<String>,

    progress: HashMap<NodeId, NodeProgress>,
    timeline: BTreeMap<NodeId, NodeTiming>,
    clock_ms: f64,
}

impl<'a> LoadSimulator<'a> {
    pub fn new(graph: &'a PageGraph, options: SimulationOptions) -> Self {
        let connections = Self::build_connections(graph, &options);

        // Browser policy clamp, applied once at construction: even if
        // per-connection throughput is later rebalanced downward, the cap is
        // not recomputed.
        let saturated = Connection::maximum_saturated_connections(
            options.rtt_ms,
            options.throughput_bps,
        );
        let maximum_concurrent_requests = options.maximum_concurrent_requests.min(saturated);

        debug!(
            connections = connections.len(),
            maximum_concurrent_requests,
            rtt_ms = options.rtt_ms,
            throughput_bps = options.throughput_bps,
            "simulator initialised"
        );

        Self {
            graph,
            options,
            maximum_concurrent_requests,
            connections,
            ready: Vec::new(),
            queued: HashSet::new(),
            in_flight: Vec::new(),
            cpu_in_flight: None,
            completed: HashSet::new(),
            connections_in_use: HashSet::new(),
            progress: HashMap::new(),
            timeline: BTreeMap::new(),
            clock_ms: 0.0,
        }
    }

    /// One [`Connection`] per distinct connection id among reachable network
    /// nodes. Response time is the smallest finite value recorded on the
    /// group, falling back to the configured default; the secure flag
    /// follows the first record seen on the connection.
    fn build_connections(
        graph: &PageGraph,
        options: &SimulationOptions,
    ) -> HashMap<String, Connection> {
        let mut network_nodes: Vec<NodeId> = Vec::new();
        graph.traverse(|id, kind| {
            if kind.is_network() {
                network_nodes.push(id);
            }
        });

        // connection id -> (secure flag of first record, min finite response time)
        let mut groups: HashMap<String, (bool, Option<f64>)> = HashMap::new();
        for &id in &network_nodes {
            let record = match graph.kind(id).and_then(NodeKind::as_network) {
                Some(record) => record,
                None => continue,
            };
            let response = record.response_time_ms.filter(|ms| ms.is_finite());

            match groups.entry(record.connection_id.clone()) {
                std::collections::hash_map::Entry::Vacant(entry) => {
                    entry.insert((record.secure, response));
                }
                std::collections::hash_map::Entry::Occupied(mut entry) => {
                    let (_, existing) = entry.get_mut();
                    *existing = match (*existing, response) {
                        (Some(a), Some(b)) => Some(a.min(b)),
                        (Some(a), None) => Some(a),
                        (None, b) => b,
                    };
                }
            }
        }

        groups
            .into_iter()
            .map(|(connection_id, (secure, response))| {
                let response_time_ms =
                    response.unwrap_or(options.default_response_time_ms);
                let connection = Connection::new(
                    options.rtt_ms,
                    options.throughput_bps,
                    response_time_ms,
                    secure,
                );
                (connection_id, connection)
            })
            .collect()
    }

    /// Run the simulation to completion and return the elapsed time plus the
    /// per-node timeline.
    pub fn simulate(mut self) -> Result<SimulationResult> {
        let root = match self.graph.root() {
            Some(root) => root,
            None => {
                return Ok(SimulationResult {
                    total_elapsed_ms: 0.0,
                    timeline: BTreeMap::new(),
                })
            }
        };

        self.enqueue(root);

        let mut iterations = 0usize;
        while !self.ready.is_empty() || !self.in_flight.is_empty() || self.cpu_in_flight.is_some()
        {
            iterations += 1;
            if iterations > MAX_SIMULATION_ITERATIONS {
                return Err(LoadcastError::SimulationDivergence(MAX_SIMULATION_ITERATIONS));
            }

            self.admit_queued_nodes();
            self.rebalance_throughput()?;

            let step_ms = self.next_completion_delta()?;
            self.advance(step_ms)?;
        }

        debug!(
            total_elapsed_ms = self.clock_ms,
            nodes = self.timeline.len(),
            iterations,
            "simulation settled"
        );

        Ok(SimulationResult {
            total_elapsed_ms: self.clock_ms,
            timeline: self.timeline,
        })
    }

    /// Put a node on the ready queue the first time it is seen.
    fn enqueue(&mut self, node: NodeId) {
        if self.queued.insert(node) {
            self.ready.push(node);
        }
    }

    /// Whether every dependency of `node` has completed.
    fn is_node_ready(&self, node: NodeId) -> bool {
        self.graph
            .dependencies_of(node)
            .iter()
            .all(|dep| self.completed.contains(dep))
    }

    /// Try to start every queued node, keeping queue order for the ones
    /// that have to wait.
    fn admit_queued_nodes(&mut self) {
        // Decide per node while mutating the lanes; refused nodes go back in
        // their original order.
        let candidates: Vec<NodeId> = std::mem::take(&mut self.ready);
        for node in candidates {
            if !self.try_start_node(node) {
                self.ready.push(node);
            }
        }
    }

    /// Admission rules: a node must be fully ready; a network node also
    /// needs a free concurrency slot and an idle connection; a CPU node
    /// needs the single main-thread lane.
    fn try_start_node(&mut self, node: NodeId) -> bool {
        if !self.is_node_ready(node) {
            return false;
        }

        let graph = self.graph;
        let kind = match graph.kind(node) {
            Some(kind) => kind,
            None => return false,
        };

        match kind {
            NodeKind::Cpu(_) => {
                if self.cpu_in_flight.is_some() {
                    return false;
                }
                self.cpu_in_flight = Some(node);
                self.progress
                    .insert(node, NodeProgress::started_at(self.clock_ms));
                true
            }
            NodeKind::Network(record) => {
                if self.in_flight.len() >= self.maximum_concurrent_requests {
                    return false;
                }
                if self.connections_in_use.contains(&record.connection_id) {
                    return false;
                }
                self.connections_in_use.insert(record.connection_id.clone());
                self.in_flight.push(node);
                self.progress
                    .insert(node, NodeProgress::started_at(self.clock_ms));
                true
            }
        }
    }

    /// Equal-share throughput split across in-flight network requests. CPU
    /// nodes never share throughput.
    fn rebalance_throughput(&mut self) -> Result<()> {
        if self.in_flight.is_empty() {
            return Ok(());
        }

        let graph = self.graph;
        let share = self.options.throughput_bps / self.in_flight.len() as f64;
        for &node in &self.in_flight {
            let record = Self::network_record(graph, node)?;
            if let Some(connection) = self.connections.get_mut(&record.connection_id) {
                connection.set_throughput(share);
            }
        }
        Ok(())
    }

    /// Query every in-flight node for its full-completion time, store each
    /// node's estimate for finisher detection, and return the smallest.
    ///
    /// The estimate query carries no deadline and does not commit window
    /// state; the matching deadline query in [`advance`](Self::advance) must
    /// reuse the exact same arithmetic path so that the finisher comparison
    /// is an equality between identically-produced floats.
    fn next_completion_delta(&mut self) -> Result<f64> {
        let graph = self.graph;
        let mut minimum = f64::INFINITY;

        for &node in &self.in_flight {
            let record = Self::network_record(graph, node)?;
            let connection = match self.connections.get(&record.connection_id) {
                Some(connection) => connection,
                None => continue,
            };
            let state = match self.progress.get_mut(&node) {
                Some(state) => state,
                None => continue,
            };

            let timing = connection.simulate_download(
                record.transfer_size - state.bytes_downloaded,
                state.time_elapsed_ms,
                f64::INFINITY,
            );
            let estimate = timing.time_elapsed_ms + state.time_elapsed_overshoot_ms;
            state.estimated_time_elapsed_ms = estimate;
            minimum = minimum.min(estimate);
        }

        if let Some(node) = self.cpu_in_flight {
            if let (Some(NodeKind::Cpu(task)), Some(state)) =
                (graph.kind(node), self.progress.get_mut(&node))
            {
                let estimate = task.duration_ms - state.time_elapsed_ms;
                state.estimated_time_elapsed_ms = estimate;
                minimum = minimum.min(estimate);
            }
        }

        // Nothing in flight (every queued node refused admission): a zero
        // step keeps the clock still and lets the iteration guard catch the
        // livelock.
        Ok(if minimum.is_finite() { minimum } else { 0.0 })
    }

    /// Move the clock forward by `step_ms`, committing partial progress to
    /// every in-flight node and completing those whose stored estimate
    /// matches the step exactly.
    fn advance(&mut self, step_ms: f64) -> Result<()> {
        self.clock_ms += step_ms;

        let graph = self.graph;
        let in_flight = std::mem::take(&mut self.in_flight);
        let mut finished: Vec<NodeId> = Vec::new();

        for node in in_flight {
            let record = Self::network_record(graph, node)?;
            let state = match self.progress.get_mut(&node) {
                Some(state) => state,
                None => continue,
            };
            let connection = match self.connections.get_mut(&record.connection_id) {
                Some(connection) => connection,
                None => continue,
            };

            // Second query of the step: bounded by the step length, less
            // any transfer time already credited past a prior step's end.
            let deadline_ms = step_ms - state.time_elapsed_overshoot_ms;
            let timing = connection.simulate_download(
                record.transfer_size - state.bytes_downloaded,
                state.time_elapsed_ms,
                deadline_ms,
            );
            connection.set_congestion_window(timing.congestion_window);

            if state.estimated_time_elapsed_ms == step_ms {
                connection.set_warmed(true);
                self.connections_in_use.remove(&record.connection_id);
                finished.push(node);
            } else {
                state.time_elapsed_ms += timing.time_elapsed_ms;
                state.time_elapsed_overshoot_ms += timing.time_elapsed_ms - step_ms;
                state.bytes_downloaded += timing.bytes_downloaded;
                debug_assert!(
                    state.time_elapsed_overshoot_ms >= 0.0,
                    "overshoot must never go negative"
                );
                self.in_flight.push(node);
            }
        }

        if let Some(node) = self.cpu_in_flight {
            if let Some(state) = self.progress.get_mut(&node) {
                if state.estimated_time_elapsed_ms == step_ms {
                    self.cpu_in_flight = None;
                    finished.push(node);
                } else {
                    state.time_elapsed_ms += step_ms;
                }
            }
        }

        for node in finished {
            self.complete_node(node);
        }

        Ok(())
    }

    /// Record completion and queue the node's dependents. Admission
    /// re-checks full readiness, so a dependent with other outstanding
    /// dependencies just waits in the queue.
    fn complete_node(&mut self, node: NodeId) {
        self.completed.insert(node);
        if let Some(state) = self.progress.remove(&node) {
            self.timeline.insert(
                node,
                NodeTiming {
                    start_ms: state.start_time_ms,
                    end_ms: self.clock_ms,
                },
            );
        }

        let dependents: Vec<NodeId> = self.graph.dependents_of(node).to_vec();
        for dependent in dependents {
            if !self.completed.contains(&dependent) {
                self.enqueue(dependent);
            }
        }
    }

    /// The network record behind an in-flight node. Only network nodes take
    /// the connection path; anything else here is a programming error.
    fn network_record(graph: &'a PageGraph, node: NodeId) -> Result<&'a NetworkRecord> {
        match graph.kind(node) {
            Some(NodeKind::Network(record)) => Ok(record),
            _ => Err(LoadcastError::UnsupportedNodeKind(node)),
        }
    }
}
