#![allow(dead_code)]

use loadcast::config::{RawSimulationOptions, SimulationOptions};
use loadcast::graph::{CpuTask, NetworkRecord, NodeId, NodeKind, PageGraph};

/// Builder for `NetworkRecord` to simplify test setup.
pub struct RecordBuilder {
    record: NetworkRecord,
}

impl RecordBuilder {
    pub fn new(connection_id: &str, transfer_size: f64) -> Self {
        Self {
            record: NetworkRecord {
                connection_id: connection_id.to_string(),
                transfer_size,
                secure: false,
                response_time_ms: None,
            },
        }
    }

    pub fn secure(mut self, val: bool) -> Self {
        self.record.secure = val;
        self
    }

    pub fn response_time_ms(mut self, ms: f64) -> Self {
        self.record.response_time_ms = Some(ms);
        self
    }

    pub fn build(self) -> NetworkRecord {
        self.record
    }
}

/// Builder for `PageGraph`.
///
/// Node-adding methods return the new node's id so edges can be wired with
/// [`GraphBuilder::after`]; the first node added becomes the root.
pub struct GraphBuilder {
    graph: PageGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: PageGraph::new(),
        }
    }

    pub fn network(&mut self, record: NetworkRecord) -> NodeId {
        self.graph.add_node(NodeKind::Network(record))
    }

    pub fn cpu(&mut self, duration_ms: f64) -> NodeId {
        self.graph.add_node(NodeKind::Cpu(CpuTask { duration_ms }))
    }

    /// `dependent` runs only after `dependency` has completed.
    pub fn after(&mut self, dependency: NodeId, dependent: NodeId) -> &mut Self {
        self.graph.add_dependency(dependency, dependent);
        self
    }

    pub fn build(self) -> PageGraph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `SimulationOptions`.
pub struct OptionsBuilder {
    raw: RawSimulationOptions,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawSimulationOptions::default(),
        }
    }

    pub fn rtt_ms(mut self, val: f64) -> Self {
        self.raw.rtt_ms = val;
        self
    }

    pub fn throughput_bps(mut self, val: f64) -> Self {
        self.raw.throughput_bps = val;
        self
    }

    pub fn default_response_time_ms(mut self, val: f64) -> Self {
        self.raw.default_response_time_ms = val;
        self
    }

    pub fn maximum_concurrent_requests(mut self, val: usize) -> Self {
        self.raw.maximum_concurrent_requests = val;
        self
    }

    pub fn build(self) -> SimulationOptions {
        SimulationOptions::try_from(self.raw).expect("Failed to build valid options from builder")
    }
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
