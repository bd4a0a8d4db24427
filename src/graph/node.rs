// src/graph/node.rs

//! Node payload types for the request dependency graph.

/// What a graph node represents.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A network request, with the record captured for it.
    Network(NetworkRecord),
    /// A main-thread CPU task, with its recorded duration.
    Cpu(CpuTask),
}

impl NodeKind {
    pub fn is_network(&self) -> bool {
        matches!(self, NodeKind::Network(_))
    }

    pub fn as_network(&self) -> Option<&NetworkRecord> {
        match self {
            NodeKind::Network(record) => Some(record),
            NodeKind::Cpu(_) => None,
        }
    }
}

/// Captured attributes of one network request.
///
/// Two distinct nodes may describe the same URL; identity is the node id,
/// not the record contents.
#[derive(Debug, Clone)]
pub struct NetworkRecord {
    /// Opaque identifier of the reusable transport this request rode on.
    /// Requests sharing an id share (and serialise on) one connection.
    pub connection_id: String,

    /// Wire size of the response in bytes, headers included.
    pub transfer_size: f64,

    /// Whether the URL scheme implies TLS.
    pub secure: bool,

    /// Server response time in milliseconds (`receiveHeadersEnd - sendEnd`),
    /// if the capture produced a finite value. `None` falls back to the
    /// configured default at connection construction.
    pub response_time_ms: Option<f64>,
}

/// A recorded main-thread task.
#[derive(Debug, Clone)]
pub struct CpuTask {
    /// Recorded task duration in milliseconds.
    pub duration_ms: f64,
}
