// src/sim/node_progress.rs

//! Per-node bookkeeping while a node is in flight, plus the public timeline
//! view returned to callers.

/// Internal in-flight state for one node (network or CPU).
///
/// Owned by the scheduler and discarded at completion; the node itself is
/// never mutated.
#[derive(Debug, Clone)]
pub(crate) struct NodeProgress {
    /// Simulation clock when the node was admitted.
    pub start_time_ms: f64,

    /// Transfer time committed to this node across prior partial steps.
    /// For CPU nodes this is the consumed share of the task duration.
    pub time_elapsed_ms: f64,

    /// Transfer time credited beyond the end of a prior step: a debt that
    /// must be repaid before new progress counts. Grows when window growth
    /// overshoots a step deadline (growth proceeds in whole round trips);
    /// never negative.
    pub time_elapsed_overshoot_ms: f64,

    /// Bytes committed across prior partial steps.
    pub bytes_downloaded: f64,

    /// Most recent full-completion estimate (overshoot included), used to
    /// recognise finishers once the clock has advanced by the step length.
    pub estimated_time_elapsed_ms: f64,
}

impl NodeProgress {
    pub fn started_at(clock_ms: f64) -> Self {
        Self {
            start_time_ms: clock_ms,
            time_elapsed_ms: 0.0,
            time_elapsed_overshoot_ms: 0.0,
            bytes_downloaded: 0.0,
            estimated_time_elapsed_ms: 0.0,
        }
    }
}

/// Start and end of one node on the simulation clock, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTiming {
    pub start_ms: f64,
    pub end_ms: f64,
}
