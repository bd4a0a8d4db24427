// src/sim/connection.rs

//! TCP connection model.
//!
//! One [`Connection`] stands for one reusable transport: it knows its
//! round-trip time, the throughput currently granted to it, whether it has
//! already carried a transfer (warmed) and its congestion window. The
//! central operation, [`Connection::simulate_download`], answers "how long
//! does it take to move this many bytes", accounting for handshakes,
//! slow-start window growth capped by the bandwidth-delay product, and an
//! optional deadline that halts the transfer mid-window.
//!
//! Queries are pure: `simulate_download` never mutates the connection. The
//! scheduler decides whether to commit the returned congestion window via
//! [`Connection::set_congestion_window`], which lets it probe completion
//! times without disturbing state.

/// Initial TCP congestion window, in segments (RFC 6928).
pub const INITIAL_CONGESTION_WINDOW: f64 = 10.0;

/// TCP segment payload size in bytes.
pub const TCP_SEGMENT_SIZE: f64 = 1460.0;

/// Outcome of a transfer-time query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownloadTiming {
    /// Round trips consumed by this query. Handshake legs count on the
    /// first step of a transfer; continuation steps start from zero.
    pub round_trips: u32,

    /// Time charged by this query in milliseconds: residual time-to-first-
    /// byte plus download-phase time.
    pub time_elapsed_ms: f64,

    /// Bytes credited by this query, clamped to the requested amount.
    pub bytes_downloaded: f64,

    /// Congestion window after the query. The caller writes it back with
    /// [`Connection::set_congestion_window`] to carry slow-start state
    /// across partial steps.
    pub congestion_window: f64,
}

/// Model of one TCP (optionally TLS) connection.
#[derive(Debug, Clone)]
pub struct Connection {
    rtt_ms: f64,
    throughput_bps: f64,
    response_time_ms: f64,
    secure: bool,
    warmed: bool,
    congestion_window: f64,
}

impl Connection {
    pub fn new(rtt_ms: f64, throughput_bps: f64, response_time_ms: f64, secure: bool) -> Self {
        Self {
            rtt_ms,
            throughput_bps,
            response_time_ms,
            secure,
            warmed: false,
            congestion_window: INITIAL_CONGESTION_WINDOW,
        }
    }

    /// Number of connections that can each keep one segment in flight per
    /// round trip at `throughput_bps`. Below that per-connection share TCP
    /// cannot make forward progress, so the browser concurrency limit is
    /// clamped to this value.
    pub fn maximum_saturated_connections(rtt_ms: f64, throughput_bps: f64) -> usize {
        let bytes_per_second = (1000.0 / rtt_ms) * TCP_SEGMENT_SIZE;
        let minimum_throughput_per_request = bytes_per_second * 8.0;
        (throughput_bps / minimum_throughput_per_request).floor() as usize
    }

    /// Bandwidth-delay product expressed in whole segments, at the
    /// throughput currently granted to this connection. Recomputed on every
    /// query because the granted throughput changes as other requests
    /// complete.
    fn maximum_congestion_window(&self) -> f64 {
        let bytes_per_second = self.throughput_bps / 8.0;
        let seconds_per_round_trip = self.rtt_ms / 1000.0;
        let bytes_per_round_trip = bytes_per_second * seconds_per_round_trip;
        (bytes_per_round_trip / TCP_SEGMENT_SIZE).floor()
    }

    pub fn is_warmed(&self) -> bool {
        self.warmed
    }

    /// Mark the connection as having carried a completed transfer. Warmed
    /// connections skip the TCP and TLS handshakes. Monotonic in practice:
    /// the scheduler only ever sets this to `true`.
    pub fn set_warmed(&mut self, warmed: bool) {
        self.warmed = warmed;
    }

    pub fn set_throughput(&mut self, throughput_bps: f64) {
        self.throughput_bps = throughput_bps;
    }

    pub fn set_congestion_window(&mut self, congestion_window: f64) {
        self.congestion_window = congestion_window;
    }

    /// Time to move `bytes_to_download` over this connection.
    ///
    /// `time_already_elapsed_ms` is the time charged to this transfer in
    /// prior partial steps; once it covers the time-to-first-byte, the
    /// handshake cost drops out of continuation queries.
    /// `maximum_time_to_elapse_ms` is a deadline: the download phase stops
    /// as soon as it exceeds the deadline minus the residual first-byte
    /// time. Pass `f64::INFINITY` for a full-transfer estimate.
    ///
    /// Negative byte counts are caller bugs; zero bytes yields a pure
    /// first-byte-time result.
    pub fn simulate_download(
        &self,
        bytes_to_download: f64,
        time_already_elapsed_ms: f64,
        maximum_time_to_elapse_ms: f64,
    ) -> DownloadTiming {
        let two_way_latency = self.rtt_ms;
        let one_way_latency = two_way_latency / 2.0;
        let maximum_congestion_window = self.maximum_congestion_window();

        let handshake_and_request = if self.warmed {
            // Request only.
            one_way_latency
        } else {
            // SYN, SYN-ACK, ACK + request; one extra round trip for
            // ClientHello/ServerHello when TLS False Start is in play.
            one_way_latency * 3.0
                + if self.secure { two_way_latency } else { 0.0 }
        };

        let time_to_first_byte =
            handshake_and_request + self.response_time_ms + one_way_latency;
        let time_elapsed_for_ttfb = (time_to_first_byte - time_already_elapsed_ms).max(0.0);
        let maximum_download_time = maximum_time_to_elapse_ms - time_elapsed_for_ttfb;

        let mut congestion_window = self.congestion_window.min(maximum_congestion_window);

        let mut round_trips;
        let mut bytes_credited;
        if time_elapsed_for_ttfb > 0.0 {
            // First step of this transfer: the initial window rides on the
            // handshake completion.
            round_trips = (handshake_and_request / two_way_latency).ceil() as u32;
            bytes_credited = congestion_window * TCP_SEGMENT_SIZE;
        } else {
            round_trips = 0;
            bytes_credited = 0.0;
        }

        let mut download_time_elapsed = 0.0;
        let mut bytes_remaining = bytes_to_download - bytes_credited;
        while bytes_remaining > 0.0 && download_time_elapsed <= maximum_download_time {
            round_trips += 1;
            download_time_elapsed += two_way_latency;
            // Slow start doubles the window each round trip, capped by the
            // bandwidth-delay product; the floor of one segment covers
            // grants so small the product rounds to zero.
            congestion_window = (congestion_window * 2.0)
                .min(maximum_congestion_window)
                .max(1.0);
            let window_bytes = congestion_window * TCP_SEGMENT_SIZE;
            bytes_credited += window_bytes;
            bytes_remaining -= window_bytes;
        }

        DownloadTiming {
            round_trips,
            time_elapsed_ms: time_elapsed_for_ttfb + download_time_elapsed,
            bytes_downloaded: bytes_credited.min(bytes_to_download),
            congestion_window,
        }
    }
}
