// tests/simulation_concurrency.rs

use loadcast::config::SimulationOptions;
use loadcast::estimate;
use loadcast::graph::NodeId;
use loadcast_test_utils::builders::{GraphBuilder, OptionsBuilder, RecordBuilder};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn test_options() -> SimulationOptions {
    OptionsBuilder::new()
        .rtt_ms(100.0)
        .throughput_bps(1_638_400.0)
        .maximum_concurrent_requests(10)
        .build()
}

/// Root document plus `count` siblings, each on its own connection.
fn fan_out(count: usize, transfer_size: f64, response_ms: f64) -> (Vec<NodeId>, loadcast::graph::PageGraph) {
    let mut builder = GraphBuilder::new();
    let root = builder.network(
        RecordBuilder::new("conn-root", transfer_size)
            .response_time_ms(response_ms)
            .build(),
    );
    let mut children = Vec::new();
    for i in 0..count {
        let child = builder.network(
            RecordBuilder::new(&format!("conn-{i}"), transfer_size)
                .response_time_ms(response_ms)
                .build(),
        );
        builder.after(root, child);
        children.push(child);
    }
    (children, builder.build())
}

#[test]
fn twenty_siblings_run_in_two_batches_of_ten() {
    let (children, graph) = fan_out(20, 14_600.0, 30.0);
    let result = estimate(&graph, &test_options()).expect("simulation settles");

    // Ten children at a time share the link, so each gets a one-segment
    // window: 230 ms to first byte plus nine round trips for the rest.
    for child in &children[..10] {
        assert_close(result.timeline[child].start_ms, 230.0);
        assert_close(result.timeline[child].end_ms, 1_360.0);
    }
    // The second batch starts exactly when the first completes.
    for child in &children[10..] {
        assert_close(result.timeline[child].start_ms, 1_360.0);
        assert_close(result.timeline[child].end_ms, 2_490.0);
    }
    assert_close(result.total_elapsed_ms, 2_490.0);
}

#[test]
fn at_no_point_are_more_than_the_limit_in_flight() {
    let (children, graph) = fan_out(20, 14_600.0, 30.0);
    let result = estimate(&graph, &test_options()).expect("simulation settles");

    // Probe concurrency at every start instant.
    for probe in children.iter().map(|c| result.timeline[c].start_ms) {
        let in_flight = children
            .iter()
            .map(|c| result.timeline[c])
            .filter(|t| t.start_ms <= probe && probe < t.end_ms)
            .count();
        assert!(
            in_flight <= 10,
            "{in_flight} siblings in flight at t={probe}"
        );
    }
}

#[test]
fn siblings_on_one_connection_take_turns() {
    let mut builder = GraphBuilder::new();
    let shared = || {
        RecordBuilder::new("conn-shared", 14_600.0)
            .response_time_ms(30.0)
            .build()
    };
    let root = builder.network(
        RecordBuilder::new("conn-root", 14_600.0)
            .response_time_ms(30.0)
            .build(),
    );
    let first = builder.network(shared());
    let second = builder.network(shared());
    builder.after(root, first).after(root, second);
    let graph = builder.build();

    let result = estimate(&graph, &test_options()).expect("simulation settles");

    // The connection is exclusive: the second sibling waits, then rides the
    // connection its twin warmed up.
    let t_first = result.timeline[&first];
    let t_second = result.timeline[&second];
    assert!(t_first.end_ms <= t_second.start_ms);
    assert_close(t_first.start_ms, 230.0);
    assert_close(t_first.end_ms, 460.0);
    assert_close(t_second.start_ms, 460.0);
    assert_close(t_second.end_ms, 590.0);
    assert_close(result.total_elapsed_ms, 590.0);
}

#[test]
fn slow_links_clamp_concurrency_to_saturated_connections() {
    // 500 kbit/s at 100 ms rtt saturates at four connections, clamping the
    // configured limit of ten.
    let options = OptionsBuilder::new()
        .rtt_ms(100.0)
        .throughput_bps(500_000.0)
        .maximum_concurrent_requests(10)
        .build();

    let mut builder = GraphBuilder::new();
    let root = builder.network(
        RecordBuilder::new("conn-root", 1_460.0)
            .response_time_ms(0.0)
            .build(),
    );
    let mut children = Vec::new();
    for i in 0..8 {
        let child = builder.network(
            RecordBuilder::new(&format!("conn-{i}"), 1_460.0)
                .response_time_ms(0.0)
                .build(),
        );
        builder.after(root, child);
        children.push(child);
    }
    let graph = builder.build();

    let result = estimate(&graph, &options).expect("simulation settles");

    for child in &children[..4] {
        assert_close(result.timeline[child].start_ms, 200.0);
    }
    for child in &children[4..] {
        assert_close(result.timeline[child].start_ms, 400.0);
    }
    assert_close(result.total_elapsed_ms, 600.0);
}

#[test]
fn doubling_throughput_never_slows_the_load() {
    let double = OptionsBuilder::new()
        .rtt_ms(100.0)
        .throughput_bps(2.0 * 1_638_400.0)
        .maximum_concurrent_requests(10)
        .build();

    let (_, fan) = fan_out(20, 14_600.0, 30.0);
    let slow = estimate(&fan, &test_options()).expect("simulation settles");
    let fast = estimate(&fan, &double).expect("simulation settles");
    assert!(fast.total_elapsed_ms <= slow.total_elapsed_ms);

    let mut builder = GraphBuilder::new();
    let a = builder.network(RecordBuilder::new("conn-1", 10_000.0).response_time_ms(30.0).build());
    let b = builder.network(RecordBuilder::new("conn-1", 10_000.0).response_time_ms(30.0).build());
    builder.after(a, b);
    let chain = builder.build();

    let slow = estimate(&chain, &test_options()).expect("simulation settles");
    let fast = estimate(&chain, &double).expect("simulation settles");
    assert!(fast.total_elapsed_ms <= slow.total_elapsed_ms);
}
