//! Metrics for the faucet client.

use anyhow::Result;
use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_histogram, register_int_counter_vec, Counter, Histogram,
    HistogramOpts, IntCounterVec, Opts,
};
use std::net::SocketAddr;
use tracing::{info, warn};
use warp::Filter;

lazy_static! {
    /// Counter for faucet dispatches, by outcome.
    pub static ref DISPATCH_COUNTER: IntCounterVec = register_int_counter_vec!(
        Opts::new(
            "faucet_dispatch_total",
            "Total number of faucet dispatches by outcome"
        ),
        &["outcome"]
    )
    .unwrap();

    /// Counter for balance reads that fell back to zero, by asset.
    pub static ref READ_FAILURE_COUNTER: IntCounterVec = register_int_counter_vec!(
        Opts::new(
            "faucet_balance_read_failures_total",
            "Total number of balance reads that failed"
        ),
        &["asset"]
    )
    .unwrap();

    /// Counter for published balance snapshots.
    pub static ref SNAPSHOT_COUNTER: Counter = register_counter!(
        Opts::new(
            "faucet_balance_snapshots_total",
            "Total number of balance snapshots published"
        )
    )
    .unwrap();

    /// Histogram for the time from submission to confirmation.
    pub static ref DISPATCH_TIME: Histogram = register_histogram!(
        HistogramOpts::new(
            "faucet_dispatch_time_seconds",
            "Time to submit and confirm a faucet transaction"
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0])
    )
    .unwrap();
}

/// Renders all registered metrics in the text exposition format.
pub fn render() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Starts the metrics server.
pub async fn start_metrics_server(addr: SocketAddr) -> Result<()> {
    let metrics_route = warp::path("metrics").map(render);

    info!("Serving metrics on http://{}/metrics", addr);
    tokio::spawn(async move {
        warp::serve(metrics_route).run(addr).await;
    });

    Ok(())
}
