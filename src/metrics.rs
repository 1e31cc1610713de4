//! Request Metrics
//!
//! Per-route request counters and latency histograms plus a few process
//! gauges, rendered in the Prometheus text exposition format at `/metrics`.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

/// Upper bounds (seconds) of the latency histogram buckets.
const LATENCY_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Route label used for requests that matched no route.
const UNMATCHED_ROUTE: &str = "unmatched";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RequestLabels {
    method: String,
    route: String,
    status: u16,
}

#[derive(Debug, Clone, Default)]
struct Histogram {
    buckets: [u64; LATENCY_BUCKETS.len()],
    count: u64,
    sum: f64,
}

impl Histogram {
    fn observe(&mut self, seconds: f64) {
        for (bound, bucket) in LATENCY_BUCKETS.iter().zip(self.buckets.iter_mut()) {
            if seconds <= *bound {
                *bucket += 1;
            }
        }
        self.count += 1;
        self.sum += seconds;
    }
}

// == Request Metrics ==
/// Collected request metrics shared by the middleware and `/metrics`.
#[derive(Debug)]
pub struct RequestMetrics {
    started: Instant,
    start_time_unix: f64,
    requests: Mutex<BTreeMap<RequestLabels, Histogram>>,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            start_time_unix: chrono::Utc::now().timestamp_millis() as f64 / 1000.0,
            requests: Mutex::new(BTreeMap::new()),
        }
    }

    /// Wall-clock seconds since the metrics (and the process) started.
    ///
    /// This is elapsed real time, not CPU time consumed by the process.
    pub fn uptime_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Records one finished request.
    pub fn record(&self, method: &str, route: &str, status: u16, seconds: f64) {
        let labels = RequestLabels {
            method: method.to_string(),
            route: route.to_string(),
            status,
        };
        // A poisoned lock only means another request panicked mid-update.
        let mut requests = self
            .requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        requests.entry(labels).or_default().observe(seconds);
    }

    /// Total requests recorded for a route, across methods and statuses.
    pub fn request_count(&self, route: &str) -> u64 {
        let requests = self
            .requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        requests
            .iter()
            .filter(|(labels, _)| labels.route == route)
            .map(|(_, histogram)| histogram.count)
            .sum()
    }

    // == Render ==
    /// Renders all metrics in Prometheus text format.
    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();

        write_header(
            &mut out,
            "process_start_time_seconds",
            "gauge",
            "Start time of the process since unix epoch in seconds.",
        );
        let _ = writeln!(out, "process_start_time_seconds {}", self.start_time_unix);

        write_header(
            &mut out,
            "process_uptime_seconds",
            "gauge",
            "Wall-clock seconds since the process started.",
        );
        let _ = writeln!(out, "process_uptime_seconds {}", self.uptime_seconds());

        let requests = self
            .requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        write_header(
            &mut out,
            "http_requests_total",
            "counter",
            "Total number of HTTP requests.",
        );
        for (labels, histogram) in &requests {
            let _ = writeln!(
                out,
                "http_requests_total{{{}}} {}",
                format_labels(labels),
                histogram.count
            );
        }

        write_header(
            &mut out,
            "http_request_duration_seconds",
            "histogram",
            "Duration of HTTP requests in seconds.",
        );
        for (labels, histogram) in &requests {
            let base = format_labels(labels);
            for (bound, bucket) in LATENCY_BUCKETS.iter().zip(histogram.buckets.iter()) {
                let _ = writeln!(
                    out,
                    "http_request_duration_seconds_bucket{{{},le=\"{}\"}} {}",
                    base, bound, bucket
                );
            }
            let _ = writeln!(
                out,
                "http_request_duration_seconds_bucket{{{},le=\"+Inf\"}} {}",
                base, histogram.count
            );
            let _ = writeln!(
                out,
                "http_request_duration_seconds_sum{{{}}} {}",
                base, histogram.sum
            );
            let _ = writeln!(
                out,
                "http_request_duration_seconds_count{{{}}} {}",
                base, histogram.count
            );
        }

        out
    }
}

impl Default for RequestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn write_header(out: &mut String, name: &str, kind: &str, help: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

fn format_labels(labels: &RequestLabels) -> String {
    format!(
        "method=\"{}\",route=\"{}\",status=\"{}\"",
        escape_label(&labels.method),
        escape_label(&labels.route),
        labels.status
    )
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

// == Middleware ==
/// Times every request and records it under its matched route template.
pub async fn track_metrics(
    State(metrics): State<Arc<RequestMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let response = next.run(request).await;

    metrics.record(
        &method,
        &route,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}
