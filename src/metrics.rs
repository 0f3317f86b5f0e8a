//! Latency histograms for the registration pipeline.

use prometheus::{Encoder, Histogram, HistogramOpts, Registry, TextEncoder};

pub const HASHING_HISTOGRAM: &str = "generate_hash_duration_seconds";
pub const PERSISTENCE_HISTOGRAM: &str = "save_user_duration_seconds";

// Argon2id with the deployment parameters lands between 50 and 150 ms.
const HASHING_BUCKETS: [f64; 11] = [
    0.05, 0.06, 0.07, 0.08, 0.09, 0.1, 0.11, 0.12, 0.13, 0.14, 0.15,
];
const PERSISTENCE_BUCKETS: [f64; 10] = [0.01, 0.02, 0.03, 0.04, 0.05, 0.06, 0.07, 0.08, 0.09, 0.1];

/// Sink for stage durations, injected into the pipeline.
pub trait MetricsRecorder: Send + Sync {
    fn observe_hashing(&self, seconds: f64);
    fn observe_persistence(&self, seconds: f64);
}

/// Prometheus-backed recorder; bucket increments are atomic, so concurrent
/// requests never lose an observation.
#[derive(Clone)]
pub struct PrometheusRecorder {
    hashing: Histogram,
    persistence: Histogram,
}

impl PrometheusRecorder {
    /// Create both histograms and register them in `registry`.
    ///
    /// # Errors
    /// Returns an error if a histogram with the same name is already registered.
    pub fn new(registry: &Registry) -> prometheus::Result<Self> {
        let hashing = Histogram::with_opts(
            HistogramOpts::new(
                HASHING_HISTOGRAM,
                "Duration to generate argon2 hash for the user.",
            )
            .buckets(HASHING_BUCKETS.to_vec()),
        )?;
        let persistence = Histogram::with_opts(
            HistogramOpts::new(
                PERSISTENCE_HISTOGRAM,
                "Duration to save user into the database.",
            )
            .buckets(PERSISTENCE_BUCKETS.to_vec()),
        )?;

        registry.register(Box::new(hashing.clone()))?;
        registry.register(Box::new(persistence.clone()))?;

        Ok(Self {
            hashing,
            persistence,
        })
    }
}

impl MetricsRecorder for PrometheusRecorder {
    fn observe_hashing(&self, seconds: f64) {
        self.hashing.observe(seconds);
    }

    fn observe_persistence(&self, seconds: f64) {
        self.persistence.observe(seconds);
    }
}

/// Render every metric in `registry` in the Prometheus text format.
///
/// # Errors
/// Returns an error if encoding fails or produces invalid UTF-8.
pub fn render(registry: &Registry) -> anyhow::Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
