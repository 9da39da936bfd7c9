// Copyright (c) 2026 Vouch Foundation

//! Tracing setup with optional OTLP export.
//!
//! ```toml
//! [telemetry]
//! enabled = true
//! endpoint = "http://localhost:4317"  # OTLP gRPC endpoint
//! service_name = "vouch-node"
//! sampling_rate = 0.1
//! ```
//!
//! OTLP export batches on the tokio runtime, so [`init_tracing`] with
//! telemetry enabled must be called from inside one.

use anyhow::{Context, Result};
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler, Tracer},
    Resource,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub enabled: bool,
    /// OTLP endpoint (gRPC)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Sampling rate (0.0 to 1.0)
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: f64,
}

fn default_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "vouch-node".to_string()
}

fn default_sampling_rate() -> f64 {
    1.0
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            service_name: default_service_name(),
            sampling_rate: default_sampling_rate(),
        }
    }
}

impl TelemetryConfig {
    fn sampler(&self) -> Sampler {
        if self.sampling_rate >= 1.0 {
            Sampler::AlwaysOn
        } else if self.sampling_rate <= 0.0 {
            Sampler::AlwaysOff
        } else {
            Sampler::TraceIdRatioBased(self.sampling_rate)
        }
    }
}

/// Crates whose spans and events are shown at the node's log level; all
/// other crates only log warnings.
const NODE_CRATES: &[&str] = &["vouch", "vch_vm_host"];

/// Filter directives used when `RUST_LOG` is not set.
pub fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut directives = String::from("warn");
    for krate in NODE_CRATES {
        directives.push_str(&format!(",{}={}", krate, level));
    }
    directives
}

fn env_filter(verbose: bool) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directives(verbose))
            .context("Invalid default log directives"),
    }
}

/// Install the global subscriber: console output for block production,
/// verification and finality, plus OTLP export when enabled.
///
/// Hold the returned guard for the life of the process; dropping it flushes
/// pending traces. Fails if a global subscriber is already installed.
pub fn init_tracing(config: &TelemetryConfig, verbose: bool) -> Result<Option<TelemetryGuard>> {
    let console = tracing_subscriber::fmt::layer()
        .with_target(verbose)
        .with_filter(env_filter(verbose)?);

    let otlp = if config.enabled {
        Some(tracing_opentelemetry::layer().with_tracer(otlp_tracer(config)?))
    } else {
        None
    };
    let guard = otlp.as_ref().map(|_| TelemetryGuard);

    tracing_subscriber::registry()
        .with(console)
        .with(otlp)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if guard.is_some() {
        tracing::info!(
            endpoint = %config.endpoint,
            service = %config.service_name,
            sampling_rate = config.sampling_rate,
            "Exporting consensus traces over OTLP"
        );
    }
    Ok(guard)
}

fn otlp_tracer(config: &TelemetryConfig) -> Result<Tracer> {
    let resource = Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(config.endpoint.clone()),
        )
        .with_trace_config(
            opentelemetry_sdk::trace::config()
                .with_sampler(config.sampler())
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .install_batch(runtime::Tokio)
        .with_context(|| format!("Failed to install OTLP exporter for {}", config.endpoint))
}

/// Shuts the tracer provider down, flushing pending spans, when dropped.
pub struct TelemetryGuard;

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        opentelemetry::global::shutdown_tracer_provider();
    }
}
