// Path: crates/telemetry/src/init.rs
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Initializes the global `tracing` subscriber for structured JSON logging.
///
/// Output goes to stderr so that command output on stdout stays machine-readable.
/// The filter is read from `RUST_LOG` and defaults to `info`. Records emitted
/// through the `log` facade are bridged into the same subscriber.
pub fn init_tracing() -> Result<(), anyhow::Error> {
    init_tracing_with_default("info")
}

/// Like [`init_tracing`], with a caller-chosen filter when `RUST_LOG` is unset.
pub fn init_tracing_with_default(default_filter: &str) -> Result<(), anyhow::Error> {
    let fmt_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let subscriber = Registry::default().with(filter).with(fmt_layer);
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
