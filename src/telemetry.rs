//! Tracing subscriber setup (M-LOG-STRUCTURED).

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogFormat;

/// Install the global subscriber. `RUST_LOG` refines the default `info` level.
///
/// Logs go to stderr; stdout carries the `--once` fragment.
pub fn init(format: LogFormat) -> anyhow::Result<()> {
    subscriber(format, std::io::stderr).try_init()?;
    Ok(())
}

fn subscriber<W>(format: LogFormat, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => Box::new(
            registry.with(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true),
            ),
        ),
        LogFormat::Json => Box::new(
            registry.with(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_current_span(false),
            ),
        ),
    }
}
