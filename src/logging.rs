use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::Error;

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. Filter comes from `RUST_LOG`, default `info`.
pub fn init_logging() -> Result<(), Error> {
    INITIALISED.set(()).map_err(|_| Error::LoggingInit)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);
    Registry::default()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|_| Error::LoggingInit)
}
