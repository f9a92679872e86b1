use std::error::Error;

use once_cell::sync::Lazy;
use tracing::{subscriber::set_global_default, Subscriber};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Forced by tests that want diagnostics; set `TEST_LOG` to see them.
pub static TEST_TRACING: Lazy<()> = Lazy::new(|| {
    let filter = if std::env::var("TEST_LOG").is_ok() { "debug" } else { "" };
    let subscriber = Registry::default()
        .with(EnvFilter::new(filter))
        .with(fmt::layer().with_test_writer());
    let _ = set_global_default(subscriber);
});

/// Compose the subscriber used by the binaries.
///
/// `RUST_LOG` wins over `env_filter` when it is set. Output goes to stderr so
/// it never mixes with anything a binary prints on stdout.
pub fn get_subscriber(env_filter: impl AsRef<str>) -> impl Subscriber + Sync + Send {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));

    Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_thread_names(true))
}

/// Register a subscriber as global default, bridging `log` records from
/// the windowing stack into it.
///
/// It should be only called once!
pub fn init_subscriber(subscriber: impl Subscriber + Sync + Send) -> Result<(), Box<dyn Error>> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}
