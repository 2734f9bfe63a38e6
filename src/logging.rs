/// Initialize tracing with a compact stderr subscriber.
///
/// Filtering comes from `DTH_LOG` (standard `EnvFilter` syntax), falling
/// back to `info`. Call once, before the first request goes out.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    let filter = EnvFilter::try_from_env("DTH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    tracing::debug!(target: "system", "Tracing initialized");
}
