/// Initializes structured logging for the server.
///
/// Verbosity follows `RUST_LOG` (e.g. `RUST_LOG=storefront_checkout=debug`)
/// and defaults to `info` when the variable is unset or unparsable.
pub fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
