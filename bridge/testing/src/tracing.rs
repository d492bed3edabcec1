use {
    std::sync::Once,
    tracing_subscriber::{EnvFilter, FmtSubscriber},
};

/// Overrides the filter built from the level passed to the setup function.
pub const LOG_FILTER_ENV: &str = "BRIDGE_LOG";

/// Set to `json` to log one JSON object per event.
pub const LOG_FORMAT_ENV: &str = "BRIDGE_LOG_FORMAT";

static TRACING: Once = Once::new();

/// Install the global subscriber for a test process. Only the first call has
/// any effect.
pub fn setup_tracing_subscriber(level: tracing::Level) {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "bridge_channel={level},bridge_gateway={level},bridge_hub={level},bridge_testing={level}"
            ))
        });

        let builder = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_test_writer();

        let result = match std::env::var(LOG_FORMAT_ENV).as_deref() {
            Ok("json") => tracing::subscriber::set_global_default(builder.json().finish()),
            _ => tracing::subscriber::set_global_default(builder.finish()),
        };

        result.expect("failed to set global tracing subscriber");
    });
}
