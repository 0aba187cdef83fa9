// wallet-core/src/logging.rs
//
// tracing subscriber: RUST_LOG qua EnvFilter (mặc định "info"),
// WALLET_LOG_JSON=1 để ra JSON lines. Luôn ghi ra stderr.

use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOG_JSON: &str = "WALLET_LOG_JSON";

/// Cài global subscriber. Gọi nhiều lần là no-op.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let use_json = std::env::var(ENV_LOG_JSON)
        .map(|value| value == "1")
        .unwrap_or(false);

    if use_json {
        let _ = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .json()
            .with_writer(std::io::stderr)
            .try_init();
    } else {
        let _ = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
