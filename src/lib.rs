//! Suivy offers purchase-order consumption tracking for external provider
//! teams: a working-day calendar, half-day exhaustion projections,
//! chronological allocation of consumed days, monthly cost curves, and
//! overpayment-safe payment ledgers.

pub use suivy_config as config;
pub use suivy_core as engine;
pub use suivy_domain as domain;
pub use suivy_storage_json as storage_json;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        init_tracing();
        tracing::info!("Suivy tracing initialized.");
    });
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::from_default_env().add_directive("suivy=info".parse().unwrap());

    fmt().with_env_filter(filter).init();
}
