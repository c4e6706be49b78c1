//! `tracing` subscriber setup for hosts without one

use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Filter variable checked before `RUST_LOG`.
pub const LOG_VAR: &str = "GLIDE_LOG";

const DEFAULT_FILTER: &str = "info,glide_core::scheduler=warn";

/// Build the filter from `$GLIDE_LOG`, then `$RUST_LOG`, then a quiet
/// default. Unparseable values fall through to the next source.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Install a formatted subscriber. Returns false when one was already set,
/// which happens when the host or a previous call got there first.
pub fn init_tracing() -> bool {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
