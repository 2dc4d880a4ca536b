use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

pub const DEFAULT_FILTER: &str = "hostbridge=info";

static INIT: Once = Once::new();

/// Picks the filter directive: `RUST_LOG` first, then `configured`, then
/// [`DEFAULT_FILTER`].
pub fn filter_directive(env: Option<String>, configured: Option<&str>) -> String {
    env.filter(|value| !value.trim().is_empty())
        .or_else(|| configured.map(str::to_owned))
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned())
}

/// Initialise tracing subscriber once per process.
///
/// The host may already have installed a global subscriber, in which case
/// this one is dropped silently.
pub fn init_logging(configured: Option<&str>) {
    INIT.call_once(|| {
        let directive = filter_directive(std::env::var("RUST_LOG").ok(), configured);
        let env_filter =
            EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .compact()
            .try_init();
    });
}
