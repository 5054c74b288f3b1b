//! Logging setup for binaries embedding the core.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LendConfig;

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(config: &LendConfig) -> &'static str {
    if config.debug {
        "locale_lend_core=debug"
    } else {
        "locale_lend_core=info"
    }
}

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` wins over the config. Returns `false` if a subscriber was
/// already installed, in which case nothing changes.
pub fn init(config: &LendConfig) -> bool {
    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(config).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(filter = default_filter(config), "logging initialized");
    }
    installed
}
