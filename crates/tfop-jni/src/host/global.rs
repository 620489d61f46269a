//! Process-wide bridge instance.
//!
//! The first export to run loads the scoped configuration, installs the `tracing`
//! subscriber when logging is enabled and builds the reference backend.

use once_cell::sync::Lazy;
use tfop_config::{BridgeConfig, LoggingConfig};
use tfop_core::constants::modules;
use tfop_core::{log_info, log_warn};
use tfop_graph::{BackendOptions, ReferenceBackend};

use crate::OpBridge;

/// Bridge shared by every export.
static GLOBAL_BRIDGE: Lazy<OpBridge<ReferenceBackend>> = Lazy::new(build_bridge);

/// Returns the process-wide bridge, building it on first use.
pub fn bridge() -> &'static OpBridge<ReferenceBackend> {
    &GLOBAL_BRIDGE
}

fn build_bridge() -> OpBridge<ReferenceBackend> {
    let (config, load_error) = match BridgeConfig::load_scoped() {
        Ok(config) => (config, None),
        Err(err) => (BridgeConfig::default(), Some(err)),
    };
    init_tracing(&config.logging);
    if let Some(err) = load_error {
        log_warn!(modules::CONFIG, error = %err, "Falling back to default configuration");
    }

    log_info!(
        modules::HOST,
        include_internal = config.catalog.include_internal,
        "Initializing op bridge"
    );
    OpBridge::new(ReferenceBackend::with_options(BackendOptions {
        include_internal: config.catalog.include_internal,
    }))
}

fn init_tracing(logging: &LoggingConfig) {
    if !logging.enabled {
        return;
    }
    tracing_subscriber::fmt()
        .with_target(logging.with_target)
        .with_max_level(logging.level.as_tracing())
        .try_init()
        .ok(); // the host may already have installed one
}
