//! Test fixtures for map-roads.
//!
//! Provides:
//! - Real Paris locations (from OpenStreetMap)
//! - Recording doubles for the routing backend and the map surface

pub mod doubles;
pub mod paris_locations;

pub use doubles::*;
pub use paris_locations::*;

/// Routes `tracing` output to the test harness; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
