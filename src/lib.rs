//! Titan quick-look: a universal-variable Lambert solver, an Earth→Saturn porkchop search, and
//! the patched-conic Titan flyby estimates around it.
//!
//! The member crates carry the physics; this facade re-exports them so front-ends and tests
//! share one import path, and owns the PNG plotting layer.

pub mod plot;

pub use quicklook_config as config;
pub use quicklook_core as common;
pub use quicklook_ephem as ephem;
pub use quicklook_export as export;
pub use quicklook_impulsive as impulsive;
pub use quicklook_orbits as orbits;
pub use quicklook_transfer as transfer;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
