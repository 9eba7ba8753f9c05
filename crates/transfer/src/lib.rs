//! Transfer search crate: porkchop grids, Hohmann quick-looks, and flyby sweeps built on the
//! impulsive and patched-conic helpers.

pub mod grid;
pub mod mission;

pub use grid::{CellMinimum, Grid};
pub use mission::flyby::{FlybyMap, Moon, TurnAngleCurve, post_flyby_map, turn_angle_curves};
pub use mission::porkchop::{
    CellSample, ConvergencePolicy, ParkingOrbit, PorkchopAxes, PorkchopError, PorkchopMinimum,
    PorkchopRequest, PorkchopResult, linspace, search,
};
pub use mission::quicklook::{HohmannQuickLook, MoonVinfBounds, QuickLookError, hohmann_quick_look};
