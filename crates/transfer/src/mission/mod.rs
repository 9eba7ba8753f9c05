//! Mission-analysis sweeps layered over the single-shot solvers.

pub mod flyby;
pub mod porkchop;
pub mod quicklook;
