//! Impulsive transfer utilities: Stumpff functions, the universal-variable Lambert solver,
//! and classical transfer approximations.

pub mod lambert;
pub mod stumpff;
pub mod transfers;

pub use lambert::{LambertError, LambertProblem, LambertSolution, TransferPath};
pub use stumpff::stumpff;
