//! Evolutionary optimizer
//!
//! The driver consumes the optimizer through three operations: read the
//! population size, draw candidates one at a time, and report the evaluated
//! batch back.

pub mod cmaes;

pub mod prelude {
    pub use super::cmaes::*;
}
