//! Gait genomes
//!
//! A candidate gait is a flat real-valued vector, three genes per actuator.

pub mod actuator;
pub mod candidate;

pub mod prelude {
    pub use super::actuator::*;
    pub use super::candidate::*;
}
