//! # gait-evo
//!
//! A CMA-ES optimization driver for sine-wave actuator gaits.
//!
//! The crate evolves the per-actuator `(frequency, amplitude, phase_offset)`
//! parameters of a simulated robot: each generation it draws a population of
//! candidate gaits from the optimizer, scores every candidate through a
//! [`Simulator`](sim::Simulator), reports the batch back, and appends the
//! generation's representative best gait to `output.csv`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gait_evo::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let config = RunConfig {
//!     mode: DisplayMode::Headless,
//!     generations: 50,
//!     sigma: 2.0,
//!     ..RunConfig::default()
//! };
//! Driver::new(PointMassRobot::default(), config).run(&mut rng)?;
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod genome;
pub mod optimizer;
pub mod sim;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::driver::prelude::*;
    pub use crate::error::*;
    pub use crate::genome::prelude::*;
    pub use crate::optimizer::prelude::*;
    pub use crate::sim::prelude::*;
}
