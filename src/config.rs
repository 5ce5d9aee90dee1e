//! Run configuration
//!
//! A [`RunConfig`] is fixed for the duration of a run; the CLI builds one
//! from its arguments.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::sim::DisplayMode;

/// Default generation count
pub const DEFAULT_GENERATIONS: u32 = 100;

/// Default initial step size
///
/// The CLI parses `--sigma` as an integer, so the default is a whole number.
pub const DEFAULT_SIGMA: f64 = 2.0;

/// Default generation log path
pub const DEFAULT_LOG_PATH: &str = "output.csv";

/// Parameters of one optimization run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    /// How the simulator presents each evaluation
    pub mode: DisplayMode,
    /// Number of ask-evaluate-tell rounds
    pub generations: u32,
    /// Initial spread of the optimizer's sampling distribution
    pub sigma: f64,
    /// Where the generation log is written
    pub log_path: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Headless,
            generations: DEFAULT_GENERATIONS,
            sigma: DEFAULT_SIGMA,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}
