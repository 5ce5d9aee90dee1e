//! Simulator interface
//!
//! The physics simulation is a collaborator: the driver only needs its
//! actuator count, its iteration budget, a default parameter triple to seed
//! the optimizer's mean, and a way to score candidates. [`PointMassRobot`]
//! is the built-in reference implementation.
//!
//! [`PointMassRobot`]: point_mass::PointMassRobot

pub mod capture;
pub mod point_mass;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::EvoResult;
use crate::genome::actuator::ActuatorParams;
use crate::genome::candidate::Candidate;

/// How a simulation run presents itself
///
/// The CLI keeps the single-character tokens `h`, `s`, `v`, `b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    /// No visual output
    Headless,
    /// Show the simulation in a window
    Screen,
    /// Save the simulation as a video
    Video,
    /// Show on screen and save a video
    Both,
}

impl DisplayMode {
    /// The single-character CLI token for this mode
    pub fn token(self) -> &'static str {
        match self {
            DisplayMode::Headless => "h",
            DisplayMode::Screen => "s",
            DisplayMode::Video => "v",
            DisplayMode::Both => "b",
        }
    }

    /// Whether this mode records a video artifact
    pub fn records_video(self) -> bool {
        matches!(self, DisplayMode::Video | DisplayMode::Both)
    }

    /// Whether this mode displays on screen
    pub fn shows_screen(self) -> bool {
        matches!(self, DisplayMode::Screen | DisplayMode::Both)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayMode::Headless => "headless",
            DisplayMode::Screen => "screen",
            DisplayMode::Video => "video",
            DisplayMode::Both => "both",
        };
        write!(f, "{}", name)
    }
}

/// Error for unrecognized display mode tokens
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown display mode '{0}' (expected h, s, v, or b)")]
pub struct ParseModeError(String);

impl FromStr for DisplayMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "h" | "headless" => Ok(DisplayMode::Headless),
            "s" | "screen" => Ok(DisplayMode::Screen),
            "v" | "video" => Ok(DisplayMode::Video),
            "b" | "both" => Ok(DisplayMode::Both),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// The simulation collaborator consumed by the driver
pub trait Simulator {
    /// Number of actuators on the simulated robot
    fn num_actuators(&self) -> usize;

    /// Fixed step count for every evaluation
    fn iteration_budget(&self) -> u32;

    /// Default parameters for one actuator; tiled per actuator, they seed
    /// the optimizer's starting mean
    fn default_actuator_params(&self) -> ActuatorParams;

    /// Execute one simulation and return the candidate's fitness
    ///
    /// `label` uniquely identifies the run (`"<generation>_<slot>"`) and
    /// names any output artifacts; the driver never interprets it.
    /// Lower fitness is better.
    fn run(
        &self,
        iterations: u32,
        candidate: &Candidate,
        mode: DisplayMode,
        label: &str,
    ) -> EvoResult<f64>;
}

pub mod prelude {
    pub use super::capture::*;
    pub use super::point_mass::*;
    pub use super::{DisplayMode, ParseModeError, Simulator};
}
