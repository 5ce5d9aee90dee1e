//! Point-mass reference robot
//!
//! A chain of point masses on a 1-D track, each adjacent pair coupled by a
//! sine-driven actuator that modulates the spring's rest length. Ground drag
//! is asymmetric (sliding backward costs more than sliding forward), so a
//! well-phased oscillation crawls the chain along the track.
//!
//! Fitness is the negated displacement of the center of mass: the optimizer
//! minimizes, so farther forward is better. The model is fully
//! deterministic.

use std::fs;
use std::path::PathBuf;

use crate::error::{EvoResult, SimError};
use crate::genome::actuator::ActuatorParams;
use crate::genome::candidate::Candidate;
use crate::sim::capture::{FrameBuffer, GifRecorder};
use crate::sim::{DisplayMode, Simulator};

/// Actuators on the default robot
pub const DEFAULT_NUM_ACTUATORS: usize = 4;

/// Simulation steps per evaluation
pub const DEFAULT_ITERATIONS: u32 = 600;

/// Starting point for the optimizer's mean, per actuator
pub const DEFAULT_ACTUATOR_PARAMS: ActuatorParams = ActuatorParams {
    frequency: 1.0,
    amplitude: 0.5,
    phase_offset: 0.0,
};

const REST_LENGTH: f64 = 1.0;
const STIFFNESS: f64 = 40.0;
const MASS: f64 = 1.0;
const FORWARD_DRAG: f64 = 0.5;
const BACKWARD_DRAG: f64 = 3.0;
// Rest-length modulation is clamped so wild candidates cannot invert a link
const MIN_LENGTH_FACTOR: f64 = 0.2;
const MAX_LENGTH_FACTOR: f64 = 2.0;

const FRAME_WIDTH: u16 = 160;
const FRAME_HEIGHT: u16 = 90;
const CAPTURE_INTERVAL: u32 = 4;
const CAPTURE_FPS: u16 = 15;
const PIXELS_PER_UNIT: f64 = 12.0;

const BACKGROUND: [u8; 3] = [245, 245, 245];
const GROUND: [u8; 3] = [60, 60, 60];
const BODY: [u8; 3] = [200, 60, 40];

/// Built-in locomotion simulator
pub struct PointMassRobot {
    num_actuators: usize,
    iterations: u32,
    dt: f64,
    video_dir: PathBuf,
}

impl PointMassRobot {
    /// Create a robot with the given actuator count
    pub fn new(num_actuators: usize) -> Self {
        Self {
            num_actuators,
            iterations: DEFAULT_ITERATIONS,
            dt: 1.0 / 60.0,
            video_dir: PathBuf::from("videos"),
        }
    }

    /// Override the per-evaluation step count
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Override where video-mode GIFs are written
    pub fn with_video_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.video_dir = dir.into();
        self
    }

    fn center_of_mass(positions: &[f64]) -> f64 {
        positions.iter().sum::<f64>() / positions.len() as f64
    }

    fn draw_frame(buffer: &mut FrameBuffer, positions: &[f64]) {
        buffer.clear(BACKGROUND);

        let ground_y = FRAME_HEIGHT as i32 - 20;
        buffer.fill_rect(0, ground_y, FRAME_WIDTH, 2, GROUND);

        // Camera follows the robot's center of mass
        let camera = Self::center_of_mass(positions);
        for &x in positions {
            let px = ((x - camera) * PIXELS_PER_UNIT) as i32 + FRAME_WIDTH as i32 / 2;
            buffer.fill_rect(px - 2, ground_y - 5, 5, 5, BODY);
        }
    }
}

impl Default for PointMassRobot {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_ACTUATORS)
    }
}

impl Simulator for PointMassRobot {
    fn num_actuators(&self) -> usize {
        self.num_actuators
    }

    fn iteration_budget(&self) -> u32 {
        self.iterations
    }

    fn default_actuator_params(&self) -> ActuatorParams {
        DEFAULT_ACTUATOR_PARAMS
    }

    fn run(
        &self,
        iterations: u32,
        candidate: &Candidate,
        mode: DisplayMode,
        label: &str,
    ) -> EvoResult<f64> {
        if candidate.num_actuators() != self.num_actuators {
            return Err(SimError::ActuatorMismatch {
                expected: self.num_actuators,
                actual: candidate.num_actuators(),
            }
            .into());
        }

        if mode.shows_screen() {
            log::warn!("screen display is not available in this build; running headless");
        }
        let mut recorder = if mode.records_video() {
            Some((
                FrameBuffer::new(FRAME_WIDTH, FRAME_HEIGHT),
                GifRecorder::new(FRAME_WIDTH, FRAME_HEIGHT, CAPTURE_FPS),
            ))
        } else {
            None
        };

        let actuators: Vec<ActuatorParams> = candidate.actuators().collect();
        let num_masses = self.num_actuators + 1;
        let mut positions: Vec<f64> = (0..num_masses).map(|i| i as f64 * REST_LENGTH).collect();
        let mut velocities = vec![0.0; num_masses];
        let start = Self::center_of_mass(&positions);

        for step in 0..iterations {
            let t = step as f64 * self.dt;

            let mut forces = vec![0.0; num_masses];
            for (i, params) in actuators.iter().enumerate() {
                let target = (REST_LENGTH * (1.0 + params.displacement(t))).clamp(
                    MIN_LENGTH_FACTOR * REST_LENGTH,
                    MAX_LENGTH_FACTOR * REST_LENGTH,
                );
                let length = positions[i + 1] - positions[i];
                let f = STIFFNESS * (target - length);
                forces[i] -= f;
                forces[i + 1] += f;
            }

            for i in 0..num_masses {
                let drag = if velocities[i] >= 0.0 {
                    FORWARD_DRAG
                } else {
                    BACKWARD_DRAG
                };
                forces[i] -= drag * velocities[i];
                velocities[i] += self.dt * forces[i] / MASS;
                positions[i] += self.dt * velocities[i];
            }

            if let Some((buffer, recorder)) = recorder.as_mut() {
                if step % CAPTURE_INTERVAL == 0 {
                    Self::draw_frame(buffer, &positions);
                    recorder.record(buffer);
                }
            }
        }

        if let Some((_, recorder)) = recorder {
            fs::create_dir_all(&self.video_dir).map_err(SimError::Io)?;
            let path = self.video_dir.join(format!("{}.gif", label));
            recorder.save(&path)?;
            log::debug!("saved simulation video to {}", path.display());
        }

        let displacement = Self::center_of_mass(&positions) - start;
        Ok(-displacement)
    }
}
