//! Optimization Driver
//!
//! Runs the generation loop: draw a full population from the optimizer,
//! score every candidate through the simulator, report the batch back, and
//! append the generation's representative best to the log. Single-threaded
//! and synchronous; any error aborts the run.

pub mod output;

use rand::Rng;

use crate::config::RunConfig;
use crate::driver::output::{GenerationLog, GenerationRecord};
use crate::error::EvoResult;
use crate::genome::candidate::Candidate;
use crate::optimizer::cmaes::CmaEs;
use crate::sim::Simulator;

pub mod prelude {
    pub use super::output::*;
    pub use super::Driver;
}

/// Drives one CMA-ES run over a simulator
pub struct Driver<S: Simulator> {
    simulator: S,
    config: RunConfig,
}

impl<S: Simulator> Driver<S> {
    /// Create a driver for the given simulator and run parameters
    pub fn new(simulator: S, config: RunConfig) -> Self {
        Self { simulator, config }
    }

    /// The simulator this driver evaluates candidates on
    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    /// Execute the run
    ///
    /// Writes the log header, then one row per generation. With zero
    /// generations only the header is produced. Errors from the optimizer,
    /// the simulator, or the log are fatal and propagate unchanged.
    pub fn run<R: Rng>(&self, rng: &mut R) -> EvoResult<()> {
        let num_actuators = self.simulator.num_actuators();
        log::info!(
            "starting run: {} generations, sigma {}, mode {}, {} actuators",
            self.config.generations,
            self.config.sigma,
            self.config.mode,
            num_actuators
        );

        let journal = GenerationLog::create(&self.config.log_path, num_actuators)?;

        let mean = Candidate::tiled(self.simulator.default_actuator_params(), num_actuators);
        let mut optimizer = CmaEs::new(mean.into_inner(), self.config.sigma)?;
        let budget = self.simulator.iteration_budget();

        for generation in 0..self.config.generations {
            // Population size is re-read every round; the optimizer owns it
            let population_size = optimizer.population_size();
            let mut solutions: Vec<(Candidate, f64)> = Vec::with_capacity(population_size);

            for slot in 0..population_size {
                let candidate = optimizer.ask(rng);
                let label = format!("{}_{}", generation, slot);
                let fitness =
                    self.simulator
                        .run(budget, &candidate, self.config.mode, &label)?;
                solutions.push((candidate, fitness));
            }

            optimizer.tell(&solutions)?;

            let fitnesses: Vec<f64> = solutions.iter().map(|(_, fitness)| *fitness).collect();
            println!("{:?}", fitnesses);

            // The first pair in draw order stands in for the generation's
            // best; the batch is never re-sorted here.
            let (winner, best_fitness) = &solutions[0];
            println!("Generation {} Best Fitness: {}", generation, best_fitness);

            journal.append(&GenerationRecord {
                generation,
                best_fitness: *best_fitness,
                genes: winner.genes().to_vec(),
            })?;
        }

        log::info!(
            "run complete; generation log written to {}",
            journal.path().display()
        );
        Ok(())
    }
}
