use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use gait_evo::prelude::*;

/// CMA-ES gait optimization for a sine-wave actuated robot
///
/// Runs the optimizer for `--gens` generations and logs each generation's
/// best genome to output.csv. `--mode s` shows the simulation (where the
/// build supports it), `--mode v` saves each evaluation as a GIF under
/// ./videos, `--mode b` does both.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Display mode: h (headless), s (screen), v (video), b (both)
    #[arg(long, default_value = "h")]
    mode: DisplayMode,

    /// Number of generations to run
    #[arg(long, default_value_t = 100)]
    gens: u32,

    /// Initial step size for the sampling distribution
    #[arg(long, default_value_t = 2)]
    sigma: u32,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = RunConfig {
        mode: args.mode,
        generations: args.gens,
        sigma: f64::from(args.sigma),
        ..RunConfig::default()
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let driver = Driver::new(PointMassRobot::default(), config);
    driver.run(&mut rng)?;
    Ok(())
}
