//! Candidate gait genome
//!
//! A candidate is a fixed-length real-valued vector drawn by the optimizer,
//! semantically grouped into per-actuator triples. It is immutable once
//! drawn; the driver only reads it back out for evaluation and logging.

use serde::{Deserialize, Serialize};

use crate::error::GenomeError;
use crate::genome::actuator::{ActuatorParams, GENES_PER_ACTUATOR};

/// A real-valued parameter vector representing one gait to evaluate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    genes: Vec<f64>,
}

impl Candidate {
    /// Create a candidate from raw genes
    ///
    /// The gene count must be a whole number of actuator triples.
    pub fn new(genes: Vec<f64>) -> Result<Self, GenomeError> {
        if genes.len() % GENES_PER_ACTUATOR != 0 {
            return Err(GenomeError::RaggedGenome(genes.len(), GENES_PER_ACTUATOR));
        }
        Ok(Self { genes })
    }

    /// Construct without the triple-alignment check
    ///
    /// Callers must guarantee `genes.len()` is a multiple of
    /// [`GENES_PER_ACTUATOR`]; the optimizer validates its mean once at
    /// construction and samples the same dimension ever after.
    pub(crate) fn from_genes_unchecked(genes: Vec<f64>) -> Self {
        Self { genes }
    }

    /// Create a candidate by repeating one actuator's parameters
    ///
    /// This is how the optimizer's starting mean is seeded from the
    /// simulator's defaults.
    pub fn tiled(params: ActuatorParams, num_actuators: usize) -> Self {
        let mut genes = Vec::with_capacity(num_actuators * GENES_PER_ACTUATOR);
        for _ in 0..num_actuators {
            genes.extend_from_slice(&params.as_genes());
        }
        Self { genes }
    }

    /// Create a candidate from per-actuator parameters
    pub fn from_actuators(actuators: &[ActuatorParams]) -> Self {
        let mut genes = Vec::with_capacity(actuators.len() * GENES_PER_ACTUATOR);
        for params in actuators {
            genes.extend_from_slice(&params.as_genes());
        }
        Self { genes }
    }

    /// The raw genes
    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    /// Genome length (3 x actuator count)
    pub fn dimension(&self) -> usize {
        self.genes.len()
    }

    /// Number of actuators this candidate configures
    pub fn num_actuators(&self) -> usize {
        self.genes.len() / GENES_PER_ACTUATOR
    }

    /// Iterate the genome as per-actuator parameter triples
    pub fn actuators(&self) -> impl Iterator<Item = ActuatorParams> + '_ {
        self.genes
            .chunks_exact(GENES_PER_ACTUATOR)
            .map(|triple| ActuatorParams::new(triple[0], triple[1], triple[2]))
    }

    /// Consume the candidate, returning the raw genes
    pub fn into_inner(self) -> Vec<f64> {
        self.genes
    }
}
