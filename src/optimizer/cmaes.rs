//! CMA-ES (Covariance Matrix Adaptation Evolution Strategy)
//!
//! An ask/tell implementation of CMA-ES with full covariance matrix
//! adaptation, evolution path management, and step-size control. Candidates
//! are drawn one at a time with [`CmaEs::ask`]; once the whole population is
//! evaluated, the batch is reported with [`CmaEs::tell`], which adapts the
//! sampling distribution for the next generation.
//!
//! Lower fitness is better: `tell` ranks the batch ascending.
//!
//! Reference: Hansen, N., & Ostermeier, A. (2001). Completely Derandomized
//! Self-Adaptation in Evolution Strategies. Evolutionary Computation, 9(2).

use std::cmp::Ordering;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::{EvoResult, OptimizerError};
use crate::genome::actuator::GENES_PER_ACTUATOR;
use crate::genome::candidate::Candidate;

/// CMA-ES optimizer state
///
/// Constructed from an initial mean and step size; all adaptation
/// parameters derive from the problem dimension.
#[derive(Clone, Debug)]
pub struct CmaEs {
    /// Current mean of the search distribution
    mean: Vec<f64>,

    /// Global step size (sigma)
    sigma: f64,

    /// Covariance matrix C
    covariance: Vec<Vec<f64>>,

    /// Evolution path for sigma adaptation (p_sigma)
    path_sigma: Vec<f64>,

    /// Evolution path for C adaptation (p_c)
    path_c: Vec<f64>,

    /// Eigenvalues of C (D^2)
    eigenvalues: Vec<f64>,

    /// Eigenvectors of C, one per column (B)
    eigenvectors: Vec<Vec<f64>>,

    /// Generation of the last eigendecomposition
    eigen_eval: usize,

    /// Problem dimension
    dimension: usize,

    /// Population size (lambda)
    lambda: usize,

    /// Parent number (mu)
    mu: usize,

    /// Recombination weights
    weights: Vec<f64>,

    /// Variance effective selection mass (mu_eff)
    mu_eff: f64,

    /// Learning rate for the rank-1 covariance update
    c_1: f64,

    /// Learning rate for the rank-mu covariance update
    c_mu: f64,

    /// Learning rate for sigma path cumulation
    c_sigma: f64,

    /// Damping for sigma
    d_sigma: f64,

    /// Learning rate for C path cumulation
    c_c: f64,

    /// Expected length of a N(0, I) random vector
    chi_n: f64,

    /// Completed generations (tell calls)
    generation: usize,
}

impl CmaEs {
    /// Create a new optimizer from an initial mean and step size
    ///
    /// Fails when `sigma` is not a positive finite real, when the mean is
    /// empty, or when the mean is not a whole number of actuator triples.
    pub fn new(initial_mean: Vec<f64>, sigma: f64) -> EvoResult<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(OptimizerError::InvalidSigma(sigma).into());
        }
        if initial_mean.is_empty() {
            return Err(OptimizerError::EmptyMean.into());
        }
        if initial_mean.len() % GENES_PER_ACTUATOR != 0 {
            return Err(crate::error::GenomeError::RaggedGenome(
                initial_mean.len(),
                GENES_PER_ACTUATOR,
            )
            .into());
        }

        let n = initial_mean.len();

        // Default population size: 4 + floor(3 * ln(n))
        let lambda = ((4.0 + (3.0 * (n as f64).ln()).floor()) as usize).max(4);
        let mu = lambda / 2;

        // Log-linear recombination weights, normalized to sum 1
        let mut weights: Vec<f64> = (0..mu)
            .map(|i| ((lambda as f64 + 1.0) / 2.0).ln() - ((i + 1) as f64).ln())
            .collect();
        let weight_sum: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= weight_sum;
        }

        let mu_eff = 1.0 / weights.iter().map(|w| w * w).sum::<f64>();

        // Time constants for cumulation
        let c_sigma = (mu_eff + 2.0) / (n as f64 + mu_eff + 5.0);
        let c_c = (4.0 + mu_eff / n as f64) / (n as f64 + 4.0 + 2.0 * mu_eff / n as f64);

        // Learning rates for the covariance matrix update
        let c_1 = 2.0 / ((n as f64 + 1.3).powi(2) + mu_eff);
        let alpha_mu = 2.0;
        let c_mu = (alpha_mu * (mu_eff - 2.0 + 1.0 / mu_eff))
            / ((n as f64 + 2.0).powi(2) + alpha_mu * mu_eff / 2.0);
        let c_mu = c_mu.min(1.0 - c_1);

        let d_sigma =
            1.0 + 2.0 * (0.0_f64.max(((mu_eff - 1.0) / (n as f64 + 1.0)).sqrt() - 1.0)) + c_sigma;

        let chi_n =
            (n as f64).sqrt() * (1.0 - 1.0 / (4.0 * n as f64) + 1.0 / (21.0 * (n as f64).powi(2)));

        Ok(Self {
            mean: initial_mean,
            sigma,
            covariance: identity(n),
            path_sigma: vec![0.0; n],
            path_c: vec![0.0; n],
            eigenvalues: vec![1.0; n],
            eigenvectors: identity(n),
            eigen_eval: 0,
            dimension: n,
            lambda,
            mu,
            weights,
            mu_eff,
            c_1,
            c_mu,
            c_sigma,
            d_sigma,
            c_c,
            chi_n,
            generation: 0,
        })
    }

    /// Population size (lambda) for the current generation
    pub fn population_size(&self) -> usize {
        self.lambda
    }

    /// Draw one candidate from the current N(m, sigma^2 C) distribution
    pub fn ask<R: Rng>(&self, rng: &mut R) -> Candidate {
        let n = self.dimension;
        let normal = StandardNormal;

        // z ~ N(0, I)
        let z: Vec<f64> = (0..n).map(|_| normal.sample(rng)).collect();

        // y = B * D * z, x = m + sigma * y
        let genes: Vec<f64> = (0..n)
            .map(|i| {
                let y_i: f64 = (0..n)
                    .map(|j| self.eigenvectors[i][j] * self.eigenvalues[j].sqrt() * z[j])
                    .sum();
                self.mean[i] + self.sigma * y_i
            })
            .collect();

        Candidate::from_genes_unchecked(genes)
    }

    /// Report the evaluated population back and adapt the distribution
    ///
    /// `solutions` must contain exactly [`population_size`](Self::population_size)
    /// pairs. The slice is ranked internally by ascending fitness; the
    /// caller's ordering is never disturbed.
    pub fn tell(&mut self, solutions: &[(Candidate, f64)]) -> EvoResult<()> {
        if solutions.len() != self.lambda {
            return Err(OptimizerError::BatchSize {
                expected: self.lambda,
                actual: solutions.len(),
            }
            .into());
        }
        for (i, (candidate, fitness)) in solutions.iter().enumerate() {
            if candidate.dimension() != self.dimension {
                return Err(OptimizerError::SolutionDimension {
                    expected: self.dimension,
                    actual: candidate.dimension(),
                }
                .into());
            }
            if fitness.is_nan() {
                return Err(OptimizerError::NanFitness(i).into());
            }
        }

        let mut order: Vec<usize> = (0..solutions.len()).collect();
        order.sort_by(|&a, &b| {
            solutions[a]
                .1
                .partial_cmp(&solutions[b].1)
                .unwrap_or(Ordering::Equal)
        });
        let selected: Vec<&Candidate> =
            order.iter().take(self.mu).map(|&i| &solutions[i].0).collect();

        self.update(&selected);
        Ok(())
    }

    /// Current mean of the search distribution
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Current step size
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Completed generations
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Adapt mean, evolution paths, covariance, and step size from the
    /// selected (best mu, ascending) candidates
    fn update(&mut self, selected: &[&Candidate]) {
        let n = self.dimension;

        // Per-parent steps y_k = (x_k - m_old) / sigma
        let steps: Vec<Vec<f64>> = selected
            .iter()
            .map(|candidate| {
                candidate
                    .genes()
                    .iter()
                    .zip(self.mean.iter())
                    .map(|(&x, &m)| (x - m) / self.sigma)
                    .collect()
            })
            .collect();

        // Weighted recombination of the selected steps
        let mut y_w = vec![0.0; n];
        for (weight, step) in self.weights.iter().zip(steps.iter()) {
            for (acc, &y) in y_w.iter_mut().zip(step.iter()) {
                *acc += weight * y;
            }
        }

        // C^(-1/2) * y_w = B * D^-1 * B^T * y_w, for the sigma path
        let mut whitened = vec![0.0; n];
        {
            let mut temp = vec![0.0; n];
            for i in 0..n {
                for j in 0..n {
                    temp[i] += self.eigenvectors[j][i] * y_w[j];
                }
                temp[i] /= self.eigenvalues[i].sqrt().max(1e-16);
            }
            for i in 0..n {
                for j in 0..n {
                    whitened[i] += self.eigenvectors[i][j] * temp[j];
                }
            }
        }

        // Update evolution path for sigma
        let c_sigma_factor = (self.c_sigma * (2.0 - self.c_sigma) * self.mu_eff).sqrt();
        for i in 0..n {
            self.path_sigma[i] =
                (1.0 - self.c_sigma) * self.path_sigma[i] + c_sigma_factor * whitened[i];
        }
        let path_sigma_norm = self
            .path_sigma
            .iter()
            .map(|x| x * x)
            .sum::<f64>()
            .sqrt();

        // Heaviside stall detection
        let h_sigma = if path_sigma_norm
            / (1.0 - (1.0 - self.c_sigma).powi((2 * (self.generation + 1)) as i32)).sqrt()
            / self.chi_n
            < 1.4 + 2.0 / (n as f64 + 1.0)
        {
            1.0
        } else {
            0.0
        };

        // Update evolution path for C
        let c_c_factor = (self.c_c * (2.0 - self.c_c) * self.mu_eff).sqrt();
        for i in 0..n {
            self.path_c[i] = (1.0 - self.c_c) * self.path_c[i] + h_sigma * c_c_factor * y_w[i];
        }

        // Covariance: decay, rank-1, and rank-mu updates
        let delta_h = (1.0 - h_sigma) * self.c_c * (2.0 - self.c_c);
        for i in 0..n {
            for j in 0..=i {
                let mut c_ij =
                    self.covariance[i][j] * (1.0 - self.c_1 - self.c_mu + delta_h * self.c_1);
                c_ij += self.c_1 * self.path_c[i] * self.path_c[j];
                for (weight, step) in self.weights.iter().zip(steps.iter()) {
                    c_ij += self.c_mu * weight * step[i] * step[j];
                }
                self.covariance[i][j] = c_ij;
                if i != j {
                    self.covariance[j][i] = c_ij;
                }
            }
        }

        // Shift the mean along the recombined step
        for (m, &y) in self.mean.iter_mut().zip(y_w.iter()) {
            *m += self.sigma * y;
        }

        // Step-size control
        self.sigma *=
            ((self.c_sigma / self.d_sigma) * (path_sigma_norm / self.chi_n - 1.0)).exp();

        self.generation += 1;

        // Eigendecomposition is O(n^3); refresh it only every few generations
        let refresh_due = self.generation - self.eigen_eval
            > (self.lambda as f64 / (self.c_1 + self.c_mu) / n as f64 / 10.0) as usize;
        if refresh_due {
            let (eigenvalues, eigenvectors) = jacobi_eigendecomposition(&self.covariance);
            self.eigenvalues = eigenvalues;
            self.eigenvectors = eigenvectors;
            for ev in &mut self.eigenvalues {
                *ev = ev.max(1e-16);
            }
            self.eigen_eval = self.generation;
        }
    }
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| {
            let mut row = vec![0.0; n];
            row[i] = 1.0;
            row
        })
        .collect()
}

/// Cyclic Jacobi eigendecomposition for a symmetric matrix
///
/// Returns `(eigenvalues, eigenvectors)` with eigenvector `j` stored as
/// column `j` of the returned matrix.
fn jacobi_eigendecomposition(matrix: &[Vec<f64>]) -> (Vec<f64>, Vec<Vec<f64>>) {
    let n = matrix.len();
    let mut a: Vec<Vec<f64>> = matrix.to_vec();
    let mut v = identity(n);

    let max_sweeps = 50;

    for _ in 0..max_sweeps {
        let mut off_diagonal = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off_diagonal += a[p][q].abs();
            }
        }
        if off_diagonal < 1e-14 {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q].abs() < 1e-300 {
                    continue;
                }

                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = if theta >= 0.0 {
                    1.0 / (theta + (1.0 + theta * theta).sqrt())
                } else {
                    1.0 / (theta - (1.0 + theta * theta).sqrt())
                };
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = t * c;

                // A <- G^T A G for the Givens rotation G in the (p, q) plane
                for k in 0..n {
                    let akp = a[k][p];
                    let akq = a[k][q];
                    a[k][p] = c * akp - s * akq;
                    a[k][q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[p][k];
                    let aqk = a[q][k];
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }

                // Accumulate V <- V G
                for k in 0..n {
                    let vkp = v[k][p];
                    let vkq = v[k][q];
                    v[k][p] = c * vkp - s * vkq;
                    v[k][q] = s * vkp + c * vkq;
                }
            }
        }
    }

    let eigenvalues: Vec<f64> = (0..n).map(|i| a[i][i]).collect();
    (eigenvalues, v)
}
