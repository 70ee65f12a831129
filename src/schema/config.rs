//! Configuration types for automaton evaluation and rule evolution.

use serde::{Deserialize, Serialize};

use super::RuleError;

/// Settings for scoring one rule on the density-classification task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Independent trials per rule (each with a fresh random lattice).
    pub trials: usize,
    /// Step budget per trial as a multiple of the lattice size.
    pub step_budget_factor: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            trials: 10,
            step_budget_factor: 1.5,
        }
    }
}

impl EvaluationConfig {
    /// Maximum steps per trial: `floor(lattice_size * step_budget_factor)`.
    #[inline]
    pub fn step_budget(&self, lattice_size: usize) -> usize {
        (lattice_size as f64 * self.step_budget_factor).floor() as usize
    }
}

/// Genetic algorithm parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Rules per generation.
    pub population_size: usize,
    /// Per-gene flip probability for offspring.
    pub mutation_rate: f64,
    /// Fraction of each generation copied unchanged into the next.
    pub elite_fraction: f64,
    /// Candidates drawn (with replacement) per tournament.
    pub tournament_size: usize,
    /// Fitness evaluation settings.
    pub evaluation: EvaluationConfig,
    /// Score population members in parallel, one random stream per rule.
    pub parallel: bool,
    /// Random seed for reproducibility.
    pub random_seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            mutation_rate: 0.02,
            elite_fraction: 0.1,
            tournament_size: 5,
            evaluation: EvaluationConfig::default(),
            parallel: false,
            random_seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Defaults with the given population size and mutation rate.
    pub fn new(population_size: usize, mutation_rate: f64) -> Self {
        Self {
            population_size,
            mutation_rate,
            ..Self::default()
        }
    }

    /// Rules carried unchanged into the next generation.
    #[inline]
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elite_fraction).floor() as usize
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidRate {
                name: "mutation_rate",
                value: self.mutation_rate,
            });
        }
        if !(0.0..=1.0).contains(&self.elite_fraction) {
            return Err(ConfigError::InvalidRate {
                name: "elite_fraction",
                value: self.elite_fraction,
            });
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::InvalidTournamentSize);
        }
        if self.evaluation.trials == 0 {
            return Err(ConfigError::NoTrials);
        }
        let factor = self.evaluation.step_budget_factor;
        if !factor.is_finite() || factor < 0.0 {
            return Err(ConfigError::InvalidStepBudget(factor));
        }
        Ok(())
    }
}

/// Top-level settings for a command-line evolution run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Lattice width used for scoring and display.
    pub lattice_size: usize,
    /// Generations to evolve.
    pub generations: usize,
    pub evolution: EvolutionConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            lattice_size: 149,
            generations: 50,
            evolution: EvolutionConfig::default(),
        }
    }
}

impl RunConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_lattice_size(self.lattice_size)?;
        self.evolution.validate()
    }
}

/// Reject lattices with no cells.
pub fn validate_lattice_size(size: usize) -> Result<(), ConfigError> {
    if size == 0 {
        return Err(ConfigError::InvalidLatticeSize);
    }
    Ok(())
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Lattice size must be non-zero")]
    InvalidLatticeSize,
    #[error("Cell {index} is {value}, expected 0 or 1")]
    InvalidCell { index: usize, value: u8 },
    #[error("Population size must be non-zero")]
    EmptyPopulation,
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidRate { name: &'static str, value: f64 },
    #[error("Tournament size must be non-zero")]
    InvalidTournamentSize,
    #[error("At least one evaluation trial is required")]
    NoTrials,
    #[error("Step budget factor must be finite and non-negative, got {0}")]
    InvalidStepBudget(f64),
    #[error(transparent)]
    Rule(#[from] RuleError),
}
