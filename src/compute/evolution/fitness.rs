//! Density-classification fitness for rule tables.

use crate::compute::Automaton;
use crate::random::RandomSource;
use crate::schema::{ConfigError, EvaluationConfig, Rule};

/// Scores rules by running independent automaton trials.
#[derive(Debug, Clone, Default)]
pub struct FitnessEvaluator {
    config: EvaluationConfig,
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Mean trial fitness of `rule` on lattices of `lattice_size` cells.
    ///
    /// Each trial builds a fresh automaton (random density, random cells)
    /// from `rng` and steps it until it settles or the step budget runs
    /// out.
    pub fn evaluate<R: RandomSource + ?Sized>(
        &self,
        rule: &Rule,
        lattice_size: usize,
        rng: &mut R,
    ) -> Result<f64, ConfigError> {
        let max_steps = self.config.step_budget(lattice_size);
        let mut total = 0.0;

        for trial in 0..self.config.trials {
            let mut automaton = Automaton::new(lattice_size, Some(rule.clone()), &mut *rng)?;
            let steps = automaton.run_until_settled(max_steps);
            let score = automaton.fitness();
            log::trace!(
                "trial {}: density={:.3} steps={} fitness={}",
                trial,
                automaton.initial_density(),
                steps,
                score
            );
            total += score;
        }

        Ok(total / self.config.trials as f64)
    }
}
