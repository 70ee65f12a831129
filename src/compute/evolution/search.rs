//! Generational genetic algorithm over rule tables.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::compute::Automaton;
use crate::random::{RandomSource, SeededSource};
use crate::schema::{ConfigError, EvolutionConfig, Rule, validate_lattice_size};

use super::fitness::FitnessEvaluator;
use super::genome::{crossover, mutate, population_diversity};

/// A rule paired with its fitness for one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRule {
    pub rule: Rule,
    pub fitness: f64,
}

/// Summary of one completed generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generations completed, including this one.
    pub generation: usize,
    /// Best fitness seen across all generations so far.
    pub best_fitness: f64,
    /// Best fitness within this generation.
    pub generation_best: f64,
    pub mean_fitness: f64,
    /// Mean pairwise Hamming distance of the scored population (0-1).
    pub diversity: f64,
    pub elite_count: usize,
}

/// Pick a parent: best of `tournament_size` draws with replacement.
///
/// Comparison is strict, so the first-drawn of equally fit candidates wins.
/// `scored` must be non-empty and `tournament_size` at least 1.
pub fn tournament_select<'a, R: RandomSource + ?Sized>(
    scored: &'a [ScoredRule],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Rule {
    let mut best = &scored[rng.next_index(scored.len())];
    for _ in 1..tournament_size {
        let candidate = &scored[rng.next_index(scored.len())];
        if candidate.fitness > best.fitness {
            best = candidate;
        }
    }
    &best.rule
}

/// Genetic algorithm evolving rules for density classification.
pub struct GeneticAlgorithm<R> {
    config: EvolutionConfig,
    evaluator: FitnessEvaluator,
    rng: R,
    population: Vec<Rule>,
    generation: usize,
    best_fitness: f64,
    best_rule: Option<Rule>,
    fitness_history: Vec<f64>,
    cancelled: Arc<AtomicBool>,
}

impl GeneticAlgorithm<SeededSource> {
    /// Create from configuration, seeding from `random_seed` or entropy.
    pub fn from_config(config: EvolutionConfig) -> Result<Self, ConfigError> {
        let rng = match config.random_seed {
            Some(seed) => SeededSource::new(seed),
            None => SeededSource::from_entropy(),
        };
        Self::new(config, rng)
    }
}

impl<R: RandomSource> GeneticAlgorithm<R> {
    /// Create a new engine with a random initial population.
    pub fn new(config: EvolutionConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let evaluator = FitnessEvaluator::new(config.evaluation.clone());

        let mut engine = Self {
            config,
            evaluator,
            rng,
            population: Vec::new(),
            generation: 0,
            best_fitness: 0.0,
            best_rule: None,
            fitness_history: Vec::new(),
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        engine.initialize();
        Ok(engine)
    }

    /// Fresh random population; clears generation count, best and history.
    pub fn initialize(&mut self) {
        self.population = (0..self.config.population_size)
            .map(|_| Rule::random(&mut self.rng))
            .collect();
        self.generation = 0;
        self.best_fitness = 0.0;
        self.best_rule = None;
        self.fitness_history.clear();
    }

    /// Mean fitness of `rule` over the configured number of trials.
    pub fn evaluate_fitness(&mut self, rule: &Rule, lattice_size: usize) -> Result<f64, ConfigError> {
        self.evaluator.evaluate(rule, lattice_size, &mut self.rng)
    }

    /// Run one generation: score, record the best, breed the next population.
    pub fn evolve(&mut self, lattice_size: usize) -> Result<GenerationStats, ConfigError> {
        validate_lattice_size(lattice_size)?;

        let scores = self.score_population(lattice_size)?;
        let population = std::mem::take(&mut self.population);
        let diversity = population_diversity(&population);
        let mut scored: Vec<ScoredRule> = population
            .into_iter()
            .zip(scores)
            .map(|(rule, fitness)| ScoredRule { rule, fitness })
            .collect();

        // Stable sort keeps equal-fitness rules in population order.
        scored.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        let generation_best = scored[0].fitness;
        let mean_fitness = scored.iter().map(|s| s.fitness).sum::<f64>() / scored.len() as f64;
        log::debug!(
            "generation {}: best={:.3} mean={:.3} diversity={:.3}",
            self.generation,
            generation_best,
            mean_fitness,
            diversity
        );

        // Ties replace the stored best.
        if generation_best >= self.best_fitness {
            if generation_best > self.best_fitness {
                log::info!(
                    "generation {}: new best fitness {:.3} ({})",
                    self.generation,
                    generation_best,
                    scored[0].rule
                );
            }
            self.best_fitness = generation_best;
            self.best_rule = Some(scored[0].rule.clone());
        }
        self.fitness_history.push(self.best_fitness);

        let population_size = self.config.population_size;
        let elite_count = self.config.elite_count().min(population_size);
        let mut next_gen: Vec<Rule> = Vec::with_capacity(population_size);
        next_gen.extend(scored[..elite_count].iter().map(|s| s.rule.clone()));

        while next_gen.len() < population_size {
            let parent1 = tournament_select(&scored, self.config.tournament_size, &mut self.rng);
            let parent2 = tournament_select(&scored, self.config.tournament_size, &mut self.rng);
            let mut child = crossover(parent1, parent2, &mut self.rng);
            mutate(&mut child, self.config.mutation_rate, &mut self.rng);
            next_gen.push(child);
        }

        self.population = next_gen;
        self.generation += 1;

        Ok(GenerationStats {
            generation: self.generation,
            best_fitness: self.best_fitness,
            generation_best,
            mean_fitness,
            diversity,
            elite_count,
        })
    }

    /// Fitness of every population member, in population order.
    #[cfg(not(target_arch = "wasm32"))]
    fn score_population(&mut self, lattice_size: usize) -> Result<Vec<f64>, ConfigError> {
        if !self.config.parallel {
            return self.score_sequential(lattice_size);
        }

        // One independent stream per rule, drawn in order from the master.
        let seeds: Vec<u64> = (0..self.population.len())
            .map(|_| self.rng.next_seed())
            .collect();
        let evaluator = &self.evaluator;

        self.population
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(rule, &seed)| {
                let mut rng = SeededSource::new(seed);
                evaluator.evaluate(rule, lattice_size, &mut rng)
            })
            .collect()
    }

    #[cfg(target_arch = "wasm32")]
    fn score_population(&mut self, lattice_size: usize) -> Result<Vec<f64>, ConfigError> {
        self.score_sequential(lattice_size)
    }

    fn score_sequential(&mut self, lattice_size: usize) -> Result<Vec<f64>, ConfigError> {
        let mut scores = Vec::with_capacity(self.population.len());
        for rule in &self.population {
            scores.push(self.evaluator.evaluate(rule, lattice_size, &mut self.rng)?);
        }
        Ok(scores)
    }

    /// A fresh automaton running the best rule, stepped `lattice_size` times.
    ///
    /// `None` until a generation has completed.
    pub fn showcase(
        &mut self,
        lattice_size: usize,
    ) -> Result<Option<Automaton<SeededSource>>, ConfigError> {
        let Some(rule) = self.best_rule.clone() else {
            return Ok(None);
        };
        let seed = self.rng.next_seed();
        let mut automaton = Automaton::new(lattice_size, Some(rule), SeededSource::new(seed))?;
        for _ in 0..lattice_size {
            automaton.step();
        }
        Ok(Some(automaton))
    }

    /// Evolve up to `generations` generations, reporting each one.
    ///
    /// Stops early when the cancel handle is set. Returns the number of
    /// generations completed by this call.
    pub fn run_with_callback<F>(
        &mut self,
        generations: usize,
        lattice_size: usize,
        mut callback: F,
    ) -> Result<usize, ConfigError>
    where
        F: FnMut(&GenerationStats),
    {
        let mut completed = 0;
        while completed < generations {
            if self.cancelled.load(Ordering::Relaxed) {
                log::info!("evolution cancelled after {} generations", completed);
                break;
            }
            let stats = self.evolve(lattice_size)?;
            callback(&stats);
            completed += 1;
        }
        Ok(completed)
    }
}

impl<R> GeneticAlgorithm<R> {
    /// Get cancellation handle.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn population(&self) -> &[Rule] {
        &self.population
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    pub fn best_rule(&self) -> Option<&Rule> {
        self.best_rule.as_ref()
    }

    /// Best fitness as of each completed generation.
    pub fn fitness_history(&self) -> &[f64] {
        &self.fitness_history
    }
}
