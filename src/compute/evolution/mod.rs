//! Evolutionary search for density-classification rules.
//!
//! # Overview
//!
//! - **Fitness** (`fitness`): trial-averaged classification score of a rule
//! - **Genome Operations** (`genome`): crossover, mutation and diversity
//! - **Search** (`search`): generational GA with elitism and tournament selection
//!
//! # Example
//!
//! ```rust,no_run
//! use emergent_ca::compute::evolution::GeneticAlgorithm;
//! use emergent_ca::schema::EvolutionConfig;
//!
//! let config = EvolutionConfig {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//! let mut ga = GeneticAlgorithm::from_config(config).unwrap();
//! ga.run_with_callback(20, 149, |stats| {
//!     println!("Generation {}: best fitness = {:.3}", stats.generation, stats.best_fitness);
//! })
//! .unwrap();
//!
//! if let Some(rule) = ga.best_rule() {
//!     println!("Best rule: {rule}");
//! }
//! ```

mod fitness;
mod genome;
mod search;

pub use fitness::FitnessEvaluator;
pub use genome::{crossover, crossover_at, mutate, population_diversity};
pub use search::{GenerationStats, GeneticAlgorithm, ScoredRule, tournament_select};
