//! Emergent CA - evolving cellular automata for density classification.
//!
//! A one-dimensional, binary, radius-3 cellular automaton on a ring, and a
//! genetic algorithm that searches its 2^128 rule tables for ones that
//! drive any initial configuration to all 1s when 1s are the majority and
//! to all 0s otherwise.
//!
//! # Architecture
//!
//! - `schema`: rule tables, named presets and configuration
//! - `compute`: the automaton, particle detection and evolutionary search
//! - `random`: the injectable randomness source everything draws from
//!
//! # Example
//!
//! ```rust,no_run
//! use emergent_ca::{Automaton, RulePreset, SeededSource};
//!
//! let mut ca = Automaton::new(149, Some(RulePreset::Gkl.rule()), SeededSource::new(7)).unwrap();
//! let steps = ca.run_until_settled(223);
//!
//! println!(
//!     "density {:.3} -> {:?} after {} steps (fitness {})",
//!     ca.initial_density(),
//!     ca.outcome(),
//!     steps,
//!     ca.fitness()
//! );
//! ```

pub mod compute;
pub mod random;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{FitnessEvaluator, GenerationStats, GeneticAlgorithm};
pub use compute::{Automaton, AutomatonStats, Outcome, Particle, ParticleType};
pub use random::{RandomSource, SeededSource, SequenceSource};
pub use schema::{ConfigError, EvolutionConfig, Rule, RulePreset, RunConfig};
