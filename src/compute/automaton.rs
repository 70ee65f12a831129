//! One-dimensional binary cellular automaton on a periodic lattice.
//!
//! Each step updates every cell synchronously from its radius-3
//! neighborhood through a [`Rule`] lookup. The automaton records every
//! configuration it passes through and scores how well the final state
//! classifies the density of the initial one.

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;
use crate::schema::{
    ConfigError, NEIGHBORHOOD_RADIUS, NEIGHBORHOOD_WIDTH, RULE_SIZE, Rule, validate_lattice_size,
};

use super::{Particle, ParticleCounts, detect_particles_into};

/// History length required before the automaton is scored.
pub const MIN_HISTORY_FOR_FITNESS: usize = 10;

/// Identical trailing configurations that count as a settled fixed point.
pub const CONVERGENCE_WINDOW: usize = 5;

/// Fitness given to a run that has not settled into a uniform state.
pub const UNDECIDED_FITNESS: f64 = 0.5;

/// 7-bit neighborhood key for cell `i` (cells `i-3 ..= i+3`, wrapping).
///
/// The leftmost cell is the most significant bit.
#[inline]
pub fn neighborhood_key(cells: &[u8], i: usize) -> usize {
    let size = cells.len();
    let start = i + NEIGHBORHOOD_RADIUS * size - NEIGHBORHOOD_RADIUS;
    (0..NEIGHBORHOOD_WIDTH).fold(0, |key, offset| {
        (key << 1) | cells[(start + offset) % size] as usize
    })
}

/// What the latest configuration says about the initial density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    AllOnes,
    AllZeros,
    Mixed,
}

/// Cellular automaton state container.
#[derive(Debug, Clone)]
pub struct Automaton<R> {
    size: usize,
    rule: Rule,
    /// Every configuration so far; `history[0]` is the initial one.
    history: Vec<Vec<u8>>,
    particles: Vec<Particle>,
    initial_density: f64,
    correct_classification: u8,
    rng: R,
}

impl<R: RandomSource> Automaton<R> {
    /// Create an automaton with a random initial configuration.
    ///
    /// Without a rule, a random one is drawn from `rng` first.
    pub fn new(size: usize, rule: Option<Rule>, mut rng: R) -> Result<Self, ConfigError> {
        validate_lattice_size(size)?;
        let rule = match rule {
            Some(rule) => rule,
            None => Rule::random(&mut rng),
        };

        let mut automaton = Self {
            size,
            rule,
            history: Vec::new(),
            particles: Vec::new(),
            initial_density: 0.0,
            correct_classification: 0,
            rng,
        };
        automaton.reset();
        Ok(automaton)
    }

    /// Create an automaton from a given initial configuration.
    pub fn from_configuration(rule: Rule, cells: Vec<u8>, rng: R) -> Result<Self, ConfigError> {
        validate_lattice_size(cells.len())?;
        if let Some((index, &value)) = cells.iter().enumerate().find(|(_, c)| **c > 1) {
            return Err(ConfigError::InvalidCell { index, value });
        }

        let mut automaton = Self {
            size: cells.len(),
            rule,
            history: Vec::new(),
            particles: Vec::new(),
            initial_density: 0.0,
            correct_classification: 0,
            rng,
        };
        automaton.start_from(cells);
        Ok(automaton)
    }

    /// Draw a fresh initial configuration and clear history and particles.
    ///
    /// The target density is itself uniform in `[0, 1)`, so trials span
    /// easy and hard classification instances alike.
    pub fn reset(&mut self) {
        let density = self.rng.next_unit();
        let cells: Vec<u8> = (0..self.size)
            .map(|_| u8::from(self.rng.next_unit() < density))
            .collect();
        self.start_from(cells);
    }

    fn start_from(&mut self, cells: Vec<u8>) {
        self.initial_density = density_of(&cells);
        self.correct_classification = u8::from(self.initial_density > 0.5);
        self.history.clear();
        self.history.push(cells);
        self.particles.clear();
    }
}

impl<R> Automaton<R> {
    /// Advance every cell one synchronous step.
    pub fn step(&mut self) {
        let size = self.size;
        let current = &self.history[self.history.len() - 1];
        let mut next = Vec::with_capacity(size);

        // Slide the 7-cell window: drop the leftmost bit, shift in i+4.
        let mut key = neighborhood_key(current, 0);
        for i in 0..size {
            next.push(self.rule.get(key));
            let incoming = current[(i + NEIGHBORHOOD_RADIUS + 1) % size];
            key = ((key << 1) & (RULE_SIZE - 1)) | incoming as usize;
        }

        detect_particles_into(&next, &mut self.particles);
        self.history.push(next);
    }

    /// Step until converged or `max_steps` have run. Returns steps taken.
    pub fn run_until_settled(&mut self, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps && !self.is_converged() {
            self.step();
            steps += 1;
        }
        steps
    }

    /// True when the last [`CONVERGENCE_WINDOW`] configurations are identical.
    pub fn is_converged(&self) -> bool {
        let len = self.history.len();
        if len < CONVERGENCE_WINDOW {
            return false;
        }
        self.history[len - CONVERGENCE_WINDOW..]
            .windows(2)
            .all(|pair| pair[0] == pair[1])
    }

    /// Classification score of the latest configuration.
    ///
    /// 0.0 before [`MIN_HISTORY_FOR_FITNESS`] configurations exist; 1.0 for
    /// a uniform state matching the initial majority, 0.0 for the wrong
    /// uniform state and [`UNDECIDED_FITNESS`] for a mixed state.
    pub fn fitness(&self) -> f64 {
        if self.history.len() < MIN_HISTORY_FOR_FITNESS {
            return 0.0;
        }
        match self.outcome() {
            Outcome::AllOnes if self.correct_classification == 1 => 1.0,
            Outcome::AllZeros if self.correct_classification == 0 => 1.0,
            Outcome::AllOnes | Outcome::AllZeros => 0.0,
            Outcome::Mixed => UNDECIDED_FITNESS,
        }
    }

    /// Uniform or mixed state of the latest configuration.
    pub fn outcome(&self) -> Outcome {
        let cells = self.configuration();
        if cells.iter().all(|&c| c == 1) {
            Outcome::AllOnes
        } else if cells.iter().all(|&c| c == 0) {
            Outcome::AllZeros
        } else {
            Outcome::Mixed
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// All configurations so far, oldest first.
    #[inline]
    pub fn history(&self) -> &[Vec<u8>] {
        &self.history
    }

    /// The latest configuration.
    #[inline]
    pub fn configuration(&self) -> &[u8] {
        &self.history[self.history.len() - 1]
    }

    /// Particles detected in the latest configuration.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Fraction of 1s in the initial configuration.
    #[inline]
    pub fn initial_density(&self) -> f64 {
        self.initial_density
    }

    /// 1 if the initial configuration had a strict majority of 1s, else 0.
    #[inline]
    pub fn correct_classification(&self) -> u8 {
        self.correct_classification
    }

    /// Steps taken since the initial configuration.
    #[inline]
    pub fn steps(&self) -> usize {
        self.history.len() - 1
    }

    /// Fraction of 1s in the latest configuration.
    pub fn density(&self) -> f64 {
        density_of(self.configuration())
    }
}

fn density_of(cells: &[u8]) -> f64 {
    if cells.is_empty() {
        return 0.0;
    }
    cells.iter().map(|&c| c as usize).sum::<usize>() as f64 / cells.len() as f64
}

/// Automaton statistics for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomatonStats {
    pub size: usize,
    pub steps: usize,
    pub initial_density: f64,
    pub density: f64,
    pub correct_classification: u8,
    pub outcome: Outcome,
    pub converged: bool,
    pub fitness: f64,
    pub particles: ParticleCounts,
}

impl AutomatonStats {
    /// Compute statistics from an automaton.
    pub fn from_automaton<R>(automaton: &Automaton<R>) -> Self {
        Self {
            size: automaton.size(),
            steps: automaton.steps(),
            initial_density: automaton.initial_density(),
            density: automaton.density(),
            correct_classification: automaton.correct_classification(),
            outcome: automaton.outcome(),
            converged: automaton.is_converged(),
            fitness: automaton.fitness(),
            particles: ParticleCounts::from_particles(automaton.particles()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::ParticleType;
    use crate::random::{SeededSource, SequenceSource};
    use crate::schema::RulePreset;
    use proptest::prelude::*;

    fn fixed(rule: Rule, cells: Vec<u8>) -> Automaton<SequenceSource> {
        Automaton::from_configuration(rule, cells, SequenceSource::new(vec![0.5])).unwrap()
    }

    #[test]
    fn test_rejects_empty_lattice() {
        let result = Automaton::new(0, None, SeededSource::new(1));
        assert!(matches!(result, Err(ConfigError::InvalidLatticeSize)));
    }

    #[test]
    fn test_rejects_non_binary_cells() {
        let result =
            Automaton::from_configuration(Rule::zeros(), vec![0, 1, 3], SeededSource::new(1));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidCell { index: 2, value: 3 })
        ));
    }

    #[test]
    fn test_reset_draws_density_then_cells() {
        // density 0.6, then cells drawn against it: 0.1 -> 1, 0.9 -> 0
        let rng = SequenceSource::new(vec![0.6, 0.1, 0.9, 0.1, 0.9, 0.1]);
        let ca = Automaton::new(5, Some(Rule::zeros()), rng).unwrap();
        assert_eq!(ca.history().len(), 1);
        assert_eq!(ca.configuration(), &[1, 0, 1, 0, 1]);
        assert!((ca.initial_density() - 0.6).abs() < 1e-12);
        assert_eq!(ca.correct_classification(), 1);
        assert!(ca.particles().is_empty());
    }

    #[test]
    fn test_random_rule_when_none_given() {
        let mut a = Automaton::new(21, None, SeededSource::new(9)).unwrap();
        let mut b = Automaton::new(21, None, SeededSource::new(9)).unwrap();
        assert_eq!(a.rule(), b.rule());
        a.step();
        b.step();
        assert_eq!(a.history(), b.history());
    }

    #[test]
    fn test_periodic_neighborhood_at_zero() {
        // Positions 5, 6, 7, 0, 1, 2, 3 -> 1 1 0 1 0 0 0
        let cells = [1, 0, 0, 0, 0, 1, 1, 0];
        assert_eq!(neighborhood_key(&cells, 0), 0b1101000);
        // Positions 4, 5, 6, 7, 0, 1, 2 -> 0 1 1 0 1 0 0
        assert_eq!(neighborhood_key(&cells, 7), 0b0110100);
    }

    #[test]
    fn test_step_uses_exact_key() {
        // A rule that is 1 only for key 0b1101000 lights up exactly cell 0.
        let mut bits = [0u8; RULE_SIZE];
        bits[0b1101000] = 1;
        let rule = Rule::from_bits(&bits).unwrap();
        let mut ca = fixed(rule, vec![1, 0, 0, 0, 0, 1, 1, 0]);
        ca.step();
        assert_eq!(ca.configuration(), &[1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_sliding_window_matches_direct_keys() {
        let mut rng = SeededSource::new(11);
        for size in [1, 2, 3, 6, 7, 8, 31] {
            let rule = Rule::random(&mut rng);
            let mut ca = Automaton::new(size, Some(rule.clone()), &mut rng).unwrap();
            let before = ca.configuration().to_vec();
            ca.step();
            let expected: Vec<u8> = (0..size)
                .map(|i| rule.get(neighborhood_key(&before, i)))
                .collect();
            assert_eq!(ca.configuration(), expected.as_slice(), "size {size}");
        }
    }

    #[test]
    fn test_step_detects_particles() {
        // Identity on the center cell keeps the configuration.
        let mut bits = [0u8; RULE_SIZE];
        for (key, bit) in bits.iter_mut().enumerate() {
            *bit = ((key >> NEIGHBORHOOD_RADIUS) & 1) as u8;
        }
        let mut ca = fixed(Rule::from_bits(&bits).unwrap(), vec![0, 0, 1, 1, 1, 0, 0]);
        ca.step();
        assert_eq!(ca.configuration(), &[0, 0, 1, 1, 1, 0, 0]);
        let kinds: Vec<ParticleType> = ca.particles().iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![ParticleType::Alpha, ParticleType::Gamma]);
    }

    #[test]
    fn test_not_converged_before_window() {
        let mut ca = fixed(Rule::zeros(), vec![0; 9]);
        for _ in 0..3 {
            ca.step();
            assert!(!ca.is_converged());
        }
        ca.step();
        assert_eq!(ca.history().len(), 5);
        assert!(ca.is_converged());
    }

    #[test]
    fn test_oscillation_is_not_converged() {
        // Complement of the center cell flips every step.
        let mut bits = [0u8; RULE_SIZE];
        for (key, bit) in bits.iter_mut().enumerate() {
            *bit = 1 - ((key >> NEIGHBORHOOD_RADIUS) & 1) as u8;
        }
        let mut ca = fixed(Rule::from_bits(&bits).unwrap(), vec![0, 1, 0, 1, 1]);
        let steps = ca.run_until_settled(20);
        assert_eq!(steps, 20);
        assert!(!ca.is_converged());
    }

    #[test]
    fn test_run_until_settled_stops_early() {
        let mut ca = fixed(Rule::zeros(), vec![1, 0, 1, 1, 0, 1, 1]);
        let steps = ca.run_until_settled(100);
        // The mixed initial row must leave the trailing window first.
        assert_eq!(steps, 5);
        assert!(ca.is_converged());
    }

    #[test]
    fn test_fitness_needs_ten_configurations() {
        let mut ca = fixed(Rule::ones(), vec![1; 7]);
        for _ in 0..8 {
            ca.step();
        }
        assert_eq!(ca.history().len(), 9);
        assert_eq!(ca.fitness(), 0.0);
        ca.step();
        assert_eq!(ca.fitness(), 1.0);
    }

    #[test]
    fn test_fitness_scores() {
        // All ones, majority of ones -> 1.0
        let mut ca = fixed(Rule::ones(), vec![1, 1, 1, 0, 0]);
        assert_eq!(ca.correct_classification(), 1);
        for _ in 0..9 {
            ca.step();
        }
        assert_eq!(ca.outcome(), Outcome::AllOnes);
        assert_eq!(ca.fitness(), 1.0);

        // All ones, majority of zeros -> 0.0
        let mut ca = fixed(Rule::ones(), vec![1, 0, 0, 0, 0]);
        assert_eq!(ca.correct_classification(), 0);
        for _ in 0..9 {
            ca.step();
        }
        assert_eq!(ca.fitness(), 0.0);

        // All zeros, majority of zeros -> 1.0
        let mut ca = fixed(Rule::zeros(), vec![1, 0, 0, 0, 0]);
        for _ in 0..9 {
            ca.step();
        }
        assert_eq!(ca.outcome(), Outcome::AllZeros);
        assert_eq!(ca.fitness(), 1.0);

        // Exactly half is not a majority of ones.
        let ca = fixed(Rule::ones(), vec![1, 0, 1, 0]);
        assert_eq!(ca.correct_classification(), 0);
    }

    #[test]
    fn test_mixed_ending_scores_half() {
        let mut bits = [0u8; RULE_SIZE];
        for (key, bit) in bits.iter_mut().enumerate() {
            *bit = ((key >> NEIGHBORHOOD_RADIUS) & 1) as u8;
        }
        let mut ca = fixed(Rule::from_bits(&bits).unwrap(), vec![1, 1, 0, 1, 0, 0, 0]);
        for _ in 0..12 {
            ca.step();
        }
        assert_eq!(ca.outcome(), Outcome::Mixed);
        assert_eq!(ca.fitness(), UNDECIDED_FITNESS);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut ca = Automaton::new(31, Some(RulePreset::Gkl.rule()), SeededSource::new(5))
            .unwrap();
        ca.run_until_settled(10);
        ca.reset();
        assert_eq!(ca.history().len(), 1);
        assert!(ca.particles().is_empty());
        assert_eq!(ca.steps(), 0);
    }

    #[test]
    fn test_gkl_absorbs_isolated_zero() {
        let mut cells = vec![1u8; 21];
        cells[10] = 0;
        let mut ca = fixed(RulePreset::Gkl.rule(), cells);
        ca.step();
        assert_eq!(ca.outcome(), Outcome::AllOnes);
    }

    #[test]
    fn test_stats_snapshot() {
        let mut ca = fixed(Rule::zeros(), vec![0, 1, 0, 0, 1]);
        ca.run_until_settled(50);
        let stats = AutomatonStats::from_automaton(&ca);
        assert_eq!(stats.size, 5);
        assert_eq!(stats.steps, 5);
        assert!((stats.initial_density - 0.4).abs() < 1e-12);
        assert_eq!(stats.density, 0.0);
        assert_eq!(stats.outcome, Outcome::AllZeros);
        assert!(stats.converged);
        assert_eq!(stats.particles.total(), 0);
    }

    proptest! {
        #[test]
        fn prop_step_preserves_length_and_binary(
            bits in proptest::collection::vec(0u8..=1, RULE_SIZE),
            size in 7usize..96,
            seed in any::<u64>(),
            steps in 1usize..20,
        ) {
            let rule = Rule::from_bits(&bits).unwrap();
            let mut ca = Automaton::new(size, Some(rule), SeededSource::new(seed)).unwrap();
            for _ in 0..steps {
                ca.step();
                prop_assert_eq!(ca.configuration().len(), size);
                prop_assert!(ca.configuration().iter().all(|&c| c <= 1));
            }
            prop_assert_eq!(ca.history().len(), steps + 1);
        }

        #[test]
        fn prop_short_history_never_converged(
            bits in proptest::collection::vec(0u8..=1, RULE_SIZE),
            size in 1usize..64,
            seed in any::<u64>(),
            steps in 0usize..CONVERGENCE_WINDOW - 1,
        ) {
            let rule = Rule::from_bits(&bits).unwrap();
            let mut ca = Automaton::new(size, Some(rule), SeededSource::new(seed)).unwrap();
            for _ in 0..steps {
                ca.step();
            }
            prop_assert!(ca.history().len() < CONVERGENCE_WINDOW);
            prop_assert!(!ca.is_converged());
        }

        #[test]
        fn prop_identical_seeds_identical_history(
            seed in any::<u64>(),
            size in 7usize..64,
            steps in 0usize..40,
        ) {
            let mut rule_rng = SeededSource::new(seed ^ 0x5eed);
            let rule = Rule::random(&mut rule_rng);
            let mut a = Automaton::new(size, Some(rule.clone()), SeededSource::new(seed)).unwrap();
            let mut b = Automaton::new(size, Some(rule), SeededSource::new(seed)).unwrap();
            for _ in 0..steps {
                a.step();
                b.step();
            }
            prop_assert_eq!(a.history(), b.history());
        }
    }
}
