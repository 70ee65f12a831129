//! Genetic operators on rule tables.

use crate::random::RandomSource;
use crate::schema::{RULE_SIZE, Rule};

/// Single-point crossover at a uniformly drawn point in `0..RULE_SIZE`.
pub fn crossover<R: RandomSource + ?Sized>(parent1: &Rule, parent2: &Rule, rng: &mut R) -> Rule {
    let point = rng.next_index(RULE_SIZE);
    crossover_at(parent1, parent2, point)
}

/// Offspring with `parent1`'s genes before `point` and `parent2`'s from it on.
pub fn crossover_at(parent1: &Rule, parent2: &Rule, point: usize) -> Rule {
    let point = point.min(RULE_SIZE);
    let mut child = parent2.clone();
    child.bits_mut()[..point].copy_from_slice(&parent1.bits()[..point]);
    child
}

/// Flip each gene independently with probability `rate`.
pub fn mutate<R: RandomSource + ?Sized>(rule: &mut Rule, rate: f64, rng: &mut R) {
    for gene in rule.bits_mut().iter_mut() {
        if rng.next_unit() < rate {
            *gene = 1 - *gene;
        }
    }
}

/// Mean pairwise Hamming distance, normalized by the rule size.
pub fn population_diversity(rules: &[Rule]) -> f64 {
    if rules.len() < 2 {
        return 0.0;
    }

    let mut total = 0usize;
    let mut count = 0usize;
    for i in 0..rules.len() {
        for j in (i + 1)..rules.len() {
            total += rules[i].hamming_distance(&rules[j]);
            count += 1;
        }
    }

    total as f64 / (count * RULE_SIZE) as f64
}
