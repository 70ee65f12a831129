//! Domain-wall ("particle") detection on a single configuration.

use serde::{Deserialize, Serialize};

/// Classification of a boundary by the 3-cell pattern around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleType {
    Alpha,
    Beta,
    Gamma,
    Domain,
}

impl ParticleType {
    /// Classify a 3-bit pattern `(left << 2) | (center << 1) | right`.
    pub fn classify(pattern: u8) -> Self {
        match pattern {
            0b001 | 0b011 => ParticleType::Alpha,
            0b110 | 0b100 => ParticleType::Gamma,
            0b010 | 0b101 => ParticleType::Beta,
            _ => ParticleType::Domain,
        }
    }
}

/// A boundary between differing neighbors in the current configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Particle {
    /// Lattice index of the cell that differs from its left neighbor.
    pub position: usize,
    #[serde(rename = "type")]
    pub kind: ParticleType,
    /// Always 0: trajectories are not tracked across steps.
    pub velocity: i32,
}

/// Detect particles, replacing the contents of `out`.
pub fn detect_particles_into(cells: &[u8], out: &mut Vec<Particle>) {
    out.clear();
    let size = cells.len();
    for i in 0..size {
        let prev = cells[(i + size - 1) % size];
        let current = cells[i];
        if prev == current {
            continue;
        }
        let next = cells[(i + 1) % size];
        let pattern = (prev << 2) | (current << 1) | next;
        out.push(Particle {
            position: i,
            kind: ParticleType::classify(pattern),
            velocity: 0,
        });
    }
}

/// Detect particles in a configuration.
pub fn detect_particles(cells: &[u8]) -> Vec<Particle> {
    let mut particles = Vec::new();
    detect_particles_into(cells, &mut particles);
    particles
}

/// Per-type particle totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleCounts {
    pub alpha: usize,
    pub beta: usize,
    pub gamma: usize,
    pub domain: usize,
}

impl ParticleCounts {
    pub fn from_particles(particles: &[Particle]) -> Self {
        let mut counts = Self::default();
        for particle in particles {
            match particle.kind {
                ParticleType::Alpha => counts.alpha += 1,
                ParticleType::Beta => counts.beta += 1,
                ParticleType::Gamma => counts.gamma += 1,
                ParticleType::Domain => counts.domain += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.alpha + self.beta + self.gamma + self.domain
    }
}
