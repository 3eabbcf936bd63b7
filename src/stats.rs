//! Per-generation fitness statistics.
//!
//! One [`GenerationStats`] entry is recorded per generation, immediately
//! after evaluation, and never modified afterwards. The engine's history
//! is dense: entry `n` describes generation `n`.

use crate::types::{Fitness, Genome};

/// Aggregate fitness summary of one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Sum of all fitness values.
    pub sum: f64,
    /// Mean fitness (`sum / population length`).
    pub avg: f64,
    /// Smallest fitness in the population.
    pub min: f64,
    /// Largest fitness in the population.
    pub max: f64,
}

impl GenerationStats {
    /// Measures a population.
    ///
    /// The reduction is independent of the order in which fitness values
    /// were computed: the same population produces bit-identical
    /// statistics whether evaluation ran sequentially or in parallel.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn measure<G: Genome>(population: &[G]) -> Self {
        assert!(!population.is_empty(), "cannot measure an empty population");

        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for genome in population {
            let f = genome.fitness().to_f64();
            sum += f;
            min = min.min(f);
            max = max.max(f);
        }

        Self {
            sum,
            avg: sum / population.len() as f64,
            min,
            max,
        }
    }
}
