//! Selection strategies.
//!
//! Selection picks one individual from the current population to serve as
//! a parent. Built-in strategies are uniform-random and
//! fitness-proportionate (roulette); arbitrary strategies plug in through
//! [`Selector::Custom`], scoped to the engine instance that owns them.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use crate::stats::GenerationStats;
use crate::types::{Fitness, Genome};
use rand::{Rng, RngCore};
use std::fmt;
use std::sync::Arc;

/// Read-only view handed to selection strategies.
///
/// The engine guarantees the population has been evaluated and ranked for
/// the current generation before any selection runs, so `stats` is always
/// this generation's entry.
pub struct SelectionContext<'a, G: Genome> {
    /// The ranked population.
    pub population: &'a [G],
    /// This generation's fitness summary.
    pub stats: &'a GenerationStats,
    /// The current generation number.
    pub generation: usize,
}

/// A pluggable selection strategy: engine state in, population index out.
pub type SelectorFn<G> =
    Arc<dyn Fn(&SelectionContext<'_, G>, &mut dyn RngCore) -> usize + Send + Sync>;

/// Strategy for choosing parents.
#[derive(Clone)]
pub enum Selector<G: Genome> {
    /// Every individual is equally likely. O(1) per selection.
    Uniform,

    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Draws `limit = sum × uniform[0, 1)` against the current
    /// generation's fitness sum and linearly scans the population until
    /// the accumulated fitness reaches the limit. A limit at or below the
    /// first individual's fitness selects index 0. Assumes non-negative
    /// fitness values.
    ///
    /// O(n) per selection; the dominant per-generation cost for large
    /// populations.
    Roulette,

    /// A caller-supplied strategy.
    Custom(SelectorFn<G>),
}

impl<G: Genome> Default for Selector<G> {
    fn default() -> Self {
        Selector::Uniform
    }
}

impl<G: Genome> Selector<G> {
    /// Selects one individual, returning its population index.
    ///
    /// # Panics
    /// Panics if the population is empty.
    pub fn select<R: Rng>(&self, ctx: &SelectionContext<'_, G>, rng: &mut R) -> usize {
        assert!(
            !ctx.population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selector::Uniform => rng.random_range(0..ctx.population.len()),
            Selector::Roulette => roulette(ctx, rng),
            Selector::Custom(f) => f(ctx, rng),
        }
    }
}

impl<G: Genome> fmt::Debug for Selector<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Uniform => f.write_str("Uniform"),
            Selector::Roulette => f.write_str("Roulette"),
            Selector::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Roulette wheel scan.
///
/// Returns the first index whose cumulative fitness reaches the drawn
/// limit, so a zero limit lands on index 0 rather than underflowing the
/// scan.
fn roulette<G: Genome, R: Rng>(ctx: &SelectionContext<'_, G>, rng: &mut R) -> usize {
    let n = ctx.population.len();
    if n == 1 {
        return 0;
    }

    let limit = ctx.stats.sum * rng.random_range(0.0..1.0);
    let mut cumulative = 0.0;
    for (i, genome) in ctx.population.iter().enumerate() {
        cumulative += genome.fitness().to_f64();
        if cumulative >= limit {
            return i;
        }
    }

    n - 1 // floating-point fallback
}
