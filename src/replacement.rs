//! Generation-transition policy.

use crate::types::Genome;

/// How the population is replaced between generations.
///
/// Elitism is a policy value injected into the engine, not a separate
/// engine variant: `Elitist(k)` appends the top-`k` individuals of the
/// ranked pre-replacement population verbatim on top of the generated
/// children, so the realized population size becomes `population_size + k`
/// for every generation after the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Replacement {
    /// Replace the whole population with generated children.
    #[default]
    Full,

    /// Replace with children plus the top-`k` of the previous generation.
    Elitist(usize),
}

impl Replacement {
    /// Number of individuals carried over unconditionally.
    pub fn preserved(&self) -> usize {
        match self {
            Replacement::Full => 0,
            Replacement::Elitist(k) => *k,
        }
    }

    /// Clones the individuals this policy carries into the next
    /// generation. `ranked` must already be sorted per the active
    /// ordering, best first.
    pub(crate) fn carry_over<G: Genome>(&self, ranked: &[G]) -> Vec<G> {
        match self {
            Replacement::Full => Vec::new(),
            Replacement::Elitist(k) => ranked[..(*k).min(ranked.len())].to_vec(),
        }
    }
}
