//! Named genetic operators and their application rates.
//!
//! A genotype advertises its operators through an [`OperatorSet`]: a
//! name-keyed collection of closures, each taking one or more parent
//! genomes and returning zero or more children. The engine binds that set
//! to the configured per-name application rates in an
//! [`OperatorRegistry`] at construction.
//!
//! The engine never inspects an operator's arity or internals — it passes
//! whatever selection produced and forwards whatever the operator
//! returns. Applying a name with no registered implementation is a silent
//! no-op yielding an empty batch, which lets a genome implement only a
//! subset of the conventional operators.

use crate::error::ConfigError;
use crate::types::Genome;
use rand::{Rng, RngCore};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Conventional name of the recombination operator.
pub const CROSSOVER: &str = "crossover";

/// Conventional name of the perturbation operator.
pub const MUTATION: &str = "mutation";

/// A genetic operator: parents in, children out.
pub type OperatorFn<G> = Arc<dyn Fn(&[&G], &mut dyn RngCore) -> Vec<G> + Send + Sync>;

/// Named operator implementations supplied by a genotype.
///
/// Populated via explicit [`register`](OperatorSet::register) calls —
/// there is no process-wide registry.
#[derive(Clone)]
pub struct OperatorSet<G: Genome> {
    ops: HashMap<String, OperatorFn<G>>,
}

impl<G: Genome> Default for OperatorSet<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Genome> OperatorSet<G> {
    pub fn new() -> Self {
        Self {
            ops: HashMap::new(),
        }
    }

    /// Registers an operator under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, op: F)
    where
        F: Fn(&[&G], &mut dyn RngCore) -> Vec<G> + Send + Sync + 'static,
    {
        self.ops.insert(name.into(), Arc::new(op));
    }

    /// Names of all registered operators, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ops.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&OperatorFn<G>> {
        self.ops.get(name)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl<G: Genome> fmt::Debug for OperatorSet<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("OperatorSet").field("ops", &names).finish()
    }
}

struct OperatorEntry<G: Genome> {
    rate: f64,
    op: Option<OperatorFn<G>>,
}

/// The engine-side binding of operator names to `{implementation, rate}`.
///
/// Built once at engine construction. Every name advertised by the
/// genotype must have a configured rate; a configured rate without an
/// implementation is allowed (its application is a no-op).
pub struct OperatorRegistry<G: Genome> {
    entries: HashMap<String, OperatorEntry<G>>,
}

impl<G: Genome> OperatorRegistry<G> {
    /// Binds an operator set to the configured rates.
    pub fn bind(set: OperatorSet<G>, rates: &HashMap<String, f64>) -> Result<Self, ConfigError> {
        if rates.is_empty() {
            return Err(ConfigError::EmptyOperators);
        }
        for (name, &rate) in rates {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::RateOutOfRange {
                    name: name.clone(),
                    rate,
                });
            }
        }
        if let Some(name) = set.names().find(|name| !rates.contains_key(*name)) {
            return Err(ConfigError::MissingRate(name.to_string()));
        }

        let mut ops = set.ops;
        let entries = rates
            .iter()
            .map(|(name, &rate)| {
                let op = ops.remove(name);
                (name.clone(), OperatorEntry { rate, op })
            })
            .collect();
        Ok(Self { entries })
    }

    /// The configured application rate for `name`, if any.
    pub fn rate(&self, name: &str) -> Option<f64> {
        self.entries.get(name).map(|e| e.rate)
    }

    /// Whether an implementation is registered under `name`.
    pub fn is_registered(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|e| e.op.is_some())
    }

    /// Independent Bernoulli trial against the configured rate.
    ///
    /// A uniform `[0, 1)` draw is compared against the rate, so rate 0
    /// never fires and rate 1 always fires. An unknown name never fires.
    /// The implementation's existence is not checked.
    pub fn gate<R: Rng>(&self, name: &str, rng: &mut R) -> bool {
        match self.entries.get(name) {
            Some(entry) => rng.random_range(0.0..1.0) < entry.rate,
            None => false,
        }
    }

    /// Applies the operator registered under `name` to `parents`.
    ///
    /// Returns whatever the operator returns; the empty batch when no
    /// implementation is registered.
    pub fn apply(&self, name: &str, parents: &[&G], rng: &mut dyn RngCore) -> Vec<G> {
        match self.entries.get(name).and_then(|e| e.op.as_ref()) {
            Some(op) => op(parents, rng),
            None => Vec::new(),
        }
    }
}

impl<G: Genome> fmt::Debug for OperatorRegistry<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<(&str, f64, bool)> = self
            .entries
            .iter()
            .map(|(name, e)| (name.as_str(), e.rate, e.op.is_some()))
            .collect();
        entries.sort_unstable_by_key(|e| e.0);
        f.debug_struct("OperatorRegistry")
            .field("entries", &entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Clone, Debug, PartialEq)]
    struct Cell {
        value: u32,
        fitness: f64,
    }

    impl Genome for Cell {
        type Fitness = f64;
        fn fitness(&self) -> f64 {
            self.fitness
        }
        fn set_fitness(&mut self, f: f64) {
            self.fitness = f;
        }
    }

    fn doubling_set() -> OperatorSet<Cell> {
        let mut set = OperatorSet::new();
        set.register("double", |parents: &[&Cell], _rng: &mut dyn RngCore| {
            vec![Cell {
                value: parents[0].value * 2,
                fitness: 0.0,
            }]
        });
        set
    }

    fn rates(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries
            .iter()
            .map(|(name, rate)| (name.to_string(), *rate))
            .collect()
    }

    #[test]
    fn test_bind_rejects_empty_rates() {
        let result = OperatorRegistry::bind(doubling_set(), &HashMap::new());
        assert_eq!(result.unwrap_err(), ConfigError::EmptyOperators);
    }

    #[test]
    fn test_bind_rejects_out_of_range_rate() {
        let result = OperatorRegistry::bind(doubling_set(), &rates(&[("double", 1.5)]));
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::RateOutOfRange { .. }
        ));
    }

    #[test]
    fn test_bind_rejects_missing_rate_for_advertised_operator() {
        let result = OperatorRegistry::bind(doubling_set(), &rates(&[("other", 0.5)]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingRate("double".into())
        );
    }

    #[test]
    fn test_bind_allows_rate_without_implementation() {
        let registry =
            OperatorRegistry::bind(doubling_set(), &rates(&[("double", 0.5), ("ghost", 0.9)]))
                .unwrap();
        assert_eq!(registry.rate("ghost"), Some(0.9));
        assert!(!registry.is_registered("ghost"));
        assert!(registry.is_registered("double"));
    }

    #[test]
    fn test_apply_forwards_to_implementation() {
        let registry = OperatorRegistry::bind(doubling_set(), &rates(&[("double", 1.0)])).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let parent = Cell {
            value: 21,
            fitness: 0.0,
        };
        let children = registry.apply("double", &[&parent], &mut rng);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].value, 42);
    }

    #[test]
    fn test_apply_unregistered_is_empty() {
        let registry = OperatorRegistry::bind(doubling_set(), &rates(&[("double", 1.0)])).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let parent = Cell {
            value: 1,
            fitness: 0.0,
        };
        assert!(registry.apply("unknown", &[&parent], &mut rng).is_empty());
    }

    #[test]
    fn test_gate_rate_zero_never_fires() {
        let registry = OperatorRegistry::bind(doubling_set(), &rates(&[("double", 0.0)])).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            assert!(!registry.gate("double", &mut rng));
        }
    }

    #[test]
    fn test_gate_rate_one_always_fires() {
        let registry = OperatorRegistry::bind(doubling_set(), &rates(&[("double", 1.0)])).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            assert!(registry.gate("double", &mut rng));
        }
    }

    #[test]
    fn test_gate_unknown_name_never_fires() {
        let registry = OperatorRegistry::bind(doubling_set(), &rates(&[("double", 1.0)])).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        assert!(!registry.gate("unknown", &mut rng));
    }

    #[test]
    fn test_gate_intermediate_rate_fires_proportionally() {
        let registry = OperatorRegistry::bind(doubling_set(), &rates(&[("double", 0.3)])).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let n = 10_000;
        let fired = (0..n).filter(|_| registry.gate("double", &mut rng)).count();
        assert!(
            (2_500..3_500).contains(&fired),
            "expected ~30% firing rate, got {fired}/{n}"
        );
    }
}
