//! Engine configuration.
//!
//! [`EngineConfig`] holds all parameters that control the evolutionary
//! loop. The operator rate map and (for non-trivial runs) the selector
//! are the parts a caller always supplies; everything else has the
//! documented defaults.

use crate::error::ConfigError;
use crate::replacement::Replacement;
use crate::selection::Selector;
use crate::types::Genome;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Default number of individuals in the population.
pub const DEFAULT_POPULATION_SIZE: usize = 500;

/// Default maximum number of generations.
pub const DEFAULT_MAX_GENERATIONS: usize = 100;

/// Fitness ranking direction of the population.
///
/// Index 0 of the evaluated population is always the fittest under the
/// active mode: the largest fitness under `Descending`, the smallest
/// under `Ascending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortOrder {
    /// Worst (smallest) fitness first; for minimization problems.
    Ascending,
    /// Best (largest) fitness first.
    #[default]
    Descending,
}

impl FromStr for SortOrder {
    type Err = ();

    /// Accepts `asc`/`ascending` and `desc`/`descending`,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, ()> {
        if s.eq_ignore_ascii_case("asc") || s.eq_ignore_ascii_case("ascending") {
            Ok(SortOrder::Ascending)
        } else if s.eq_ignore_ascii_case("desc") || s.eq_ignore_ascii_case("descending") {
            Ok(SortOrder::Descending)
        } else {
            Err(())
        }
    }
}

/// Configuration for an [`Engine`](crate::Engine).
///
/// # Builder Pattern
///
/// ```
/// use evokit::{EngineConfig, Selector, SortOrder, CROSSOVER, MUTATION};
/// use evokit::BitString;
///
/// let config: EngineConfig<BitString> = EngineConfig::default()
///     .with_population_size(50)
///     .with_max_generations(200)
///     .with_rate(CROSSOVER, 0.9)
///     .with_rate(MUTATION, 0.05)
///     .with_selector(Selector::Roulette)
///     .with_ordering(SortOrder::Descending)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct EngineConfig<G: Genome> {
    /// Number of individuals in each generated population. Must be > 0.
    pub population_size: usize,

    /// Generation bound for [`evolve`](crate::Engine::evolve). Must be > 0.
    pub max_generations: usize,

    /// Fitness ranking direction.
    pub ordering: SortOrder,

    /// Operator name → application rate in `[0, 1]`. Must be non-empty
    /// and cover every operator the genotype advertises.
    pub rates: HashMap<String, f64>,

    /// Parent selection strategy.
    pub selector: Selector<G>,

    /// Generation-transition policy.
    pub replacement: Replacement,

    /// Random seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,

    /// Whether to evaluate fitness in parallel. Only effective when the
    /// crate is built with the `parallel` feature.
    pub parallel: bool,
}

impl<G: Genome> Default for EngineConfig<G> {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            max_generations: DEFAULT_MAX_GENERATIONS,
            ordering: SortOrder::default(),
            rates: HashMap::new(),
            selector: Selector::default(),
            replacement: Replacement::default(),
            seed: None,
            parallel: false,
        }
    }
}

impl<G: Genome> EngineConfig<G> {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the fitness ranking direction.
    pub fn with_ordering(mut self, ordering: SortOrder) -> Self {
        self.ordering = ordering;
        self
    }

    /// Sets one operator's application rate, clamped to `[0, 1]`.
    pub fn with_rate(mut self, name: impl Into<String>, rate: f64) -> Self {
        self.rates.insert(name.into(), rate.clamp(0.0, 1.0));
        self
    }

    /// Replaces the whole rate map. Rates are validated, not clamped.
    pub fn with_rates(mut self, rates: HashMap<String, f64>) -> Self {
        self.rates = rates;
        self
    }

    /// Sets the parent selection strategy.
    pub fn with_selector(mut self, selector: Selector<G>) -> Self {
        self.selector = selector;
        self
    }

    /// Sets the generation-transition policy.
    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = replacement;
        self
    }

    /// Convenience for elitism: preserve the top `k` individuals each
    /// generation. `k = 0` disables preservation.
    pub fn with_preserve(self, k: usize) -> Self {
        self.with_replacement(if k == 0 {
            Replacement::Full
        } else {
            Replacement::Elitist(k)
        })
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    ///
    /// Rate coverage of the genotype's advertised operators is checked at
    /// engine construction, where the genotype is known.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if self.max_generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        if self.rates.is_empty() {
            return Err(ConfigError::EmptyOperators);
        }
        for (name, &rate) in &self.rates {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::RateOutOfRange {
                    name: name.clone(),
                    rate,
                });
            }
        }
        if self.replacement.preserved() > self.population_size {
            return Err(ConfigError::PreserveTooLarge {
                preserve: self.replacement.preserved(),
                population_size: self.population_size,
            });
        }
        Ok(())
    }
}

impl<G: Genome> fmt::Debug for EngineConfig<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rates: Vec<(&str, f64)> = self
            .rates
            .iter()
            .map(|(name, &rate)| (name.as_str(), rate))
            .collect();
        rates.sort_unstable_by_key(|r| r.0);
        f.debug_struct("EngineConfig")
            .field("population_size", &self.population_size)
            .field("max_generations", &self.max_generations)
            .field("ordering", &self.ordering)
            .field("rates", &rates)
            .field("selector", &self.selector)
            .field("replacement", &self.replacement)
            .field("seed", &self.seed)
            .field("parallel", &self.parallel)
            .finish()
    }
}
