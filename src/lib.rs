//! Generic genetic-algorithm engine.
//!
//! An evolutionary optimizer that evolves a population of candidate
//! solutions across discrete generations using selection, crossover, and
//! mutation, guided by a user-supplied fitness function. Plug in a custom
//! genome representation and its genetic operators without rewriting the
//! evolutionary loop.
//!
//! # Core Traits
//!
//! - [`Genome`]: a candidate solution carrying its fitness
//! - [`Genotype`]: the genome capability — creation, random
//!   initialization, and the named operator set
//!
//! # Key Types
//!
//! - [`Engine`]: owns the population and runs the evolutionary loop
//! - [`EngineConfig`]: algorithm parameters (population size, operator
//!   rates, selection, ordering, elitism)
//! - [`Selector`]: uniform, roulette, or custom parent selection
//! - [`GenerationStats`]: per-generation fitness summary
//!
//! # Example
//!
//! ```
//! use evokit::{BitGenotype, BitString, Engine, EngineConfig, Selector, CROSSOVER, MUTATION};
//!
//! let config = EngineConfig::default()
//!     .with_population_size(30)
//!     .with_max_generations(50)
//!     .with_rate(CROSSOVER, 0.9)
//!     .with_rate(MUTATION, 0.02)
//!     .with_selector(Selector::Roulette)
//!     .with_preserve(1)
//!     .with_seed(42);
//!
//! let mut engine = Engine::new(
//!     BitGenotype::new(16),
//!     |g: &BitString| g.value() as f64 / 65_536.0,
//!     config,
//! )
//! .expect("valid configuration");
//!
//! engine.evolve();
//! println!("best: {:?}", engine.fittest());
//! ```
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*

pub mod bitstring;
mod config;
mod engine;
mod error;
mod registry;
mod replacement;
mod selection;
mod stats;
mod types;

pub use bitstring::{BitGenotype, BitString};
pub use config::{EngineConfig, SortOrder, DEFAULT_MAX_GENERATIONS, DEFAULT_POPULATION_SIZE};
pub use engine::{Engine, RunState, TerminationFn};
pub use error::ConfigError;
pub use registry::{OperatorFn, OperatorRegistry, OperatorSet, CROSSOVER, MUTATION};
pub use replacement::Replacement;
pub use selection::{SelectionContext, Selector, SelectorFn};
pub use stats::GenerationStats;
pub use types::{Fitness, FitnessFn, Genome, Genotype};
