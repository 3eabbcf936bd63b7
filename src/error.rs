//! Construction-time error types.

use thiserror::Error;

/// Errors surfaced when an [`Engine`](crate::Engine) is configured.
///
/// All failures are fatal and reported before any evolution starts.
/// Once construction succeeds, the evolutionary loop itself cannot fail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// The operator rate map was empty.
    #[error("operator rate map must not be empty")]
    EmptyOperators,

    /// An application rate was outside `[0, 1]`.
    #[error("application rate {rate} for operator `{name}` is outside [0, 1]")]
    RateOutOfRange { name: String, rate: f64 },

    /// The genotype advertises an operator with no configured rate.
    #[error("no application rate configured for operator `{0}`")]
    MissingRate(String),

    /// Population size was zero.
    #[error("population size must be positive")]
    ZeroPopulation,

    /// Max generations was zero.
    #[error("max generations must be positive")]
    ZeroGenerations,

    /// Elitist preservation count exceeds the population size.
    #[error("preservation count {preserve} exceeds population size {population_size}")]
    PreserveTooLarge {
        preserve: usize,
        population_size: usize,
    },
}
