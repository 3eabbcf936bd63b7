//! Core trait definitions for the evolutionary engine.
//!
//! The central traits — [`Genome`] and [`Genotype`] — define the contract
//! between the generic engine and domain-specific genome representations.
//! The fitness function itself is not part of either trait: it is an
//! independent callback owned by the engine and swappable at runtime.

use crate::registry::OperatorSet;
use rand::Rng;

/// Marker trait for fitness values.
///
/// Fitness must support comparison and be cheaply copyable. Whether a
/// larger or smaller value is "better" is decided by the engine's
/// ordering mode, not by the fitness type.
///
/// Built-in implementations exist for `f64` and `f32`.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// The value a freshly created genome carries before evaluation.
    fn zero() -> Self;

    /// Converts the fitness to `f64` for statistics and selection.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn zero() -> Self {
        0.0
    }

    fn to_f64(self) -> f64 {
        self
    }
}

impl Fitness for f32 {
    fn zero() -> Self {
        0.0
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// A candidate solution in the population.
///
/// Genomes carry their own fitness value. The engine computes fitness via
/// its fitness function exactly once per generation and stores the result
/// through [`set_fitness`](Genome::set_fitness); the internal
/// representation is opaque to the engine.
pub trait Genome: Clone + Send + Sync + 'static {
    /// The fitness type. Must implement [`Fitness`].
    type Fitness: Fitness;

    /// Returns the current fitness of this genome.
    fn fitness(&self) -> Self::Fitness;

    /// Sets the fitness of this genome.
    ///
    /// Called by the engine after evaluation.
    fn set_fitness(&mut self, fitness: Self::Fitness);
}

/// The genome capability supplied to the engine at construction.
///
/// A genotype knows how to build blank genomes, how to randomize fresh
/// ones, and which named genetic operators its genome supports. Operators
/// are registered explicitly through the returned [`OperatorSet`]; there
/// is no global registry and no load-order sensitivity.
///
/// Genomes produced by crossover are built directly from explicit genetic
/// material through the concrete genome's own constructors (e.g.
/// [`BitString::from_bits`](crate::BitString::from_bits)) inside the
/// registered operator; [`initialize`](Genotype::initialize) is only
/// called on blank genomes created for a fresh population.
pub trait Genotype: Send + Sync {
    /// The genome (solution) type for this capability.
    type Genome: Genome;

    /// Creates a blank genome with no genetic material of interest.
    fn create(&self) -> Self::Genome;

    /// Randomizes a freshly created genome in place.
    fn initialize<R: Rng>(&self, genome: &mut Self::Genome, rng: &mut R);

    /// Returns the named genetic operators this genome supports.
    fn operators(&self) -> OperatorSet<Self::Genome>;
}

/// The fitness callback: a pure score over one genome.
pub type FitnessFn<G> = Box<dyn Fn(&G) -> <G as Genome>::Fitness + Send + Sync>;
