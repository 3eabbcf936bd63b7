//! The canonical bit-vector genome.
//!
//! [`BitString`] is a fixed-length vector of bits with an `f64` fitness;
//! [`BitGenotype`] is its capability, advertising one-point crossover and
//! single-bit flip mutation under the conventional operator names. It
//! doubles as the reference representation for the engine's tests and the
//! demo driver.

use crate::registry::{OperatorSet, CROSSOVER, MUTATION};
use crate::types::{Genome, Genotype};
use rand::Rng;

/// A fixed-length binary genome.
#[derive(Debug, Clone, PartialEq)]
pub struct BitString {
    bits: Vec<bool>,
    fitness: f64,
}

impl BitString {
    /// An all-zero genome of the given length.
    pub fn zeros(len: usize) -> Self {
        Self::from_bits(vec![false; len])
    }

    /// Builds a genome from explicit genetic material, fitness unset.
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits, fitness: 0.0 }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The genome read as an unsigned binary number, bit 0 most
    /// significant.
    ///
    /// # Panics
    /// Panics if the genome is longer than 64 bits.
    pub fn value(&self) -> u64 {
        assert!(self.bits.len() <= 64, "value() supports up to 64 bits");
        self.bits
            .iter()
            .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit))
    }

    /// Flips one bit in place.
    pub fn flip(&mut self, index: usize) {
        self.bits[index] = !self.bits[index];
    }

    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for bit in &mut self.bits {
            *bit = rng.random_bool(0.5);
        }
        self.fitness = 0.0;
    }
}

impl Genome for BitString {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

/// One-point crossover.
///
/// Draws a cut point in `[1, L-1]` and swaps suffixes: the first child is
/// `mom`'s prefix followed by `dad`'s suffix, the second the
/// complementary combination. Both children have fitness unset.
///
/// # Panics
/// Panics if the parents differ in length or are shorter than two bits.
pub fn one_point_crossover<R: Rng + ?Sized>(
    mom: &BitString,
    dad: &BitString,
    rng: &mut R,
) -> (BitString, BitString) {
    let len = mom.len();
    assert_eq!(len, dad.len(), "parents must have equal length");
    assert!(len >= 2, "parents must have at least two bits");

    let cut = rng.random_range(1..len);
    let mut a = Vec::with_capacity(len);
    let mut b = Vec::with_capacity(len);
    a.extend_from_slice(&mom.bits[..cut]);
    a.extend_from_slice(&dad.bits[cut..]);
    b.extend_from_slice(&dad.bits[..cut]);
    b.extend_from_slice(&mom.bits[cut..]);

    (BitString::from_bits(a), BitString::from_bits(b))
}

/// Single-bit flip mutation: one uniformly chosen bit is inverted in a
/// copy of the genome, fitness unset.
pub fn flip_mutation<R: Rng + ?Sized>(genome: &BitString, rng: &mut R) -> BitString {
    let mut child = BitString::from_bits(genome.bits.clone());
    let index = rng.random_range(0..child.len());
    child.flip(index);
    child
}

/// Capability for fixed-length binary genomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitGenotype {
    len: usize,
}

impl BitGenotype {
    /// A genotype of `len`-bit genomes.
    ///
    /// # Panics
    /// Panics if `len < 2` (one-point crossover needs both sides of a
    /// cut).
    pub fn new(len: usize) -> Self {
        assert!(len >= 2, "bit genomes must have at least two bits");
        Self { len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Genotype for BitGenotype {
    type Genome = BitString;

    fn create(&self) -> BitString {
        BitString::zeros(self.len)
    }

    fn initialize<R: Rng>(&self, genome: &mut BitString, rng: &mut R) {
        genome.randomize(rng);
    }

    fn operators(&self) -> OperatorSet<BitString> {
        let mut set = OperatorSet::new();
        set.register(
            CROSSOVER,
            |parents: &[&BitString], rng: &mut dyn rand::RngCore| {
                let (a, b) = one_point_crossover(parents[0], parents[1], rng);
                vec![a, b]
            },
        );
        set.register(
            MUTATION,
            |parents: &[&BitString], rng: &mut dyn rand::RngCore| {
                vec![flip_mutation(parents[0], rng)]
            },
        );
        set
    }
}

// ===========================================================================
// Tests
// ===========================================================================
