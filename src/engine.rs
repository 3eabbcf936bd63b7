//! The evolutionary engine.
//!
//! [`Engine`] owns the population and orchestrates the full lifecycle:
//! initialize → evaluate → select → recombine/mutate → replace, repeated
//! until termination. Construction is eager: generation 0 is fully
//! materialized, evaluated and ranked before [`Engine::new`] returns.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*

use crate::config::{EngineConfig, SortOrder};
use crate::error::ConfigError;
use crate::registry::{OperatorRegistry, CROSSOVER, MUTATION};
use crate::replacement::Replacement;
use crate::selection::{SelectionContext, Selector};
use crate::stats::GenerationStats;
use crate::types::{FitnessFn, Genome, Genotype};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::Arc;

/// Read-only engine state handed to termination predicates and other
/// external observers.
pub struct RunState<'a, G: Genome> {
    /// Current generation number.
    pub generation: usize,
    /// The configured generation bound.
    pub max_generations: usize,
    /// The evaluated, ranked population.
    pub population: &'a [G],
    /// Per-generation statistics, indexed by generation number.
    pub history: &'a [GenerationStats],
}

/// A termination predicate over the engine's observable state.
pub type TerminationFn<G> = Arc<dyn Fn(&RunState<'_, G>) -> bool + Send + Sync>;

/// The evolutionary engine.
///
/// # Usage
///
/// ```
/// use evokit::{BitGenotype, BitString, Engine, EngineConfig, Genome, Selector, CROSSOVER, MUTATION};
///
/// let config = EngineConfig::default()
///     .with_population_size(20)
///     .with_max_generations(30)
///     .with_rate(CROSSOVER, 0.9)
///     .with_rate(MUTATION, 0.05)
///     .with_selector(Selector::Roulette)
///     .with_seed(42);
///
/// let mut engine = Engine::new(
///     BitGenotype::new(8),
///     |g: &BitString| g.value() as f64 / 256.0,
///     config,
/// )
/// .unwrap();
///
/// engine.evolve();
/// assert_eq!(engine.generation(), 30);
/// assert_eq!(engine.statistics().len(), 31);
/// assert_eq!(engine.fittest().fitness(), engine.statistics()[30].max);
/// ```
pub struct Engine<P: Genotype> {
    genotype: P,
    population: Vec<P::Genome>,
    registry: OperatorRegistry<P::Genome>,
    selector: Selector<P::Genome>,
    fitness_fn: FitnessFn<P::Genome>,
    termination: Option<TerminationFn<P::Genome>>,
    ordering: SortOrder,
    replacement: Replacement,
    max_generations: usize,
    population_size: usize,
    generation: usize,
    history: Vec<GenerationStats>,
    parallel: bool,
    rng: StdRng,
}

impl<P: Genotype> Engine<P> {
    /// Builds an engine and runs generation 0.
    ///
    /// Validates the configuration, binds the genotype's operators to the
    /// configured rates, then initializes and evaluates the first
    /// population — on success the engine is immediately queryable
    /// ([`fittest`](Self::fittest), [`statistics`](Self::statistics)).
    pub fn new<F>(
        genotype: P,
        fitness: F,
        config: EngineConfig<P::Genome>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&P::Genome) -> <P::Genome as Genome>::Fitness + Send + Sync + 'static,
    {
        config.validate()?;
        let registry = OperatorRegistry::bind(genotype.operators(), &config.rates)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut engine = Self {
            genotype,
            population: Vec::new(),
            registry,
            selector: config.selector,
            fitness_fn: Box::new(fitness),
            termination: None,
            ordering: config.ordering,
            replacement: config.replacement,
            max_generations: config.max_generations,
            population_size: config.population_size,
            generation: 0,
            history: Vec::new(),
            parallel: config.parallel,
            rng,
        };
        engine.initialize_population();
        Ok(engine)
    }

    /// (Re)creates the population from scratch.
    ///
    /// Builds `population_size` fresh genomes via the genotype's
    /// `create` + `initialize`, resets the generation counter and the
    /// statistics history, and evaluates. Records the generation-0
    /// statistics entry.
    pub fn initialize_population(&mut self) {
        self.generation = 0;
        self.history.clear();
        self.population = (0..self.population_size)
            .map(|_| {
                let mut genome = self.genotype.create();
                self.genotype.initialize(&mut genome, &mut self.rng);
                genome
            })
            .collect();
        self.evaluate();
    }

    /// Evaluates the current population.
    ///
    /// This is the single place fitness is computed; it runs exactly once
    /// per generation, immediately after population replacement. Every
    /// genome's stored fitness is recomputed through the fitness
    /// function, the population is ranked in place per the ordering mode
    /// (ties in any relative order), and this generation's statistics
    /// entry is recorded.
    pub fn evaluate(&mut self) {
        self.compute_fitness();
        let stats = GenerationStats::measure(&self.population);
        self.rank_population();
        // History stays dense and indexed by generation; re-evaluating
        // the same generation overwrites its entry.
        if self.generation == self.history.len() {
            self.history.push(stats);
        } else {
            self.history[self.generation] = stats;
        }
    }

    fn compute_fitness(&mut self) {
        #[cfg(feature = "parallel")]
        if self.parallel {
            let fitness_fn = &self.fitness_fn;
            self.population.par_iter_mut().for_each(|genome| {
                let f = fitness_fn(genome);
                genome.set_fitness(f);
            });
            return;
        }
        #[cfg(not(feature = "parallel"))]
        if self.parallel {
            log::warn!("parallel evaluation requested without the `parallel` feature");
        }

        for genome in &mut self.population {
            let f = (self.fitness_fn)(genome);
            genome.set_fitness(f);
        }
    }

    fn rank_population(&mut self) {
        let ordering = self.ordering;
        self.population.sort_by(|a, b| {
            let cmp = a
                .fitness()
                .partial_cmp(&b.fitness())
                .unwrap_or(std::cmp::Ordering::Equal);
            match ordering {
                SortOrder::Ascending => cmp,
                SortOrder::Descending => cmp.reverse(),
            }
        });
    }

    /// Whether evolution should stop.
    ///
    /// True once the generation bound is reached, or when the optional
    /// termination predicate reports convergence.
    pub fn terminate(&self) -> bool {
        if self.generation >= self.max_generations {
            return true;
        }
        match &self.termination {
            Some(predicate) => predicate(&self.run_state()),
            None => false,
        }
    }

    /// Runs the evolutionary loop to completion.
    ///
    /// Synchronous; the only cancellation point is [`terminate`](Self::terminate),
    /// checked once per generation boundary.
    pub fn evolve(&mut self) {
        while !self.terminate() {
            let next = self.next_generation();
            self.population = next;
            self.advance_generation();
            self.evaluate();

            let stats = self.history[self.generation];
            debug!(
                "generation {}: avg {:.4}, min {:.4}, max {:.4}",
                self.generation, stats.avg, stats.min, stats.max
            );
        }
        info!(
            "evolution finished after {} generations, best fitness {:?}",
            self.generation,
            self.fittest().fitness()
        );
    }

    /// Builds the next generation's population.
    ///
    /// Repeats until `population_size` children have accumulated: gate
    /// crossover by its rate; when it fires, select two parents
    /// independently (the same individual may serve as both) and apply
    /// the crossover operator; otherwise a single selected individual
    /// passes through as the sole child. Each child is then independently
    /// gated for mutation. Whole batches are appended and the result is
    /// truncated to exactly `population_size`; under an elitist policy
    /// the top-`k` of the current population are appended verbatim on
    /// top.
    pub fn next_generation(&mut self) -> Vec<P::Genome> {
        let stats = *self
            .history
            .last()
            .expect("population is evaluated before breeding");
        let mut next: Vec<P::Genome> =
            Vec::with_capacity(self.population_size + self.replacement.preserved());

        while next.len() < self.population_size {
            let ctx = SelectionContext {
                population: &self.population,
                stats: &stats,
                generation: self.generation,
            };

            let children: Vec<P::Genome> = if self.registry.gate(CROSSOVER, &mut self.rng) {
                let mom = self.selector.select(&ctx, &mut self.rng);
                let dad = self.selector.select(&ctx, &mut self.rng);
                let brood = self.registry.apply(
                    CROSSOVER,
                    &[&self.population[mom], &self.population[dad]],
                    &mut self.rng,
                );
                if brood.is_empty() {
                    // No crossover implementation: pass one parent through.
                    vec![self.population[mom].clone()]
                } else {
                    brood
                }
            } else {
                let chosen = self.selector.select(&ctx, &mut self.rng);
                vec![self.population[chosen].clone()]
            };

            for child in children {
                if self.registry.gate(MUTATION, &mut self.rng) {
                    let mutated = self.registry.apply(MUTATION, &[&child], &mut self.rng);
                    if mutated.is_empty() {
                        next.push(child);
                    } else {
                        next.extend(mutated);
                    }
                } else {
                    next.push(child);
                }
            }
        }

        next.truncate(self.population_size);
        next.extend(self.replacement.carry_over(&self.population));
        next
    }

    /// Bernoulli trial against `name`'s configured rate.
    ///
    /// See [`OperatorRegistry::gate`].
    pub fn can_apply(&mut self, name: &str) -> bool {
        self.registry.gate(name, &mut self.rng)
    }

    /// Applies the operator registered under `name` to `parents`.
    ///
    /// Returns the operator's children; the empty batch when no
    /// implementation is registered under that name.
    pub fn apply(&mut self, name: &str, parents: &[&P::Genome]) -> Vec<P::Genome> {
        self.registry.apply(name, parents, &mut self.rng)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The fittest individual under the active ordering (index 0 of the
    /// ranked population).
    pub fn fittest(&self) -> &P::Genome {
        &self.population[0]
    }

    /// The current population, ranked. Read-only.
    pub fn population(&self) -> &[P::Genome] {
        &self.population
    }

    /// Per-generation statistics, indexed by generation number.
    pub fn statistics(&self) -> &[GenerationStats] {
        &self.history
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn max_generations(&self) -> usize {
        self.max_generations
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn ordering(&self) -> SortOrder {
        self.ordering
    }

    pub fn replacement(&self) -> Replacement {
        self.replacement
    }

    /// The configured application rate for `name`, if any.
    pub fn rate(&self, name: &str) -> Option<f64> {
        self.registry.rate(name)
    }

    /// The read-only view handed to termination predicates.
    pub fn run_state(&self) -> RunState<'_, P::Genome> {
        RunState {
            generation: self.generation,
            max_generations: self.max_generations,
            population: &self.population,
            history: &self.history,
        }
    }

    // ------------------------------------------------------------------
    // Tolerant setters
    //
    // Invalid values are ignored and the prior value kept; nothing is
    // surfaced. See DESIGN.md for the policy decision.
    // ------------------------------------------------------------------

    /// Advances the generation counter by one.
    ///
    /// The counter is monotonic; there is no inverse operation. Callers
    /// stepping the loop manually advance after replacing the population
    /// and before re-evaluating.
    pub fn advance_generation(&mut self) {
        self.generation += 1;
    }

    /// Sets the generation bound. Zero is ignored.
    pub fn set_max_generations(&mut self, n: usize) {
        if n > 0 {
            self.max_generations = n;
        }
    }

    /// Sets the population size used for subsequent generations. Zero is
    /// ignored.
    pub fn set_population_size(&mut self, n: usize) {
        if n > 0 {
            self.population_size = n;
        }
    }

    /// Sets the ranking direction from `asc`/`desc` (case-insensitive,
    /// long forms accepted). Anything else is ignored. Takes effect at
    /// the next evaluation.
    pub fn set_ordering(&mut self, ordering: &str) {
        if let Ok(order) = ordering.parse() {
            self.ordering = order;
        }
    }

    /// Replaces the population wholesale. An empty population is ignored.
    ///
    /// The replacement is not evaluated until the next generation
    /// boundary; statistics and ranking still describe the previous
    /// population until then.
    pub fn set_population(&mut self, population: Vec<P::Genome>) {
        if !population.is_empty() {
            self.population = population;
        }
    }

    /// Replaces the fitness function.
    pub fn set_fitness<F>(&mut self, fitness: F)
    where
        F: Fn(&P::Genome) -> <P::Genome as Genome>::Fitness + Send + Sync + 'static,
    {
        self.fitness_fn = Box::new(fitness);
    }

    /// Installs a termination predicate.
    pub fn set_termination<F>(&mut self, predicate: F)
    where
        F: Fn(&RunState<'_, P::Genome>) -> bool + Send + Sync + 'static,
    {
        self.termination = Some(Arc::new(predicate));
    }

    /// Removes the termination predicate; only the generation bound
    /// remains.
    pub fn clear_termination(&mut self) {
        self.termination = None;
    }

    /// Replaces the selection strategy.
    pub fn set_selector(&mut self, selector: Selector<P::Genome>) {
        self.selector = selector;
    }

    /// Replaces the generation-transition policy.
    pub fn set_replacement(&mut self, replacement: Replacement) {
        self.replacement = replacement;
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstring::{BitGenotype, BitString};

    fn bit_config(len_pop: usize) -> EngineConfig<BitString> {
        EngineConfig::default()
            .with_population_size(len_pop)
            .with_max_generations(10)
            .with_rate(CROSSOVER, 0.9)
            .with_rate(MUTATION, 0.05)
            .with_seed(42)
    }

    fn value_fitness(g: &BitString) -> f64 {
        g.value() as f64
    }

    #[test]
    fn test_construction_is_eager() {
        let engine = Engine::new(BitGenotype::new(8), value_fitness, bit_config(20)).unwrap();
        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.population().len(), 20);
        assert_eq!(engine.statistics().len(), 1);
    }

    #[test]
    fn test_construction_rejects_missing_rate() {
        let config = EngineConfig::default()
            .with_population_size(10)
            .with_rate(CROSSOVER, 0.9)
            .with_seed(42);
        let result = Engine::new(BitGenotype::new(8), value_fitness, config);
        assert_eq!(
            result.err(),
            Some(ConfigError::MissingRate(MUTATION.into()))
        );
    }

    #[test]
    fn test_construction_rejects_empty_rates() {
        let config: EngineConfig<BitString> =
            EngineConfig::default().with_population_size(10).with_seed(42);
        let result = Engine::new(BitGenotype::new(8), value_fitness, config);
        assert_eq!(result.err(), Some(ConfigError::EmptyOperators));
    }

    #[test]
    fn test_population_ranked_descending() {
        let engine = Engine::new(BitGenotype::new(8), value_fitness, bit_config(30)).unwrap();
        for pair in engine.population().windows(2) {
            assert!(pair[0].fitness() >= pair[1].fitness());
        }
        assert_eq!(
            engine.fittest().fitness(),
            engine.statistics()[0].max
        );
    }

    #[test]
    fn test_population_ranked_ascending() {
        let config = bit_config(30).with_ordering(SortOrder::Ascending);
        let engine = Engine::new(BitGenotype::new(8), value_fitness, config).unwrap();
        for pair in engine.population().windows(2) {
            assert!(pair[0].fitness() <= pair[1].fitness());
        }
        assert_eq!(
            engine.fittest().fitness(),
            engine.statistics()[0].min
        );
    }

    #[test]
    fn test_statistics_are_consistent() {
        let mut engine = Engine::new(BitGenotype::new(8), value_fitness, bit_config(25)).unwrap();
        engine.evolve();

        assert_eq!(engine.statistics().len(), 11);
        for stats in engine.statistics() {
            assert!(stats.min <= stats.avg);
            assert!(stats.avg <= stats.max);
        }
        // The last entry describes the current population exactly.
        let last = engine.statistics().last().unwrap();
        let sum: f64 = engine.population().iter().map(|g| g.fitness()).sum();
        assert!((last.sum - sum).abs() < 1e-9);
        assert!((last.avg - sum / engine.population().len() as f64).abs() < 1e-9);
    }

    #[test]
    fn test_evolve_halts_at_generation_bound() {
        let mut engine = Engine::new(BitGenotype::new(8), value_fitness, bit_config(15)).unwrap();
        engine.evolve();
        assert_eq!(engine.generation(), 10);
        assert_eq!(engine.statistics().len(), 11);
        assert!(engine.terminate());
    }

    #[test]
    fn test_population_size_invariant() {
        let mut engine = Engine::new(BitGenotype::new(8), value_fitness, bit_config(17)).unwrap();
        engine.evolve();
        assert_eq!(engine.population().len(), 17);
    }

    #[test]
    fn test_overshoot_is_truncated() {
        // Crossover always fires and always yields two children, so an
        // odd target forces an overshooting final batch.
        let config = bit_config(11).with_rate(CROSSOVER, 1.0);
        let mut engine = Engine::new(BitGenotype::new(8), value_fitness, config).unwrap();
        let next = engine.next_generation();
        assert_eq!(next.len(), 11);
    }

    #[test]
    fn test_elitist_population_size() {
        let config = bit_config(12).with_preserve(3);
        let mut engine = Engine::new(BitGenotype::new(8), value_fitness, config).unwrap();
        assert_eq!(engine.population().len(), 12);
        engine.evolve();
        assert_eq!(engine.population().len(), 15);
    }

    #[test]
    fn test_elites_survive_verbatim() {
        let config = bit_config(10).with_preserve(2);
        let mut engine = Engine::new(BitGenotype::new(16), value_fitness, config).unwrap();

        let elites: Vec<BitString> = engine.population()[..2].to_vec();
        let next = engine.next_generation();
        assert_eq!(next.len(), 12);
        // The elitist policy appends the preserved individuals last.
        assert_eq!(&next[10..], &elites[..]);
    }

    #[test]
    fn test_termination_predicate_stops_early() {
        let mut engine = Engine::new(
            BitGenotype::new(8),
            value_fitness,
            bit_config(20).with_max_generations(1000),
        )
        .unwrap();
        engine.set_termination(|state| state.generation >= 3);
        engine.evolve();
        assert_eq!(engine.generation(), 3);
    }

    #[test]
    fn test_termination_predicate_sees_history() {
        let mut engine = Engine::new(
            BitGenotype::new(8),
            value_fitness,
            bit_config(20).with_max_generations(1000),
        )
        .unwrap();
        // Stop as soon as any individual reaches at least half the range.
        engine.set_termination(|state| {
            state.history.last().is_some_and(|s| s.max >= 128.0)
        });
        engine.evolve();
        assert!(engine.generation() < 1000);
        assert!(engine.statistics().last().unwrap().max >= 128.0);
    }

    #[test]
    fn test_can_apply_rate_extremes() {
        let config = bit_config(10)
            .with_rate(CROSSOVER, 0.0)
            .with_rate(MUTATION, 1.0);
        let mut engine = Engine::new(BitGenotype::new(8), value_fitness, config).unwrap();
        for _ in 0..1000 {
            assert!(!engine.can_apply(CROSSOVER));
            assert!(engine.can_apply(MUTATION));
        }
    }

    #[test]
    fn test_apply_unregistered_operator_is_noop() {
        let mut engine = Engine::new(BitGenotype::new(8), value_fitness, bit_config(10)).unwrap();
        let parent = engine.fittest().clone();
        assert!(engine.apply("inversion", &[&parent]).is_empty());
    }

    #[test]
    fn test_apply_crossover_produces_children() {
        let mut engine = Engine::new(BitGenotype::new(8), value_fitness, bit_config(10)).unwrap();
        let mom = engine.population()[0].clone();
        let dad = engine.population()[1].clone();
        let children = engine.apply(CROSSOVER, &[&mom, &dad]);
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].len(), 8);
    }

    // ---- Tolerant setters ----

    #[test]
    fn test_setters_reject_invalid_silently() {
        let mut engine = Engine::new(BitGenotype::new(8), value_fitness, bit_config(10)).unwrap();

        engine.set_max_generations(0);
        assert_eq!(engine.max_generations(), 10);
        engine.set_max_generations(50);
        assert_eq!(engine.max_generations(), 50);

        engine.set_population_size(0);
        assert_eq!(engine.population_size(), 10);
        engine.set_population_size(40);
        assert_eq!(engine.population_size(), 40);

        engine.set_ordering("sideways");
        assert_eq!(engine.ordering(), SortOrder::Descending);
        engine.set_ordering("ASC");
        assert_eq!(engine.ordering(), SortOrder::Ascending);
        engine.set_ordering("Descending");
        assert_eq!(engine.ordering(), SortOrder::Descending);

        engine.set_population(Vec::new());
        assert_eq!(engine.population().len(), 10);
    }

    #[test]
    fn test_set_population_replaces_wholesale() {
        let mut engine = Engine::new(BitGenotype::new(8), value_fitness, bit_config(10)).unwrap();
        let replacement = vec![BitString::from_bits(vec![true; 8]); 4];
        engine.set_population(replacement);
        assert_eq!(engine.population().len(), 4);
        assert!(engine.population().iter().all(|g| g.value() == 255));
    }

    #[test]
    fn test_set_fitness_changes_evaluation() {
        let mut engine = Engine::new(BitGenotype::new(8), value_fitness, bit_config(10)).unwrap();
        engine.set_fitness(|_g: &BitString| 1.0);
        engine.evaluate();
        assert!(engine.population().iter().all(|g| g.fitness() == 1.0));
        // Re-evaluating generation 0 overwrote its entry; history stays dense.
        assert_eq!(engine.statistics().len(), 1);
        assert_eq!(engine.statistics()[0].max, 1.0);
    }

    #[test]
    fn test_initialize_population_resets() {
        let mut engine = Engine::new(BitGenotype::new(8), value_fitness, bit_config(10)).unwrap();
        engine.evolve();
        assert_eq!(engine.generation(), 10);

        engine.initialize_population();
        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.statistics().len(), 1);
        assert_eq!(engine.population().len(), 10);
    }

    #[test]
    fn test_manual_stepping() {
        let mut engine = Engine::new(BitGenotype::new(8), value_fitness, bit_config(10)).unwrap();
        let next = engine.next_generation();
        engine.set_population(next);
        engine.advance_generation();
        engine.evaluate();

        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.statistics().len(), 2);
        assert_eq!(engine.population().len(), 10);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = |seed: u64| {
            let mut engine = Engine::new(
                BitGenotype::new(12),
                value_fitness,
                bit_config(20).with_seed(seed),
            )
            .unwrap();
            engine.evolve();
            engine.fittest().value()
        };
        assert_eq!(run(7), run(7));
    }

    // ---- End-to-end scenario ----

    #[test]
    fn test_end_to_end_seven_bit_scenario() {
        let config = EngineConfig::default()
            .with_population_size(10)
            .with_max_generations(25)
            .with_rate(CROSSOVER, 0.9)
            .with_rate(MUTATION, 0.01)
            .with_selector(Selector::Roulette)
            .with_preserve(1)
            .with_seed(42);

        let mut engine = Engine::new(
            BitGenotype::new(7),
            |g: &BitString| g.value() as f64 / 128.0,
            config,
        )
        .unwrap();
        engine.evolve();

        assert_eq!(engine.generation(), 25);
        assert_eq!(engine.statistics().len(), 26);

        // The preserved elite guarantees the historical best is never
        // lost: max per generation is non-decreasing.
        for pair in engine.statistics().windows(2) {
            assert!(
                pair[1].max >= pair[0].max - 1e-12,
                "historical max regressed: {} -> {}",
                pair[0].max,
                pair[1].max
            );
        }

        let best = engine.fittest();
        assert!(best.fitness() >= 0.0 && best.fitness() < 1.0);
        assert_eq!(best.fitness(), engine.statistics()[25].max);
    }
}
