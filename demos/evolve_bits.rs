//! Demo driver: evolve 7-bit binary genomes toward the all-ones string.
//!
//! Fitness is the genome's binary value normalized to `[0, 1)`, so the
//! optimum is `1111111` (127/128). Run with `RUST_LOG=debug` to watch the
//! per-generation progress.

use evokit::{BitGenotype, BitString, Engine, EngineConfig, Genome, Selector, CROSSOVER, MUTATION};

fn main() {
    env_logger::init();

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
    .expect("valid configuration");

    engine.evolve();

    println!("gen     sum     avg     min     max");
    for (generation, stats) in engine.statistics().iter().enumerate() {
        println!(
            "{generation:>3}  {:.4}  {:.4}  {:.4}  {:.4}",
            stats.sum, stats.avg, stats.min, stats.max
        );
    }

    let best = engine.fittest();
    let bits: String = best
        .bits()
        .iter()
        .map(|&bit| if bit { '1' } else { '0' })
        .collect();
    println!(
        "fittest after {} generations: {bits} (value {}, fitness {:.4})",
        engine.generation(),
        best.value(),
        best.fitness()
    );
}
