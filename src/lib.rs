//! An implementation of NEAT-style neuroevolution with real-valued node
//! layers, compatibility-based speciation and tournament selection.
//!
//! The crate maintains a [`Population`] of candidate networks ([`Genome`]s),
//! evaluates them against a caller-supplied fitness function, clusters them
//! into [`Species`] by genetic compatibility, and repeatedly applies
//! selection, crossover and structural/weight mutation to produce the next
//! generation. Structural mutations are tracked in a shared [`History`] so
//! that identical mutations arising independently in different genomes are
//! recognized as the same gene, which is what makes gene alignment during
//! crossover meaningful.
//!
//! The fitness function is the only boundary to the outside world: it
//! receives the whole generation, writes each genome's fitness in place,
//! and reports whether the search is complete. Rendering, persistence and
//! statistics export are external concerns.
//!
//! [`Population`]: crate::populations::Population
//! [`Species`]: crate::populations::Species
//! [`Genome`]: crate::genomics::Genome
//! [`History`]: crate::genomics::History
//!
//! # Example usage: evolution of a XOR approximator
//! ```
//! use evoneat::genomics::{GeneticConfig, Genome};
//! use evoneat::populations::{Population, PopulationConfig};
//! use std::num::NonZeroUsize;
//!
//! fn evaluate_xor(genomes: &mut [Genome]) -> bool {
//!     let cases = [
//!         ([0.0, 0.0], 0.0),
//!         ([0.0, 1.0], 1.0),
//!         ([1.0, 0.0], 1.0),
//!         ([1.0, 1.0], 0.0),
//!     ];
//!
//!     let mut solved = false;
//!     for genome in genomes.iter_mut() {
//!         let mut error = 0.0;
//!         for (inputs, expected) in &cases {
//!             let outputs = genome.evaluate(inputs).unwrap();
//!             error += (outputs[0] - expected).abs();
//!         }
//!         genome.set_fitness((4.0 - error).powi(2));
//!         solved |= error < 0.5;
//!     }
//!     solved
//! }
//!
//! let genetic_config = GeneticConfig {
//!     input_count: NonZeroUsize::new(2).unwrap(),
//!     output_count: NonZeroUsize::new(1).unwrap(),
//!     ..GeneticConfig::default()
//! };
//! let population_config = PopulationConfig {
//!     size: NonZeroUsize::new(50).unwrap(),
//!     max_generations: 10,
//!     ..PopulationConfig::default()
//! };
//!
//! let mut population = Population::from_seed(population_config, genetic_config, 42);
//! population.run(evaluate_xor);
//!
//! assert!(population.best_genome().is_some());
//! ```

pub mod genomics;
pub mod populations;

/// Identifier type used to designate historically
/// identical structural mutations for the purposes of
/// gene alignment and genetic tracking.
pub type Innovation = usize;

/// Identifier type for nodes. Node ids are allocated from
/// the same global counter as the innovation history's
/// node-split records, so they never collide across genomes.
pub type NodeId = usize;

/// Identifier type for genomes.
pub type GenomeId = usize;

/// Identifier type for species.
pub type SpeciesId = usize;
