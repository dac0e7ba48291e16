use crate::GenomeId;

use std::error::Error;
use std::fmt;

/// An error type indicating that a set of seed genomes could
/// not be injected into a population.
#[derive(Debug)]
pub enum SeedError {
    /// A seed genome's input/output arity does not match the
    /// genetic configuration.
    ArityMismatch(GenomeId),
    /// More seed genomes were supplied than the configured
    /// population size can hold.
    TooManySeeds { seeds: usize, capacity: usize },
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArityMismatch(id) => write!(
                f,
                "seed genome {} does not match the configured input/output arity",
                id
            ),
            Self::TooManySeeds { seeds, capacity } => write!(
                f,
                "{} seed genomes supplied for a population of size {}",
                seeds, capacity
            ),
        }
    }
}

impl Error for SeedError {}
