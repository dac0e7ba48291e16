use super::Population;
use crate::genomics::Genome;
use crate::{Innovation, SpeciesId};

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllGenomes,
    /// Clones species and their best genomes.
    SpeciesBests,
    /// Clones only the population's best genome.
    PopulationBest,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of a population.
#[derive(Clone, Debug)]
pub struct Log {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord,
    pub species_count: usize,
    pub compatibility_multiplier: f32,
    pub fitness: Stats,
    pub connection_count: Stats,
    pub node_count: Stats,
    pub max_innovation: Option<Innovation>,
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration_number: {:?}\n\
            \tspecies_count: {:?}\n\
            \tcompatibility_multiplier: {:?}\n\
            \tfitness: {:?}\n\
            \tconnection_count: {:?}\n\
            \tnode_count: {:?}\n\
            \tmax_innovation: {:?}\n\
            }}",
            &self.generation_number,
            &self.species_count,
            &self.compatibility_multiplier,
            &self.fitness,
            &self.connection_count,
            &self.node_count,
            &self.max_innovation,
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence.
    /// All fields are 0 for an empty sequence.
    ///
    /// # Examples
    /// ```
    /// use evoneat::populations::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Stats {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return Stats {
                maximum: 0.0,
                minimum: 0.0,
                mean: 0.0,
                median: 0.0,
            };
        }
        data.sort_unstable_by(|a, b| {
            a.partial_cmp(b)
                .unwrap_or_else(|| panic!("uncomparable value in statistics"))
        });
        let mean = data.iter().sum::<f32>() / data.len() as f32;
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean,
            median,
        }
    }
}

/// A reporting-level dependant store of genomes from a
/// population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord {
    /// Species ids, member genomes and staleness level.
    Species(Vec<(SpeciesId, Vec<Genome>, usize)>),
    /// Only species ids, species bests, and staleness level.
    SpeciesBests(Vec<(SpeciesId, Genome, usize)>),
    /// Only the population's best genome, if one has been
    /// elected yet.
    PopulationBest(Option<Genome>),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    logs: Vec<Log>,
}

impl EvolutionLogger {
    /// Returns a logger with the appropiate reporting level.
    ///
    /// # Examples
    /// ```
    /// use evoneat::populations::{EvolutionLogger, ReportingLevel};
    ///
    /// let logger = EvolutionLogger::new(ReportingLevel::NoGenomes);
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Stores a snapshot of a population.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::GeneticConfig;
    /// use evoneat::populations::{EvolutionLogger, Population, PopulationConfig, ReportingLevel};
    ///
    /// let mut logger = EvolutionLogger::new(ReportingLevel::NoGenomes);
    /// let mut population = Population::from_seed(
    ///     PopulationConfig::default(),
    ///     GeneticConfig::default(),
    ///     42,
    /// );
    ///
    /// population.epoch(|genomes| {
    ///     for genome in genomes.iter_mut() {
    ///         genome.set_fitness(1.0);
    ///     }
    ///     false
    /// });
    ///
    /// logger.log(&population);
    /// ```
    pub fn log(&mut self, population: &Population) {
        let stats: Vec<(f32, f32, f32)> = population
            .genomes()
            .iter()
            .map(|g| {
                (
                    g.connections().len() as f32,
                    g.nodes().len() as f32,
                    g.fitness(),
                )
            })
            .collect();
        self.logs.push(Log {
            generation_number: population.generation(),
            generation_sample: match self.reporting_level {
                ReportingLevel::AllGenomes => GenerationMemberRecord::Species(
                    population
                        .species()
                        .map(|s| {
                            (
                                s.id(),
                                s.members()
                                    .map(|i| population.genomes()[i].clone())
                                    .collect(),
                                s.staleness(),
                            )
                        })
                        .collect(),
                ),
                ReportingLevel::SpeciesBests => GenerationMemberRecord::SpeciesBests(
                    population
                        .species()
                        .map(|s| (s.id(), s.best_genome().clone(), s.staleness()))
                        .collect(),
                ),
                ReportingLevel::PopulationBest => {
                    GenerationMemberRecord::PopulationBest(population.best_genome().cloned())
                }
                ReportingLevel::NoGenomes => GenerationMemberRecord::None,
            },
            species_count: population.species().count(),
            compatibility_multiplier: population.compatibility_multiplier(),
            fitness: Stats::from(stats.iter().map(|(_, _, f)| *f)),
            connection_count: Stats::from(stats.iter().map(|(c, _, _)| *c)),
            node_count: Stats::from(stats.iter().map(|(_, n, _)| *n)),
            max_innovation: population.history().max_innovation(),
        })
    }

    /// Iterates over all logged snapshots.
    ///
    /// # Examples
    /// ```
    /// use evoneat::populations::{EvolutionLogger, ReportingLevel};
    ///
    /// let logger = EvolutionLogger::new(ReportingLevel::AllGenomes);
    /// // Log some populations... then
    /// for log in logger.iter() {
    ///     println!("{}", log);
    /// }
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_from_even_sequence() {
        let stats = Stats::from([4.0, 1.0, 3.0, 2.0].iter().copied());
        assert_eq!(stats.maximum, 4.0);
        assert_eq!(stats.minimum, 1.0);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn stats_from_empty_sequence() {
        let stats = Stats::from(std::iter::empty());
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.median, 0.0);
    }
}
