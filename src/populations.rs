//! A Population is a collection of genomes, grouped into
//! species by genetic compatibility and evolved generation by
//! generation using a caller-supplied fitness function as the
//! source of selective pressure.

mod config;
mod errors;
mod log;
mod species;

pub use config::PopulationConfig;
pub use errors::SeedError;
pub use log::{EvolutionLogger, GenerationMemberRecord, Log, ReportingLevel, Stats};
pub use species::Species;

use crate::genomics::{GeneticConfig, Genome, History};
use crate::{GenomeId, SpeciesId};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A population of genomes.
///
/// The population owns the live genome list, the species list
/// and the innovation [`History`]; species refer to their
/// members by index into the genome list. One [`epoch`] call is
/// one generation transition; [`run`] repeats epochs until the
/// configured generation budget is exhausted or the fitness
/// function signals that the search is complete.
///
/// The evolution loop is single-threaded and strictly phased:
/// fitness evaluation, speciation and reproduction never
/// overlap, and the innovation history is only written during
/// the reproduction phase. The fitness callback receives the
/// whole generation at once and is the only point where callers
/// may parallelize work.
///
/// [`epoch`]: Population::epoch
/// [`run`]: Population::run
pub struct Population {
    genomes: Vec<Genome>,
    species: Vec<Species>,
    history: History,
    generation: usize,
    next_genome_id: GenomeId,
    next_species_id: SpeciesId,
    best_genome: Option<Genome>,
    compatibility_multiplier: f32,
    finished: bool,
    seeds: Vec<Genome>,
    rng: SmallRng,
    population_config: PopulationConfig,
    genetic_config: GeneticConfig,
}

impl Population {
    /// Creates a new population using the passed configurations,
    /// with randomness seeded from the operating system. The
    /// population is filled lazily during the first epoch.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::GeneticConfig;
    /// use evoneat::populations::{Population, PopulationConfig};
    ///
    /// let population = Population::new(PopulationConfig::default(), GeneticConfig::default());
    ///
    /// assert_eq!(population.generation(), 0);
    /// ```
    pub fn new(population_config: PopulationConfig, genetic_config: GeneticConfig) -> Population {
        Self::with_rng(population_config, genetic_config, SmallRng::from_entropy())
    }

    /// Creates a new population whose randomness is fully
    /// determined by `seed`, so identical runs are reproducible.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::GeneticConfig;
    /// use evoneat::populations::{Population, PopulationConfig};
    ///
    /// let population = Population::from_seed(
    ///     PopulationConfig::default(),
    ///     GeneticConfig::default(),
    ///     42,
    /// );
    /// ```
    pub fn from_seed(
        population_config: PopulationConfig,
        genetic_config: GeneticConfig,
        seed: u64,
    ) -> Population {
        Self::with_rng(
            population_config,
            genetic_config,
            SmallRng::seed_from_u64(seed),
        )
    }

    fn with_rng(
        population_config: PopulationConfig,
        genetic_config: GeneticConfig,
        rng: SmallRng,
    ) -> Population {
        Population {
            genomes: Vec::new(),
            species: Vec::new(),
            history: History::new(),
            generation: 0,
            next_genome_id: 0,
            next_species_id: 0,
            best_genome: None,
            compatibility_multiplier: 1.0,
            finished: false,
            seeds: Vec::new(),
            rng,
            population_config,
            genetic_config,
        }
    }

    /// Injects the passed genomes into generation zero; the rest
    /// of the population is filled with freshly-wired genomes as
    /// usual. The seeds' node ids are reserved in the innovation
    /// history and the genome id counter is advanced past theirs.
    ///
    /// # Errors
    /// Returns an error if any seed's input/output arity does not
    /// match the genetic configuration, or if more seeds are
    /// supplied than the population can hold.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, History};
    /// use evoneat::populations::{Population, PopulationConfig};
    /// use rand::rngs::SmallRng;
    /// use rand::SeedableRng;
    ///
    /// let config = GeneticConfig::default();
    /// let mut history = History::new();
    /// let mut rng = SmallRng::seed_from_u64(1);
    /// let seed = Genome::new(0, &mut history, &config, &mut rng);
    ///
    /// let population = Population::from_seed(PopulationConfig::default(), config, 42)
    ///     .with_seeds(vec![seed])
    ///     .unwrap();
    /// ```
    pub fn with_seeds(mut self, seeds: Vec<Genome>) -> Result<Population, SeedError> {
        let capacity = self.population_config.size.get();
        if seeds.len() > capacity {
            return Err(SeedError::TooManySeeds {
                seeds: seeds.len(),
                capacity,
            });
        }
        for genome in &seeds {
            if genome.input_count() != self.genetic_config.input_count.get()
                || genome.output_count() != self.genetic_config.output_count.get()
            {
                return Err(SeedError::ArityMismatch(genome.id()));
            }
            let high_water = genome.nodes().last().map_or(0, |node| node.id() + 1);
            self.history.reserve_node_ids(high_water);
            self.next_genome_id = self.next_genome_id.max(genome.id() + 1);
        }
        self.seeds = seeds;
        Ok(self)
    }

    /// Performs one generation transition: offspring allocation,
    /// stale-species removal, truncation selection and
    /// reproduction, population fill, fitness evaluation,
    /// speciation, compatibility-threshold adjustment and species
    /// bookkeeping, in that order.
    ///
    /// The fitness function receives the whole generation, must
    /// write each genome's fitness in place (values are expected
    /// to be ≥ 0), and returns whether the search is complete.
    ///
    /// Returns whether the fitness function signalled completion.
    pub fn epoch<F>(&mut self, mut fitness_fn: F) -> bool
    where
        F: FnMut(&mut [Genome]) -> bool,
    {
        self.allocate_children();
        self.kill_stale_species();
        self.truncate_and_reproduce();
        self.fill_population();
        self.update_fitnesses(&mut fitness_fn);
        self.speciate();
        self.adjust_compatibility_threshold();
        self.update_species_stats();
        self.generation += 1;
        self.finished
    }

    /// Runs [`epoch`] until the configured number of generations
    /// is exhausted or the fitness function signals completion.
    /// Running out of generations is normal termination; the
    /// result is simply the best genome found, available through
    /// [`best_genome`].
    ///
    /// [`epoch`]: Population::epoch
    /// [`best_genome`]: Population::best_genome
    pub fn run<F>(&mut self, mut fitness_fn: F)
    where
        F: FnMut(&mut [Genome]) -> bool,
    {
        while self.generation < self.population_config.max_generations && !self.finished {
            self.epoch(&mut fitness_fn);
        }
    }

    /// Allots each species' offspring quota in proportion to its
    /// share of the total average fitness. A population with no
    /// selective signal at all (zero total fitness) degenerates
    /// to an equal split.
    fn allocate_children(&mut self) {
        if self.species.is_empty() {
            return;
        }
        let population_size = self.population_config.size.get();
        let total: f32 = self.species.iter().map(Species::average_fitness).sum();
        if total == 0.0 {
            let share = population_size / self.species.len();
            for species in &mut self.species {
                species.set_allocated_children(share.max(1));
            }
            return;
        }
        for species in &mut self.species {
            let quota =
                (population_size as f32 * species.average_fitness() / total).round() as usize;
            species.set_allocated_children(quota);
        }
    }

    /// Removes species that have been stale for too long, unless
    /// they hold the population's best genome, and species that
    /// were allocated no offspring at all. Holding the best
    /// genome never overrides a zero allocation.
    fn kill_stale_species(&mut self) {
        let best_id = self.best_genome.as_ref().map(Genome::id);
        let genomes = &self.genomes;
        let staleness_threshold = self.population_config.staleness_threshold;
        self.species.retain(|species| {
            if species.allocated_children() == 0 {
                return false;
            }
            if species.staleness() < staleness_threshold {
                return true;
            }
            best_id.map_or(false, |id| species.members().any(|i| genomes[i].id() == id))
        });
    }

    /// Produces the next generation: per species, keeps the top
    /// performers as the breeding pool, optionally carries the
    /// species' best genome over unchanged, and fills the
    /// species' quota with mutated crossover offspring of
    /// tournament-selected parents.
    fn truncate_and_reproduce(&mut self) {
        let previous = std::mem::take(&mut self.genomes);
        let mut next_generation = Vec::with_capacity(self.population_config.size.get());

        for index in 0..self.species.len() {
            let (pool, quota, elite) = {
                let survival_rate = self.population_config.survival_rate;
                let elitism = self.population_config.elitism;
                let min_elitism_size = self.population_config.min_elitism_size;

                let species = &mut self.species[index];
                species.sort_members(&previous);
                let member_count = species.member_count();
                let survivors = ((survival_rate * member_count as f32).round() as usize)
                    .max(1)
                    .min(member_count);
                let pool = species.member_indices()[..survivors].to_vec();
                species.clear_members();
                species.increment_age();

                let elite = (elitism && pool.len() > min_elitism_size)
                    .then(|| species.best_genome().clone());
                (pool, species.allocated_children(), elite)
            };
            if pool.is_empty() {
                continue;
            }

            let mut produced = 0;
            if let Some(elite) = elite {
                next_generation.push(elite);
                produced += 1;
            }
            while produced < quota {
                let parent1 = self.tournament_select(&previous, &pool);
                let parent2 = self.tournament_select(&previous, &pool);
                let offspring_id = self.next_genome_id;
                self.next_genome_id += 1;
                let mut offspring = Genome::crossover(
                    &previous[parent1],
                    &previous[parent2],
                    offspring_id,
                    &mut self.rng,
                );
                offspring.mutate(&mut self.history, &self.genetic_config, &mut self.rng);
                next_generation.push(offspring);
                produced += 1;
            }
        }

        self.genomes = next_generation;
    }

    /// Selects a parent by tournament: samples up to
    /// `tournament_size` contestants from the pool and keeps the
    /// fittest.
    fn tournament_select(&mut self, genomes: &[Genome], pool: &[usize]) -> usize {
        let rounds = self.population_config.tournament_size.get().min(pool.len());
        let mut champion: Option<usize> = None;
        for _ in 0..rounds {
            let contestant = pool[self.rng.gen_range(0..pool.len())];
            champion = match champion {
                Some(current) if genomes[current].fitness() >= genomes[contestant].fitness() => {
                    Some(current)
                }
                _ => Some(contestant),
            };
        }
        champion.unwrap_or_else(|| panic!("tournament selection from an empty breeding pool"))
    }

    /// Tops the population up to its configured size with
    /// freshly-wired genomes. Seed genomes are injected first,
    /// in generation zero only.
    fn fill_population(&mut self) {
        if self.generation == 0 && !self.seeds.is_empty() {
            let seeds = std::mem::take(&mut self.seeds);
            self.genomes.extend(seeds);
        }
        while self.genomes.len() < self.population_config.size.get() {
            let id = self.next_genome_id;
            self.next_genome_id += 1;
            let genome = Genome::new(id, &mut self.history, &self.genetic_config, &mut self.rng);
            self.genomes.push(genome);
        }
    }

    /// Rebuilds and ages every genome, runs the fitness function
    /// over the whole generation, sorts genomes by descending
    /// fitness and updates the population's best genome on strict
    /// improvement.
    fn update_fitnesses<F>(&mut self, fitness_fn: &mut F)
    where
        F: FnMut(&mut [Genome]) -> bool,
    {
        for genome in &mut self.genomes {
            genome.rebuild_network();
            genome.increment_age();
        }

        self.finished = fitness_fn(&mut self.genomes);

        self.genomes.sort_unstable_by(|a, b| {
            b.fitness()
                .partial_cmp(&a.fitness())
                .unwrap_or_else(|| panic!("invalid genome fitnesses detected (NaN)"))
        });

        let improved = match &self.best_genome {
            Some(best) => self.genomes[0].fitness() > best.fitness(),
            None => true,
        };
        if improved {
            self.best_genome = Some(self.genomes[0].clone());
        }
    }

    /// Reassigns every genome to the first species it is
    /// compatible with, in generation order, founding new species
    /// for genomes no existing species accepts. Species left with
    /// no members are dropped.
    fn speciate(&mut self) {
        for species in &mut self.species {
            species.clear_members();
        }
        for index in 0..self.genomes.len() {
            let mut assigned = false;
            for s in 0..self.species.len() {
                if self.species[s].compatible(
                    &self.genomes[index],
                    &self.genetic_config,
                    self.compatibility_multiplier,
                ) {
                    self.species[s].add_member(index, &mut self.genomes[index]);
                    assigned = true;
                    break;
                }
            }
            if !assigned {
                let id = self.next_species_id;
                self.next_species_id += 1;
                let species = Species::new(id, index, &mut self.genomes[index]);
                self.species.push(species);
            }
        }
        self.species.retain(|species| species.member_count() > 0);
    }

    /// Steers the species count toward the configured target by
    /// slowly scaling the compatibility multiplier: shrinking it
    /// merges fewer species, growing it merges more.
    fn adjust_compatibility_threshold(&mut self) {
        let target = self.population_config.target_species_count;
        if self.species.len() < target {
            self.compatibility_multiplier *= 0.95;
        } else if self.species.len() > target {
            self.compatibility_multiplier *= 1.05;
        }
    }

    fn update_species_stats(&mut self) {
        let genomes = &self.genomes;
        for species in &mut self.species {
            species.update_stats(genomes);
        }
    }

    /// Returns the best genome found so far, if at least one
    /// generation has been evaluated.
    pub fn best_genome(&self) -> Option<&Genome> {
        self.best_genome.as_ref()
    }

    /// Returns the current generation's genomes. Sorted by
    /// descending fitness after each epoch.
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Returns an iterator over all current species.
    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns whether the fitness function has signalled that
    /// the search is complete.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the population's innovation history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns the running compatibility-threshold multiplier.
    pub fn compatibility_multiplier(&self) -> f32 {
        self.compatibility_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::num::NonZeroUsize;

    fn genetic_config() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::new(2).unwrap(),
            output_count: NonZeroUsize::new(1).unwrap(),
            ..GeneticConfig::default()
        }
    }

    fn population_config(size: usize, max_generations: usize) -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::new(size).unwrap(),
            max_generations,
            ..PopulationConfig::default()
        }
    }

    fn constant_fitness(value: f32) -> impl FnMut(&mut [Genome]) -> bool {
        move |genomes| {
            for genome in genomes.iter_mut() {
                genome.set_fitness(value);
            }
            false
        }
    }

    #[test]
    fn run_stops_when_the_fitness_function_finishes() {
        let mut population =
            Population::from_seed(population_config(20, 50), genetic_config(), 42);

        population.run(|genomes| {
            for genome in genomes.iter_mut() {
                genome.set_fitness(1.0);
            }
            true
        });

        assert_eq!(population.generation(), 1);
        assert!(population.is_finished());
        assert!(population.best_genome().is_some());
    }

    #[test]
    fn run_stops_at_the_generation_budget() {
        let mut population = Population::from_seed(population_config(20, 3), genetic_config(), 42);

        population.run(constant_fitness(1.0));

        assert_eq!(population.generation(), 3);
        assert!(!population.is_finished());
        assert!(population.best_genome().is_some());
    }

    #[test]
    fn epoch_maintains_population_and_speciation_invariants() {
        let mut population =
            Population::from_seed(population_config(30, 10), genetic_config(), 7);

        for _ in 0..5 {
            population.epoch(constant_fitness(1.0));
        }

        assert!(population.genomes().len() >= 30);
        assert!(population.genomes().iter().all(|g| g.species().is_some()));
        let member_total: usize = population.species().map(Species::member_count).sum();
        assert_eq!(member_total, population.genomes().len());
    }

    #[test]
    fn child_allocation_follows_average_fitness() {
        let mut population =
            Population::from_seed(population_config(40, 10), genetic_config(), 11);
        population.fill_population();
        population.genomes[0].set_fitness(4.0);
        population.genomes[1].set_fitness(2.0);
        population.genomes[2].set_fitness(1.0);

        let mut first = Species::new(0, 0, &mut population.genomes[0]);
        first.add_member(1, &mut population.genomes[1]);
        let mut second = Species::new(1, 2, &mut population.genomes[2]);
        first.update_stats(&population.genomes);
        second.update_stats(&population.genomes);
        population.species = vec![first, second];

        population.allocate_children();

        // Average fitnesses 3.0 and 1.0 split 40 children 3:1.
        assert_eq!(population.species[0].allocated_children(), 30);
        assert_eq!(population.species[1].allocated_children(), 10);
    }

    #[test]
    fn zero_total_fitness_degenerates_to_an_equal_split() {
        let mut population =
            Population::from_seed(population_config(40, 10), genetic_config(), 11);
        population.fill_population();

        let first = Species::new(0, 0, &mut population.genomes[0]);
        let second = Species::new(1, 1, &mut population.genomes[1]);
        population.species = vec![first, second];

        population.allocate_children();

        assert_eq!(population.species[0].allocated_children(), 20);
        assert_eq!(population.species[1].allocated_children(), 20);
    }

    #[test]
    fn stale_species_are_killed_unless_they_hold_the_best_genome() {
        let mut population =
            Population::from_seed(population_config(10, 10), genetic_config(), 13);
        population.fill_population();

        let mut stale = Species::new(0, 0, &mut population.genomes[0]);
        let mut stale_with_best = Species::new(1, 1, &mut population.genomes[1]);
        for _ in 0..=population.population_config.staleness_threshold {
            stale.update_stats(&population.genomes);
            stale_with_best.update_stats(&population.genomes);
        }
        stale.set_allocated_children(1);
        stale_with_best.set_allocated_children(1);
        population.best_genome = Some(population.genomes[1].clone());
        population.species = vec![stale, stale_with_best];

        population.kill_stale_species();

        assert_eq!(population.species.len(), 1);
        assert_eq!(population.species[0].id(), 1);
    }

    #[test]
    fn zero_allocation_kills_even_the_best_genome_holder() {
        let mut population =
            Population::from_seed(population_config(10, 10), genetic_config(), 13);
        population.fill_population();

        let mut species = Species::new(0, 0, &mut population.genomes[0]);
        species.set_allocated_children(0);
        population.best_genome = Some(population.genomes[0].clone());
        population.species = vec![species];

        population.kill_stale_species();

        assert!(population.species.is_empty());
    }

    #[test]
    fn compatibility_multiplier_tracks_the_species_target() {
        let mut below_target =
            Population::from_seed(population_config(10, 10), genetic_config(), 17);
        below_target.adjust_compatibility_threshold();
        assert_eq!(below_target.compatibility_multiplier(), 0.95);

        let mut above_target = Population::from_seed(
            PopulationConfig {
                target_species_count: 0,
                ..population_config(10, 10)
            },
            genetic_config(),
            17,
        );
        above_target.fill_population();
        let species = Species::new(0, 0, &mut above_target.genomes[0]);
        above_target.species = vec![species];
        above_target.adjust_compatibility_threshold();
        assert!((above_target.compatibility_multiplier() - 1.05).abs() < 1e-6);
    }

    #[test]
    fn seed_genomes_join_generation_zero() {
        let config = genetic_config();
        let mut history = History::new();
        let mut rng = rand::rngs::SmallRng::seed_from_u64(19);
        let seed = Genome::new(99, &mut history, &config, &mut rng);

        let mut population = Population::from_seed(population_config(10, 10), config, 19)
            .with_seeds(vec![seed])
            .unwrap();
        population.epoch(constant_fitness(1.0));

        assert!(population.genomes().iter().any(|g| g.id() == 99));
        // Fresh genomes never reuse the seed's id.
        assert_eq!(
            population.genomes().iter().filter(|g| g.id() == 99).count(),
            1
        );
    }

    #[test]
    fn seeds_with_wrong_arity_are_rejected() {
        let mut history = History::new();
        let mut rng = rand::rngs::SmallRng::seed_from_u64(19);
        let wrong_arity = GeneticConfig {
            input_count: NonZeroUsize::new(5).unwrap(),
            ..genetic_config()
        };
        let seed = Genome::new(0, &mut history, &wrong_arity, &mut rng);

        let result = Population::from_seed(population_config(10, 10), genetic_config(), 19)
            .with_seeds(vec![seed]);

        assert!(matches!(result, Err(SeedError::ArityMismatch(0))));
    }

    #[test]
    fn too_many_seeds_are_rejected() {
        let config = genetic_config();
        let mut history = History::new();
        let mut rng = rand::rngs::SmallRng::seed_from_u64(19);
        let seeds: Vec<Genome> = (0..3)
            .map(|id| Genome::new(id, &mut history, &config, &mut rng))
            .collect();

        let result =
            Population::from_seed(population_config(2, 10), config, 19).with_seeds(seeds);

        assert!(matches!(
            result,
            Err(SeedError::TooManySeeds {
                seeds: 3,
                capacity: 2
            })
        ));
    }

    #[test]
    fn best_genome_only_improves_strictly() {
        let mut population =
            Population::from_seed(population_config(20, 10), genetic_config(), 23);

        population.epoch(constant_fitness(2.0));
        let first_best = population.best_genome().unwrap().id();

        // Same fitness everywhere: the incumbent stays.
        population.epoch(constant_fitness(2.0));
        assert_eq!(population.best_genome().unwrap().id(), first_best);

        population.epoch(constant_fitness(3.0));
        assert_eq!(population.best_genome().unwrap().fitness(), 3.0);
    }
}
