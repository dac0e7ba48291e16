use crate::genomics::{GeneticConfig, Genome};
use crate::SpeciesId;

/// Species are clusters of genetically compatible genomes.
/// Membership is determined by the genetic distance to the
/// species' _current best genome_, re-elected every generation
/// rather than fixed at species formation. Offspring
/// quotas are shared per species, which protects structural
/// novelty from immediate competition with the whole population.
///
/// Members are indices into the population's generation list;
/// the genomes themselves are owned by the population. The best
/// genome is kept as an owned snapshot so it survives the
/// membership churn between generations.
#[derive(Clone, Debug)]
pub struct Species {
    id: SpeciesId,
    members: Vec<usize>,
    best_genome: Genome,
    old_best_genome: Genome,
    staleness: usize,
    average_fitness: f32,
    allocated_children: usize,
    age: usize,
}

impl Species {
    /// Creates a new species around a founding genome, which
    /// becomes its first member and best genome.
    pub(super) fn new(id: SpeciesId, founder_index: usize, founder: &mut Genome) -> Species {
        let mut species = Species {
            id,
            members: Vec::new(),
            best_genome: founder.clone(),
            old_best_genome: founder.clone(),
            staleness: 0,
            average_fitness: 0.0,
            allocated_children: 0,
            age: 0,
        };
        species.add_member(founder_index, founder);
        species
    }

    /// Returns whether `genome` is genetically compatible with
    /// this species, i.e. whether its distance to the species'
    /// current best genome falls within the base compatibility
    /// threshold scaled by `multiplier`.
    pub fn compatible(&self, genome: &Genome, config: &GeneticConfig, multiplier: f32) -> bool {
        Genome::genetic_distance(genome, &self.best_genome, config)
            <= config.compatibility_threshold * multiplier
    }

    /// Adds a member and stamps its species back-reference.
    pub(super) fn add_member(&mut self, index: usize, genome: &mut Genome) {
        genome.species = Some(self.id);
        self.members.push(index);
    }

    /// Sorts the member indices by descending fitness.
    pub(super) fn sort_members(&mut self, genomes: &[Genome]) {
        self.members.sort_unstable_by(|&a, &b| {
            genomes[b]
                .fitness()
                .partial_cmp(&genomes[a].fitness())
                .unwrap_or_else(|| panic!("invalid genome fitnesses detected (NaN)"))
        });
    }

    /// Rolls the best-genome records and staleness counter, and
    /// recomputes the average fitness. Expects a non-empty,
    /// fitness-evaluated member list.
    pub(super) fn update_stats(&mut self, genomes: &[Genome]) {
        self.sort_members(genomes);
        let best = &genomes[self.members[0]];

        self.old_best_genome = std::mem::replace(&mut self.best_genome, best.clone());
        if self.best_genome.fitness() > self.old_best_genome.fitness() {
            self.staleness = 0;
        } else {
            self.staleness += 1;
        }

        let total: f32 = self.members.iter().map(|&i| genomes[i].fitness()).sum();
        self.average_fitness = total / self.members.len() as f32;
    }

    pub(super) fn clear_members(&mut self) {
        self.members.clear();
    }

    pub(super) fn member_indices(&self) -> &[usize] {
        &self.members
    }

    pub(super) fn set_allocated_children(&mut self, children: usize) {
        self.allocated_children = children;
    }

    pub(super) fn increment_age(&mut self) {
        self.age += 1;
    }

    /// Returns the species' id.
    pub fn id(&self) -> SpeciesId {
        self.id
    }

    /// Returns an iterator over the members' indices into the
    /// population's genome list.
    pub fn members(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied()
    }

    /// Returns the number of member genomes.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Returns the species' current best genome.
    pub fn best_genome(&self) -> &Genome {
        &self.best_genome
    }

    /// Returns the species' best genome of the previous
    /// generation.
    pub fn old_best_genome(&self) -> &Genome {
        &self.old_best_genome
    }

    /// Returns the number of consecutive generations without an
    /// improvement of the species' best fitness.
    pub fn staleness(&self) -> usize {
        self.staleness
    }

    /// Returns the mean fitness of the species' members.
    pub fn average_fitness(&self) -> f32 {
        self.average_fitness
    }

    /// Returns the offspring quota allocated for the next
    /// generation.
    pub fn allocated_children(&self) -> usize {
        self.allocated_children
    }

    /// Returns the species' age in generations.
    pub fn age(&self) -> usize {
        self.age
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::History;

    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use std::num::NonZeroUsize;

    fn config() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::new(2).unwrap(),
            output_count: NonZeroUsize::new(1).unwrap(),
            ..GeneticConfig::default()
        }
    }

    fn genome(id: usize, history: &mut History, rng: &mut SmallRng) -> Genome {
        Genome::new(id, history, &config(), rng)
    }

    #[test]
    fn new_stamps_the_founder() {
        let mut history = History::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut founder = genome(0, &mut history, &mut rng);

        let species = Species::new(7, 0, &mut founder);

        assert_eq!(founder.species(), Some(7));
        assert_eq!(species.member_count(), 1);
    }

    #[test]
    fn identical_genome_is_compatible_at_any_multiplier() {
        let mut history = History::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut founder = genome(0, &mut history, &mut rng);
        let twin = founder.clone();

        let species = Species::new(0, 0, &mut founder);

        // Distance 0 passes no matter how tight the threshold.
        assert!(species.compatible(&twin, &config(), 1.0));
        assert!(species.compatible(&twin, &config(), 1e-6));
        assert!(species.compatible(&twin, &config(), 0.0));
    }

    #[test]
    fn update_stats_tracks_staleness() {
        let mut history = History::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut genomes = vec![
            genome(0, &mut history, &mut rng),
            genome(1, &mut history, &mut rng),
        ];
        genomes[0].set_fitness(1.0);
        genomes[1].set_fitness(2.0);

        let mut species = {
            let (first, rest) = genomes.split_at_mut(1);
            let mut species = Species::new(0, 0, &mut first[0]);
            species.add_member(1, &mut rest[0]);
            species
        };

        // Strict improvement over the founder's fitness resets
        // staleness.
        species.update_stats(&genomes);
        assert_eq!(species.staleness(), 0);
        assert_eq!(species.best_genome().id(), 1);
        assert_eq!(species.average_fitness(), 1.5);

        // No improvement increments it.
        species.update_stats(&genomes);
        assert_eq!(species.staleness(), 1);
        assert_eq!(species.old_best_genome().id(), 1);
    }
}
