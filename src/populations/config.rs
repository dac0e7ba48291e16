use std::num::NonZeroUsize;

/// Configuration data for population generation and the
/// evolution loop.
///
/// # Note
/// All quantities expressing probabilities or rates should be
/// in the range [0.0, 1.0]. Using values that are not in this
/// bound may result in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug)]
pub struct PopulationConfig {
    /// Target size of the population.
    pub size: NonZeroUsize,
    /// Number of generations after which the evolution loop
    /// stops, regardless of whether the fitness function has
    /// signalled completion.
    pub max_generations: usize,
    /// Number of generations without a best-fitness improvement
    /// after which a species is removed, unless it holds the
    /// population's best genome.
    pub staleness_threshold: usize,
    /// Top fraction of each species admitted into the breeding
    /// pool.
    pub survival_rate: f32,
    /// Number of contestants sampled per tournament-selection
    /// round; the fittest becomes a parent.
    pub tournament_size: NonZeroUsize,
    /// Desired number of species; the compatibility multiplier
    /// is steered toward it every generation.
    pub target_species_count: usize,
    /// Whether each species' best genome is carried into the
    /// next generation unchanged.
    pub elitism: bool,
    /// Minimum breeding-pool size for elitism to take effect.
    pub min_elitism_size: usize,
}

impl PopulationConfig {
    /// Returns a "zero-valued" configuration. All values are 0,
    /// `false`, or in the case of `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use evoneat::populations::PopulationConfig;
    ///
    /// let config = PopulationConfig {
    ///     max_generations: 50,
    ///     ..PopulationConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            // SAFETY: 1 is a valid NonZeroUsize. Replace this with
            // NonZeroUsize::new(1).unwrap() once const Option::unwrap
            // becomes stable.
            size: unsafe { NonZeroUsize::new_unchecked(1) },
            max_generations: 0,
            staleness_threshold: 0,
            survival_rate: 0.0,
            tournament_size: unsafe { NonZeroUsize::new_unchecked(1) },
            target_species_count: 0,
            elitism: false,
            min_elitism_size: 0,
        }
    }
}

impl Default for PopulationConfig {
    /// Returns a configuration with workable general-purpose
    /// values.
    fn default() -> PopulationConfig {
        PopulationConfig {
            // SAFETY: as in `zero`.
            size: unsafe { NonZeroUsize::new_unchecked(150) },
            max_generations: 100,
            staleness_threshold: 20,
            survival_rate: 0.5,
            tournament_size: unsafe { NonZeroUsize::new_unchecked(3) },
            target_species_count: 6,
            elitism: true,
            min_elitism_size: 0,
        }
    }
}
