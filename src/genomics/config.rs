use crate::genomics::ActivationKind;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for genome generation, mutation and
/// inter-genome comparison.
///
/// # Note
/// All quantities expressing probabilities should be in the
/// range [0.0, 1.0]. Using values that are not in this bound
/// may result in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of input nodes in a genome.
    pub input_count: NonZeroUsize,
    /// Number of output nodes in a genome.
    pub output_count: NonZeroUsize,
    /// If set, fresh genomes start with a single random
    /// input→output connection instead of full wiring.
    pub sparse_start: bool,
    /// If set, [`Genome::mutate`] may also remove first-layer
    /// connections (the deselection variant).
    ///
    /// [`Genome::mutate`]: crate::genomics::Genome::mutate
    pub deselection: bool,
    /// Standard deviation of the zero-mean normal distribution
    /// used when setting or resetting a connection weight.
    pub weight_std_dev: f32,
    /// Standard deviation of the zero-mean normal distribution
    /// used when perturbing a connection weight.
    pub weight_perturb_std_dev: f32,
    /// Minimum allowable connection weight.
    pub min_weight: f32,
    /// Maximum allowable connection weight.
    pub max_weight: f32,
    /// Chance that a weight mutation resets the weight
    /// instead of perturbing it.
    pub weight_reset_chance: f32,
    /// Per-connection chance of a weight mutation.
    pub weight_mutation_chance: f32,
    /// Per-node chance of an activation-response perturbation.
    pub activation_mutation_chance: f32,
    /// Magnitude scaling the uniform [-1, 1] activation-response
    /// perturbation.
    pub activation_perturb_magnitude: f32,
    /// Chance of a node-addition mutation per reproduction.
    pub add_node_chance: f32,
    /// Chance of a connection-addition mutation per reproduction.
    pub add_connection_chance: f32,
    /// Chance of a connection-removal mutation per reproduction
    /// (only effective with [`deselection`] set).
    ///
    /// [`deselection`]: GeneticConfig::deselection
    pub remove_connection_chance: f32,
    /// Chance that a candidate recurrent connection is accepted
    /// during connection addition.
    pub recurrent_connection_chance: f32,
    /// Maximum candidate-sampling attempts during node addition.
    pub add_node_attempts: usize,
    /// Maximum pair-sampling attempts during connection addition.
    pub add_connection_attempts: usize,
    /// Maximum sampling attempts during connection removal.
    pub remove_connection_attempts: usize,
    /// Activation kind given to all freshly created nodes.
    pub default_activation: ActivationKind,
    /// Activation response given to all freshly created nodes.
    pub default_activation_response: f32,
    /// Weight of excess genes in the compatibility score.
    pub excess_coefficient: f32,
    /// Weight of disjoint genes in the compatibility score.
    pub disjoint_coefficient: f32,
    /// Weight of the matched-gene weight difference in the
    /// compatibility score.
    pub weight_coefficient: f32,
    /// Base compatibility threshold, scaled by the population's
    /// running multiplier during speciation.
    pub compatibility_threshold: f32,
}

impl GeneticConfig {
    /// Returns a "zero-valued" configuration. All values are 0,
    /// `false`, or in the case of `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::GeneticConfig;
    ///
    /// let config = GeneticConfig {
    ///     add_node_chance: 0.1,
    ///     ..GeneticConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            // SAFETY: 1 is a valid NonZeroUsize. Replace this with
            // NonZeroUsize::new(1).unwrap() once const Option::unwrap
            // becomes stable.
            input_count: unsafe { NonZeroUsize::new_unchecked(1) },
            output_count: unsafe { NonZeroUsize::new_unchecked(1) },
            sparse_start: false,
            deselection: false,
            weight_std_dev: 0.0,
            weight_perturb_std_dev: 0.0,
            min_weight: 0.0,
            max_weight: 0.0,
            weight_reset_chance: 0.0,
            weight_mutation_chance: 0.0,
            activation_mutation_chance: 0.0,
            activation_perturb_magnitude: 0.0,
            add_node_chance: 0.0,
            add_connection_chance: 0.0,
            remove_connection_chance: 0.0,
            recurrent_connection_chance: 0.0,
            add_node_attempts: 0,
            add_connection_attempts: 0,
            remove_connection_attempts: 0,
            default_activation: ActivationKind::ScaledSigmoid,
            default_activation_response: 1.0,
            excess_coefficient: 0.0,
            disjoint_coefficient: 0.0,
            weight_coefficient: 0.0,
            compatibility_threshold: 0.0,
        }
    }
}

impl Default for GeneticConfig {
    /// Returns a configuration with workable general-purpose
    /// values for every parameter except the input/output arity,
    /// which defaults to 1/1 and should be set explicitly.
    fn default() -> GeneticConfig {
        GeneticConfig {
            sparse_start: false,
            deselection: false,
            weight_std_dev: 2.0,
            weight_perturb_std_dev: 1.5,
            min_weight: -10.0,
            max_weight: 10.0,
            weight_reset_chance: 0.1,
            weight_mutation_chance: 0.8,
            activation_mutation_chance: 0.9,
            activation_perturb_magnitude: 0.1,
            add_node_chance: 0.03,
            add_connection_chance: 0.3,
            remove_connection_chance: 0.3,
            recurrent_connection_chance: 0.05,
            add_node_attempts: 5,
            add_connection_attempts: 5,
            remove_connection_attempts: 5,
            default_activation: ActivationKind::ScaledSigmoid,
            default_activation_response: 1.0 / 4.924_273,
            excess_coefficient: 1.0,
            disjoint_coefficient: 1.0,
            weight_coefficient: 0.4,
            compatibility_threshold: 3.0,
            ..GeneticConfig::zero()
        }
    }
}
