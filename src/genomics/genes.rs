use crate::genomics::GeneticConfig;
use crate::{Innovation, NodeId};

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Connections are the principal genes of a genome: weighted
/// edges between two node ids. Endpoints are resolved by id
/// lookup, never by reference, so genomes can be copied freely
/// during crossover.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Connection {
    innovation: Innovation,
    origin: NodeId,
    target: NodeId,
    weight: f32,
    enabled: bool,
    recurrent: bool,
}

impl Connection {
    /// Returns a new _enabled_ connection with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::Connection;
    ///
    /// let connection = Connection::new(42, 3, 9, 2.0, false);
    ///
    /// assert_eq!(connection.innovation(), 42);
    /// assert!(connection.enabled());
    /// ```
    pub fn new(
        innovation: Innovation,
        origin: NodeId,
        target: NodeId,
        weight: f32,
        recurrent: bool,
    ) -> Connection {
        Connection {
            innovation,
            origin,
            target,
            weight,
            enabled: true,
            recurrent,
        }
    }

    /// Mutates the connection's weight. With
    /// [`weight_reset_chance`] the weight is resampled from a
    /// zero-mean normal distribution; otherwise it is perturbed
    /// by a zero-mean normal sample. Either way the result is
    /// clamped into `[min_weight, max_weight]`.
    ///
    /// [`weight_reset_chance`]: crate::genomics::GeneticConfig::weight_reset_chance
    pub fn mutate_weight<R: Rng>(&mut self, config: &GeneticConfig, rng: &mut R) {
        if rng.gen::<f32>() < config.weight_reset_chance {
            self.weight = random_weight(config, rng);
        } else {
            let normal = Normal::new(0.0, config.weight_perturb_std_dev)
                .unwrap_or_else(|_| panic!("invalid weight perturbation standard deviation"));
            self.weight =
                (self.weight + normal.sample(rng)).clamp(config.min_weight, config.max_weight);
        }
    }

    /// Returns the connection's innovation number.
    pub fn innovation(&self) -> Innovation {
        self.innovation
    }

    /// Returns the id of the connection's origin node.
    pub fn origin(&self) -> NodeId {
        self.origin
    }

    /// Returns the id of the connection's target node.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Returns the connection's weight.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Returns whether the connection is expressed in the network.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the connection's enabled status.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns whether the connection runs against the layer
    /// ordering (origin layer ≥ target layer).
    pub fn recurrent(&self) -> bool {
        self.recurrent
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:?}[{:?}->{:?}, {:.3}]{}",
            if self.enabled { "" } else { "(" },
            self.innovation,
            self.origin,
            self.target,
            self.weight,
            if self.enabled { "" } else { ")" },
        )
    }
}

/// Samples a fresh connection weight from a zero-mean normal
/// distribution with the configured standard deviation, clamped
/// into the configured weight bounds.
pub(super) fn random_weight<R: Rng>(config: &GeneticConfig, rng: &mut R) -> f32 {
    let normal = Normal::new(0.0, config.weight_std_dev)
        .unwrap_or_else(|_| panic!("invalid weight standard deviation"));
    normal
        .sample(rng)
        .clamp(config.min_weight, config.max_weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use std::num::NonZeroUsize;

    fn narrow_bounds_config() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::new(1).unwrap(),
            output_count: NonZeroUsize::new(1).unwrap(),
            weight_std_dev: 8.0,
            weight_perturb_std_dev: 8.0,
            min_weight: -1.0,
            max_weight: 1.0,
            ..GeneticConfig::default()
        }
    }

    #[test]
    fn mutate_weight_reset_stays_in_bounds() {
        let config = GeneticConfig {
            weight_reset_chance: 1.0,
            ..narrow_bounds_config()
        };
        let mut rng = SmallRng::seed_from_u64(7);
        let mut connection = Connection::new(0, 0, 1, 0.0, false);
        for _ in 0..200 {
            connection.mutate_weight(&config, &mut rng);
            assert!((-1.0..=1.0).contains(&connection.weight()));
        }
    }

    #[test]
    fn mutate_weight_perturb_stays_in_bounds() {
        let config = GeneticConfig {
            weight_reset_chance: 0.0,
            ..narrow_bounds_config()
        };
        let mut rng = SmallRng::seed_from_u64(7);
        let mut connection = Connection::new(0, 0, 1, 0.9, false);
        for _ in 0..200 {
            connection.mutate_weight(&config, &mut rng);
            assert!((-1.0..=1.0).contains(&connection.weight()));
        }
    }

    #[test]
    fn random_weight_respects_bounds() {
        let config = narrow_bounds_config();
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let weight = random_weight(&config, &mut rng);
            assert!((-1.0..=1.0).contains(&weight));
        }
    }
}
