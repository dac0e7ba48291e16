//! Genome representation, mutation operators and crossover.
//!
//! Genomes are the focus of evolution. They are a collection of
//! [`Node`]s and [`Connection`]s that can be instantiated as a
//! neural network and evaluated for performance in a task, which
//! results numerically in their fitness score. Genomes are
//! progressively complexified by structural mutation, with every
//! structural change recorded in a shared [`History`].

mod config;
mod errors;
mod genes;
mod history;
mod nodes;

pub use config::GeneticConfig;
pub use errors::GenomeError;
pub use genes::Connection;
pub use history::{History, InnovationKind, InnovationRecord};
pub use nodes::{ActivationKind, Node, NodeKind};

use crate::{GenomeId, Innovation, NodeId, SpeciesId};

use ahash::RandomState;
use rand::prelude::{Rng, SliceRandom};
use serde::{Deserialize, Serialize};

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// A genome: one candidate neural network in the population.
///
/// Nodes are kept sorted by id and connections sorted by
/// innovation number; the latter ordering is what makes the
/// linear-time gene alignment in [`crossover`] and
/// [`genetic_distance`] work, and every insertion preserves it.
///
/// [`crossover`]: Genome::crossover
/// [`genetic_distance`]: Genome::genetic_distance
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Genome {
    id: GenomeId,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    input_count: usize,
    output_count: usize,
    fitness: f32,
    age: usize,
    pub(crate) species: Option<SpeciesId>,
    // Number of distinct layer values, doubling as the
    // network-built flag: `None` until `rebuild_network` runs,
    // reset by every structural change.
    #[serde(skip)]
    layer_count: Option<usize>,
}

impl Genome {
    /// Creates a freshly-wired genome: one bias node and
    /// `input_count` input nodes at layer 0, `output_count`
    /// output nodes at layer 1, connected either fully (every
    /// zero-layer node to every output) or, in
    /// [`sparse_start`] mode, by a single random
    /// input→output pair. New weights are drawn from a
    /// zero-mean normal distribution and all innovation numbers
    /// come from `history`.
    ///
    /// [`sparse_start`]: GeneticConfig::sparse_start
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, History};
    /// use rand::rngs::SmallRng;
    /// use rand::SeedableRng;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     output_count: NonZeroUsize::new(1).unwrap(),
    ///     ..GeneticConfig::default()
    /// };
    /// let mut history = History::new();
    /// let mut rng = SmallRng::seed_from_u64(42);
    ///
    /// let genome = Genome::new(0, &mut history, &config, &mut rng);
    ///
    /// // Bias + 2 inputs + 1 output, fully connected.
    /// assert_eq!(genome.nodes().len(), 4);
    /// assert_eq!(genome.connections().len(), 3);
    /// ```
    pub fn new<R: Rng>(
        id: GenomeId,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Genome {
        let input_count = config.input_count.get();
        let output_count = config.output_count.get();

        let mut nodes = Vec::with_capacity(1 + input_count + output_count);
        nodes.push(Node::new(
            0,
            NodeKind::Bias,
            0.0,
            config.default_activation,
            config.default_activation_response,
        ));
        for i in 0..input_count {
            nodes.push(Node::new(
                1 + i,
                NodeKind::Input,
                0.0,
                config.default_activation,
                config.default_activation_response,
            ));
        }
        for o in 0..output_count {
            nodes.push(Node::new(
                1 + input_count + o,
                NodeKind::Output,
                1.0,
                config.default_activation,
                config.default_activation_response,
            ));
        }
        history.reserve_node_ids(nodes.len());

        let mut genome = Genome {
            id,
            nodes,
            connections: Vec::new(),
            input_count,
            output_count,
            fitness: 0.0,
            age: 0,
            species: None,
            layer_count: None,
        };

        if config.sparse_start {
            genome.connect_single(history, config, rng);
        } else {
            genome.connect_full(history, config, rng);
        }
        genome
    }

    /// Assembles a genome from supplied genes, e.g. crossover
    /// output or caller-provided seeds. Nodes are sorted by id
    /// and connections by innovation number; no default wiring
    /// is added.
    ///
    /// # Panics
    /// Panics if the supplied nodes contain duplicate ids or the
    /// connections duplicate innovation numbers, as either
    /// indicates a bug in the code that assembled the genes.
    pub fn from_genes(
        id: GenomeId,
        mut nodes: Vec<Node>,
        mut connections: Vec<Connection>,
        input_count: usize,
        output_count: usize,
    ) -> Genome {
        nodes.sort_unstable_by_key(Node::id);
        connections.sort_unstable_by_key(Connection::innovation);
        assert!(
            nodes.windows(2).all(|pair| pair[0].id() != pair[1].id()),
            "duplicate node ids in assembled genome"
        );
        assert!(
            connections
                .windows(2)
                .all(|pair| pair[0].innovation() != pair[1].innovation()),
            "duplicate connection innovations in assembled genome"
        );
        for node in &mut nodes {
            node.reset_state();
        }
        Genome {
            id,
            nodes,
            connections,
            input_count,
            output_count,
            fitness: 0.0,
            age: 0,
            species: None,
            layer_count: None,
        }
    }

    /// Wires every zero-layer node to every output node.
    fn connect_full<R: Rng>(&mut self, history: &mut History, config: &GeneticConfig, rng: &mut R) {
        for origin in 0..=self.input_count {
            for o in 0..self.output_count {
                let target = 1 + self.input_count + o;
                let record = history.get_or_create(InnovationKind::NewConnection, origin, target);
                let weight = genes::random_weight(config, rng);
                self.insert_connection(Connection::new(
                    record.innovation,
                    origin,
                    target,
                    weight,
                    false,
                ));
            }
        }
    }

    /// Wires a single random zero-layer node to a random output
    /// node, for feature-selective starts.
    fn connect_single<R: Rng>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) {
        let origin = rng.gen_range(0..=self.input_count);
        let target = 1 + self.input_count + rng.gen_range(0..self.output_count);
        let record = history.get_or_create(InnovationKind::NewConnection, origin, target);
        let weight = genes::random_weight(config, rng);
        self.insert_connection(Connection::new(
            record.innovation,
            origin,
            target,
            weight,
            false,
        ));
    }

    /// Recomputes the derived per-node adjacency caches from the
    /// currently enabled connections, and the genome's layer
    /// count. Must be called before [`evaluate`] after any
    /// structural change.
    ///
    /// [`evaluate`]: Genome::evaluate
    pub fn rebuild_network(&mut self) {
        let mut layers: HashSet<u32, RandomState> = HashSet::default();
        for node in &mut self.nodes {
            node.reset_state();
            layers.insert(node.layer().to_bits());
        }
        for index in 0..self.connections.len() {
            if !self.connections[index].enabled() {
                continue;
            }
            let target_id = self.connections[index].target();
            let target = self
                .node_index(target_id)
                .unwrap_or_else(|| panic!("connection targets nonexistant node {}", target_id));
            self.nodes[target].incoming.push(index);
        }
        self.layer_count = Some(layers.len());
    }

    /// Propagates `inputs` through the network and returns the
    /// output nodes' activated values, in node-id order.
    ///
    /// The network is activated once per distinct layer, so
    /// signals from nodes added by splitting still propagate all
    /// the way through without a topological ordering, which no
    /// ordering could provide in the presence of arbitrary
    /// recurrent and skip connections.
    ///
    /// # Errors
    /// Returns an error if [`rebuild_network`] has not been
    /// called since construction or the last structural change,
    /// or if `inputs` does not match the genome's input arity.
    ///
    /// [`rebuild_network`]: Genome::rebuild_network
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, History};
    /// use rand::rngs::SmallRng;
    /// use rand::SeedableRng;
    ///
    /// let config = GeneticConfig::default();
    /// let mut history = History::new();
    /// let mut rng = SmallRng::seed_from_u64(42);
    /// let mut genome = Genome::new(0, &mut history, &config, &mut rng);
    ///
    /// assert!(genome.evaluate(&[1.0]).is_err());
    ///
    /// genome.rebuild_network();
    /// let outputs = genome.evaluate(&[1.0]).unwrap();
    ///
    /// assert_eq!(outputs.len(), 1);
    /// ```
    pub fn evaluate(&mut self, inputs: &[f32]) -> Result<Vec<f32>, GenomeError> {
        let layer_count = self.layer_count.ok_or(GenomeError::NetworkNotBuilt)?;
        if inputs.len() != self.input_count {
            return Err(GenomeError::InputSizeMismatch {
                expected: self.input_count,
                actual: inputs.len(),
            });
        }

        let mut outputs = Vec::with_capacity(self.output_count);
        for _ in 0..layer_count {
            outputs.clear();
            let mut next_input = 0;
            for index in 0..self.nodes.len() {
                match self.nodes[index].kind() {
                    NodeKind::Input => {
                        self.nodes[index].activated_output = inputs[next_input];
                        next_input += 1;
                    }
                    NodeKind::Bias => self.nodes[index].activated_output = 1.0,
                    NodeKind::Output | NodeKind::Hidden => {
                        self.fire(index);
                        if self.nodes[index].kind() == NodeKind::Output {
                            outputs.push(self.nodes[index].activated_output);
                        }
                    }
                }
            }
        }
        Ok(outputs)
    }

    /// Aggregates the node's enabled incoming signals and applies
    /// its activation function.
    fn fire(&mut self, index: usize) {
        let mut sum = 0.0;
        for &c in &self.nodes[index].incoming {
            let connection = &self.connections[c];
            let origin = self
                .node_by_id(connection.origin())
                .unwrap_or_else(|| panic!("connection originates from nonexistant node"));
            sum += connection.weight() * origin.activated_output;
        }
        self.nodes[index].aggregated_input = sum;
        self.nodes[index].activate(sum);
    }

    /// Induces a _node mutation_: splits a connection by
    /// disabling it and routing its signal through a fresh hidden
    /// node at the midpoint of its endpoints' layers. The
    /// incoming replacement keeps weight 1.0 and the outgoing one
    /// inherits the split connection's weight, preserving the
    /// edge's effect.
    ///
    /// Candidate sampling is biased toward older connections
    /// while the genome is small, so brand-new links are not
    /// immediately re-split. Candidates that are disabled,
    /// recurrent or originate from the bias node are rejected,
    /// retrying up to [`add_node_attempts`] times.
    ///
    /// Returns the new node's id and the two new connections'
    /// innovation numbers, or `None` if no eligible candidate was
    /// found or this exact split is already present in the genome.
    ///
    /// [`add_node_attempts`]: GeneticConfig::add_node_attempts
    pub fn mutate_add_node<R: Rng>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Option<(NodeId, Innovation, Innovation)> {
        if self.connections.is_empty() {
            return None;
        }

        let size_threshold = self.input_count + self.output_count + 5;
        let mut split_index = None;
        for _ in 0..config.add_node_attempts {
            let n = self.connections.len();
            let candidate = if n < size_threshold {
                let upper = n - 1 - (((n - 1) as f64).sqrt() as usize);
                rng.gen_range(0..=upper)
            } else {
                rng.gen_range(0..n)
            };
            let connection = &self.connections[candidate];
            let origin_is_bias = self
                .node_by_id(connection.origin())
                .map_or(true, |node| node.kind() == NodeKind::Bias);
            if connection.enabled() && !connection.recurrent() && !origin_is_bias {
                split_index = Some(candidate);
                break;
            }
        }
        let split_index = split_index?;

        let (split_innovation, origin_id, target_id, split_weight) = {
            let connection = &self.connections[split_index];
            (
                connection.innovation(),
                connection.origin(),
                connection.target(),
                connection.weight(),
            )
        };
        let origin_layer = self.node_by_id(origin_id)?.layer();
        let target_layer = self.node_by_id(target_id)?.layer();
        let new_layer = (origin_layer + target_layer) / 2.0;
        let recurrent = origin_layer > target_layer;

        let split = history.get_or_create(InnovationKind::NodeSplit, origin_id, target_id);
        let new_node_id = split
            .node_id
            .unwrap_or_else(|| panic!("node-split innovation without a node id"));
        // The same split can already be present if the original
        // connection was re-enabled by crossover after an earlier
        // split; in that case nothing happens.
        if self.node_by_id(new_node_id).is_some() {
            return None;
        }

        self.insert_node(Node::new(
            new_node_id,
            NodeKind::Hidden,
            new_layer,
            config.default_activation,
            config.default_activation_response,
        ));
        let incoming = history.get_or_create(InnovationKind::NewConnection, origin_id, new_node_id);
        self.insert_connection(Connection::new(
            incoming.innovation,
            origin_id,
            new_node_id,
            1.0,
            recurrent,
        ));
        let outgoing = history.get_or_create(InnovationKind::NewConnection, new_node_id, target_id);
        self.insert_connection(Connection::new(
            outgoing.innovation,
            new_node_id,
            target_id,
            split_weight,
            recurrent,
        ));

        let split_at = self
            .connections
            .binary_search_by_key(&split_innovation, Connection::innovation)
            .unwrap_or_else(|_| panic!("split connection vanished from genome"));
        self.connections[split_at].set_enabled(false);

        Some((new_node_id, incoming.innovation, outgoing.innovation))
    }

    /// Induces a _connection mutation_: connects two previously
    /// unconnected nodes with a normally-distributed weight. The
    /// target is never the bias node or an input node. Candidate
    /// pairs whose origin layer is not below the target layer
    /// form a recurrent connection, and are only accepted with
    /// [`recurrent_connection_chance`]; feed-forward pairs are
    /// accepted immediately. Retries up to
    /// [`add_connection_attempts`] times.
    ///
    /// Returns the new connection's innovation number, or `None`
    /// if no eligible pair was found.
    ///
    /// [`recurrent_connection_chance`]: GeneticConfig::recurrent_connection_chance
    /// [`add_connection_attempts`]: GeneticConfig::add_connection_attempts
    pub fn mutate_add_connection<R: Rng>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Option<Innovation> {
        let first_target = 1 + self.input_count;
        if self.nodes.len() <= first_target {
            return None;
        }

        for _ in 0..config.add_connection_attempts {
            let origin_index = rng.gen_range(0..self.nodes.len());
            let target_index = rng.gen_range(first_target..self.nodes.len());
            if origin_index == target_index {
                continue;
            }
            let (origin_id, origin_layer) = {
                let node = &self.nodes[origin_index];
                (node.id(), node.layer())
            };
            let (target_id, target_layer) = {
                let node = &self.nodes[target_index];
                (node.id(), node.layer())
            };
            if self.has_connection(origin_id, target_id) {
                continue;
            }
            let recurrent = origin_layer >= target_layer;
            if recurrent && rng.gen::<f32>() >= config.recurrent_connection_chance {
                continue;
            }

            let record = history.get_or_create(InnovationKind::NewConnection, origin_id, target_id);
            let weight = genes::random_weight(config, rng);
            self.insert_connection(Connection::new(
                record.innovation,
                origin_id,
                target_id,
                weight,
                recurrent,
            ));
            return Some(record.innovation);
        }
        None
    }

    /// Induces a _deselection mutation_: removes a random
    /// connection whose origin is an input or bias node and whose
    /// target is an output node. Wiring that involves hidden
    /// nodes is never touched. Retries up to
    /// [`remove_connection_attempts`] times; no-op if the genome
    /// has fewer than two connections, as removing the last one
    /// would leave a non-functional network.
    ///
    /// Returns the removed connection's innovation number.
    ///
    /// [`remove_connection_attempts`]: GeneticConfig::remove_connection_attempts
    pub fn mutate_remove_connection<R: Rng>(
        &mut self,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Option<Innovation> {
        if self.connections.len() < 2 {
            return None;
        }

        for _ in 0..config.remove_connection_attempts {
            let index = rng.gen_range(0..self.connections.len());
            let (origin_id, target_id) = {
                let connection = &self.connections[index];
                (connection.origin(), connection.target())
            };
            let first_layer_origin = self.node_by_id(origin_id).map_or(false, |node| {
                matches!(node.kind(), NodeKind::Input | NodeKind::Bias)
            });
            let output_target = self
                .node_by_id(target_id)
                .map_or(false, |node| node.kind() == NodeKind::Output);
            if first_layer_origin && output_target {
                let removed = self.connections.remove(index);
                self.layer_count = None;
                return Some(removed.innovation());
            }
        }
        None
    }

    /// Applies all mutation operators, each independently with
    /// its configured chance: node addition, connection addition,
    /// per-connection weight mutation and per-node
    /// activation-response perturbation. With [`deselection`] set
    /// and more than one connection present, connection removal
    /// is applied as well.
    ///
    /// [`deselection`]: GeneticConfig::deselection
    pub fn mutate<R: Rng>(&mut self, history: &mut History, config: &GeneticConfig, rng: &mut R) {
        if rng.gen::<f32>() < config.add_node_chance {
            self.mutate_add_node(history, config, rng);
        }
        if rng.gen::<f32>() < config.add_connection_chance {
            self.mutate_add_connection(history, config, rng);
        }
        for connection in &mut self.connections {
            if rng.gen::<f32>() < config.weight_mutation_chance {
                connection.mutate_weight(config, rng);
            }
        }
        for node in &mut self.nodes {
            if rng.gen::<f32>() < config.activation_mutation_chance {
                let delta = (rng.gen::<f32>() * 2.0 - 1.0) * config.activation_perturb_magnitude;
                node.nudge_activation_response(delta);
            }
        }
        if config.deselection
            && self.connections.len() > 1
            && rng.gen::<f32>() < config.remove_connection_chance
        {
            self.mutate_remove_connection(config, rng);
        }
    }

    /// Combines two parents into an offspring genome by aligning
    /// their connections on innovation numbers: matching genes
    /// are picked from either parent at random, while disjoint
    /// and excess genes are inherited only from the better parent
    /// (higher fitness, with fewer connections as the
    /// tie-breaker). Endpoint nodes are copied over from whichever
    /// parent contributed the gene, and all of the first parent's
    /// input, bias and output nodes are present in the offspring
    /// even if no inherited connection touches them.
    ///
    /// If every inherited connection is disabled, one of them,
    /// chosen uniformly at random, is re-enabled so the offspring
    /// network is never degenerate.
    pub fn crossover<R: Rng>(
        parent1: &Genome,
        parent2: &Genome,
        offspring_id: GenomeId,
        rng: &mut R,
    ) -> Genome {
        let better_is_first = match parent1.fitness.partial_cmp(&parent2.fitness) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Less) => false,
            Some(Ordering::Equal) => parent1.connections.len() <= parent2.connections.len(),
            None => panic!("invalid genome fitnesses detected (NaN)"),
        };

        let mut connections: Vec<Connection> = Vec::new();
        let mut nodes: Vec<Node> = Vec::new();
        let mut node_ids: HashSet<NodeId, RandomState> = HashSet::default();

        let (n1, n2) = (parent1.connections.len(), parent2.connections.len());
        let (mut i1, mut i2) = (0, 0);
        while i1 < n1 || i2 < n2 {
            let picked: Option<(&Connection, &Genome)> = if i1 < n1 && i2 < n2 {
                let c1 = &parent1.connections[i1];
                let c2 = &parent2.connections[i2];
                match c1.innovation().cmp(&c2.innovation()) {
                    Ordering::Equal => {
                        i1 += 1;
                        i2 += 1;
                        if rng.gen::<bool>() {
                            Some((c1, parent1))
                        } else {
                            Some((c2, parent2))
                        }
                    }
                    Ordering::Less => {
                        i1 += 1;
                        better_is_first.then(|| (c1, parent1))
                    }
                    Ordering::Greater => {
                        i2 += 1;
                        (!better_is_first).then(|| (c2, parent2))
                    }
                }
            } else if i1 < n1 {
                i1 += 1;
                better_is_first.then(|| (&parent1.connections[i1 - 1], parent1))
            } else {
                i2 += 1;
                (!better_is_first).then(|| (&parent2.connections[i2 - 1], parent2))
            };

            let (connection, contributor) = match picked {
                Some(picked) => picked,
                None => continue,
            };
            // Guards a pathological double pick of the same
            // innovation number.
            if connections
                .last()
                .map_or(false, |last| last.innovation() == connection.innovation())
            {
                continue;
            }

            connections.push(connection.clone());
            for endpoint in [connection.origin(), connection.target()] {
                if !node_ids.contains(&endpoint) {
                    if let Some(node) = contributor.node_by_id(endpoint) {
                        nodes.push(node.clone());
                        node_ids.insert(endpoint);
                    }
                }
            }
        }

        for node in &parent1.nodes {
            if node.kind() != NodeKind::Hidden && node_ids.insert(node.id()) {
                nodes.push(node.clone());
            }
        }

        if !connections.is_empty() && connections.iter().all(|c| !c.enabled()) {
            if let Some(connection) = connections.choose_mut(rng) {
                connection.set_enabled(true);
            }
        }

        Genome::from_genes(
            offspring_id,
            nodes,
            connections,
            parent1.input_count,
            parent1.output_count,
        )
    }

    /// Returns the genetic distance between two genomes: a
    /// weighted combination of excess genes, disjoint genes and
    /// the matched genes' accumulated weight difference.
    ///
    /// Two genomes with identical connection innovations and
    /// weights have distance 0.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{GeneticConfig, Genome, History};
    /// use rand::rngs::SmallRng;
    /// use rand::SeedableRng;
    ///
    /// let config = GeneticConfig::default();
    /// let mut history = History::new();
    /// let mut rng = SmallRng::seed_from_u64(42);
    /// let genome = Genome::new(0, &mut history, &config, &mut rng);
    ///
    /// assert_eq!(Genome::genetic_distance(&genome, &genome.clone(), &config), 0.0);
    /// ```
    pub fn genetic_distance(first: &Genome, second: &Genome, config: &GeneticConfig) -> f32 {
        let (n1, n2) = (first.connections.len(), second.connections.len());
        let (mut i1, mut i2) = (0, 0);
        let (mut matching, mut disjoint, mut excess) = (0usize, 0usize, 0usize);
        let mut weight_difference = 0.0f32;

        while i1 < n1 || i2 < n2 {
            if i1 == n1 {
                excess += 1;
                i2 += 1;
                continue;
            }
            if i2 == n2 {
                excess += 1;
                i1 += 1;
                continue;
            }
            let c1 = &first.connections[i1];
            let c2 = &second.connections[i2];
            match c1.innovation().cmp(&c2.innovation()) {
                Ordering::Equal => {
                    matching += 1;
                    weight_difference += (c1.weight() - c2.weight()).abs();
                    i1 += 1;
                    i2 += 1;
                }
                Ordering::Less => {
                    disjoint += 1;
                    i1 += 1;
                }
                Ordering::Greater => {
                    disjoint += 1;
                    i2 += 1;
                }
            }
        }

        let longest = n1.max(n2).max(1) as f32;
        (config.excess_coefficient * excess as f32 + config.disjoint_coefficient * disjoint as f32)
            / longest
            + config.weight_coefficient * weight_difference / (matching + 1) as f32
    }

    /// Returns whether the genome contains a connection for the
    /// ordered `(origin, target)` pair.
    fn has_connection(&self, origin: NodeId, target: NodeId) -> bool {
        self.connections
            .iter()
            .any(|c| c.origin() == origin && c.target() == target)
    }

    /// Returns the index of the node with the given id.
    fn node_index(&self, id: NodeId) -> Option<usize> {
        self.nodes.binary_search_by_key(&id, Node::id).ok()
    }

    /// Returns the node with the given id.
    fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.node_index(id).map(|index| &self.nodes[index])
    }

    /// Inserts a node, keeping the id ordering.
    ///
    /// # Panics
    /// Panics on a duplicate node id: that indicates a bug in the
    /// mutation or crossover logic, not a runtime condition.
    fn insert_node(&mut self, node: Node) {
        match self.nodes.binary_search_by_key(&node.id(), Node::id) {
            Ok(_) => panic!("duplicate node insertion with id {}", node.id()),
            Err(at) => self.nodes.insert(at, node),
        }
        self.layer_count = None;
    }

    /// Inserts a connection, keeping the innovation ordering.
    ///
    /// # Panics
    /// Panics on a duplicate innovation number.
    fn insert_connection(&mut self, connection: Connection) {
        match self
            .connections
            .binary_search_by_key(&connection.innovation(), Connection::innovation)
        {
            Ok(_) => panic!(
                "duplicate connection insertion with innovation {}",
                connection.innovation()
            ),
            Err(at) => self.connections.insert(at, connection),
        }
        self.layer_count = None;
    }

    /// Returns the genome's id.
    pub fn id(&self) -> GenomeId {
        self.id
    }

    /// Returns the genome's fitness.
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Sets the genome's fitness. Evolution expects fitness
    /// values to be ≥ 0.
    pub fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }

    /// Returns the number of generations the genome has survived.
    pub fn age(&self) -> usize {
        self.age
    }

    pub(crate) fn increment_age(&mut self) {
        self.age += 1;
    }

    /// Returns the id of the species the genome currently
    /// belongs to, if it has been speciated.
    pub fn species(&self) -> Option<SpeciesId> {
        self.species
    }

    /// Returns the genome's nodes, sorted by id.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the genome's connections, sorted by innovation
    /// number.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Returns the genome's input arity.
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Returns the genome's output arity.
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Returns the number of distinct node layers, or `None` if
    /// the network has not been built.
    pub fn layer_count(&self) -> Option<usize> {
        self.layer_count
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}[fitness: {:.3}, nodes: {}, connections: {}]",
            self.id,
            self.fitness,
            self.nodes.len(),
            self.connections.len(),
        )
    }
}
