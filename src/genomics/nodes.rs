use crate::NodeId;

use serde::{Deserialize, Serialize};

use std::fmt;

/// An ActivationKind selects the activation function
/// a node applies when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ActivationKind {
    // 1 / (1 + exp(-x))
    Sigmoid,
    // (1 / (1 + exp(-x / response))) * 2 - 1
    ScaledSigmoid,
    // max(0, x)
    ReLU,
    // max(0.1x, x)
    LeakyReLU,
    // 1 if x >= 0, else 0
    Step,
    // x
    Identity,
}

/// A NodeKind indicates the role a node plays in the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Input nodes. Take their assigned input value
    /// directly, bypassing activation.
    Input,
    /// Output nodes.
    Output,
    /// The bias node. Always outputs 1.
    Bias,
    /// Hidden nodes, created by splitting a connection.
    Hidden,
}

/// Nodes are the structural endpoints between which
/// connections are created.
///
/// `layer` locates the node between the input depth (0.0)
/// and the output depth (1.0); hidden nodes take the midpoint
/// of the edge they split.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    layer: f32,
    kind: NodeKind,
    activation: ActivationKind,
    activation_response: f32,
    // Transient per-evaluation state and the derived adjacency
    // cache. Rebuilt by `Genome::rebuild_network`, never
    // authoritative, never serialized.
    #[serde(skip)]
    pub(super) aggregated_input: f32,
    #[serde(skip)]
    pub(super) activated_output: f32,
    #[serde(skip)]
    pub(super) incoming: Vec<usize>,
}

impl Node {
    /// Returns a new node with the passed parameters.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{ActivationKind, Node, NodeKind};
    ///
    /// let node = Node::new(5, NodeKind::Hidden, 0.5, ActivationKind::Sigmoid, 1.0);
    ///
    /// assert_eq!(node.id(), 5);
    /// assert_eq!(node.layer(), 0.5);
    /// ```
    pub fn new(
        id: NodeId,
        kind: NodeKind,
        layer: f32,
        activation: ActivationKind,
        activation_response: f32,
    ) -> Node {
        Node {
            id,
            layer,
            kind,
            activation,
            activation_response,
            aggregated_input: 0.0,
            activated_output: 0.0,
            incoming: Vec::new(),
        }
    }

    /// Returns the node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the node's layer position in `[0, 1]`.
    pub fn layer(&self) -> f32 {
        self.layer
    }

    /// Returns the node's kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the node's activation kind.
    pub fn activation(&self) -> ActivationKind {
        self.activation
    }

    /// Returns the node's activation response (the scale
    /// parameter of the scaled sigmoid).
    pub fn activation_response(&self) -> f32 {
        self.activation_response
    }

    /// Shifts the activation response by `delta`.
    pub(super) fn nudge_activation_response(&mut self, delta: f32) {
        self.activation_response += delta;
    }

    /// Clears the transient evaluation state and the
    /// derived adjacency cache.
    pub(super) fn reset_state(&mut self) {
        self.aggregated_input = 0.0;
        self.activated_output = 0.0;
        self.incoming.clear();
    }

    /// Applies the node's activation function to `x` and
    /// stores the result as the node's activated output.
    pub(super) fn activate(&mut self, x: f32) {
        self.activated_output = match self.activation {
            ActivationKind::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationKind::ScaledSigmoid => {
                (1.0 / (1.0 + (-x / self.activation_response).exp())) * 2.0 - 1.0
            }
            ActivationKind::ReLU => x.max(0.0),
            ActivationKind::LeakyReLU => (0.1 * x).max(x),
            ActivationKind::Step => {
                if x >= 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivationKind::Identity => x,
        };
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}[{:?}, {:?}, L{:.3}]",
            self.id, self.kind, self.activation, self.layer,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activate_identity_passes_through() {
        let mut node = Node::new(0, NodeKind::Hidden, 0.5, ActivationKind::Identity, 1.0);
        node.activate(-3.25);
        assert_eq!(node.activated_output, -3.25);
    }

    #[test]
    fn activate_relu_clamps_negatives() {
        let mut node = Node::new(0, NodeKind::Hidden, 0.5, ActivationKind::ReLU, 1.0);
        node.activate(-2.0);
        assert_eq!(node.activated_output, 0.0);
        node.activate(2.0);
        assert_eq!(node.activated_output, 2.0);
    }

    #[test]
    fn activate_leaky_relu_keeps_slope() {
        let mut node = Node::new(0, NodeKind::Hidden, 0.5, ActivationKind::LeakyReLU, 1.0);
        node.activate(-10.0);
        assert_eq!(node.activated_output, -1.0);
    }

    #[test]
    fn activate_step_is_binary() {
        let mut node = Node::new(0, NodeKind::Hidden, 0.5, ActivationKind::Step, 1.0);
        node.activate(0.0);
        assert_eq!(node.activated_output, 1.0);
        node.activate(-0.001);
        assert_eq!(node.activated_output, 0.0);
    }

    #[test]
    fn activate_sigmoid_is_centered() {
        let mut node = Node::new(0, NodeKind::Hidden, 0.5, ActivationKind::Sigmoid, 1.0);
        node.activate(0.0);
        assert!((node.activated_output - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn activate_scaled_sigmoid_is_zero_centered() {
        let mut node = Node::new(0, NodeKind::Hidden, 0.5, ActivationKind::ScaledSigmoid, 0.2);
        node.activate(0.0);
        assert!(node.activated_output.abs() < f32::EPSILON);
    }
}
