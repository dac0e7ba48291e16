use crate::{Innovation, NodeId};

use serde::{Deserialize, Serialize};

/// The kind of structural mutation an innovation record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InnovationKind {
    /// A connection was split by inserting a hidden node.
    NodeSplit,
    /// A new connection was created between two existing nodes.
    NewConnection,
}

/// A single entry in the innovation ledger.
///
/// `node_id` is `Some` exactly for [`NodeSplit`] records, and
/// names the hidden node every re-occurrence of the same split
/// must reuse.
///
/// [`NodeSplit`]: InnovationKind::NodeSplit
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InnovationRecord {
    pub kind: InnovationKind,
    pub origin: NodeId,
    pub target: NodeId,
    pub innovation: Innovation,
    pub node_id: Option<NodeId>,
}

/// A `History` keeps track of structural mutations across a whole
/// run, so that identical mutations are assigned the same innovation
/// numbers (and, for node splits, the same hidden-node id) no
/// matter which genome or generation they occur in.
///
/// The ledger is append-only; records are never removed or reused.
/// It is an explicit value passed into every genome-mutating call,
/// never a hidden global, so independent runs can coexist in one
/// process.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct History {
    records: Vec<InnovationRecord>,
    next_innovation: Innovation,
    next_node_id: NodeId,
}

impl History {
    /// Creates an empty history.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::History;
    ///
    /// let history = History::new();
    ///
    /// assert_eq!(history.max_innovation(), None);
    /// ```
    pub fn new() -> History {
        History::default()
    }

    /// Looks up the record matching `(kind, origin, target)`,
    /// allocating a fresh one (with the next innovation number
    /// and, for node splits, the next node id) if this exact
    /// mutation has not been seen before.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::{History, InnovationKind};
    ///
    /// let mut history = History::new();
    ///
    /// let first = history.get_or_create(InnovationKind::NewConnection, 0, 2);
    /// let again = history.get_or_create(InnovationKind::NewConnection, 0, 2);
    ///
    /// assert_eq!(first, again);
    /// ```
    pub fn get_or_create(
        &mut self,
        kind: InnovationKind,
        origin: NodeId,
        target: NodeId,
    ) -> InnovationRecord {
        if let Some(record) = self
            .records
            .iter()
            .find(|r| r.kind == kind && r.origin == origin && r.target == target)
        {
            return *record;
        }

        let record = InnovationRecord {
            kind,
            origin,
            target,
            innovation: self.next_innovation,
            node_id: match kind {
                InnovationKind::NodeSplit => {
                    let id = self.next_node_id;
                    self.next_node_id += 1;
                    Some(id)
                }
                InnovationKind::NewConnection => None,
            },
        };
        self.next_innovation += 1;
        self.records.push(record);
        record
    }

    /// Raises the node-id counter to at least `high_water`.
    ///
    /// Called by genome construction so hidden nodes created by
    /// later splits never collide with input/bias/output node ids.
    pub fn reserve_node_ids(&mut self, high_water: NodeId) {
        self.next_node_id = self.next_node_id.max(high_water);
    }

    /// Returns the next node id the history would assign.
    pub fn next_node_id(&self) -> NodeId {
        self.next_node_id
    }

    /// Returns the highest innovation number assigned so far,
    /// or `None` if the ledger is empty.
    pub fn max_innovation(&self) -> Option<Innovation> {
        self.next_innovation.checked_sub(1)
    }

    /// Returns an iterator over the complete ledger, in
    /// assignment order.
    pub fn records(&self) -> impl Iterator<Item = &InnovationRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_is_idempotent() {
        let mut history = History::new();

        let first = history.get_or_create(InnovationKind::NewConnection, 3, 9);
        let again = history.get_or_create(InnovationKind::NewConnection, 3, 9);

        assert_eq!(first, again);
        assert_eq!(history.records().count(), 1);
    }

    #[test]
    fn distinct_kinds_get_distinct_records() {
        let mut history = History::new();

        let connection = history.get_or_create(InnovationKind::NewConnection, 3, 9);
        let split = history.get_or_create(InnovationKind::NodeSplit, 3, 9);

        assert_ne!(connection.innovation, split.innovation);
        assert_eq!(connection.node_id, None);
        assert!(split.node_id.is_some());
    }

    #[test]
    fn node_splits_allocate_node_ids_monotonically() {
        let mut history = History::new();
        history.reserve_node_ids(4);

        let first = history.get_or_create(InnovationKind::NodeSplit, 0, 1);
        let second = history.get_or_create(InnovationKind::NodeSplit, 1, 2);

        assert_eq!(first.node_id, Some(4));
        assert_eq!(second.node_id, Some(5));
    }

    #[test]
    fn reserve_node_ids_never_lowers_the_counter() {
        let mut history = History::new();
        history.reserve_node_ids(10);
        history.reserve_node_ids(3);

        assert_eq!(history.next_node_id(), 10);
    }

    #[test]
    fn identical_splits_resolve_to_the_same_node() {
        let mut history = History::new();
        history.reserve_node_ids(3);

        let first = history.get_or_create(InnovationKind::NodeSplit, 1, 2);
        // Later generation, different genome, same split.
        history.get_or_create(InnovationKind::NewConnection, 0, 2);
        let again = history.get_or_create(InnovationKind::NodeSplit, 1, 2);

        assert_eq!(first.node_id, again.node_id);
        assert_eq!(first.innovation, again.innovation);
    }
}
