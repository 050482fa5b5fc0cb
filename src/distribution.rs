//! Hierarchical allocator for one resource's stock.
//!
//! A [`DistributionTree`] spreads a single resource across a hierarchy of
//! demand nodes. Allocation is greedy by node priority and destructive:
//! [`DistributionTree::distribute`] rewrites node quantities rather than
//! previewing an assignment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Node id used for roots created through [`DistributionTree::create_root`].
pub const ROOT_ID: &str = "root";

/// A demand node holding part of a resource's stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionNode {
    id: String,
    resource: String,
    quantity: u32,
    parent: Option<String>,
    children: Vec<String>,
    priority: u32,
}

impl DistributionNode {
    fn new(id: impl Into<String>, resource: impl Into<String>, quantity: u32, priority: u32) -> Self {
        Self {
            id: id.into(),
            resource: resource.into(),
            quantity,
            parent: None,
            children: Vec::new(),
            priority: priority.max(1),
        }
    }

    /// Unique identifier within the tree.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the resource whose stock this node holds.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Quantity currently held at this node (excluding descendants).
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Parent node id; `None` for the root and for orphans.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Ids of the child nodes, in attachment order.
    #[must_use]
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// Priority weight used by greedy allocation (at least 1).
    #[must_use]
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Allocation of part of a distribution request to one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Node that received the stock.
    pub node: String,
    /// Quantity assigned to it.
    pub assigned: u32,
}

/// A hierarchy allocating one resource's stock across demand nodes.
///
/// Nodes are created once and mutated in place; there is no removal. A node
/// whose parent id is unknown at insertion time stays in the node index but
/// is never linked into the tree — such orphans are invisible to
/// [`DistributionTree::total_quantity`] yet still participate in
/// [`DistributionTree::distribute`], mirroring how the structure has always
/// behaved.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionTree {
    root: Option<String>,

    /// Insertion order; keeps the priority sort in `distribute` stable.
    order: Vec<String>,

    nodes: HashMap<String, DistributionNode>,
}

impl DistributionTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes, orphans included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the tree has no nodes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Establishes the root node with priority 1. A no-op returning `false`
    /// if a root already exists.
    pub fn create_root(&mut self, resource: &str, quantity: u32) -> bool {
        if self.root.is_some() {
            return false;
        }
        self.insert(DistributionNode::new(ROOT_ID, resource, quantity, 1));
        self.root = Some(ROOT_ID.to_string());
        true
    }

    /// Creates a node and attaches it under `parent_id`.
    ///
    /// Returns `false` on a duplicate node id. If no root exists yet the new
    /// node becomes the root regardless of `parent_id`; if `parent_id` is
    /// unknown the node is indexed but left orphaned.
    pub fn add_node(
        &mut self,
        id: &str,
        resource: &str,
        quantity: u32,
        parent_id: &str,
        priority: u32,
    ) -> bool {
        if self.nodes.contains_key(id) {
            return false;
        }

        let mut node = DistributionNode::new(id, resource, quantity, priority);

        if self.root.is_none() {
            self.insert(node);
            self.root = Some(id.to_string());
            return true;
        }

        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.children.push(id.to_string());
            node.parent = Some(parent_id.to_string());
        } else {
            debug!(node = id, parent = parent_id, "unknown parent, node left orphaned");
        }
        self.insert(node);
        true
    }

    fn insert(&mut self, node: DistributionNode) {
        self.order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&DistributionNode> {
        self.nodes.get(id)
    }

    /// The root node, if one exists.
    #[must_use]
    pub fn root(&self) -> Option<&DistributionNode> {
        self.nodes.get(self.root.as_deref()?)
    }

    /// Iterates over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &DistributionNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Total quantity in the subtree rooted at `id`: the node's own quantity
    /// plus the totals of all its descendants.
    #[must_use]
    pub fn subtree_total(&self, id: &str) -> u32 {
        let Some(node) = self.nodes.get(id) else {
            return 0;
        };
        node.quantity
            + node
                .children
                .iter()
                .map(|child| self.subtree_total(child))
                .sum::<u32>()
    }

    /// Total quantity reachable from the root. Orphaned nodes do not count.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.root
            .as_deref()
            .map_or(0, |root| self.subtree_total(root))
    }

    /// Whether the tree holds at least `requested` units.
    #[must_use]
    pub fn has_sufficient(&self, requested: u32) -> bool {
        self.total_quantity() >= requested
    }

    /// Greedily assigns `requested` units across the nodes, highest priority
    /// first, rewriting each visited node's quantity to its assigned share.
    ///
    /// Returns the assignments in allocation order, or an empty list when
    /// the tree does not hold enough stock. The sum of assignments always
    /// equals `requested` on success.
    pub fn distribute(&mut self, requested: u32) -> Vec<Allocation> {
        if !self.has_sufficient(requested) {
            debug!(
                requested,
                total = self.total_quantity(),
                "insufficient stock for distribution"
            );
            return Vec::new();
        }

        let mut ids = self.order.clone();
        ids.sort_by_key(|id| std::cmp::Reverse(self.nodes[id].priority));

        let mut allocations = Vec::new();
        let mut remaining = requested;

        for id in ids {
            if remaining == 0 {
                break;
            }
            let node = self
                .nodes
                .get_mut(&id)
                .expect("ordered ids always resolve");
            let assigned = node.quantity.min(remaining);
            if assigned > 0 {
                node.quantity = assigned;
                remaining -= assigned;
                allocations.push(Allocation { node: id, assigned });
            }
        }

        allocations
    }

    /// All nodes with no children, orphans included.
    #[must_use]
    pub fn leaves(&self) -> Vec<&DistributionNode> {
        self.nodes().filter(|node| node.is_leaf()).collect()
    }

    /// Ratio of the flat sum of node quantities to the root-reachable total;
    /// zero for an empty tree or a zero total.
    #[must_use]
    pub fn efficiency(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        let total = self.total_quantity();
        if total == 0 {
            return 0.0;
        }
        let assigned: u32 = self.nodes().map(DistributionNode::quantity).sum();
        f64::from(assigned) / f64::from(total)
    }

    /// Replaces every node's quantity with an equal split of the total
    /// (integer division), irrespective of priority.
    pub fn rebalance(&mut self) {
        if self.root.is_none() {
            return;
        }
        #[allow(clippy::cast_possible_truncation)]
        let share = self.total_quantity() / self.order.len() as u32;
        for node in self.nodes.values_mut() {
            node.quantity = share;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DistributionTree, ROOT_ID};

    /// Root with 100 units at priority 1 and two children: 40 units at
    /// priority 2 and 80 units at priority 3.
    fn tree() -> DistributionTree {
        let mut tree = DistributionTree::new();
        assert!(tree.create_root("water", 100));
        assert!(tree.add_node("shelter-a", "water", 40, ROOT_ID, 2));
        assert!(tree.add_node("shelter-b", "water", 80, ROOT_ID, 3));
        tree
    }

    #[test]
    fn totals_recurse_through_the_hierarchy() {
        let tree = tree();
        assert_eq!(tree.total_quantity(), 220);
        assert_eq!(tree.subtree_total("shelter-a"), 40);
        assert!(tree.has_sufficient(220));
        assert!(!tree.has_sufficient(221));
    }

    #[test]
    fn distribute_follows_priority_and_sums_to_request() {
        let mut tree = tree();
        let allocations = tree.distribute(150);

        let order: Vec<(&str, u32)> = allocations
            .iter()
            .map(|a| (a.node.as_str(), a.assigned))
            .collect();
        assert_eq!(
            order,
            vec![("shelter-b", 80), ("shelter-a", 40), (ROOT_ID, 30)]
        );
        assert_eq!(allocations.iter().map(|a| a.assigned).sum::<u32>(), 150);

        // Destructive: visited node quantities now hold the assignment.
        assert_eq!(tree.node(ROOT_ID).unwrap().quantity(), 30);
    }

    #[test]
    fn distribute_refuses_when_insufficient() {
        let mut tree = tree();
        assert!(tree.distribute(500).is_empty());
        // Nothing was mutated.
        assert_eq!(tree.total_quantity(), 220);
    }

    #[test]
    fn second_root_is_rejected() {
        let mut tree = tree();
        assert!(!tree.create_root("water", 999));
        assert_eq!(tree.root().unwrap().quantity(), 100);
    }

    #[test]
    fn first_node_becomes_root_even_with_a_parent_hint() {
        let mut tree = DistributionTree::new();
        assert!(tree.add_node("n1", "water", 10, "nonexistent", 1));
        assert_eq!(tree.root().unwrap().id(), "n1");
    }

    #[test]
    fn unknown_parent_leaves_an_orphan() {
        let mut tree = tree();
        assert!(tree.add_node("stray", "water", 25, "nowhere", 9));

        // Indexed but unreachable from the root.
        assert!(tree.node("stray").is_some());
        assert_eq!(tree.total_quantity(), 220);

        // Orphans still compete in distribution, at their priority.
        let allocations = tree.distribute(100);
        assert_eq!(allocations[0].node, "stray");
        assert_eq!(allocations[0].assigned, 25);
    }

    #[test]
    fn duplicate_node_ids_are_rejected() {
        let mut tree = tree();
        assert!(!tree.add_node("shelter-a", "water", 1, ROOT_ID, 1));
        assert_eq!(tree.node("shelter-a").unwrap().quantity(), 40);
    }

    #[test]
    fn leaves_and_efficiency() {
        let tree = tree();
        let mut leaves: Vec<&str> = tree.leaves().iter().map(|n| n.id()).collect();
        leaves.sort_unstable();
        assert_eq!(leaves, vec!["shelter-a", "shelter-b"]);
        assert!((tree.efficiency() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rebalance_splits_evenly() {
        let mut tree = tree();
        tree.rebalance();
        // 220 / 3 = 73, integer division.
        for node in tree.nodes() {
            assert_eq!(node.quantity(), 73);
        }
    }

    #[test]
    fn empty_tree_is_inert() {
        let mut tree = DistributionTree::new();
        assert_eq!(tree.total_quantity(), 0);
        assert!(tree.distribute(0).is_empty());
        assert!((tree.efficiency() - 0.0).abs() < f64::EPSILON);
        tree.rebalance(); // no-op, must not panic
    }
}
