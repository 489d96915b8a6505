use crate::TreeNode;
use itertools::Itertools;

/// An abstraction for the cost of elementary tree edits.
///
/// Implementations must return finite, non-negative costs;
/// [edit_distance][crate::edit_distance] rejects models that do not.
pub trait CostModel {
    /// The cost of deleting `node`, excluding its children.
    fn delete(&self, node: &TreeNode) -> f64;

    /// The cost of inserting `node`, excluding its children.
    fn insert(&self, node: &TreeNode) -> f64;

    /// The cost of relabeling `a` into `b`.
    fn rename(&self, a: &TreeNode, b: &TreeNode) -> f64;
}

/// Prices a rename by the share of tracked attributes whose values differ.
///
/// Deleting or inserting a node costs one unit; renaming a node with `d` of
/// `k` tracked attributes changed costs `d / 2k` units, so relabeling is
/// always cheaper than deleting the node and reinserting it.
#[derive(Debug, Clone)]
pub struct AttributeCostModel {
    unit: f64,
    tracked: Vec<String>,
}

impl AttributeCostModel {
    /// Tracks the given attributes at a cost of one unit per edit.
    pub fn new<I>(tracked: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        AttributeCostModel {
            unit: 1.0,
            tracked: tracked.into_iter().map_into().collect(),
        }
    }

    /// Scales every cost by `unit`.
    pub fn with_unit(mut self, unit: f64) -> Self {
        self.unit = unit;
        self
    }
}

/// Tracks the `size` and `type` attributes at one unit per edit.
impl Default for AttributeCostModel {
    fn default() -> Self {
        AttributeCostModel::new(["size", "type"])
    }
}

impl CostModel for AttributeCostModel {
    fn delete(&self, _: &TreeNode) -> f64 {
        self.unit
    }

    fn insert(&self, _: &TreeNode) -> f64 {
        self.unit
    }

    fn rename(&self, a: &TreeNode, b: &TreeNode) -> f64 {
        if self.tracked.is_empty() {
            return 0.0;
        }

        let differing = self
            .tracked
            .iter()
            .filter(|&name| a.attributes().get(name) != b.attributes().get(name))
            .count();

        self.unit * differing as f64 / (2 * self.tracked.len()) as f64
    }
}

/// The classic unit-cost metric.
///
/// Every deletion and insertion costs one; a rename costs one unless the two
/// payloads are identical.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnitCostModel;

impl CostModel for UnitCostModel {
    fn delete(&self, _: &TreeNode) -> f64 {
        1.0
    }

    fn insert(&self, _: &TreeNode) -> f64 {
        1.0
    }

    fn rename(&self, a: &TreeNode, b: &TreeNode) -> f64 {
        if a.attributes() == b.attributes() {
            0.0
        } else {
            1.0
        }
    }
}
