use crate::{edit_distance, ComputeError, CostModel, Tree};

/// How a raw edit distance is scaled by the sizes of the trees compared.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Normalization {
    /// The raw distance, unscaled.
    #[default]
    None,
    /// Divides by the total number of nodes across both trees.
    SumOfSizes,
    /// Divides by the node count of the larger tree.
    MaxSize,
}

impl Normalization {
    /// Scales `distance` for a pair of trees of `a` and `b` nodes.
    ///
    /// Two empty trees are zero apart, so a zero denominator yields zero.
    pub fn apply(self, distance: f64, a: usize, b: usize) -> f64 {
        let denominator = match self {
            Normalization::None => return distance,
            Normalization::SumOfSizes => a + b,
            Normalization::MaxSize => a.max(b),
        };

        if denominator == 0 {
            0.0
        } else {
            distance / denominator as f64
        }
    }
}

/// Computes the [edit_distance] between two [Tree]s and scales it by
/// `normalization`.
pub fn normalized_distance<C: CostModel>(
    a: &Tree,
    b: &Tree,
    model: &C,
    normalization: Normalization,
) -> Result<f64, ComputeError> {
    let distance = edit_distance(a, b, model)?;
    Ok(normalization.apply(distance, a.len(), b.len()))
}
