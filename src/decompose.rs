use crate::{Tree, TreeNode};

/// The direction in which sibling lists are read during decomposition.
///
/// Reading every sibling list right to left mirrors the tree; mirroring both
/// trees preserves every valid mapping between them, so either orientation
/// yields the same distance and the engine is free to pick the cheaper one.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum Orientation {
    LeftToRight,
    RightToLeft,
}

/// A tree flattened to post-order under some [Orientation].
///
/// `lld[i]` is the post-order index of the leftmost leaf descendant of node
/// `i`, so the subtree rooted at `i` occupies exactly the block `lld[i]..=i`.
/// The keyroots are the highest node per distinct leftmost leaf, in ascending
/// order; the root is always among them.
#[derive(Debug)]
pub(crate) struct Decomposed<'t> {
    pub(crate) nodes: Vec<&'t TreeNode>,
    pub(crate) lld: Vec<usize>,
    pub(crate) keyroots: Vec<usize>,
}

impl<'t> Decomposed<'t> {
    pub(crate) fn new(tree: &'t Tree, orientation: Orientation) -> Self {
        let mut nodes = Vec::with_capacity(tree.len());
        let mut lld = Vec::with_capacity(tree.len());
        let mut pending: Vec<usize> = Vec::new();

        let mut stack: Vec<_> = tree.root().map(|root| (root, false)).into_iter().collect();

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                let index = nodes.len();
                let children = pending.split_off(pending.len() - node.children().len());
                let leftmost = children.first().copied().unwrap_or(index);

                nodes.push(node);
                lld.push(leftmost);
                pending.push(leftmost);
            } else {
                stack.push((node, true));

                match orientation {
                    Orientation::LeftToRight => {
                        for child in node.children().iter().rev() {
                            stack.push((child, false));
                        }
                    }

                    Orientation::RightToLeft => {
                        for child in node.children() {
                            stack.push((child, false));
                        }
                    }
                }
            }
        }

        let mut keyroots = Vec::new();
        let mut seen = vec![false; nodes.len()];

        for index in (0..nodes.len()).rev() {
            if !seen[lld[index]] {
                seen[lld[index]] = true;
                keyroots.push(index);
            }
        }

        keyroots.reverse();

        Decomposed {
            nodes,
            lld,
            keyroots,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The sum of keyroot window widths; the product of two trees' work
    /// counts the forest distance cells their comparison fills.
    pub(crate) fn work(&self) -> u64 {
        self.keyroots
            .iter()
            .map(|&k| (k - self.lld[k] + 1) as u64)
            .sum()
    }
}
