use derive_more::From;
use indexmap::IndexMap;
use std::mem;

/// A single attribute value.
///
/// The attribute schema is open; values are restricted to JSON scalars.
/// Numbers are held as `f64`, so the integer `100` and the float `100.0`
/// compare equal.
#[derive(Debug, Clone, PartialEq, From)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_owned())
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n as f64)
    }
}

impl From<u64> for Scalar {
    fn from(n: u64) -> Self {
        Scalar::Number(n as f64)
    }
}

/// A node's payload: an insertion-ordered mapping from attribute name to value.
pub type Attributes = IndexMap<String, Scalar>;

/// One node of a rooted ordered labeled tree.
///
/// A [TreeNode] owns its payload and an ordered sequence of children; sibling
/// order is semantically significant and preserved by every alignment. The
/// `children` attribute name is reserved by the wire format and should not be
/// used as a payload key.
#[derive(Debug)]
pub struct TreeNode {
    attributes: Attributes,
    children: Vec<TreeNode>,
}

impl TreeNode {
    /// Creates a leaf node.
    pub fn new(attributes: Attributes) -> Self {
        Self::with_children(attributes, Vec::new())
    }

    /// Creates a node with the given children, in order.
    pub fn with_children(attributes: Attributes, children: Vec<TreeNode>) -> Self {
        TreeNode {
            attributes,
            children,
        }
    }

    /// Returns this node's payload.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns this node's immediate children, in order.
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Returns the number of nodes in the subtree rooted here, including itself.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(&node.children);
        }
        count
    }
}

impl Clone for TreeNode {
    fn clone(&self) -> Self {
        // Deep chains must not recurse on clone.
        let mut built: Vec<TreeNode> = Vec::new();
        let mut stack = vec![(self, false)];

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                let children = built.split_off(built.len() - node.children.len());
                built.push(TreeNode::with_children(node.attributes.clone(), children));
            } else {
                stack.push((node, true));

                for child in node.children.iter().rev() {
                    stack.push((child, false));
                }
            }
        }

        debug_assert_eq!(built.len(), 1);
        built.pop().unwrap()
    }
}

impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        // Deep chains must not recurse on comparison.
        let mut stack = vec![(self, other)];

        while let Some((a, b)) = stack.pop() {
            if a.attributes != b.attributes || a.children.len() != b.children.len() {
                return false;
            }

            stack.extend(a.children.iter().zip(&b.children));
        }

        true
    }
}

impl Drop for TreeNode {
    fn drop(&mut self) {
        // Deep chains must not recurse on drop.
        let mut stack = mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// A rooted ordered labeled tree.
///
/// A [Tree] is built once, by the input parser or from a [TreeNode], and is
/// immutable thereafter. The empty tree (zero nodes) is a valid value; it is
/// what `{"length": 0}` parses to.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tree {
    root: Option<TreeNode>,
    len: usize,
}

impl Tree {
    /// Wraps `root` into a tree.
    pub fn new(root: TreeNode) -> Self {
        Tree {
            len: root.size(),
            root: Some(root),
        }
    }

    /// Creates the empty tree.
    pub fn empty() -> Self {
        Tree::default()
    }

    /// Returns the root node, or [None] for the empty tree.
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// Returns the total number of nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether this tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Visits every node in left-to-right post-order (children before parents).
    pub fn postorder(&self) -> PostOrder<'_> {
        PostOrder {
            stack: self.root.iter().map(|root| (root, false)).collect(),
        }
    }
}

impl From<TreeNode> for Tree {
    fn from(root: TreeNode) -> Self {
        Tree::new(root)
    }
}

/// Explicit-stack post-order traversal over a [Tree].
#[derive(Debug)]
pub struct PostOrder<'t> {
    stack: Vec<(&'t TreeNode, bool)>,
}

impl<'t> Iterator for PostOrder<'t> {
    type Item = &'t TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, expanded)) = self.stack.pop() {
            if expanded {
                return Some(node);
            }
            self.stack.push((node, true));
            for child in node.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}


#[cfg(test)]
pub(crate) use tests::{attributes, node, Size};
