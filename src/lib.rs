//! # Overview
//!
//! This crate measures how far apart two rooted, ordered, labeled trees are:
//! the lowest total cost of the node deletions, insertions, and renames that
//! turn one tree into the other, computed by the keyroot decomposition of the
//! classic Zhang-Shasha dynamic program. Trees describe hierarchical resources
//! such as DOM-like documents; each node carries scalar attributes, and whole
//! documents are parsed from a keyed adjacency-list JSON encoding.
//!
//! The price of each edit comes from a pluggable [CostModel]; the default
//! [AttributeCostModel] charges one unit per inserted or deleted node and a
//! quarter of a unit per tracked attribute a rename changes. The raw distance
//! can be scaled by tree size through [Normalization].
//!
//! # Example
//!
//! ```rust
//! use treedist::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let before: Tree = r#"{
//!     "0": { "children": [1], "size": 100, "type": "text/html" },
//!     "1": { "children": [], "size": 75, "type": "image/jpeg" },
//!     "length": 2
//! }"#.parse()?;
//!
//! let after: Tree = r#"{
//!     "0": { "children": [1], "size": 90, "type": "text/html" },
//!     "1": { "children": [], "size": 75, "type": "image/jpeg" },
//!     "length": 2
//! }"#.parse()?;
//!
//! let model = AttributeCostModel::default();
//!
//! assert_eq!(edit_distance(&before, &after, &model)?, 0.25);
//!
//! let scaled = normalized_distance(&before, &after, &model, Normalization::MaxSize)?;
//! assert_eq!(scaled, 0.125);
//! # Ok(())
//! # }
//! ```

mod builder;
mod cost;
mod distance;
mod error;
mod normalize;
mod tree;

pub use cost::*;
pub use distance::*;
pub use error::*;
pub use normalize::*;
pub use tree::*;

mod decompose;

pub(crate) use decompose::*;
