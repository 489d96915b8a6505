use thiserror::Error;

/// The reasons a keyed tree representation can fail to build into a [Tree][crate::Tree].
///
/// Every variant names the offending node so malformed inputs can be diagnosed
/// without re-parsing. Builder errors are final: no partial tree is produced.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// The input is not syntactically valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level value is not an object.
    #[error("expected a keyed object at the top level")]
    NotAnObject,

    /// A node entry is not an object.
    #[error("node {id}: entry is not an object")]
    InvalidEntry { id: String },

    /// A node entry is missing its `children` array.
    #[error("node {id}: \"children\" is missing or not an array")]
    InvalidChildren { id: String },

    /// A `children` element is neither an integer nor a string.
    #[error("node {id}: child reference {reference} is not a node id")]
    InvalidReference { id: String, reference: String },

    /// An attribute value is an array or object rather than a scalar.
    #[error("node {id}: attribute \"{name}\" is not a scalar")]
    NonScalarAttribute { id: String, name: String },

    /// A `children` array references an id with no entry of its own.
    #[error("node {parent} references unknown child {child}")]
    DanglingChild { parent: String, child: String },

    /// An id appears in more than one `children` array, or twice in one.
    #[error("node {child} is referenced by more than one parent")]
    DuplicateReference { child: String },

    /// Some nodes are unreachable from the root, which implies a cycle.
    #[error("cycle detected through node {id}")]
    Cycle { id: String },

    /// Every node is referenced as a child, so no root exists.
    #[error("no root: every node is referenced as a child")]
    MissingRoot,

    /// More than one node is never referenced as a child.
    #[error("ambiguous root: {first} and {second} are both unreferenced")]
    AmbiguousRoot { first: String, second: String },

    /// The declared `length` does not match the number of node entries.
    #[error("declared length {declared} does not match {actual} node entries")]
    LengthMismatch { declared: usize, actual: usize },

    /// The `length` entry is missing or not a non-negative integer.
    #[error("\"length\" is missing or not a non-negative integer")]
    InvalidLength,
}

/// The reasons a distance computation can abort.
///
/// Neither variant is reachable with a valid [Tree][crate::Tree] and a
/// [CostModel][crate::CostModel] that honors its contract; both signal a
/// defect rather than a recoverable condition.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ComputeError {
    /// The cost model returned a negative or non-finite cost.
    #[error("cost model returned an invalid {operation} cost ({cost})")]
    InvalidCost { operation: &'static str, cost: f64 },

    /// An internal invariant of the dynamic program was violated.
    #[error("internal invariant violated: {0}")]
    Invariant(&'static str),
}
