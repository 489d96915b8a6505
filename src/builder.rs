use crate::{Attributes, BuildError, Scalar, Tree, TreeNode};
use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::{Map, Value};
use std::{mem, str::FromStr};

#[derive(Debug)]
struct RawNode {
    attributes: Attributes,
    children: Vec<String>,
}

fn child_id(reference: &Value) -> Option<String> {
    match reference {
        Value::Number(n) if !n.is_f64() => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn scalar(value: &Value) -> Option<Scalar> {
    match value {
        Value::Null => Some(Scalar::Null),
        Value::Bool(b) => Some(Scalar::Bool(*b)),
        Value::Number(n) => n.as_f64().map(Scalar::Number),
        Value::String(s) => Some(Scalar::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn serialize(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
        Scalar::Text(s) => Value::String(s.clone()),
    }
}

fn parse(object: &Map<String, Value>) -> Result<IndexMap<String, RawNode>, BuildError> {
    let mut entries = IndexMap::with_capacity(object.len().saturating_sub(1));

    for (id, entry) in object {
        if id == "length" {
            continue;
        }

        let fields = entry
            .as_object()
            .ok_or_else(|| BuildError::InvalidEntry { id: id.clone() })?;

        let references = fields
            .get("children")
            .and_then(Value::as_array)
            .ok_or_else(|| BuildError::InvalidChildren { id: id.clone() })?;

        let mut children = Vec::with_capacity(references.len());
        for reference in references {
            let child = child_id(reference).ok_or_else(|| BuildError::InvalidReference {
                id: id.clone(),
                reference: reference.to_string(),
            })?;

            children.push(child);
        }

        let mut attributes = Attributes::with_capacity(fields.len().saturating_sub(1));
        for (name, value) in fields {
            if name == "children" {
                continue;
            }

            let value = scalar(value).ok_or_else(|| BuildError::NonScalarAttribute {
                id: id.clone(),
                name: name.clone(),
            })?;

            attributes.insert(name.clone(), value);
        }

        entries.insert(id.clone(), RawNode { attributes, children });
    }

    Ok(entries)
}

fn validate(entries: &IndexMap<String, RawNode>) -> Result<(usize, Vec<Vec<usize>>), BuildError> {
    let mut children = Vec::with_capacity(entries.len());
    let mut referenced = vec![false; entries.len()];

    for (id, node) in entries {
        let mut indices = Vec::with_capacity(node.children.len());

        for child in &node.children {
            let index =
                entries
                    .get_index_of(child)
                    .ok_or_else(|| BuildError::DanglingChild {
                        parent: id.clone(),
                        child: child.clone(),
                    })?;

            referenced[index] = true;
            indices.push(index);
        }

        children.push(indices);
    }

    if let Some(child) = entries.values().flat_map(|n| &n.children).duplicates().next() {
        return Err(BuildError::DuplicateReference {
            child: child.clone(),
        });
    }

    let mut roots = entries.keys().enumerate().filter(|&(i, _)| !referenced[i]);

    let root = match (roots.next(), roots.next()) {
        (Some((root, _)), None) => root,
        (None, _) => return Err(BuildError::MissingRoot),
        (Some((_, first)), Some((_, second))) => {
            return Err(BuildError::AmbiguousRoot {
                first: first.clone(),
                second: second.clone(),
            })
        }
    };

    let mut visited = vec![false; entries.len()];
    let mut stack = vec![root];
    visited[root] = true;

    while let Some(index) = stack.pop() {
        for &child in &children[index] {
            if !visited[child] {
                visited[child] = true;
                stack.push(child);
            }
        }
    }

    if let Some((_, id)) = entries.keys().enumerate().find(|&(i, _)| !visited[i]) {
        return Err(BuildError::Cycle { id: id.clone() });
    }

    Ok((root, children))
}

fn materialize(
    mut entries: IndexMap<String, RawNode>,
    children: Vec<Vec<usize>>,
    root: usize,
) -> Tree {
    let mut schedule = Vec::with_capacity(entries.len());
    let mut stack = vec![(root, false)];

    while let Some((index, expanded)) = stack.pop() {
        if expanded {
            schedule.push(index);
        } else {
            stack.push((index, true));

            for &child in children[index].iter().rev() {
                stack.push((child, false));
            }
        }
    }

    // children complete before their parent
    let mut built: Vec<TreeNode> = Vec::with_capacity(entries.len());

    for index in schedule {
        let attributes = mem::take(&mut entries[index].attributes);
        let nodes = built.split_off(built.len() - children[index].len());
        built.push(TreeNode::with_children(attributes, nodes));
    }

    debug_assert_eq!(built.len(), 1);
    built.pop().map_or_else(Tree::empty, Tree::new)
}

impl FromStr for Tree {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tree::from_json(&serde_json::from_str(s)?)
    }
}

impl Tree {
    /// Parses a [Tree] from its keyed adjacency-list encoding.
    ///
    /// Every key but `"length"` names a node; a node's `"children"` array lists the
    /// keys of its children in order, and its remaining fields become attributes.
    /// The root is the one node no `"children"` array refers to.
    pub fn from_json(value: &Value) -> Result<Self, BuildError> {
        let object = value.as_object().ok_or(BuildError::NotAnObject)?;

        let declared = object
            .get("length")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(BuildError::InvalidLength)?;

        let entries = parse(object)?;

        if entries.len() != declared {
            return Err(BuildError::LengthMismatch {
                declared,
                actual: entries.len(),
            });
        }

        if entries.is_empty() {
            return Ok(Tree::empty());
        }

        let (root, children) = validate(&entries)?;

        Ok(materialize(entries, children, root))
    }

    /// Encodes this [Tree] back into the keyed adjacency-list form.
    ///
    /// Nodes are keyed by their position in post-order, so [Tree::from_json]
    /// rebuilds an identical tree. The `children` field is reserved by the
    /// encoding and always reflects structure.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        let mut completed: Vec<usize> = Vec::new();
        let mut stack: Vec<_> = self.root().map(|root| (root, false)).into_iter().collect();

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                let id = object.len();
                let ids = completed.split_off(completed.len() - node.children().len());

                let mut fields = Map::with_capacity(node.attributes().len() + 1);
                for (name, value) in node.attributes() {
                    fields.insert(name.clone(), serialize(value));
                }

                let references = ids.into_iter().map(Value::from).collect();
                fields.insert("children".to_owned(), references);

                object.insert(id.to_string(), Value::Object(fields));
                completed.push(id);
            } else {
                stack.push((node, true));

                for child in node.children().iter().rev() {
                    stack.push((child, false));
                }
            }
        }

        object.insert("length".to_owned(), Value::from(self.len()));
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use test_strategy::proptest;

    #[test]
    fn parses_the_keyed_adjacency_list() {
        let tree: Tree = r#"{"0":{"children":[1,2],"size":100,"type":"text/html"},"1":{"children":[],"size":75,"type":"image/jpeg"},"2":{"children":[],"size":50,"type":"text/css"},"length":3}"#
            .parse()
            .unwrap();

        assert_eq!(tree.len(), 3);

        let root = tree.root().unwrap();
        assert_eq!(root.attributes()["size"], Scalar::Number(100.0));
        assert_eq!(root.attributes()["type"], Scalar::Text("text/html".into()));
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.children()[0].attributes()["size"], Scalar::Number(75.0));
        assert_eq!(root.children()[1].attributes()["size"], Scalar::Number(50.0));
    }

    #[test]
    fn numeric_and_string_references_are_interchangeable() {
        let numeric: Tree = r#"{"0":{"children":[1]},"1":{"children":[]},"length":2}"#
            .parse()
            .unwrap();

        let quoted: Tree = r#"{"0":{"children":["1"]},"1":{"children":[]},"length":2}"#
            .parse()
            .unwrap();

        assert_eq!(numeric, quoted);
    }

    #[test]
    fn sibling_order_follows_the_children_array() {
        let tree: Tree = r#"{"0":{"children":[2,1]},"1":{"children":[],"size":1},"2":{"children":[],"size":2},"length":3}"#
            .parse()
            .unwrap();

        let root = tree.root().unwrap();
        assert_eq!(root.children()[0].attributes()["size"], Scalar::Number(2.0));
        assert_eq!(root.children()[1].attributes()["size"], Scalar::Number(1.0));
    }

    #[test]
    fn node_ids_can_be_arbitrary_strings() {
        let tree: Tree = r#"{"doc":{"children":["body"]},"body":{"children":[]},"length":2}"#
            .parse()
            .unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root().unwrap().children().len(), 1);
    }

    #[test]
    fn an_empty_document_builds_an_empty_tree() {
        let tree: Tree = r#"{"length":0}"#.parse().unwrap();
        assert!(tree.is_empty());
        assert_eq!(Tree::from_json(&tree.to_json()).unwrap(), tree);
    }

    #[test]
    fn the_top_level_must_be_an_object() {
        assert_matches!("[0]".parse::<Tree>(), Err(BuildError::NotAnObject));
        assert_matches!("\"0\"".parse::<Tree>(), Err(BuildError::NotAnObject));
    }

    #[test]
    fn the_length_field_is_required() {
        assert_matches!("{}".parse::<Tree>(), Err(BuildError::InvalidLength));

        for length in ["-1", "1.5", "\"2\"", "null"] {
            let text = format!(r#"{{"0":{{"children":[]}},"length":{length}}}"#);
            assert_matches!(text.parse::<Tree>(), Err(BuildError::InvalidLength));
        }
    }

    #[test]
    fn the_length_field_must_match_the_node_count() {
        let text = r#"{"0":{"children":[1]},"1":{"children":[]},"length":3}"#;

        assert_matches!(
            text.parse::<Tree>(),
            Err(BuildError::LengthMismatch {
                declared: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn entries_must_be_objects() {
        assert_matches!(
            r#"{"0":5,"length":1}"#.parse::<Tree>(),
            Err(BuildError::InvalidEntry { id }) => assert_eq!(id, "0")
        );
    }

    #[test]
    fn entries_must_declare_their_children() {
        assert_matches!(
            r#"{"0":{"size":1},"length":1}"#.parse::<Tree>(),
            Err(BuildError::InvalidChildren { id }) => assert_eq!(id, "0")
        );

        assert_matches!(
            r#"{"0":{"children":5},"length":1}"#.parse::<Tree>(),
            Err(BuildError::InvalidChildren { id }) => assert_eq!(id, "0")
        );
    }

    #[test]
    fn child_references_must_be_integers_or_strings() {
        assert_matches!(
            r#"{"0":{"children":[1.5]},"length":1}"#.parse::<Tree>(),
            Err(BuildError::InvalidReference { id, reference }) => {
                assert_eq!(id, "0");
                assert_eq!(reference, "1.5");
            }
        );

        assert_matches!(
            r#"{"0":{"children":[true]},"length":1}"#.parse::<Tree>(),
            Err(BuildError::InvalidReference { .. })
        );
    }

    #[test]
    fn attributes_must_be_scalars() {
        assert_matches!(
            r#"{"0":{"children":[],"box":{"w":1}},"length":1}"#.parse::<Tree>(),
            Err(BuildError::NonScalarAttribute { id, name }) => {
                assert_eq!(id, "0");
                assert_eq!(name, "box");
            }
        );
    }

    #[test]
    fn references_to_unknown_nodes_are_rejected() {
        let text = r#"{"0":{"children":[1,3]},"1":{"children":[]},"length":2}"#;

        assert_matches!(
            text.parse::<Tree>(),
            Err(BuildError::DanglingChild { parent, child }) => {
                assert_eq!(parent, "0");
                assert_eq!(child, "3");
            }
        );
    }

    #[test]
    fn nodes_with_two_parents_are_rejected() {
        let shared = r#"{"0":{"children":[1,1]},"1":{"children":[]},"length":2}"#;

        assert_matches!(
            shared.parse::<Tree>(),
            Err(BuildError::DuplicateReference { child }) => assert_eq!(child, "1")
        );

        let cyclic = r#"{"0":{"children":[1]},"1":{"children":[1]},"length":2}"#;

        assert_matches!(
            cyclic.parse::<Tree>(),
            Err(BuildError::DuplicateReference { child }) => assert_eq!(child, "1")
        );
    }

    #[test]
    fn a_document_whose_nodes_are_all_referenced_has_no_root() {
        let text = r#"{"0":{"children":[1]},"1":{"children":[0]},"length":2}"#;
        assert_matches!(text.parse::<Tree>(), Err(BuildError::MissingRoot));
    }

    #[test]
    fn two_unreferenced_nodes_are_an_ambiguous_root() {
        let text = r#"{"0":{"children":[]},"1":{"children":[]},"length":2}"#;

        assert_matches!(
            text.parse::<Tree>(),
            Err(BuildError::AmbiguousRoot { first, second }) => {
                assert_eq!(first, "0");
                assert_eq!(second, "1");
            }
        );
    }

    #[test]
    fn an_unreachable_cycle_is_detected() {
        let text = r#"{"0":{"children":[]},"1":{"children":[2]},"2":{"children":[1]},"length":3}"#;

        assert_matches!(
            text.parse::<Tree>(),
            Err(BuildError::Cycle { id }) => assert_eq!(id, "1")
        );
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert_matches!("{".parse::<Tree>(), Err(BuildError::Json(_)));
    }

    #[test]
    fn deep_chains_build_without_recursion() {
        let n = 100_000;

        let entries = (0..n)
            .map(|i| match i + 1 {
                next if next < n => format!(r#""{i}":{{"children":[{next}]}}"#),
                _ => format!(r#""{i}":{{"children":[]}}"#),
            })
            .join(",");

        let tree: Tree = format!(r#"{{{entries},"length":{n}}}"#).parse().unwrap();
        assert_eq!(tree.len(), n);
    }

    #[proptest]
    fn a_serialized_tree_parses_back_identically(t: Tree) {
        assert_eq!(Tree::from_json(&t.to_json()).unwrap(), t);
    }

    #[proptest]
    fn the_text_form_round_trips(t: Tree) {
        assert_eq!(t.to_json().to_string().parse::<Tree>().unwrap(), t);
    }

    #[proptest]
    fn the_encoding_declares_the_node_count(t: Tree) {
        assert_eq!(t.to_json()["length"], Value::from(t.len()));
    }
}
