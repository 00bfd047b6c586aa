//! Conversions of a subtree into display and serializable forms.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use termtree::Tree as TermTree;
use tracing::instrument;

use crate::domain::arena::Tree;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{Named, NodeId};
use crate::domain::node_ref::NodeRef;

/// Nested, owned snapshot of a subtree by node name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Outline>,
}

impl Outline {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(name: impl Into<String>, children: Vec<Outline>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Inserts this snapshot as a new standalone tree.
    pub fn build_into<T>(&self, tree: &mut Tree<T>) -> TreeResult<NodeId>
    where
        T: Named + From<String>,
    {
        let root = tree.new_node(T::from(self.name.clone()));
        let mut stack = vec![(root, self)];
        while let Some((parent, outline)) = stack.pop() {
            for child in &outline.children {
                let id = tree.new_node(T::from(child.name.clone()));
                tree.add_child(parent, id)?;
                stack.push((id, child));
            }
        }
        Ok(root)
    }

    /// Renders the snapshot as outline text, `indent` spaces per level.
    pub fn to_text(&self, indent: usize) -> String {
        let mut text = String::new();
        let mut stack = vec![(self, 0)];
        while let Some((outline, level)) = stack.pop() {
            text.push_str(&" ".repeat(level * indent));
            text.push_str(&outline.name);
            text.push('\n');
            for child in outline.children.iter().rev() {
                stack.push((child, level + 1));
            }
        }
        text
    }
}

impl Drop for Outline {
    // deep chains would otherwise drop recursively, one frame per level
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut outline) = stack.pop() {
            stack.append(&mut outline.children);
        }
    }
}

impl<T: Named> Tree<T> {
    /// Subtree at `id` as a `termtree` for terminal display.
    #[instrument(level = "debug", skip(self))]
    pub fn to_termtree(&self, id: NodeId) -> TreeResult<TermTree<String>> {
        self.fold_subtree(id, |node, leaves| {
            TermTree::new(node.name().to_string()).with_leaves(leaves)
        })
    }

    /// Subtree at `id` as an owned [`Outline`].
    pub fn to_outline(&self, id: NodeId) -> TreeResult<Outline> {
        self.fold_subtree(id, |node, children| Outline::with_children(node.name(), children))
    }
}

impl<T> Tree<T> {
    /// Builds one value per node, children before their parent, without
    /// recursion. `make` receives the built children in sibling order.
    fn fold_subtree<R, F>(&self, id: NodeId, mut make: F) -> TreeResult<R>
    where
        F: FnMut(NodeRef<'_, T>, Vec<R>) -> R,
    {
        let preorder: Vec<NodeRef<'_, T>> = self.depth_first(id)?.collect();
        let mut pending: HashMap<NodeId, Vec<R>> = HashMap::new();
        let mut folded = None;

        // reverse pre-order visits every child before its parent
        for node in preorder.into_iter().rev() {
            let mut children = pending.remove(&node.id()).unwrap_or_default();
            children.reverse();
            let value = make(node, children);
            match node.parent() {
                Some(parent) if node.id() != id => {
                    pending.entry(parent.id()).or_default().push(value)
                }
                _ => folded = Some(value),
            }
        }

        folded.ok_or_else(|| TreeError::InvariantBreach(format!("fold of {id} produced no value")))
    }
}
