use std::fmt;

use crate::domain::arena::Tree;
use crate::domain::node::{Links, Named, NodeId, TreeNode};

/// Read-only view of one node, able to follow its links.
pub struct NodeRef<'a, T> {
    tree: &'a Tree<T>,
    id: NodeId,
    node: &'a TreeNode<T>,
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, id: NodeId, node: &'a TreeNode<T>) -> Self {
        Self { tree, id, node }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn data(&self) -> &'a T {
        &self.node.data
    }

    pub fn links(&self) -> Links {
        self.node.links
    }

    pub fn root(&self) -> NodeRef<'a, T> {
        self.follow(Some(self.node.links.root)).unwrap_or(*self)
    }

    pub fn parent(&self) -> Option<NodeRef<'a, T>> {
        self.follow(self.node.links.parent)
    }

    pub fn first_child(&self) -> Option<NodeRef<'a, T>> {
        self.follow(self.node.links.first_child)
    }

    pub fn last_child(&self) -> Option<NodeRef<'a, T>> {
        self.follow(self.node.links.last_child)
    }

    pub fn next_sibling(&self) -> Option<NodeRef<'a, T>> {
        self.follow(self.node.links.next_sibling)
    }

    pub fn previous_sibling(&self) -> Option<NodeRef<'a, T>> {
        self.follow(self.node.links.previous_sibling)
    }

    pub fn has_children(&self) -> bool {
        self.node.has_children()
    }

    pub fn has_parent(&self) -> bool {
        self.node.has_parent()
    }

    pub fn has_siblings(&self) -> bool {
        self.node.has_siblings()
    }

    pub fn is_root(&self) -> bool {
        !self.has_parent()
    }

    /// Direct children, first to last.
    pub fn children(&self) -> Children<'a, T> {
        Children {
            next: self.first_child(),
        }
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self) -> Ancestors<'a, T> {
        Ancestors {
            next: self.parent(),
        }
    }

    /// Number of edges between this node and its root.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    fn follow(&self, id: Option<NodeId>) -> Option<NodeRef<'a, T>> {
        id.and_then(|id| self.tree.get(id))
    }
}

impl<'a, T: Named> NodeRef<'a, T> {
    pub fn name(&self) -> &'a str {
        self.node.data.name()
    }
}

impl<T> PartialEq for NodeRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<T> Eq for NodeRef<'_, T> {}

impl<T> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("links", &self.node.links)
            .finish()
    }
}

impl<T: Named> fmt::Display for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Children<'a, T> {
    next: Option<NodeRef<'a, T>>,
}

impl<'a, T> Iterator for Children<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.next_sibling();
        Some(current)
    }
}

pub struct Ancestors<'a, T> {
    next: Option<NodeRef<'a, T>>,
}

impl<'a, T> Iterator for Ancestors<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}
