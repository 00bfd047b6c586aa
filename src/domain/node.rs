use std::fmt;

use generational_arena::Index;

/// Stable handle to a node stored in a [`Tree`](crate::domain::Tree).
///
/// Handles are generational: once a node is discarded its id never resolves
/// again, even if the arena slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) Index);

impl NodeId {
    pub(crate) fn index(self) -> Index {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}.{}", slot, generation)
    }
}

/// Identifying label of a node payload.
///
/// The tree never invents names; the concrete payload type supplies them.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

impl Named for &str {
    fn name(&self) -> &str {
        self
    }
}

/// Intrusive links of one node.
///
/// All links are non-owning handles into the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Links {
    pub root: NodeId,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub previous_sibling: Option<NodeId>,
}

impl Links {
    /// Links of a standalone node: its own root, nothing else.
    pub(crate) fn standalone(own: NodeId) -> Self {
        Self {
            root: own,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            previous_sibling: None,
        }
    }

    /// No parent, no children, no siblings.
    pub fn is_fresh(&self) -> bool {
        self.parent.is_none()
            && self.first_child.is_none()
            && self.last_child.is_none()
            && self.next_sibling.is_none()
            && self.previous_sibling.is_none()
    }

    /// Clears everything tying this node to a former parent and makes it
    /// the root of its own tree. Child links are kept.
    pub(crate) fn detach(&mut self, own: NodeId) {
        self.root = own;
        self.parent = None;
        self.next_sibling = None;
        self.previous_sibling = None;
    }
}

/// Tree node in the arena: payload plus intrusive links.
#[derive(Debug)]
pub struct TreeNode<T> {
    pub data: T,
    pub(crate) links: Links,
}

impl<T> TreeNode<T> {
    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn has_children(&self) -> bool {
        self.links.first_child.is_some()
    }

    pub fn has_parent(&self) -> bool {
        self.links.parent.is_some()
    }

    pub fn has_siblings(&self) -> bool {
        self.links.next_sibling.is_some() || self.links.previous_sibling.is_some()
    }
}

impl<T: Named> Named for TreeNode<T> {
    fn name(&self) -> &str {
        self.data.name()
    }
}
