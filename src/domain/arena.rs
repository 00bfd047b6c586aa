use std::collections::{HashMap, VecDeque};

use generational_arena::Arena;
use tracing::{debug, instrument};

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::iter::{BreadthFirst, DepthFirst, Order, OrderedCursor};
use crate::domain::node::{Links, Named, NodeId, TreeNode};
use crate::domain::node_ref::NodeRef;
use crate::domain::visit::{self, NodeVisitor, VisitResult};

/// Arena owning every node of one or more 1-to-N trees.
///
/// Parent, child and sibling links are generational indices into the arena,
/// so no node owns another. A node stays allocated until it is discarded or
/// the arena is dropped. Every standalone node is the root of its own tree,
/// which makes a single arena a forest.
#[derive(Debug)]
pub struct Tree<T> {
    arena: Arena<TreeNode<T>>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
        }
    }

    /// Number of live nodes across all trees in the arena.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.index())
    }

    /// Inserts a standalone node: no parent, no children, its own root.
    #[instrument(level = "trace", skip(self, data))]
    pub fn new_node(&mut self, data: T) -> NodeId {
        // root is self-referential, so the index must exist before the links
        let idx = self.arena.insert_with(|idx| TreeNode {
            data,
            links: Links::standalone(NodeId(idx)),
        });
        NodeId(idx)
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, T>> {
        self.arena
            .get(id.index())
            .map(|node| NodeRef::new(self, id, node))
    }

    pub fn node(&self, id: NodeId) -> TreeResult<NodeRef<'_, T>> {
        self.get(id).ok_or(TreeError::NodeNotFound(id))
    }

    pub fn data(&self, id: NodeId) -> TreeResult<&T> {
        self.entry(id).map(|node| &node.data)
    }

    pub fn data_mut(&mut self, id: NodeId) -> TreeResult<&mut T> {
        self.arena
            .get_mut(id.index())
            .map(|node| &mut node.data)
            .ok_or(TreeError::NodeNotFound(id))
    }

    pub fn links(&self, id: NodeId) -> TreeResult<Links> {
        self.entry(id).map(|node| node.links)
    }

    /// Ids of all standalone roots, in arena slot order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.arena
            .iter()
            .filter(|(_, node)| node.links.parent.is_none())
            .map(|(idx, _)| NodeId(idx))
    }

    pub fn breadth_first(&self, start: NodeId) -> TreeResult<BreadthFirst<'_, T>> {
        self.entry(start)?;
        Ok(BreadthFirst::new(self, start))
    }

    pub fn depth_first(&self, start: NodeId) -> TreeResult<DepthFirst<'_, T>> {
        self.entry(start)?;
        Ok(DepthFirst::new(self, start))
    }

    pub fn cursor(&self, start: NodeId, order: Order) -> TreeResult<OrderedCursor<'_, T>> {
        Ok(match order {
            Order::BreadthFirst => OrderedCursor::BreadthFirst(self.breadth_first(start)?),
            Order::DepthFirst => OrderedCursor::DepthFirst(self.depth_first(start)?),
        })
    }

    /// Visits the subtree at `start` until `visit` returns false.
    pub fn traverse<F>(&self, start: NodeId, order: Order, visit: F) -> TreeResult<VisitResult>
    where
        F: FnMut(NodeRef<'_, T>) -> bool,
    {
        let mut cursor = self.cursor(start, order)?;
        visit::traverse(&mut cursor, visit)
    }

    /// Visits the subtree at `start` until the visitor reports `Done`.
    pub fn accept<V>(&self, start: NodeId, order: Order, visitor: &mut V) -> TreeResult<VisitResult>
    where
        V: NodeVisitor<T> + ?Sized,
    {
        let mut cursor = self.cursor(start, order)?;
        visit::traverse_visitor(&mut cursor, visitor)
    }

    /// Verifies the link invariants of the whole tree containing `id`.
    ///
    /// Checks self-rooted tops, inherited roots, paired first/last child
    /// links and mirrored, acyclic sibling chains.
    #[instrument(level = "debug", skip(self))]
    pub fn check_invariants(&self, id: NodeId) -> TreeResult<()> {
        let limit = self.len();
        let mut top = id;
        let mut steps = 0;
        while let Some(parent) = self.linked(top)?.parent {
            top = parent;
            steps += 1;
            if steps > limit {
                return Err(breach(format!("parent chain of {id} does not terminate")));
            }
        }

        let mut queue = VecDeque::from([top]);
        let mut seen = 0;
        while let Some(current) = queue.pop_front() {
            seen += 1;
            if seen > limit {
                return Err(breach(format!("tree rooted at {top} contains a cycle")));
            }
            let links = self.linked(current)?;
            let expected_root = match links.parent {
                None => current,
                Some(parent) => self.linked(parent)?.root,
            };
            if links.root != expected_root || links.root != top {
                return Err(breach(format!(
                    "node {current} has root {} instead of {top}",
                    links.root
                )));
            }

            match (links.first_child, links.last_child) {
                (None, None) => {}
                (Some(first), Some(last)) => {
                    let mut previous = None;
                    let mut child = Some(first);
                    let mut count = 0;
                    while let Some(c) = child {
                        let child_links = self.linked(c)?;
                        if child_links.parent != Some(current) {
                            return Err(breach(format!(
                                "child {c} does not point back to {current}"
                            )));
                        }
                        if child_links.previous_sibling != previous {
                            return Err(breach(format!(
                                "sibling links around {c} are not mirrored"
                            )));
                        }
                        count += 1;
                        if count > limit {
                            return Err(breach(format!(
                                "sibling chain of {current} contains a cycle"
                            )));
                        }
                        queue.push_back(c);
                        previous = Some(c);
                        child = child_links.next_sibling;
                    }
                    if previous != Some(last) {
                        return Err(breach(format!(
                            "sibling chain of {current} does not end at its last child"
                        )));
                    }
                }
                _ => {
                    return Err(breach(format!("node {current} has only one of first/last child")));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn entry(&self, id: NodeId) -> TreeResult<&TreeNode<T>> {
        self.arena.get(id.index()).ok_or(TreeError::NodeNotFound(id))
    }

    /// Links of a node reached through another node's link.
    fn linked(&self, id: NodeId) -> TreeResult<Links> {
        self.arena
            .get(id.index())
            .map(|node| node.links)
            .ok_or_else(|| breach(format!("dangling link to {id}")))
    }

    fn linked_mut(&mut self, id: NodeId) -> TreeResult<&mut Links> {
        self.arena
            .get_mut(id.index())
            .map(|node| &mut node.links)
            .ok_or_else(|| breach(format!("dangling link to {id}")))
    }

    /// Pre-order ids of the subtree at `id`, `id` first.
    fn subtree_ids(&self, id: NodeId) -> Vec<NodeId> {
        DepthFirst::new(self, id).map(|node| node.id()).collect()
    }

    fn reroot_subtree(&mut self, id: NodeId) -> TreeResult<()> {
        for descendant in self.subtree_ids(id).into_iter().skip(1) {
            self.linked_mut(descendant)?.root = id;
        }
        Ok(())
    }
}

impl<T: Named> Tree<T> {
    /// Creates a node and attaches `child` as its only child.
    pub fn new_node_with_child(&mut self, data: T, child: NodeId) -> TreeResult<NodeId> {
        self.new_node_with_children(data, [child])
    }

    /// Creates a node and attaches `children` in sequence order.
    ///
    /// Every child is validated before the node is created, so a failure
    /// leaves the arena untouched.
    #[instrument(level = "trace", skip(self, data, children))]
    pub fn new_node_with_children<I>(&mut self, data: T, children: I) -> TreeResult<NodeId>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let children: Vec<NodeId> = children.into_iter().collect();
        for (i, &child) in children.iter().enumerate() {
            self.validate_can_be_added(child)?;
            if children[..i].contains(&child) {
                return Err(TreeError::AlreadyAttached {
                    name: self.name_of(child),
                });
            }
        }
        let parent = self.new_node(data);
        self.add_child_range(parent, children)?;
        Ok(parent)
    }

    /// Appends a fresh node as the last child of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        let parent_links = self.links(parent)?;
        self.validate_can_be_added(child)?;
        if parent == child {
            return Err(TreeError::SelfAttach {
                name: self.name_of(child),
            });
        }

        let previous_last = match (parent_links.first_child, parent_links.last_child) {
            (None, None) => None,
            (Some(_), Some(last)) => Some(last),
            _ => {
                return Err(breach(format!("node {parent} has children but no last child")))
            }
        };

        match previous_last {
            Some(previous_last) => {
                self.linked_mut(previous_last)?.next_sibling = Some(child);
                self.linked_mut(parent)?.last_child = Some(child);
            }
            None => {
                let links = self.linked_mut(parent)?;
                links.first_child = Some(child);
                links.last_child = Some(child);
            }
        }

        let links = self.linked_mut(child)?;
        links.root = parent_links.root;
        links.parent = Some(parent);
        links.next_sibling = None;
        links.previous_sibling = previous_last;

        debug!(%parent, %child, "child added");
        Ok(())
    }

    /// Appends each child in sequence order; stops at the first failure,
    /// leaving earlier children attached.
    pub fn add_child_range<I>(&mut self, parent: NodeId, children: I) -> TreeResult<()>
    where
        I: IntoIterator<Item = NodeId>,
    {
        for child in children {
            self.add_child(parent, child)?;
        }
        Ok(())
    }

    /// Detaches `child` from `parent`.
    ///
    /// The child becomes the root of its own tree and keeps its subtree.
    /// Fails with [`TreeError::NotAChild`] if `child` does not belong to
    /// `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        let child_links = self.validate_can_be_removed(parent, child)?;
        let parent_links = self.links(parent)?;

        if let Some(next) = child_links.next_sibling {
            self.linked_mut(next)?.previous_sibling = child_links.previous_sibling;
        }
        if let Some(previous) = child_links.previous_sibling {
            self.linked_mut(previous)?.next_sibling = child_links.next_sibling;
        }

        let links = self.linked_mut(parent)?;
        if parent_links.first_child == Some(child) {
            links.first_child = child_links.next_sibling;
        }
        if parent_links.last_child == Some(child) {
            links.last_child = child_links.previous_sibling;
        }

        self.linked_mut(child)?.detach(child);
        self.reroot_subtree(child)?;

        debug!(%parent, %child, "child removed");
        Ok(())
    }

    /// Removes each child in sequence order; stops at the first failure.
    pub fn remove_child_range<I>(&mut self, parent: NodeId, children: I) -> TreeResult<()>
    where
        I: IntoIterator<Item = NodeId>,
    {
        for child in children {
            self.remove_child(parent, child)?;
        }
        Ok(())
    }

    /// Puts a fresh `new_child` exactly where `old_child` was.
    ///
    /// `old_child` ends up detached like after [`Tree::remove_child`].
    #[instrument(level = "trace", skip(self))]
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        old_child: NodeId,
        new_child: NodeId,
    ) -> TreeResult<()> {
        let old_links = self.validate_can_be_removed(parent, old_child)?;
        self.validate_can_be_added(new_child)?;
        let parent_links = self.links(parent)?;

        if let Some(previous) = old_links.previous_sibling {
            self.linked_mut(previous)?.next_sibling = Some(new_child);
        }
        if let Some(next) = old_links.next_sibling {
            self.linked_mut(next)?.previous_sibling = Some(new_child);
        }

        let links = self.linked_mut(parent)?;
        if parent_links.first_child == Some(old_child) {
            links.first_child = Some(new_child);
        }
        if parent_links.last_child == Some(old_child) {
            links.last_child = Some(new_child);
        }

        let links = self.linked_mut(new_child)?;
        links.root = old_links.root;
        links.parent = old_links.parent;
        links.next_sibling = old_links.next_sibling;
        links.previous_sibling = old_links.previous_sibling;

        self.linked_mut(old_child)?.detach(old_child);
        self.reroot_subtree(old_child)?;

        debug!(%parent, %old_child, %new_child, "child replaced");
        Ok(())
    }

    /// Frees a standalone node and its whole subtree, returning the payloads
    /// in pre-order. Ids of freed nodes never resolve again.
    #[instrument(level = "trace", skip(self))]
    pub fn discard(&mut self, id: NodeId) -> TreeResult<Vec<T>> {
        if self.links(id)?.parent.is_some() {
            return Err(TreeError::StillAttached {
                name: self.name_of(id),
            });
        }
        let ids = self.subtree_ids(id);
        let mut removed = Vec::with_capacity(ids.len());
        for descendant in ids {
            if let Some(node) = self.arena.remove(descendant.index()) {
                removed.push(node.data);
            }
        }
        debug!(%id, count = removed.len(), "subtree discarded");
        Ok(removed)
    }

    /// Copies the subtree at `id` into a new standalone tree in this arena,
    /// producing each payload with `copy`.
    pub fn copy_subtree_with<E, F>(&mut self, id: NodeId, mut copy: F) -> Result<NodeId, E>
    where
        F: FnMut(&T) -> Result<T, E>,
        E: From<TreeError>,
    {
        // breadth-first, so every parent is planned before its children
        let mut plan: Vec<(T, Option<usize>)> = Vec::new();
        let mut position: HashMap<NodeId, usize> = HashMap::new();
        for node in self.breadth_first(id)? {
            let parent = match node.parent() {
                Some(parent) if node.id() != id => position.get(&parent.id()).copied(),
                _ => None,
            };
            position.insert(node.id(), plan.len());
            plan.push((copy(node.data())?, parent));
        }

        let mut created: Vec<NodeId> = Vec::with_capacity(plan.len());
        for (data, parent) in plan {
            let new_id = self.new_node(data);
            if let Some(parent) = parent {
                let parent_id = created
                    .get(parent)
                    .copied()
                    .ok_or_else(|| breach(format!("copy of {id} lost a parent")))?;
                self.add_child(parent_id, new_id)?;
            }
            created.push(new_id);
        }
        let copied = created
            .first()
            .copied()
            .ok_or_else(|| breach(format!("copy of {id} produced no nodes")))?;
        Ok(copied)
    }

    pub fn copy_subtree(&mut self, id: NodeId) -> TreeResult<NodeId>
    where
        T: Clone,
    {
        self.copy_subtree_with(id, |data| Ok::<T, TreeError>(data.clone()))
    }

    fn validate_can_be_added(&self, child: NodeId) -> TreeResult<()> {
        if self.links(child)?.is_fresh() {
            return Ok(());
        }
        Err(TreeError::AlreadyAttached {
            name: self.name_of(child),
        })
    }

    fn validate_can_be_removed(&self, parent: NodeId, child: NodeId) -> TreeResult<Links> {
        self.entry(parent)?;
        let links = self.links(child)?;
        if links.parent == Some(parent) {
            return Ok(links);
        }
        Err(TreeError::NotAChild {
            child: self.name_of(child),
            child_parent: links.parent.map(|p| self.name_of(p)),
            parent: self.name_of(parent),
        })
    }

    fn name_of(&self, id: NodeId) -> String {
        self.arena
            .get(id.index())
            .map(|node| node.data.name().to_string())
            .unwrap_or_else(|| id.to_string())
    }
}

fn breach(message: String) -> TreeError {
    TreeError::InvariantBreach(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tree: &Tree<String>, ids: impl IntoIterator<Item = NodeId>) -> Vec<String> {
        ids.into_iter()
            .map(|id| tree.node(id).unwrap().name().to_string())
            .collect()
    }

    fn child_names(tree: &Tree<String>, parent: NodeId) -> Vec<String> {
        names(
            tree,
            tree.node(parent).unwrap().children().map(|c| c.id()),
        )
    }

    #[test]
    fn test_new_node_is_fresh_root() {
        let mut tree = Tree::new();
        let id = tree.new_node("a".to_string());
        let links = tree.links(id).unwrap();
        assert!(links.is_fresh());
        assert_eq!(links.root, id);
        assert_eq!(tree.len(), 1);
        tree.check_invariants(id).unwrap();
    }

    #[test]
    fn test_add_child_appends_in_order() {
        let mut tree = Tree::new();
        let root = tree.new_node("1".to_string());
        let children: Vec<_> = ["11", "12", "13"]
            .iter()
            .map(|n| tree.new_node(n.to_string()))
            .collect();
        tree.add_child_range(root, children.clone()).unwrap();

        let links = tree.links(root).unwrap();
        assert_eq!(links.first_child, Some(children[0]));
        assert_eq!(links.last_child, Some(children[2]));
        assert_eq!(child_names(&tree, root), vec!["11", "12", "13"]);
        assert_eq!(tree.links(children[1]).unwrap().root, root);
        tree.check_invariants(root).unwrap();
    }

    #[test]
    fn test_remove_first_middle_last() {
        let mut tree = Tree::new();
        let root = tree.new_node("1".to_string());
        let c: Vec<_> = ["11", "12", "13", "14"]
            .iter()
            .map(|n| tree.new_node(n.to_string()))
            .collect();
        tree.add_child_range(root, c.clone()).unwrap();

        tree.remove_child(root, c[1]).unwrap();
        assert_eq!(child_names(&tree, root), vec!["11", "13", "14"]);
        tree.remove_child(root, c[0]).unwrap();
        assert_eq!(child_names(&tree, root), vec!["13", "14"]);
        tree.remove_child(root, c[3]).unwrap();
        assert_eq!(child_names(&tree, root), vec!["13"]);
        tree.remove_child(root, c[2]).unwrap();
        assert!(!tree.node(root).unwrap().has_children());

        for id in c {
            assert!(tree.links(id).unwrap().is_fresh());
            tree.check_invariants(id).unwrap();
        }
        tree.check_invariants(root).unwrap();
    }

    #[test]
    fn test_remove_reroots_descendants() {
        let mut tree = Tree::new();
        let root = tree.new_node("1".to_string());
        let child = tree.new_node("11".to_string());
        let grandchild = tree.new_node("111".to_string());
        tree.add_child(root, child).unwrap();
        tree.add_child(child, grandchild).unwrap();
        assert_eq!(tree.links(grandchild).unwrap().root, root);

        tree.remove_child(root, child).unwrap();
        assert_eq!(tree.links(grandchild).unwrap().root, child);
        assert_eq!(tree.links(grandchild).unwrap().parent, Some(child));
        tree.check_invariants(child).unwrap();
        tree.check_invariants(root).unwrap();
    }

    #[test]
    fn test_add_child_to_itself_fails() {
        let mut tree = Tree::new();
        let a = tree.new_node("a".to_string());
        let err = tree.add_child(a, a).unwrap_err();
        assert!(matches!(err, TreeError::SelfAttach { .. }));
        assert!(tree.links(a).unwrap().is_fresh());
    }

    #[test]
    fn test_check_invariants_detects_broken_sibling_chain() {
        let mut tree = Tree::new();
        let root = tree.new_node("1".to_string());
        let a = tree.new_node("11".to_string());
        let b = tree.new_node("12".to_string());
        tree.add_child_range(root, [a, b]).unwrap();

        tree.linked_mut(b).unwrap().previous_sibling = None;
        let err = tree.check_invariants(root).unwrap_err();
        assert!(matches!(err, TreeError::InvariantBreach(_)));
    }

    #[test]
    fn test_add_child_reports_missing_last_child_as_breach() {
        let mut tree = Tree::new();
        let root = tree.new_node("1".to_string());
        let a = tree.new_node("11".to_string());
        let b = tree.new_node("12".to_string());
        tree.add_child(root, a).unwrap();
        tree.linked_mut(root).unwrap().last_child = None;

        let err = tree.add_child(root, b).unwrap_err();
        assert!(matches!(err, TreeError::InvariantBreach(_)));
        assert!(tree.links(b).unwrap().is_fresh());
    }

    #[test]
    fn test_copy_subtree_preserves_shape() {
        let mut tree = Tree::new();
        let root = tree.new_node("1".to_string());
        let a = tree.new_node("11".to_string());
        let b = tree.new_node("12".to_string());
        let aa = tree.new_node("111".to_string());
        tree.add_child_range(root, [a, b]).unwrap();
        tree.add_child(a, aa).unwrap();

        let copy = tree.copy_subtree(root).unwrap();
        assert_ne!(copy, root);
        assert_eq!(tree.len(), 8);
        let order: Vec<String> = tree
            .depth_first(copy)
            .unwrap()
            .map(|n| n.name().to_string())
            .collect();
        assert_eq!(order, vec!["1", "11", "111", "12"]);
        tree.check_invariants(copy).unwrap();
    }
}
