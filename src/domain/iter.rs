//! Breadth-first and depth-first cursors over a subtree.
//!
//! Both cursors hold a shared borrow of the arena, so the tree cannot be
//! mutated while a traversal is in flight.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::arena::Tree;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::NodeId;
use crate::domain::node_ref::NodeRef;

/// Stateful single-pass cursor over nodes.
///
/// `current` fails with [`TreeError::NoCurrent`] before the first
/// `move_next` and after exhaustion.
pub trait Cursor<'a, T: 'a> {
    /// Advances to the next node; false once the sequence is exhausted.
    fn move_next(&mut self) -> bool;

    fn current(&self) -> TreeResult<NodeRef<'a, T>>;

    /// Starts over from the start node.
    fn reset(&mut self);
}

/// Level-order cursor: start node, then its children left to right, then
/// grandchildren left to right, and so on.
pub struct BreadthFirst<'a, T> {
    tree: &'a Tree<T>,
    initial: NodeId,
    queue: VecDeque<NodeId>,
    current: Option<NodeId>,
}

impl<'a, T> BreadthFirst<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, start: NodeId) -> Self {
        Self {
            tree,
            initial: start,
            queue: VecDeque::from([start]),
            current: None,
        }
    }
}

impl<'a, T: 'a> Cursor<'a, T> for BreadthFirst<'a, T> {
    fn move_next(&mut self) -> bool {
        while let Some(id) = self.queue.pop_front() {
            if let Some(node) = self.tree.get(id) {
                self.queue.extend(node.children().map(|child| child.id()));
                self.current = Some(id);
                return true;
            }
        }
        self.current = None;
        false
    }

    fn current(&self) -> TreeResult<NodeRef<'a, T>> {
        self.current
            .and_then(|id| self.tree.get(id))
            .ok_or(TreeError::NoCurrent)
    }

    fn reset(&mut self) {
        self.queue.clear();
        self.queue.push_back(self.initial);
        self.current = None;
    }
}

impl<'a, T> Iterator for BreadthFirst<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.move_next() {
            self.current().ok()
        } else {
            None
        }
    }
}

/// Pre-order cursor: a node before its descendants, siblings left to right.
pub struct DepthFirst<'a, T> {
    tree: &'a Tree<T>,
    initial: NodeId,
    stack: Vec<NodeId>,
    current: Option<NodeId>,
}

impl<'a, T> DepthFirst<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, start: NodeId) -> Self {
        Self {
            tree,
            initial: start,
            stack: vec![start],
            current: None,
        }
    }
}

impl<'a, T: 'a> Cursor<'a, T> for DepthFirst<'a, T> {
    fn move_next(&mut self) -> bool {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.tree.get(id) {
                // Push children in reverse order for left-to-right traversal
                let mut child = node.last_child();
                while let Some(c) = child {
                    self.stack.push(c.id());
                    child = c.previous_sibling();
                }
                self.current = Some(id);
                return true;
            }
        }
        self.current = None;
        false
    }

    fn current(&self) -> TreeResult<NodeRef<'a, T>> {
        self.current
            .and_then(|id| self.tree.get(id))
            .ok_or(TreeError::NoCurrent)
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.stack.push(self.initial);
        self.current = None;
    }
}

impl<'a, T> Iterator for DepthFirst<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.move_next() {
            self.current().ok()
        } else {
            None
        }
    }
}

/// Traversal order chosen at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Order {
    #[default]
    #[serde(alias = "bfs")]
    BreadthFirst,
    #[serde(alias = "dfs")]
    DepthFirst,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown traversal order '{0}' (expected breadth-first, bfs, depth-first or dfs)")]
pub struct ParseOrderError(String);

impl FromStr for Order {
    type Err = ParseOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breadth-first" | "bfs" => Ok(Order::BreadthFirst),
            "depth-first" | "dfs" => Ok(Order::DepthFirst),
            other => Err(ParseOrderError(other.to_string())),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::BreadthFirst => f.write_str("breadth-first"),
            Order::DepthFirst => f.write_str("depth-first"),
        }
    }
}

/// Either cursor, selected by [`Order`].
pub enum OrderedCursor<'a, T> {
    BreadthFirst(BreadthFirst<'a, T>),
    DepthFirst(DepthFirst<'a, T>),
}

impl<'a, T: 'a> Cursor<'a, T> for OrderedCursor<'a, T> {
    fn move_next(&mut self) -> bool {
        match self {
            OrderedCursor::BreadthFirst(c) => c.move_next(),
            OrderedCursor::DepthFirst(c) => c.move_next(),
        }
    }

    fn current(&self) -> TreeResult<NodeRef<'a, T>> {
        match self {
            OrderedCursor::BreadthFirst(c) => c.current(),
            OrderedCursor::DepthFirst(c) => c.current(),
        }
    }

    fn reset(&mut self) {
        match self {
            OrderedCursor::BreadthFirst(c) => c.reset(),
            OrderedCursor::DepthFirst(c) => c.reset(),
        }
    }
}

impl<'a, T> Iterator for OrderedCursor<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            OrderedCursor::BreadthFirst(c) => c.next(),
            OrderedCursor::DepthFirst(c) => c.next(),
        }
    }
}
