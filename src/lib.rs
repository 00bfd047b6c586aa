//! ntree: intrusive 1-to-N trees with breadth-first and depth-first cursors.
//!
//! Nodes live in a generational arena owned by [`domain::Tree`]; every node
//! carries its parent, sibling, child and root links so that navigation and
//! re-linking are constant time. Traversal goes through resettable cursors
//! and can be stopped early by a predicate or a [`domain::NodeVisitor`].

pub mod cli;
pub mod clone;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use clone::{CloneError, DeepClone};
pub use domain::{
    Cursor, Named, NodeId, NodeRef, NodeVisitor, Order, Tree, TreeBuilder, TreeError, TreeResult,
    VisitResult,
};
