//! Domain layer: the 1-to-N tree core
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod convert;
pub mod error;
pub mod iter;
pub mod node;
pub mod node_ref;
pub mod visit;

pub use arena::Tree;
pub use builder::TreeBuilder;
pub use convert::Outline;
pub use error::{TreeError, TreeResult};
pub use iter::{BreadthFirst, Cursor, DepthFirst, Order, OrderedCursor, ParseOrderError};
pub use node::{Links, Named, NodeId, TreeNode};
pub use node_ref::{Ancestors, Children, NodeRef};
pub use visit::{traverse, traverse_visitor, NodeVisitor, VisitResult};
