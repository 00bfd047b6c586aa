//! Deep copies by JSON serialization round trip.
//!
//! Any payload that is `Serialize + DeserializeOwned` can be deep cloned
//! without implementing `Clone`; the copy shares nothing with the source.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{Named, NodeId, Tree, TreeError};

#[derive(Error, Debug)]
pub enum CloneError {
    #[error("deep clone round trip failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Tree(#[from] TreeError),
}

/// Capability to produce an equivalent, independent copy of a value.
pub trait DeepClone: Sized {
    fn deep_clone(&self) -> Result<Self, CloneError>;
}

impl<T> DeepClone for T
where
    T: Serialize + DeserializeOwned,
{
    fn deep_clone(&self) -> Result<Self, CloneError> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Deep clones every item, failing on the first one that does not survive
/// the round trip.
pub fn deep_clone_all<'a, T, I>(items: I) -> Result<Vec<T>, CloneError>
where
    T: DeepClone + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().map(|item| item.deep_clone()).collect()
}

impl<T: Named + DeepClone> Tree<T> {
    /// Copies the subtree at `id` into a new standalone tree, deep cloning
    /// every payload.
    pub fn deep_copy_subtree(&mut self, id: NodeId) -> Result<NodeId, CloneError> {
        self.copy_subtree_with(id, |data| data.deep_clone())
    }
}
