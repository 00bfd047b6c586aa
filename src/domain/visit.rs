//! Visitor protocol: drive a cursor against a predicate or a visitor object.

use crate::domain::error::TreeResult;
use crate::domain::iter::Cursor;
use crate::domain::node_ref::NodeRef;

/// Whether visiting should go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitResult {
    /// Visiting continues.
    Continue,
    /// Visiting is done and stops immediately.
    Done,
}

/// Callback invoked once per visited node.
pub trait NodeVisitor<T> {
    fn visit(&mut self, node: NodeRef<'_, T>) -> VisitResult;
}

impl<T, F> NodeVisitor<T> for F
where
    F: FnMut(NodeRef<'_, T>) -> VisitResult,
{
    fn visit(&mut self, node: NodeRef<'_, T>) -> VisitResult {
        self(node)
    }
}

/// Advances `cursor` and calls `visit` on each node until it returns false
/// or the cursor is exhausted.
///
/// Returns [`VisitResult::Done`] when stopped early, [`VisitResult::Continue`]
/// when every node was visited.
pub fn traverse<'a, T, C, F>(cursor: &mut C, mut visit: F) -> TreeResult<VisitResult>
where
    T: 'a,
    C: Cursor<'a, T> + ?Sized,
    F: FnMut(NodeRef<'a, T>) -> bool,
{
    while cursor.move_next() {
        let current = cursor.current()?;
        if !visit(current) {
            return Ok(VisitResult::Done);
        }
    }
    Ok(VisitResult::Continue)
}

/// Same as [`traverse`], driven by a [`NodeVisitor`].
pub fn traverse_visitor<'a, T, C, V>(cursor: &mut C, visitor: &mut V) -> TreeResult<VisitResult>
where
    T: 'a,
    C: Cursor<'a, T> + ?Sized,
    V: NodeVisitor<T> + ?Sized,
{
    while cursor.move_next() {
        let current = cursor.current()?;
        if visitor.visit(current) == VisitResult::Done {
            return Ok(VisitResult::Done);
        }
    }
    Ok(VisitResult::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tree;

    #[test]
    fn test_traverse_reports_exhaustion() {
        let mut tree = Tree::new();
        let root = tree.new_node("1".to_string());
        let child = tree.new_node("11".to_string());
        tree.add_child(root, child).unwrap();

        let mut cursor = tree.breadth_first(root).unwrap();
        let mut count = 0;
        let result = traverse(&mut cursor, |_| {
            count += 1;
            true
        })
        .unwrap();
        assert_eq!(result, VisitResult::Continue);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_closure_visitor_stops_on_done() {
        let mut tree = Tree::new();
        let root = tree.new_node("1".to_string());
        let child = tree.new_node("11".to_string());
        tree.add_child(root, child).unwrap();

        let mut seen = Vec::new();
        let mut visitor = |node: NodeRef<'_, String>| {
            seen.push(node.name().to_string());
            VisitResult::Done
        };
        let mut cursor = tree.depth_first(root).unwrap();
        let result = traverse_visitor(&mut cursor, &mut visitor).unwrap();
        assert_eq!(result, VisitResult::Done);
        assert_eq!(seen, vec!["1"]);
    }
}
