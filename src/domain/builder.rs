//! Tree builder for generated trees and indented outlines.

use tracing::{debug, instrument};

use crate::domain::arena::Tree;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{Named, NodeId};

/// Constructs trees inside an existing arena.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    indent: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self { indent: 2 }
    }

    /// Spaces per outline level. Zero is treated as one.
    pub fn with_indent(indent: usize) -> Self {
        Self {
            indent: indent.max(1),
        }
    }

    /// Builds a complete tree named by child-index path.
    ///
    /// The root is `1`, its children `11`, `12`, ..., their children `111`,
    /// `112`, ... A `depth` of zero yields the root alone.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn complete<T>(
        &self,
        tree: &mut Tree<T>,
        depth: usize,
        branching: usize,
    ) -> TreeResult<NodeId>
    where
        T: Named + From<String>,
    {
        let root = tree.new_node(T::from("1".to_string()));
        if depth == 0 {
            return Ok(root);
        }

        let mut stack = vec![(root, 1)];
        while let Some((parent, level)) = stack.pop() {
            let parent_name = tree.node(parent)?.name().to_string();
            for number in 1..=branching {
                let child = tree.new_node(T::from(format!("{parent_name}{number}")));
                tree.add_child(parent, child)?;
                if level < depth {
                    stack.push((child, level + 1));
                }
            }
        }
        Ok(root)
    }

    /// Parses an indented outline into a new standalone tree.
    ///
    /// One node name per line; nesting is one tab or `indent` spaces per
    /// level. Blank lines and lines starting with `#` are skipped. On error
    /// the partially built tree is discarded again.
    #[instrument(level = "debug", skip(self, tree, text))]
    pub fn from_outline<T>(&self, tree: &mut Tree<T>, text: &str) -> TreeResult<NodeId>
    where
        T: Named + From<String>,
    {
        let mut root: Option<NodeId> = None;
        match self.parse_outline(tree, text, &mut root) {
            Ok(id) => Ok(id),
            Err(e) => {
                if let Some(partial) = root {
                    tree.discard(partial)?;
                }
                Err(e)
            }
        }
    }

    fn parse_outline<T>(
        &self,
        tree: &mut Tree<T>,
        text: &str,
        root: &mut Option<NodeId>,
    ) -> TreeResult<NodeId>
    where
        T: Named + From<String>,
    {
        // path[k] is the most recent node at level k
        let mut path: Vec<NodeId> = Vec::new();

        for (number, line) in text.lines().enumerate() {
            let line_no = number + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let level = self.level_of(line, line_no)?;
            if level == 0 && root.is_some() {
                return Err(TreeError::outline(line_no, "multiple roots"));
            }
            if level > 0 && root.is_none() {
                return Err(TreeError::outline(line_no, "indented line before the root"));
            }
            if level > path.len() {
                return Err(TreeError::outline(
                    line_no,
                    "indentation jumps more than one level",
                ));
            }

            path.truncate(level);
            let node = tree.new_node(T::from(trimmed.to_string()));
            match path.last() {
                Some(&parent) => tree.add_child(parent, node)?,
                None => *root = Some(node),
            }
            path.push(node);
        }

        let root = root.ok_or_else(|| TreeError::outline(0, "outline is empty"))?;
        debug!(%root, "outline parsed");
        Ok(root)
    }

    fn level_of(&self, line: &str, line_no: usize) -> TreeResult<usize> {
        let tabs = line.chars().take_while(|&c| c == '\t').count();
        let spaces = line[tabs..].chars().take_while(|&c| c == ' ').count();
        match (tabs, spaces) {
            (0, spaces) if spaces % self.indent == 0 => Ok(spaces / self.indent),
            (0, spaces) => Err(TreeError::outline(
                line_no,
                format!("indentation of {spaces} spaces is not a multiple of {}", self.indent),
            )),
            (tabs, 0) => Ok(tabs),
            _ => Err(TreeError::outline(line_no, "mixed tabs and spaces")),
        }
    }
}
