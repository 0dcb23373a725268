//! Validated section forest with traversal and navigation helpers.
//!
//! Traversal order is always the given child order, preorder. Navigators
//! number and step through sections in exactly this order.

use std::collections::HashSet;

use crate::entities::SectionNode;
use crate::errors::CoreError;

/// Immutable forest of standard sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionTree {
    roots: Vec<SectionNode>,
}

impl SectionTree {
    /// Validate and wrap a forest.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if two sections share an id or a
    /// section with children also declares its own questions.
    pub fn new(roots: Vec<SectionNode>) -> Result<Self, CoreError> {
        let tree = Self { roots };
        let mut seen = HashSet::new();
        for (_, node) in tree.walk() {
            if !seen.insert(node.id.as_str()) {
                return Err(CoreError::Validation(format!(
                    "duplicate section id '{}'",
                    node.id
                )));
            }
            if !node.is_leaf() && node.question_count > 0 {
                return Err(CoreError::Validation(format!(
                    "section '{}' has sub-sections and {} direct questions",
                    node.id, node.question_count
                )));
            }
        }
        Ok(tree)
    }

    #[must_use]
    pub fn roots(&self) -> &[SectionNode] {
        &self.roots
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Preorder walk yielding `(depth, node)`; roots have depth 0.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.roots.iter().rev().map(|node| (0, node)).collect(),
        }
    }

    /// Leaf sections in traversal order.
    pub fn leaves(&self) -> impl Iterator<Item = &SectionNode> {
        self.walk()
            .map(|(_, node)| node)
            .filter(|node| node.is_leaf())
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&SectionNode> {
        self.walk().map(|(_, node)| node).find(|node| node.id == id)
    }

    /// Look up a section, reporting a missing id as an error.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` when no section has this id.
    pub fn require(&self, id: &str) -> Result<&SectionNode, CoreError> {
        self.find(id).ok_or_else(|| CoreError::NotFound {
            entity_type: "section".into(),
            id: id.into(),
        })
    }

    /// Breadcrumb from a root down to the section with `id`, inclusive.
    #[must_use]
    pub fn path_to(&self, id: &str) -> Option<Vec<&SectionNode>> {
        fn descend<'a>(
            nodes: &'a [SectionNode],
            id: &str,
            path: &mut Vec<&'a SectionNode>,
        ) -> bool {
            for node in nodes {
                path.push(node);
                if node.id == id || descend(&node.children, id, path) {
                    return true;
                }
                path.pop();
            }
            false
        }

        let mut path = Vec::new();
        descend(&self.roots, id, &mut path).then_some(path)
    }

    /// The leaf following the leaf `id` in traversal order.
    #[must_use]
    pub fn next_leaf(&self, id: &str) -> Option<&SectionNode> {
        let mut leaves = self.leaves().skip_while(|node| node.id != id);
        leaves.next()?;
        leaves.next()
    }

    /// The leaf preceding the leaf `id` in traversal order.
    #[must_use]
    pub fn previous_leaf(&self, id: &str) -> Option<&SectionNode> {
        let mut previous = None;
        for leaf in self.leaves() {
            if leaf.id == id {
                return previous;
            }
            previous = Some(leaf);
        }
        None
    }

    /// Number of questions across every leaf.
    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.leaves().map(|leaf| leaf.question_count).sum()
    }
}

/// Preorder iterator over a section forest.
pub struct Walk<'a> {
    stack: Vec<(usize, &'a SectionNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a SectionNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}
