use std::cmp::Ordering;

use crate::room_map::{CLUE_LIMIT, truncate_bytes};

#[derive(Debug)]
struct ClueNode {
    text: String,
    left: Option<Box<ClueNode>>,
    right: Option<Box<ClueNode>>,
}

impl ClueNode {
    fn new(text: String) -> Box<Self> {
        Box::new(Self {
            text,
            left: None,
            right: None,
        })
    }
}

impl Drop for ClueNode {
    fn drop(&mut self) {
        let mut pending: Vec<Box<ClueNode>> = self
            .left
            .take()
            .into_iter()
            .chain(self.right.take())
            .collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

/// Every distinct clue found so far, kept in an unbalanced binary search tree
/// ordered by text.
#[derive(Debug, Default)]
pub struct ClueLedger {
    root: Option<Box<ClueNode>>,
    len: usize,
}

impl ClueLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `text` unless an equal clue is already recorded.
    /// Returns whether a new node was created.
    pub fn insert(&mut self, text: &str) -> bool {
        let text = truncate_bytes(text, CLUE_LIMIT);
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = match text.as_str().cmp(node.text.as_str()) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => return false,
            };
        }
        *slot = Some(ClueNode::new(text));
        self.len += 1;
        true
    }

    pub fn contains(&self, text: &str) -> bool {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match text.cmp(node.text.as_str()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clues in ascending order. Each call starts a fresh walk.
    pub fn iter(&self) -> InOrder<'_> {
        let mut walk = InOrder { stack: Vec::new() };
        walk.descend_left(self.root.as_deref());
        walk
    }
}

impl<'a> IntoIterator for &'a ClueLedger {
    type Item = &'a str;
    type IntoIter = InOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy in-order walk over a [`ClueLedger`].
pub struct InOrder<'a> {
    stack: Vec<&'a ClueNode>,
}

impl<'a> InOrder<'a> {
    fn descend_left(&mut self, mut node: Option<&'a ClueNode>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend_left(node.right.as_deref());
        Some(node.text.as_str())
    }
}
