//! Rotated tree diagrams for debugging.
//!
//! The right subtree is drawn above a node and the left subtree below it, so the diagram reads
//! top to bottom as keys from largest to smallest.

use crate::arena::Handle;
use crate::treap::node::Handedness;
use crate::treap::tree::Tree;
use std::fmt::Debug;

const BAR: &str = "|  ";
const SPACE: &str = "   ";
const LEAF: &str = "+--@";
const RIGHT: &str = "r-";
const LEFT: &str = "L-";
const ROOT: &str = "o-";

impl<T, U, C> Tree<T, U, C>
where
    T: Debug,
{
    /// Returns the lines of a diagram of the tree's shape. An empty tree is drawn as a single
    /// leaf placeholder.
    pub fn pretty_print(&self) -> Vec<String> {
        match self.root() {
            Some(root) => self.pretty_print_node(root),
            None => vec![String::from(LEAF)],
        }
    }

    fn pretty_print_node(&self, handle: Handle) -> Vec<String> {
        let (left_padding, right_padding, marker) = match self.handedness(handle) {
            Handedness::Root => (SPACE, SPACE, ROOT),
            Handedness::Left => (SPACE, BAR, LEFT),
            Handedness::Right => (BAR, SPACE, RIGHT),
            Handedness::Detached => (BAR, BAR, ROOT),
        };
        let node = self.node(handle);
        let mut lines = Vec::new();

        if let Some(right) = node.right {
            for line in self.pretty_print_node(right) {
                lines.push(format!("{}{}", right_padding, line));
            }
            lines.push(format!("{}{}", right_padding, BAR));
        }

        lines.push(format!("{}Node({:?}; {})", marker, node.entry.key, node.priority));

        if let Some(left) = node.left {
            lines.push(format!("{}{}", left_padding, BAR));
            for line in self.pretty_print_node(left) {
                lines.push(format!("{}{}", left_padding, line));
            }
        }
        lines
    }
}
