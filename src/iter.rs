//! Tree iterators.

use nalgebra::Scalar;
use crate::node::Node;
use crate::point::Point;


/// An in-order iterator over the points in a tree.
pub struct Iter<'a, T: Scalar> {
    nodes: Vec<&'a Node<T>>,
    next_subtree: Option<&'a Node<T>>,
}

impl<'a, T: Scalar> Iter<'a, T> {
    /// Create a new iterator over a (possibly absent) subtree.
    pub fn new(root: Option<&'a Node<T>>) -> Iter<'a, T> {
        Iter { nodes: vec![], next_subtree: root }
    }
}

impl<'a, T: Scalar> Iterator for Iter<'a, T> {
    type Item = &'a Point<T>;

    fn next(&mut self) -> Option<&'a Point<T>> {
        while let Some(node) = self.next_subtree {
            self.nodes.push(node);
            self.next_subtree = node.left();
        }
        self.nodes.pop().map(|node| {
            self.next_subtree = node.right();
            node.point()
        })
    }
}
