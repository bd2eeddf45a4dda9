//! Indexed points stored in a tree.

use std::fmt;
use itertools::Itertools;
use nalgebra::{DVector, Scalar};
use num_traits::Float;


/// A point of the input set
///
/// The index is the position of the point in the list the tree was built
/// from, so the original input can be recovered from a query result.
#[derive(Clone, PartialEq, Debug)]
pub struct Point<T: Scalar> {
    /// Position in the input list
    pub index: usize,

    /// The coordinates, one per dimension
    pub coordinates: DVector<T>,
}

impl<T: Scalar> Point<T> {
    /// Create a new point
    pub fn new(index: usize, coordinates: DVector<T>) -> Point<T> {
        Point { index: index, coordinates: coordinates }
    }

    /// Create a new point copying its coordinates from a slice
    pub fn from_slice(index: usize, coordinates: &[T]) -> Point<T> {
        Point::new(index, DVector::from_column_slice(coordinates))
    }

    /// Number of coordinates
    pub fn dim(&self) -> usize {
        self.coordinates.len()
    }

    /// The coordinate along one axis
    pub fn coordinate(&self, axis: usize) -> T {
        self.coordinates[axis].clone()
    }
}

impl<T: Scalar + Float> Point<T> {
    /// Squared Euclidean distance to a query
    ///
    /// Panics, if the query has a different number of coordinates.
    pub fn squared_distance(&self, query: &[T]) -> T {
        squared_distance(self.coordinates.as_slice(), query)
    }
}

impl<T: Scalar + fmt::Display> fmt::Display for Point<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", self.coordinates.iter().join(","))
    }
}


/// Squared Euclidean distance between two coordinate slices
///
/// Every dimension contributes, there is no early exit on partial sums.
/// Panics, if the slices differ in length.
pub fn squared_distance<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip_eq(b.iter())
        .fold(T::zero(), |sum, (&x, &y)| sum + (x - y) * (x - y))
}
