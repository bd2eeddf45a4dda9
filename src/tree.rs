//! The k-d tree and its nearest neighbour query.

use std::iter::FromIterator;
use itertools::Itertools;
use log::{debug, trace};
use nalgebra::Scalar;
use num_traits::Float;
use crate::error::DimensionError;
use crate::iter::Iter;
use crate::node::Node;
use crate::point::{Point, squared_distance};

#[cfg(any(test, feature = "arbitrary"))]
use quickcheck::TestResult;


/// The result of a nearest neighbour query
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Neighbour<'a, T: Scalar> {
    /// The closest point found
    pub point: &'a Point<T>,

    /// Its squared Euclidean distance to the query
    pub squared_distance: T,
}


/// A balanced k-d tree over a fixed set of points
///
/// The tree is built once from a list of coordinate vectors and may then be
/// queried any number of times. Building again replaces the previous tree.
///
/// ```
/// use kdnearest::KdTree;
///
/// let mut tree: KdTree<f64> = KdTree::new();
/// tree.build(vec![vec![9.0, 1.0], vec![6.0, 12.0], vec![3.0, 6.0]]);
/// let closest = tree.nearest(&[2.0, 5.0]).unwrap();
/// assert_eq!(closest.index, 2);
/// ```
#[derive(Clone, Debug)]
pub struct KdTree<T: Scalar> {
    root: Option<Node<T>>,
    len: usize,
}

impl<T: Scalar> KdTree<T> {
    /// Create a tree without any points
    pub fn new() -> KdTree<T> {
        KdTree { root: None, len: 0 }
    }

    /// The root node, absent if the tree holds no points
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_ref()
    }

    /// Number of points in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no points
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of coordinates of the stored points
    pub fn dim(&self) -> Option<usize> {
        self.root().map(|root| root.point().dim())
    }

    /// Number of levels of the tree
    pub fn height(&self) -> usize {
        self.root().map_or(0, Node::height)
    }

    /// Iterate over the stored points in order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root())
    }
}

impl<T: Scalar + Float> KdTree<T> {
    /// Build the tree from a list of coordinate vectors
    ///
    /// Each point is indexed by its position in the list. The coordinates are
    /// copied, so the input may be dropped afterwards. Any previously built
    /// tree is discarded.
    ///
    /// Panics, if the points do not all have the same, non-zero number of
    /// coordinates. See `try_build` for a fallible version.
    pub fn build<I, V>(&mut self, points: I)
        where I: IntoIterator<Item = V>,
              V: AsRef<[T]>,
    {
        if let Err(err) = self.try_build(points) {
            panic!("cannot build k-d tree: {}", err);
        }
    }

    /// Build the tree, reporting inconsistent dimensions as an error
    ///
    /// On error the previous tree is left untouched.
    pub fn try_build<I, V>(&mut self, points: I) -> Result<(), DimensionError>
        where I: IntoIterator<Item = V>,
              V: AsRef<[T]>,
    {
        let mut points: Vec<_> = points.into_iter()
            .enumerate()
            .map(|(index, coordinates)| Point::from_slice(index, coordinates.as_ref()))
            .collect();
        check_dimensions(&points)?;
        if let Some(dim) = self.dim() {
            trace!("discarding previous {}-dimensional tree of {} points", dim, self.len);
        }
        self.len = points.len();
        self.root = if points.is_empty() { None } else { Some(Node::build(&mut points, None)) };
        debug!(
            "built k-d tree of {} points, dimension {:?}, height {}",
            self.len, self.dim(), self.height()
        );
        Ok(())
    }

    /// The stored point closest to `query`
    ///
    /// Returns `None` exactly when the tree holds no points. Among several
    /// points at the same minimal distance any one may be returned.
    ///
    /// Panics, if the query has a different number of coordinates than the
    /// stored points.
    pub fn nearest(&self, query: &[T]) -> Option<&Point<T>> {
        self.nearest_with_distance(query).map(|neighbour| neighbour.point)
    }

    /// The closest stored point together with its squared distance
    ///
    /// Panics on a query of the wrong dimension, like `nearest`.
    pub fn nearest_with_distance(&self, query: &[T]) -> Option<Neighbour<'_, T>> {
        match self.try_nearest(query) {
            Ok(found) => found,
            Err(err) => panic!("cannot query k-d tree: {}", err),
        }
    }

    /// Find the closest stored point, reporting a wrong query dimension as
    /// an error
    pub fn try_nearest(&self, query: &[T]) -> Result<Option<Neighbour<'_, T>>, DimensionError> {
        let root = match self.root {
            Some(ref root) => root,
            None => {
                trace!("nearest neighbour query on an empty tree");
                return Ok(None);
            },
        };
        let dim = root.point().dim();
        if query.len() != dim {
            return Err(DimensionError::Mismatch { index: None, expected: dim, found: query.len() });
        }
        let mut best = None;
        root.nearest(query, &mut best);
        Ok(best)
    }
}

impl<T: Scalar> Default for KdTree<T> {
    fn default() -> KdTree<T> {
        KdTree::new()
    }
}

impl<T: Scalar + Float, V: AsRef<[T]>> FromIterator<V> for KdTree<T> {
    fn from_iter<I: IntoIterator<Item = V>>(points: I) -> KdTree<T> {
        let mut tree = KdTree::new();
        tree.build(points);
        tree
    }
}

impl<'a, T: Scalar> IntoIterator for &'a KdTree<T> {
    type Item = &'a Point<T>;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Iter<'a, T> { self.iter() }
}


fn check_dimensions<T: Scalar>(points: &[Point<T>]) -> Result<(), DimensionError> {
    let dim = match points.first() {
        Some(first) => first.dim(),
        None => return Ok(()),
    };
    if dim == 0 {
        return Err(DimensionError::NoCoordinates);
    }
    match points.iter().find_position(|point| point.dim() != dim) {
        Some((index, point)) => Err(DimensionError::Mismatch {
            index: Some(index),
            expected: dim,
            found: point.dim(),
        }),
        None => Ok(()),
    }
}


/// Find the point closest to `query` by a linear scan
///
/// Returns the position of the first point at minimal squared distance
/// together with that distance, or `None` for an empty list. This serves as
/// the reference the tree is checked against.
pub fn linear_nearest<T, V>(points: &[V], query: &[T]) -> Option<(usize, T)>
    where T: Float,
          V: AsRef<[T]>,
{
    points.iter()
        .map(|point| squared_distance(point.as_ref(), query))
        .enumerate()
        .fold(None, |best, (index, dist)| match best {
            Some((_, best_dist)) if !(dist < best_dist) => best,
            _ => Some((index, dist)),
        })
}


#[cfg(any(test, feature = "arbitrary"))]
fn sane(x: f64) -> bool {
    x.is_finite() && x.abs() < 1e100
}

#[cfg(any(test, feature = "arbitrary"))]
fn agrees_with_linear_scan(points: &[Vec<f64>], query: &[f64]) -> bool {
    let tree: KdTree<f64> = points.iter().collect();
    match (tree.nearest_with_distance(query), linear_nearest(points, query)) {
        (None, None) => true,
        (Some(found), Some((_, dist))) =>
            found.squared_distance == dist
                && points[found.point.index].as_slice() == found.point.coordinates.as_slice(),
        _ => false,
    }
}


/// Nearest neighbour proposition (two dimensions)
///
/// The tree finds a point at the same squared distance as a linear scan.
#[cfg(any(test, feature = "arbitrary"))]
pub fn prop_nearest_is_closest_2d(points: Vec<(f64, f64)>, query: (f64, f64)) -> TestResult {
    if !(sane(query.0) && sane(query.1)) {
        return TestResult::discard();
    }
    let points: Vec<Vec<f64>> = points.into_iter()
        .filter(|&(x, y)| sane(x) && sane(y))
        .map(|(x, y)| vec![x, y])
        .collect();
    TestResult::from_bool(agrees_with_linear_scan(&points, &[query.0, query.1]))
}


/// Nearest neighbour proposition (three dimensions)
#[cfg(any(test, feature = "arbitrary"))]
pub fn prop_nearest_is_closest_3d(points: Vec<(f64, f64, f64)>, query: (f64, f64, f64)) -> TestResult {
    if !(sane(query.0) && sane(query.1) && sane(query.2)) {
        return TestResult::discard();
    }
    let points: Vec<Vec<f64>> = points.into_iter()
        .filter(|&(x, y, z)| sane(x) && sane(y) && sane(z))
        .map(|(x, y, z)| vec![x, y, z])
        .collect();
    TestResult::from_bool(agrees_with_linear_scan(&points, &[query.0, query.1, query.2]))
}


/// Preservation proposition
///
/// Building stores every input point exactly once, with its original index
/// and unchanged coordinates.
#[cfg(any(test, feature = "arbitrary"))]
pub fn prop_build_preserves_points(points: Vec<(f64, f64)>) -> TestResult {
    if points.iter().any(|&(x, y)| x.is_nan() || y.is_nan()) {
        return TestResult::discard();
    }
    let raw: Vec<[f64; 2]> = points.iter().map(|&(x, y)| [x, y]).collect();
    let tree: KdTree<f64> = raw.iter().collect();
    let mut indices: Vec<usize> = tree.iter().map(|p| p.index).collect();
    indices.sort();
    TestResult::from_bool(
        tree.len() == raw.len()
            && indices == (0..raw.len()).collect::<Vec<_>>()
            && tree.iter().all(|p| p.coordinates.as_slice() == &raw[p.index][..])
    )
}


/// Exact hit proposition
///
/// Querying with one of the input points yields a point at distance zero.
#[cfg(any(test, feature = "arbitrary"))]
pub fn prop_input_point_is_found(points: Vec<(f64, f64)>, pick: usize) -> TestResult {
    let points: Vec<[f64; 2]> = points.into_iter()
        .filter(|&(x, y)| sane(x) && sane(y))
        .map(|(x, y)| [x, y])
        .collect();
    if points.is_empty() {
        return TestResult::discard();
    }
    let query = points[pick % points.len()];
    let tree: KdTree<f64> = points.iter().collect();
    TestResult::from_bool(
        tree.nearest_with_distance(&query)
            .map_or(false, |found| found.squared_distance == 0.0)
    )
}
