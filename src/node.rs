//! Tree nodes holding one point each.

use std::cmp::Ordering;
use nalgebra::Scalar;
use num_traits::Float;
use crate::point::Point;
use crate::tree::Neighbour;


/// A node of a k-d tree
///
/// Every node stores exactly one point and the separation axis it splits its
/// subtree along. Points in the left subtree are not greater than the node's
/// point along that axis, points in the right subtree are not smaller.
#[derive(Clone, Debug)]
pub struct Node<T: Scalar> {
    left: Option<Box<Node<T>>>,
    right: Option<Box<Node<T>>>,
    point: Point<T>,
    axis: usize,
}

impl<T: Scalar> Node<T> {
    /// The point stored in this node
    pub fn point(&self) -> &Point<T> {
        &self.point
    }

    /// The separation axis of this node
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Subtree with points not greater along the separation axis
    pub fn left(&self) -> Option<&Node<T>> {
        self.left.as_ref().map(|node| &**node)
    }

    /// Subtree with points not smaller along the separation axis
    pub fn right(&self) -> Option<&Node<T>> {
        self.right.as_ref().map(|node| &**node)
    }

    /// Whether this node has no children
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Number of nodes on the longest path from here down to a leaf
    pub fn height(&self) -> usize {
        let left = self.left().map_or(0, Node::height);
        let right = self.right().map_or(0, Node::height);
        1 + left.max(right)
    }
}

impl<T: Scalar + Float> Node<T> {
    /// Build a subtree from a non-empty set of points
    ///
    /// The separation axis is the one following `parent_axis`, or the first
    /// axis at the root. The slice is partitioned in place around its median
    /// along that axis using selection rather than a full sort, and only the
    /// median point is copied into the node. All points must have the same,
    /// non-zero number of coordinates.
    pub(crate) fn build(points: &mut [Point<T>], parent_axis: Option<usize>) -> Node<T> {
        debug_assert!(!points.is_empty());
        let dim = points[0].dim();
        let axis = parent_axis.map_or(0, |parent| (parent + 1) % dim);
        let median = points.len() / 2;
        if points.len() >= 2 {
            points.select_nth_unstable_by(median, |a, b| compare_along(axis, a, b));
        }
        let (left, rest) = points.split_at_mut(median);
        let (point, right) = rest.split_at_mut(1);
        Node {
            left: subtree(left, axis),
            right: subtree(right, axis),
            point: point[0].clone(),
            axis: axis,
        }
    }

    /// Search this subtree for a point closer to `query` than `best`
    ///
    /// The nearer side of the splitting plane is searched first. The farther
    /// side is only searched if the plane is not farther away than the best
    /// squared distance found so far.
    pub(crate) fn nearest<'a>(&'a self, query: &[T], best: &mut Option<Neighbour<'a, T>>) {
        self.search(query, best, &mut |_| ());
    }

    /// Like `nearest`, calling `visit` on the point of every node entered
    pub(crate) fn search<'a, F>(&'a self, query: &[T], best: &mut Option<Neighbour<'a, T>>, visit: &mut F)
        where F: FnMut(&'a Point<T>),
    {
        visit(&self.point);
        let squared_distance = self.point.squared_distance(query);
        let closer = match *best {
            Some(ref current) => squared_distance < current.squared_distance,
            None => true,
        };
        if closer {
            *best = Some(Neighbour { point: &self.point, squared_distance: squared_distance });
        }

        let split = self.point.coordinate(self.axis);
        let near = if query[self.axis] <= split { &self.left } else { &self.right };
        if let Some(ref node) = *near {
            node.search(query, best, visit);
        }

        // The far side is re-derived from the same comparison.
        let delta = query[self.axis] - split;
        let reachable = best.as_ref().map_or(true, |current| delta * delta <= current.squared_distance);
        if reachable {
            let far = if query[self.axis] <= split { &self.right } else { &self.left };
            if let Some(ref node) = *far {
                node.search(query, best, visit);
            }
        }
    }
}

fn subtree<T: Scalar + Float>(points: &mut [Point<T>], axis: usize) -> Option<Box<Node<T>>> {
    if points.is_empty() {
        None
    }
    else {
        Some(Box::new(Node::build(points, Some(axis))))
    }
}

fn compare_along<T: Scalar + Float>(axis: usize, a: &Point<T>, b: &Point<T>) -> Ordering {
    a.coordinate(axis)
        .partial_cmp(&b.coordinate(axis))
        .unwrap_or(Ordering::Equal)
}


#[cfg(test)]
mod test {
    use rand::distributions::{Distribution, Uniform};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::point::Point;
    use crate::tree::Neighbour;
    use super::Node;

    fn points(raw: &[&[f64]]) -> Vec<Point<f64>> {
        raw.iter().enumerate().map(|(i, c)| Point::from_slice(i, c)).collect()
    }

    fn search_order<'a>(node: &'a Node<f64>, query: &[f64]) -> (Neighbour<'a, f64>, Vec<usize>) {
        let mut best = None;
        let mut order = vec![];
        node.search(query, &mut best, &mut |p: &Point<f64>| order.push(p.index));
        (best.unwrap(), order)
    }

    fn axes_at_depth(node: &Node<f64>, depth: usize, out: &mut Vec<(usize, usize)>) {
        out.push((depth, node.axis()));
        for child in node.left().into_iter().chain(node.right()) {
            axes_at_depth(child, depth + 1, out);
        }
    }

    fn check_split(node: &Node<f64>) -> bool {
        let axis = node.axis();
        let split = node.point().coordinate(axis);
        let left_ok = node.left().map_or(true, |left| {
            crate::iter::Iter::new(Some(left)).all(|p| p.coordinate(axis) <= split)
                && check_split(left)
        });
        let right_ok = node.right().map_or(true, |right| {
            crate::iter::Iter::new(Some(right)).all(|p| p.coordinate(axis) >= split)
                && check_split(right)
        });
        left_ok && right_ok
    }

    #[test]
    fn single_point_is_a_leaf() {
        let node = Node::build(&mut points(&[&[1.0, 2.0]]), None);
        assert!(node.is_leaf());
        assert_eq!(node.axis(), 0);
        assert_eq!(node.point().index, 0);
        assert_eq!(node.height(), 1);
    }

    #[test]
    fn root_holds_median_along_first_axis() {
        let node = Node::build(&mut points(&[&[9.0, 1.0], &[6.0, 12.0], &[3.0, 6.0], &[13.0, 15.0],
                                        &[10.0, 19.0], &[17.0, 15.0], &[15.0, 12.0]]), None);
        assert_eq!(node.point().coordinates.as_slice(), &[10.0, 19.0]);
        assert_eq!(node.height(), 3);
    }

    #[test]
    fn two_points_leave_right_subtree_empty() {
        let node = Node::build(&mut points(&[&[10.0, 50.0], &[9.0, 0.0]]), None);
        assert_eq!(node.point().index, 0);
        assert_eq!(node.left().map(|n| n.point().index), Some(1));
        assert!(node.right().is_none());
    }

    #[test]
    fn axis_cycles_with_depth_in_two_dimensions() {
        let raw: Vec<Vec<f64>> = (0..15).map(|i| vec![i as f64, (i * 7 % 5) as f64]).collect();
        let refs: Vec<&[f64]> = raw.iter().map(|c| &c[..]).collect();
        let node = Node::build(&mut points(&refs), None);
        let mut axes = vec![];
        axes_at_depth(&node, 0, &mut axes);
        assert_eq!(node.height(), 4);
        assert!(axes.iter().all(|&(depth, axis)| axis == depth % 2));
    }

    #[test]
    fn axis_cycles_with_depth_in_three_dimensions() {
        let raw: Vec<Vec<f64>> = (0..31)
            .map(|i| vec![(i * 3 % 11) as f64, i as f64, -(i as f64)])
            .collect();
        let refs: Vec<&[f64]> = raw.iter().map(|c| &c[..]).collect();
        let node = Node::build(&mut points(&refs), None);
        let mut axes = vec![];
        axes_at_depth(&node, 0, &mut axes);
        assert!(axes.iter().all(|&(depth, axis)| axis == depth % 3));
    }

    #[test]
    fn subtrees_respect_the_splitting_plane() {
        let raw: Vec<Vec<f64>> = (0..40)
            .map(|i| vec![(i * 17 % 13) as f64, (i * 5 % 7) as f64, (i % 3) as f64])
            .collect();
        let refs: Vec<&[f64]> = raw.iter().map(|c| &c[..]).collect();
        assert!(check_split(&Node::build(&mut points(&refs), None)));
    }

    #[test]
    fn far_side_is_searched_when_near_child_is_missing() {
        // The root is (10, 50) with only a left child (9, 0). The query lies
        // right of the root, where there is no subtree, yet the left point is
        // much closer.
        let node = Node::build(&mut points(&[&[10.0, 50.0], &[9.0, 0.0]]), None);
        let mut best = None;
        node.nearest(&[10.5, 0.0], &mut best);
        let best = best.unwrap();
        assert_eq!(best.point.index, 1);
        assert_eq!(best.squared_distance, 2.25);
    }

    #[test]
    fn near_side_is_searched_first_and_far_side_pruned() {
        // Root (10, 0) splits (0, 0) to the left from (20, 0) to the right.
        // After finding (20, 0) at distance 1 the plane at x = 10 is 81 away.
        let node = Node::build(&mut points(&[&[10.0, 0.0], &[20.0, 0.0], &[0.0, 0.0]]), None);
        assert_eq!(node.point().index, 0);
        let (best, order) = search_order(&node, &[19.0, 0.0]);
        assert_eq!(best.point.index, 1);
        assert_eq!(best.squared_distance, 1.0);
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn far_side_is_searched_when_plane_is_exactly_at_the_bound() {
        // Root (10, 5), left (8, 0), right (12, 2). From (12, 0) the right
        // point lies at squared distance 4, as does the plane at x = 10.
        let node = Node::build(&mut points(&[&[10.0, 5.0], &[12.0, 2.0], &[8.0, 0.0]]), None);
        assert_eq!(node.point().index, 0);
        let (best, order) = search_order(&node, &[12.0, 0.0]);
        assert_eq!(best.point.index, 1);
        assert_eq!(best.squared_distance, 4.0);
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn balanced_tree_visits_few_nodes() {
        let mut rng = StdRng::seed_from_u64(1023);
        let coord = Uniform::from(-1.0..1.0);
        let raw: Vec<Vec<f64>> = (0..1023)
            .map(|_| vec![coord.sample(&mut rng), coord.sample(&mut rng)])
            .collect();
        let refs: Vec<&[f64]> = raw.iter().map(|c| &c[..]).collect();
        let node = Node::build(&mut points(&refs), None);
        assert_eq!(node.height(), 10);
        for _ in 0..50 {
            let query = [coord.sample(&mut rng), coord.sample(&mut rng)];
            let (best, order) = search_order(&node, &query);
            let (_, dist) = crate::tree::linear_nearest(&raw, &query).unwrap();
            assert_eq!(best.squared_distance, dist);
            assert!(order.len() < 200, "visited {} of 1023 nodes", order.len());
        }
    }

    #[test]
    fn existing_best_is_kept_when_nothing_is_closer() {
        let node = Node::build(&mut points(&[&[5.0], &[6.0], &[7.0]]), None);
        let other = Point::from_slice(42, &[0.0]);
        let mut best = Some(Neighbour { point: &other, squared_distance: 0.25 });
        node.nearest(&[0.5], &mut best);
        assert_eq!(best.unwrap().point.index, 42);
    }
}
