//! A balanced k-d tree for nearest neighbour queries
//!
//! The tree is built once over a set of k-dimensional points by recursive
//! median splits, cycling through the coordinate axes with depth. Queries
//! descend towards the query point and backtrack, skipping every subtree
//! that lies entirely beyond the best squared distance found so far.
//!
//! ```
//! use kdnearest::KdTree;
//!
//! let points = vec![[9.0, 1.0], [6.0, 12.0], [3.0, 6.0], [13.0, 15.0]];
//! let tree: KdTree<f64> = points.iter().collect();
//! let closest = tree.nearest(&[2.0, 5.0]).unwrap();
//! assert_eq!(points[closest.index], [3.0, 6.0]);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod iter;
pub mod node;
pub mod point;
pub mod tree;

pub use error::DimensionError;
pub use node::Node;
pub use point::Point;
pub use tree::{KdTree, Neighbour, linear_nearest};
