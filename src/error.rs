//! Error types.

use std::error::Error;
use std::fmt;


/// Violations of the dimensionality contract of a tree
///
/// All points stored in one tree, and every query against it, must have the
/// same number of coordinates.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum DimensionError {
    /// A point or query without any coordinates
    NoCoordinates,

    /// A coordinate count that differs from the rest of the tree
    Mismatch {
        /// Input position of the offending point, `None` for a query
        index: Option<usize>,
        /// Number of coordinates of the tree
        expected: usize,
        /// Number of coordinates found
        found: usize,
    },
}

impl fmt::Display for DimensionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DimensionError::NoCoordinates =>
                write!(f, "points must have at least one coordinate"),
            DimensionError::Mismatch { index: Some(index), expected, found } =>
                write!(f, "point {} has {} coordinates, expected {}", index, found, expected),
            DimensionError::Mismatch { index: None, expected, found } =>
                write!(f, "query has {} coordinates, expected {}", found, expected),
        }
    }
}

impl Error for DimensionError {}


#[cfg(test)]
mod test {
    use super::DimensionError;

    #[test]
    fn mismatch_message_names_point() {
        let err = DimensionError::Mismatch { index: Some(3), expected: 2, found: 3 };
        assert_eq!(err.to_string(), "point 3 has 3 coordinates, expected 2");
    }

    #[test]
    fn mismatch_message_names_query() {
        let err = DimensionError::Mismatch { index: None, expected: 3, found: 1 };
        assert_eq!(err.to_string(), "query has 1 coordinates, expected 3");
    }
}
