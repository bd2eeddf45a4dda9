use itertools::Itertools;
use kdnearest::{KdTree, Point, linear_nearest};
use rand::distributions::{Distribution, Uniform};
use rand::thread_rng;

/// Render a coordinate list as `(x,y,...)`
fn tuple(coordinates: &[f64]) -> String {
    format!("({})", coordinates.iter().join(","))
}

fn print_example(list: &[Vec<f64>], query: &[f64], point: &Point<f64>) {
    println!("Tree constructed from points:");
    println!("[{}]", list.iter().map(|p| tuple(p)).join(","));
    println!("Query:");
    println!("{}", tuple(query));
    println!("Closest neighbour to searched value is:");
    println!("{}", point);
}

fn main() {
    let mut tree: KdTree<f64> = KdTree::new();

    let points = vec![
        vec![9.0, 1.0], vec![6.0, 12.0], vec![3.0, 6.0], vec![13.0, 15.0],
        vec![10.0, 19.0], vec![17.0, 15.0], vec![15.0, 12.0],
    ];
    tree.build(&points);
    let query = [2.0, 5.0];
    if let Some(closest) = tree.nearest(&query) {
        print_example(&points, &query, closest);
    }

    // Rebuilding replaces the two-dimensional tree
    let points = vec![
        vec![9.0, 1.0, 5.0], vec![6.0, 12.0, 1.0], vec![3.0, 6.0, 4.0], vec![13.0, 15.0, 2.0],
        vec![10.0, 19.0, 0.0], vec![17.0, 15.0, 6.0], vec![15.0, 12.0, -12.0],
    ];
    tree.build(&points);
    let query = [2.0, 5.0, -7.0];
    if let Some(closest) = tree.nearest(&query) {
        print_example(&points, &query, closest);
    }

    // A larger random cloud, checked against a linear scan
    let mut rng = thread_rng();
    let coord_range = Uniform::from(-5.0..5.0);
    let cloud: Vec<[f64; 3]> = (0..10_000)
        .map(|_| [
            coord_range.sample(&mut rng),
            coord_range.sample(&mut rng),
            coord_range.sample(&mut rng),
        ])
        .collect();
    tree.build(&cloud);
    let query = [0.0, 0.0, 0.0];
    if let Some(found) = tree.nearest_with_distance(&query) {
        println!(
            "Closest of {} random points to the origin: {} (squared distance {:.6}, tree height {})",
            tree.len(), found.point, found.squared_distance, tree.height()
        );
        assert_eq!(linear_nearest(&cloud, &query).map(|(_, d)| d), Some(found.squared_distance));
    }
}
