use srindex::{BoundingBox, Sphere, Srindex};

#[test]
fn basic_usage() {
    let mut index = Srindex::new(4).expect("Invalid branching factor");

    // Insert some points (the fifth one overflows the root leaf)
    index.insert([0.0, 0.0]);
    index.insert([10.0, 10.0]);
    index.insert([5.0, 5.0]);
    index.insert([1.0, 1.0]);
    index.insert([9.0, 9.0]);

    assert_eq!(index.num_points(), 5);
    assert_eq!(index.height(), 2);

    // Exact membership
    assert!(index.contains(&[5.0, 5.0]));
    assert!(!index.contains(&[4.0, 4.0]));

    // Box range query
    let mut found = index.query_box(&BoundingBox::new([0.0, 0.0], [5.0, 5.0]));
    found.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(found, vec![[0.0, 0.0], [1.0, 1.0], [5.0, 5.0]]);

    // Sphere range query around the far corner
    let mut found = index.query_sphere(&Sphere::new([10.0, 10.0], 2.0));
    found.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(found, vec![[9.0, 9.0], [10.0, 10.0]]);

    // Nearest neighbors come back nearest first
    let neighbors = index.query_neighbors(&[0.0, 0.0], 2);
    assert_eq!(neighbors, vec![[0.0, 0.0], [1.0, 1.0]]);
}

#[test]
fn three_dimensions() {
    let mut index = Srindex::new(8).expect("Invalid branching factor");
    for x in 0..5 {
        for y in 0..5 {
            for z in 0..5 {
                index.insert([f64::from(x), f64::from(y), f64::from(z)]);
            }
        }
    }
    assert_eq!(index.num_points(), 125);
    assert!(index.contains(&[3.0, 1.0, 4.0]));

    let found = index.query_box(&BoundingBox::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]));
    assert_eq!(found.len(), 8);

    let neighbors = index.query_neighbors(&[2.1, 2.1, 2.1], 1);
    assert_eq!(neighbors, vec![[2.0, 2.0, 2.0]]);
}
