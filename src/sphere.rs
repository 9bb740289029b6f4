use crate::distance::{euclidean, EPSILON};

/// Bounding sphere of a set of points or child volumes.
///
/// Expansion is incremental: the sphere grows just enough to reach the new
/// element, keeping the old boundary internally tangent to the new one. The
/// result encloses everything ever included but is not the globally minimal
/// enclosing sphere.
#[derive(Clone, Copy, Debug)]
pub struct Sphere<const D: usize> {
    pub center: [f64; D],
    pub radius: f64,
}

impl<const D: usize> Sphere<D> {
    #[must_use]
    pub fn new(center: [f64; D], radius: f64) -> Sphere<D> {
        Sphere { center, radius }
    }

    /// A zero-radius sphere covering a single point.
    #[must_use]
    pub fn point(point: [f64; D]) -> Sphere<D> {
        Sphere {
            center: point,
            radius: 0.0,
        }
    }

    #[must_use]
    pub fn contains(&self, point: &[f64; D]) -> bool {
        euclidean(&self.center, point) <= self.radius + EPSILON
    }

    /// Distance from `point` to the sphere surface, zero inside.
    #[must_use]
    pub fn min_distance(&self, point: &[f64; D]) -> f64 {
        (euclidean(&self.center, point) - self.radius).max(0.0)
    }

    pub fn expand_to_include(&mut self, point: &[f64; D]) {
        let dist = euclidean(&self.center, point);
        if self.radius <= 0.0 {
            if dist <= EPSILON {
                return;
            }
            // Two-point span: midpoint center, half-distance radius
            self.radius = dist / 2.0;
            for i in 0..D {
                self.center[i] += (point[i] - self.center[i]) * 0.5;
            }
            return;
        }
        if dist <= self.radius + EPSILON {
            return;
        }

        // Grow to exactly reach the point; the old boundary stays tangent
        let new_radius = (self.radius + dist) / 2.0;
        let t = (new_radius - self.radius) / dist;
        for i in 0..D {
            self.center[i] += (point[i] - self.center[i]) * t;
        }
        self.radius = new_radius;
    }

    pub fn expand_to_include_sphere(&mut self, other: &Sphere<D>) {
        let dist = euclidean(&self.center, &other.center);
        if dist + other.radius <= self.radius + EPSILON {
            // The other sphere is already fully contained
            return;
        }
        if dist + self.radius <= other.radius + EPSILON {
            *self = *other;
            return;
        }

        // Minimal sphere containing both, centered on the line joining the
        // two centers. Neither sphere contains the other, so dist > EPSILON.
        let new_radius = (self.radius + other.radius + dist) / 2.0;
        let t = (new_radius - self.radius) / dist;
        for i in 0..D {
            self.center[i] += (other.center[i] - self.center[i]) * t;
        }
        self.radius = new_radius;
    }
}

#[cfg(test)]
mod tests {
    use super::Sphere;
    use crate::distance::euclidean;

    #[test]
    fn expand_from_point() {
        let mut sphere = Sphere::point([0.0, 0.0]);
        assert_eq!(sphere.radius, 0.0);

        // Including the same point keeps the degenerate sphere
        sphere.expand_to_include(&[0.0, 0.0]);
        assert_eq!(sphere.radius, 0.0);

        // Two-point span: midpoint center, half-distance radius
        sphere.expand_to_include(&[2.0, 0.0]);
        assert_eq!(sphere.center, [1.0, 0.0]);
        assert_eq!(sphere.radius, 1.0);
    }

    #[test]
    fn expand_is_monotonic() {
        let mut sphere = Sphere::point([0.0, 0.0]);
        let points = [[2.0, 0.0], [-1.0, 3.0], [4.0, 4.0], [0.5, 0.5]];
        let mut radius = 0.0;
        for (i, p) in points.iter().enumerate() {
            sphere.expand_to_include(p);
            assert!(sphere.radius >= radius);
            radius = sphere.radius;
            // Everything included so far stays covered
            for q in &points[..=i] {
                assert!(sphere.contains(q));
            }
        }
    }

    #[test]
    fn contained_point_is_noop() {
        let mut sphere = Sphere::new([0.0, 0.0], 5.0);
        sphere.expand_to_include(&[3.0, 0.0]);
        assert_eq!(sphere.center, [0.0, 0.0]);
        assert_eq!(sphere.radius, 5.0);
    }

    #[test]
    fn merge_contained_spheres() {
        let mut big = Sphere::new([0.0, 0.0], 10.0);
        let small = Sphere::new([1.0, 1.0], 2.0);

        // Absorbing a contained sphere changes nothing
        let mut merged = big;
        merged.expand_to_include_sphere(&small);
        assert_eq!(merged.center, [0.0, 0.0]);
        assert_eq!(merged.radius, 10.0);

        // The reverse takes the containing sphere
        let mut merged = small;
        merged.expand_to_include_sphere(&big);
        assert_eq!(merged.center, [0.0, 0.0]);
        assert_eq!(merged.radius, 10.0);

        big.expand_to_include_sphere(&small);
        assert_eq!(big.radius, 10.0);
    }

    #[test]
    fn merge_disjoint_spheres() {
        let mut sphere = Sphere::new([0.0, 0.0], 1.0);
        let other = Sphere::new([10.0, 0.0], 2.0);
        sphere.expand_to_include_sphere(&other);

        // (dist + r1 + r2) / 2 = (10 + 1 + 2) / 2
        assert_eq!(sphere.radius, 6.5);
        // Both input spheres are covered by the merge
        assert!(euclidean(&sphere.center, &[0.0, 0.0]) + 1.0 <= sphere.radius + 1e-9);
        assert!(euclidean(&sphere.center, &[10.0, 0.0]) + 2.0 <= sphere.radius + 1e-9);
    }

    #[test]
    fn merge_point_spheres() {
        // Degenerate inputs synthesize the two-point span
        let mut sphere = Sphere::point([0.0, 0.0]);
        sphere.expand_to_include_sphere(&Sphere::point([4.0, 0.0]));
        assert_eq!(sphere.center, [2.0, 0.0]);
        assert_eq!(sphere.radius, 2.0);
    }
}
