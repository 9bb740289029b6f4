use crate::distance::EPSILON;

/// Axis-aligned minimum bounding box of a set of points or child volumes.
#[derive(Clone, Copy, Debug)]
pub struct BoundingBox<const D: usize> {
    pub min: [f64; D],
    pub max: [f64; D],
}

impl<const D: usize> BoundingBox<D> {
    #[must_use]
    pub fn new(min: [f64; D], max: [f64; D]) -> BoundingBox<D> {
        BoundingBox { min, max }
    }

    /// A degenerate box covering a single point.
    #[must_use]
    pub fn point(point: [f64; D]) -> BoundingBox<D> {
        BoundingBox {
            min: point,
            max: point,
        }
    }

    pub fn expand_to_include(&mut self, point: &[f64; D]) {
        for i in 0..D {
            self.min[i] = self.min[i].min(point[i]);
            self.max[i] = self.max[i].max(point[i]);
        }
    }

    pub fn expand_to_include_box(&mut self, other: &BoundingBox<D>) {
        for i in 0..D {
            self.min[i] = self.min[i].min(other.min[i]);
            self.max[i] = self.max[i].max(other.max[i]);
        }
    }

    #[must_use]
    pub fn contains(&self, point: &[f64; D]) -> bool {
        for i in 0..D {
            if point[i] < self.min[i] - EPSILON || point[i] > self.max[i] + EPSILON {
                return false;
            }
        }
        true
    }

    /// Boundary-inclusive overlap test.
    #[must_use]
    pub fn intersects(&self, other: &BoundingBox<D>) -> bool {
        for i in 0..D {
            if self.max[i] < other.min[i] - EPSILON || self.min[i] > other.max[i] + EPSILON {
                return false;
            }
        }
        true
    }

    /// Distance from `point` to the nearest face of the box, zero inside.
    #[must_use]
    pub fn min_distance(&self, point: &[f64; D]) -> f64 {
        let mut sum = 0.0;
        for i in 0..D {
            if point[i] < self.min[i] {
                sum += (self.min[i] - point[i]).powi(2);
            } else if point[i] > self.max[i] {
                sum += (point[i] - self.max[i]).powi(2);
            }
        }
        sum.sqrt()
    }

    /// The farthest possible distance from `point` to any point inside the box.
    #[must_use]
    pub fn max_distance(&self, point: &[f64; D]) -> f64 {
        let mut sum = 0.0;
        for i in 0..D {
            let to_min = (point[i] - self.min[i]).abs();
            let to_max = (point[i] - self.max[i]).abs();
            sum += to_min.max(to_max).powi(2);
        }
        sum.sqrt()
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        let mut volume = 1.0;
        for i in 0..D {
            volume *= self.max[i] - self.min[i];
        }
        volume
    }

    /// Hypothetical volume after including `point`, minus the current volume.
    #[must_use]
    pub fn volume_increase(&self, point: &[f64; D]) -> f64 {
        let mut expanded = *self;
        expanded.expand_to_include(point);
        expanded.volume() - self.volume()
    }
}
