//! Axis-aligned trigger volumes

use super::{Point3D, Vector3D};

/// Axis-aligned box used for trigger overlap tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3D,
    pub max: Point3D,
}

impl Bounds {
    /// Box centered on `center` extending `half_extents` along each axis
    pub fn centered(center: Point3D, half_extents: Vector3D) -> Self {
        Self {
            min: Point3D::new(
                center.x - half_extents.x,
                center.y - half_extents.y,
                center.z - half_extents.z,
            ),
            max: Point3D::new(
                center.x + half_extents.x,
                center.y + half_extents.y,
                center.z + half_extents.z,
            ),
        }
    }

    /// Grow every face outward by `padding / 2`, so the total size grows by `padding`
    pub fn padded(&self, padding: f32) -> Self {
        let half = padding / 2.0;
        Self {
            min: Point3D::new(self.min.x - half, self.min.y - half, self.min.z - half),
            max: Point3D::new(self.max.x + half, self.max.y + half, self.max.z + half),
        }
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_boxes_intersect() {
        let a = Bounds::centered(Point3D::new(1.0, 1.0, 1.0), Vector3D::splat(0.5));
        let b = Bounds::centered(Point3D::new(1.5, 1.0, 1.0), Vector3D::splat(0.5));
        let c = Bounds::centered(Point3D::new(3.0, 1.0, 1.0), Vector3D::splat(0.5));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_padding_creates_overlap() {
        let a = Bounds::centered(Point3D::ORIGIN, Vector3D::splat(0.1));
        let b = Bounds::centered(Point3D::new(0.35, 0.0, 0.0), Vector3D::splat(0.1));
        assert!(!a.intersects(&b));
        assert!(a.padded(0.2).intersects(&b.padded(0.2)));
    }
}
