//! Ray casting against oriented boxes
//!
//! Every hit object in the arena is a box with a local axis-aligned extent
//! and a world transform (translation plus rotation). A ray is moved into the
//! box's local frame, tested with the slab method, and the hit is moved back
//! to world space.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A finite ray: origin, unit direction and maximum travel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
    pub far: f32,
}

impl Ray {
    /// Create a ray; `dir` is normalized here (zero stays zero)
    pub fn new(origin: Vec3, dir: Vec3, far: f32) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
            far,
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Ray contact on a box surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space contact point
    pub point: Vec3,
    /// World-space outward face normal
    pub normal: Vec3,
    /// Distance along the ray
    pub distance: f32,
}

/// An oriented box (the collision shape of paddles and walls)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxMesh {
    /// Local half extents
    pub half_extents: Vec3,
    /// World position of the box centre
    pub position: Vec3,
    pub rotation: Quat,
}

impl BoxMesh {
    /// Box of full size `size` at `position`, unrotated
    pub fn new(size: Vec3, position: Vec3) -> Self {
        Self {
            half_extents: size * 0.5,
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Rotate about the world Y axis
    pub fn with_yaw(mut self, radians: f32) -> Self {
        self.rotation = Quat::from_rotation_y(radians);
        self
    }

    /// Local bounding box, `(min, max)`
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        (-self.half_extents, self.half_extents)
    }

    /// Intersect a ray with the box's outer faces
    ///
    /// Only front faces count: a ray that starts inside the box reports no
    /// hit. A contact exactly at `ray.far` counts.
    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        let inv = self.rotation.inverse();
        let origin = inv * (ray.origin - self.position);
        let dir = inv * ray.dir;

        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        let mut near_axis = 0usize;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let h = self.half_extents[axis];

            if d.abs() < f32::EPSILON {
                // Parallel to this slab: must already be between its planes
                if o < -h || o > h {
                    return None;
                }
                continue;
            }

            let mut t0 = (-h - o) / d;
            let mut t1 = (h - o) / d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > t_near {
                t_near = t0;
                near_axis = axis;
            }
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        // Origin inside the box, or the box is behind the ray
        if t_near < 0.0 || !t_near.is_finite() {
            return None;
        }
        if t_near > ray.far {
            return None;
        }

        let mut local_normal = Vec3::ZERO;
        local_normal[near_axis] = -dir[near_axis].signum();

        Some(RayHit {
            point: ray.at(t_near),
            normal: (self.rotation * local_normal).normalize(),
            distance: t_near,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn unit_box() -> BoxMesh {
        BoxMesh::new(Vec3::new(2.0, 1.0, 2.0), Vec3::ZERO)
    }

    #[test]
    fn test_front_face_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, 10.0);
        let hit = unit_box().raycast(&ray).expect("should hit");
        assert_eq!(hit.distance, 4.0);
        assert_eq!(hit.point, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn test_hit_exactly_at_far_counts() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, 4.0);
        assert!(unit_box().raycast(&ray).is_some());

        let short = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, 3.999);
        assert!(unit_box().raycast(&short).is_none());
    }

    #[test]
    fn test_miss_outside_bounds() {
        // Infinite plane z=1 would be hit; the bounded face is not
        let ray = Ray::new(Vec3::new(1.5, 0.0, 5.0), Vec3::NEG_Z, 10.0);
        assert!(unit_box().raycast(&ray).is_none());
    }

    #[test]
    fn test_origin_inside_box_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.5), Vec3::NEG_Z, 10.0);
        assert!(unit_box().raycast(&ray).is_none());
    }

    #[test]
    fn test_box_behind_ray_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, 10.0);
        assert!(unit_box().raycast(&ray).is_none());
    }

    #[test]
    fn test_rotated_wall_normal_faces_ray() {
        // Long thin wall rotated to run along Z, standing at x = -5
        let wall = BoxMesh::new(Vec3::new(20.0, 1.0, 0.1), Vec3::new(-5.0, 0.0, 0.0))
            .with_yaw(-FRAC_PI_2);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_X, 10.0);
        let hit = wall.raycast(&ray).expect("should hit");
        assert!((hit.normal - Vec3::X).length() < 1e-5);
        assert!((hit.point.x - (-4.95)).abs() < 1e-4);
        assert!((hit.point.z - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_oblique_edge_hit_reports_side_normal() {
        let ray = Ray::new(Vec3::new(4.0, 0.0, 0.5), Vec3::NEG_X, 10.0);
        let hit = unit_box().raycast(&ray).expect("should hit");
        assert_eq!(hit.normal, Vec3::X);
    }
}
