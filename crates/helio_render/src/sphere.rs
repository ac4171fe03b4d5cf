//! Sphere primitive, stationary or linearly moving.

use std::f32::consts::PI;

use helio_math::{Aabb, Interval, Point3, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;

/// A sphere. A moving sphere travels from its construction center toward a
/// second center over the shutter interval [0,1).
pub struct Sphere<M: Material> {
    center: Point3,
    center_vec: Vec3,
    is_moving: bool,
    radius: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Sphere<M> {
    /// Stationary sphere. A negative radius is clamped to zero.
    pub fn new(center: Point3, radius: f32, material: M) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);

        Self {
            center,
            center_vec: Vec3::ZERO,
            is_moving: false,
            radius,
            material,
            bbox: Aabb::from_points(center - rvec, center + rvec),
        }
    }

    /// Sphere moving linearly from `center0` (t=0) to `center1` (t=1).
    pub fn new_moving(center0: Point3, center1: Point3, radius: f32, material: M) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);

        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Self {
            center: center0,
            center_vec: center1 - center0,
            is_moving: true,
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    fn center_at(&self, time: f32) -> Point3 {
        self.center + time * self.center_vec
    }

    /// UV coordinates for a point on the unit sphere centered at the origin.
    ///
    /// u: angle around the Y axis from X=-1, v: angle from Y=-1 to Y=+1.
    fn get_sphere_uv(p: Point3) -> (f32, f32) {
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl<M: Material> Hittable for Sphere<M> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let center = if self.is_moving {
            self.center_at(ray.time)
        } else {
            self.center
        };

        let oc = center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root inside the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        let outward_normal = (p - center) / self.radius;
        let (u, v) = Self::get_sphere_uv(outward_normal);

        Some(HitRecord::new(
            ray,
            p,
            outward_normal,
            root,
            u,
            v,
            &self.material,
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
