//! Hittable trait, HitRecord and the flat scene list.

use std::sync::Arc;

use helio_math::{Aabb, Interval, Point3, Ray, Vec3};

use crate::material::Material;

/// Record of a ray-object intersection.
///
/// Lives only for the duration of one intersection/shading step; the
/// material is borrowed from the object that produced the hit.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point3,
    /// Unit surface normal, always opposing the incoming ray
    pub normal: Vec3,
    /// Ray parameter at the intersection
    pub t: f32,
    /// Surface texture coordinates in [0,1]^2
    pub u: f32,
    pub v: f32,
    /// Whether the un-flipped outward normal already opposed the ray
    pub front_face: bool,
    /// Material of the surface that was hit
    pub material: &'a dyn Material,
}

impl<'a> HitRecord<'a> {
    /// Build a record from the geometric outward normal, flipping it to
    /// oppose the ray and remembering which side was struck.
    pub fn new(
        ray: &Ray,
        p: Point3,
        outward_normal: Vec3,
        t: f32,
        u: f32,
        v: f32,
        material: &'a dyn Material,
    ) -> Self {
        let front_face = ray.direction.dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            p,
            normal,
            t,
            u,
            v,
            front_face,
            material,
        }
    }
}

/// Anything a ray can intersect.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `ray` strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Axis-aligned box bounding the object over the whole shutter interval.
    fn bounding_box(&self) -> Aabb;
}

/// A flat list of scene objects.
///
/// Objects are shared behind `Arc` so an acceleration structure built over
/// the list can alias them without copying.
#[derive(Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest_so_far = ray_t.max;
        let mut hit = None;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, closest_so_far)) {
                closest_so_far = rec.t;
                hit = Some(rec);
            }
        }

        hit
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::sphere::Sphere;
    use helio_math::Vec3;

    #[test]
    fn test_list_returns_closest_hit() {
        let mut list = HittableList::new();
        list.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            1.0,
            Lambertian::from_color(Vec3::splat(0.5)),
        )));
        list.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -2.0),
            0.5,
            Lambertian::from_color(Vec3::splat(0.5)),
        )));

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = list
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("ray should hit");

        // Near sphere shadows the far one
        assert!((rec.t - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_front_face_law() {
        let sphere = Sphere::new(
            Vec3::ZERO,
            1.0,
            Lambertian::from_color(Vec3::splat(0.5)),
        );

        // From outside: front face, normal opposes the ray
        let outside = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = sphere
            .hit(&outside, Interval::new(0.001, f32::INFINITY))
            .unwrap();
        assert!(rec.front_face);
        assert!(rec.normal.dot(outside.direction) < 0.0);

        // From inside: back face, normal still opposes the ray
        let inside = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = sphere
            .hit(&inside, Interval::new(0.001, f32::INFINITY))
            .unwrap();
        assert!(!rec.front_face);
        assert!(rec.normal.dot(inside.direction) < 0.0);
    }

    #[test]
    fn test_empty_list_misses() {
        let list = HittableList::new();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Z);
        assert!(list.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }
}
