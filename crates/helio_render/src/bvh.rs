//! Bounding Volume Hierarchy acceleration structure.
//!
//! A binary tree over the scene objects; each internal node caches the box
//! bounding both subtrees, leaves alias the scene objects themselves.

use std::cmp::Ordering;
use std::sync::Arc;

use helio_math::{Aabb, Interval, Ray};

use crate::hittable::{HitRecord, Hittable};

/// BVH node. Built once per render from a snapshot of the scene list and
/// read-only afterwards.
pub enum BvhNode {
    /// Single scene object, shared with the scene list.
    Leaf {
        object: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Two children and the box bounding both.
    Internal {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Empty scene.
    Empty,
}

impl BvhNode {
    /// Build a BVH over the given objects.
    pub fn new(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(&mut objects)
    }

    /// Recursive construction over a contiguous range.
    ///
    /// The range's tight union box is computed first; the range is then
    /// stably sorted along that box's longest axis by descending minimum
    /// extent and split at the midpoint.
    fn build(objects: &mut [Arc<dyn Hittable>]) -> Self {
        let bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        match objects.len() {
            1 => BvhNode::Leaf {
                object: objects[0].clone(),
                bbox,
            },
            2 => BvhNode::Internal {
                left: Box::new(BvhNode::Leaf {
                    object: objects[0].clone(),
                    bbox: objects[0].bounding_box(),
                }),
                right: Box::new(BvhNode::Leaf {
                    object: objects[1].clone(),
                    bbox: objects[1].bounding_box(),
                }),
                bbox,
            },
            n => {
                let axis = bbox.longest_axis();

                // Stable: objects with equal keys keep their relative order
                objects.sort_by(|a, b| {
                    let ka = -a.bounding_box().axis_interval(axis).min;
                    let kb = -b.bounding_box().axis_interval(axis).min;
                    ka.partial_cmp(&kb).unwrap_or(Ordering::Equal)
                });

                let mid = n / 2;
                let (left_half, right_half) = objects.split_at_mut(mid);

                BvhNode::Internal {
                    left: Box::new(Self::build(left_half)),
                    right: Box::new(Self::build(right_half)),
                    bbox,
                }
            }
        }
    }

    /// Tree depth: leaves count as zero. A tree of depth d holds at most
    /// 2^d leaves; used only for the render report.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } | BvhNode::Empty => 0,
            BvhNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { object, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }
                object.hit(ray, ray_t)
            }

            BvhNode::Internal { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // A hit on the left caps the range probed on the right, so
                // a farther right-hand intersection is never materialized.
                let hit_right = match &hit_left {
                    Some(rec) => right.hit(ray, Interval::new(ray_t.min, rec.t)),
                    None => right.hit(ray, ray_t),
                };

                match (hit_left, hit_right) {
                    (Some(l), Some(r)) => Some(if l.t < r.t { l } else { r }),
                    (l, r) => l.or(r),
                }
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Internal { bbox, .. } => *bbox,
        }
    }
}
