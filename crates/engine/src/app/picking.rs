use glam::Vec3;

const PARALLEL_EPSILON: f32 = 1.0e-8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Returns `None` when `direction` has no usable length.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        if !origin.is_finite() {
            return None;
        }
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    pub fn scaled_about_center(&self, scale: Vec3) -> Self {
        Self::from_center_size(self.center(), self.size() * scale)
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, b.z),
            Vec3::new(a.x, b.y, b.z),
        ]
    }

    /// Slab test. Returns the entry distance along the ray, or `0.0` when the
    /// ray starts inside the box. Hits behind the origin are misses.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let origin = ray.origin().to_array();
        let direction = ray.direction().to_array();
        let min = self.min.to_array();
        let max = self.max.to_array();

        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        for axis in 0..3 {
            if direction[axis].abs() < PARALLEL_EPSILON {
                if origin[axis] < min[axis] || origin[axis] > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = direction[axis].recip();
            let mut t0 = (min[axis] - origin[axis]) * inv;
            let mut t1 = (max[axis] - origin[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        if t_far < 0.0 {
            return None;
        }
        Some(t_near.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(center: Vec3) -> Aabb {
        Aabb::from_center_size(center, Vec3::ONE)
    }

    #[test]
    fn ray_rejects_zero_direction() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
        assert!(Ray::new(Vec3::ZERO, Vec3::NEG_Z).is_some());
    }

    #[test]
    fn hit_reports_entry_distance() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z).expect("ray");
        let hit = unit_box_at(Vec3::new(0.0, 0.0, -5.0))
            .intersect_ray(&ray)
            .expect("hit");
        assert!((hit - 4.5).abs() < 0.0001);
    }

    #[test]
    fn box_behind_origin_is_a_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z).expect("ray");
        assert_eq!(
            unit_box_at(Vec3::new(0.0, 0.0, 5.0)).intersect_ray(&ray),
            None
        );
    }

    #[test]
    fn parallel_ray_outside_slab_misses() {
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Z).expect("ray");
        assert_eq!(
            unit_box_at(Vec3::new(0.0, 0.0, -5.0)).intersect_ray(&ray),
            None
        );
    }

    #[test]
    fn origin_inside_box_hits_at_zero() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X).expect("ray");
        assert_eq!(unit_box_at(Vec3::ZERO).intersect_ray(&ray), Some(0.0));
    }

    #[test]
    fn scaled_box_keeps_center() {
        let bounds = unit_box_at(Vec3::new(1.0, 2.0, 3.0)).scaled_about_center(Vec3::splat(2.0));
        assert!((bounds.center() - Vec3::new(1.0, 2.0, 3.0)).length() < 0.0001);
        assert!((bounds.size() - Vec3::splat(2.0)).length() < 0.0001);
    }
}
