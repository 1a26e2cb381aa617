use crate::prelude::*;

/// Represents a ray in 3D space
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>, // Should be normalized
}

impl Ray {
    /// Create a new ray with a normalized direction
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

/// Intersection of a ray with a collider surface
struct Intersection {
    distance: f32,
    normal: Vector3<f32>,
}

#[derive(Clone, Copy, Debug)]
pub enum Shape {
    Sphere {
        center: Point3<f32>,
        radius: f32,
    },
    /// Infinite plane through `point`
    Plane {
        point: Point3<f32>,
        normal: Vector3<f32>,
    },
    Aabb {
        min: Point3<f32>,
        max: Point3<f32>,
    },
}

#[derive(Clone, Copy, Debug)]
pub struct Collider {
    pub actor: ActorHandle,
    pub shape: Shape,
    /// Whether line traces on the visibility channel stop at this collider
    pub blocks_visibility: bool,
}

/// Static world geometry answering visibility line traces
#[derive(Resource, Default)]
pub struct StaticScene {
    colliders: Vec<Collider>,
    next_actor: u32,
}

impl StaticScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a visibility-blocking collider and return its actor handle
    pub fn add(&mut self, shape: Shape) -> ActorHandle {
        self.add_collider(shape, true)
    }

    pub fn add_collider(&mut self, shape: Shape, blocks_visibility: bool) -> ActorHandle {
        let actor = ActorHandle(self.next_actor);
        self.next_actor += 1;
        self.colliders.push(Collider {
            actor,
            shape,
            blocks_visibility,
        });
        actor
    }
}

impl RaycastService for StaticScene {
    fn raycast(&self, from: Point3<f32>, to: Point3<f32>) -> Option<HitResult> {
        let length = (to - from).norm();
        if length <= f32::EPSILON {
            return None;
        }

        let ray = Ray::new(from, to - from);

        self.colliders
            .iter()
            .filter(|collider| collider.blocks_visibility)
            .filter_map(|collider| {
                intersect(&ray, &collider.shape)
                    .filter(|hit| hit.distance <= length)
                    .map(|hit| (collider.actor, hit))
            })
            .min_by(|a, b| a.1.distance.total_cmp(&b.1.distance))
            .map(|(actor, hit)| HitResult {
                point: ray.point_at(hit.distance),
                normal: hit.normal,
                distance: hit.distance,
                actor,
            })
    }
}

fn intersect(ray: &Ray, shape: &Shape) -> Option<Intersection> {
    match *shape {
        Shape::Sphere { center, radius } => ray_sphere_intersection(ray, center, radius),
        Shape::Plane { point, normal } => ray_plane_intersection(ray, point, normal),
        Shape::Aabb { min, max } => ray_aabb_intersection(ray, min, max),
    }
}

fn ray_sphere_intersection(
    ray: &Ray,
    sphere_center: Point3<f32>,
    sphere_radius: f32,
) -> Option<Intersection> {
    // Vector from ray origin to sphere center
    let oc = ray.origin - sphere_center;

    // Quadratic equation coefficients: at^2 + bt + c = 0
    let a = ray.direction.dot(&ray.direction);
    let b = 2.0 * oc.dot(&ray.direction);
    let c = oc.dot(&oc) - sphere_radius * sphere_radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_discriminant = discriminant.sqrt();
    let t1 = (-b - sqrt_discriminant) / (2.0 * a);
    let t2 = (-b + sqrt_discriminant) / (2.0 * a);

    let t = if t1 >= 0.0 {
        t1
    } else if t2 >= 0.0 {
        t2 // Ray origin is inside sphere, use far intersection
    } else {
        return None;
    };

    let normal = (ray.point_at(t) - sphere_center).normalize();
    Some(Intersection {
        distance: t,
        normal,
    })
}

fn ray_plane_intersection(
    ray: &Ray,
    point: Point3<f32>,
    normal: Vector3<f32>,
) -> Option<Intersection> {
    let normal = normal.normalize();
    let denom = normal.dot(&ray.direction);
    if denom.abs() <= f32::EPSILON {
        return None; // Parallel to the plane
    }

    let t = (point - ray.origin).dot(&normal) / denom;
    if t < 0.0 {
        return None;
    }

    // Report the face the ray approached from
    let normal = if denom < 0.0 { normal } else { -normal };
    Some(Intersection {
        distance: t,
        normal,
    })
}

/// Slab test; rays starting inside the box report the exit face
fn ray_aabb_intersection(ray: &Ray, min: Point3<f32>, max: Point3<f32>) -> Option<Intersection> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut near_axis = 0;
    let mut far_axis = 0;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];

        if direction.abs() <= f32::EPSILON {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / direction;
        let mut t0 = (min[axis] - origin) * inv;
        let mut t1 = (max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if t0 > t_near {
            t_near = t0;
            near_axis = axis;
        }
        if t1 < t_far {
            t_far = t1;
            far_axis = axis;
        }
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }

    let (t, axis) = if t_near >= 0.0 {
        (t_near, near_axis)
    } else {
        (t_far, far_axis)
    };

    let mut normal = Vector3::zeros();
    normal[axis] = -ray.direction[axis].signum();
    Some(Intersection {
        distance: t,
        normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_sphere_hit() {
        let mut scene = StaticScene::new();
        let actor = scene.add(Shape::Sphere {
            center: Point3::origin(),
            radius: 1.0,
        });

        let hit = scene
            .raycast(Point3::new(0.0, 0.0, -5.0), Point3::new(0.0, 0.0, 5.0))
            .expect("segment crosses the sphere");

        assert_eq!(hit.actor, actor);
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-4);
        assert_relative_eq!(hit.point, Point3::new(0.0, 0.0, -1.0), epsilon = 1e-4);
        assert_relative_eq!(hit.normal, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-4);
    }

    #[test]
    fn test_ray_sphere_miss() {
        let mut scene = StaticScene::new();
        scene.add(Shape::Sphere {
            center: Point3::origin(),
            radius: 1.0,
        });

        let hit = scene.raycast(Point3::new(0.0, 5.0, -5.0), Point3::new(0.0, 5.0, 5.0));
        assert!(hit.is_none());
    }

    #[test]
    fn test_segment_stops_short_of_surface() {
        let mut scene = StaticScene::new();
        scene.add(Shape::Plane {
            point: Point3::new(100.0, 0.0, 0.0),
            normal: Vector3::x(),
        });

        assert!(
            scene
                .raycast(Point3::origin(), Point3::new(99.0, 0.0, 0.0))
                .is_none()
        );
        let hit = scene
            .raycast(Point3::origin(), Point3::new(101.0, 0.0, 0.0))
            .expect("segment reaches the plane");
        assert_relative_eq!(hit.point, Point3::new(100.0, 0.0, 0.0), epsilon = 1e-3);
        assert_relative_eq!(hit.normal, -Vector3::x(), epsilon = 1e-5);
    }

    #[test]
    fn test_nearest_collider_wins() {
        let mut scene = StaticScene::new();
        scene.add(Shape::Aabb {
            min: Point3::new(50.0, -10.0, -10.0),
            max: Point3::new(60.0, 10.0, 10.0),
        });
        let near = scene.add(Shape::Aabb {
            min: Point3::new(20.0, -10.0, -10.0),
            max: Point3::new(30.0, 10.0, 10.0),
        });

        let hit = scene
            .raycast(Point3::origin(), Point3::new(100.0, 0.0, 0.0))
            .expect("both boxes lie on the segment");
        assert_eq!(hit.actor, near);
        assert_relative_eq!(hit.distance, 20.0, epsilon = 1e-4);
        assert_relative_eq!(hit.normal, -Vector3::x(), epsilon = 1e-5);
    }

    #[test]
    fn test_non_blocking_collider_ignored() {
        let mut scene = StaticScene::new();
        scene.add_collider(
            Shape::Sphere {
                center: Point3::new(10.0, 0.0, 0.0),
                radius: 2.0,
            },
            false,
        );

        assert!(
            scene
                .raycast(Point3::origin(), Point3::new(20.0, 0.0, 0.0))
                .is_none()
        );
    }
}
