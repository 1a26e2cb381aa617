use crate::prelude::*;

use std::iter::FusedIterator;

/// Projectile launched from a point with an initial velocity, Z up
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ballistic {
    pub origin: Point3<f32>,
    pub velocity: Vector3<f32>,
    /// Downward acceleration, positive for normal gravity
    pub gravity: f32,
}

impl Ballistic {
    pub fn new(origin: Point3<f32>, velocity: Vector3<f32>, gravity: f32) -> Self {
        Self {
            origin,
            velocity,
            gravity,
        }
    }

    /// Offset from the origin after `t` seconds of flight
    pub fn local_position(&self, t: f32) -> Vector3<f32> {
        let horizontal = self.velocity.xy() * t;
        let vertical = self.velocity.z * t - 0.5 * self.gravity * t * t;
        Vector3::new(horizontal.x, horizontal.y, vertical)
    }

    pub fn position(&self, t: f32) -> Point3<f32> {
        self.origin + self.local_position(t)
    }
}

/// One straight piece of the sampled flight path
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectorySegment {
    /// Flight time at `start`
    pub time: f32,
    pub start: Point3<f32>,
    /// Either the analytic end of the step or the point where it hit something
    pub end: Point3<f32>,
    pub hit: Option<HitResult>,
}

/// Lazily traced flight path.
///
/// Each call to `next` performs one raycast, and the iterator ends after
/// the first segment that hits something or after `max_steps` segments.
pub struct TrajectoryIter<'a, R: ?Sized> {
    ballistic: Ballistic,
    time_step: f32,
    step: usize,
    max_steps: usize,
    raycast: &'a R,
    finished: bool,
}

impl<'a, R: RaycastService + ?Sized> TrajectoryIter<'a, R> {
    pub fn new(ballistic: Ballistic, time_step: f32, max_steps: usize, raycast: &'a R) -> Self {
        Self {
            ballistic,
            time_step,
            step: 0,
            max_steps,
            raycast,
            finished: false,
        }
    }
}

impl<R: RaycastService + ?Sized> Iterator for TrajectoryIter<'_, R> {
    type Item = TrajectorySegment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.step >= self.max_steps {
            return None;
        }

        // Times come from the step index so long paths do not drift
        let t0 = self.step as f32 * self.time_step;
        let t1 = (self.step + 1) as f32 * self.time_step;
        self.step += 1;

        let start = self.ballistic.position(t0);
        let mut end = self.ballistic.position(t1);

        let hit = self.raycast.raycast(start, end);
        if let Some(hit) = &hit {
            end = hit.point;
            self.finished = true;
            log::debug!(
                "Trajectory blocked by actor {} at ({:.1}, {:.1}, {:.1}) after {:.2}s",
                hit.actor.0,
                hit.point.x,
                hit.point.y,
                hit.point.z,
                t0
            );
        }

        Some(TrajectorySegment {
            time: t0,
            start,
            end,
            hit,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        let remaining = self.max_steps.saturating_sub(self.step);
        (remaining.min(1), Some(remaining))
    }
}

impl<R: RaycastService + ?Sized> FusedIterator for TrajectoryIter<'_, R> {}

/// Samples projectile arcs against the world for aim previews
#[derive(Clone, Copy, Debug, Default)]
pub struct TrajectorySampler {
    config: TrajectoryConfig,
}

impl TrajectorySampler {
    pub fn new(config: TrajectoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrajectoryConfig {
        &self.config
    }

    /// Iterate the flight path segment by segment
    pub fn iter<'a, R: RaycastService + ?Sized>(
        &self,
        origin: Point3<f32>,
        velocity: Vector3<f32>,
        gravity: f32,
        max_steps: usize,
        raycast: &'a R,
    ) -> TrajectoryIter<'a, R> {
        TrajectoryIter::new(
            Ballistic::new(origin, velocity, gravity),
            self.config.time_step,
            max_steps,
            raycast,
        )
    }

    /// The whole flight path up to the first hit
    pub fn sample_trajectory<R: RaycastService + ?Sized>(
        &self,
        origin: Point3<f32>,
        velocity: Vector3<f32>,
        gravity: f32,
        max_steps: usize,
        raycast: &R,
    ) -> Vec<TrajectorySegment> {
        self.iter(origin, velocity, gravity, max_steps, raycast)
            .collect()
    }

    /// Flight path with the configured step budget
    pub fn sample<R: RaycastService + ?Sized>(
        &self,
        origin: Point3<f32>,
        velocity: Vector3<f32>,
        gravity: f32,
        raycast: &R,
    ) -> Vec<TrajectorySegment> {
        self.sample_trajectory(origin, velocity, gravity, self.config.max_steps, raycast)
    }

    /// Draw the path in red and mark the impact with a blue sphere
    pub fn draw(&self, segments: &[TrajectorySegment], debug: &mut impl DebugDraw) {
        for segment in segments {
            debug.draw_line(
                segment.start,
                segment.end,
                Color::RED,
                self.config.line_thickness,
            );
            if segment.hit.is_some() {
                debug.draw_sphere(
                    segment.end,
                    self.config.hit_marker_radius,
                    self.config.hit_marker_segments,
                    Color::BLUE,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::{Cell, RefCell};

    /// Open sky
    struct NoHits;

    impl RaycastService for NoHits {
        fn raycast(&self, _from: Point3<f32>, _to: Point3<f32>) -> Option<HitResult> {
            None
        }
    }

    /// Reports a hit at the midpoint of the n-th queried segment
    struct HitOnQuery {
        hit_on: usize,
        queries: Cell<usize>,
        segments: RefCell<Vec<(Point3<f32>, Point3<f32>)>>,
    }

    impl HitOnQuery {
        fn new(hit_on: usize) -> Self {
            Self {
                hit_on,
                queries: Cell::new(0),
                segments: RefCell::new(Vec::new()),
            }
        }
    }

    impl RaycastService for HitOnQuery {
        fn raycast(&self, from: Point3<f32>, to: Point3<f32>) -> Option<HitResult> {
            self.queries.set(self.queries.get() + 1);
            self.segments.borrow_mut().push((from, to));
            (self.queries.get() == self.hit_on).then(|| HitResult {
                point: nalgebra::center(&from, &to),
                normal: Vector3::z(),
                distance: (to - from).norm() / 2.0,
                actor: ActorHandle(42),
            })
        }
    }

    #[test]
    fn test_vertical_shot_follows_parabola() {
        let sampler = TrajectorySampler::default();
        let segments = sampler.sample_trajectory(
            Point3::origin(),
            Vector3::new(0.0, 0.0, 100.0),
            980.0,
            10,
            &NoHits,
        );

        assert_eq!(segments.len(), 10);
        for (i, segment) in segments.iter().enumerate() {
            let t = i as f32 * 0.05;
            assert_relative_eq!(segment.time, t, epsilon = 1e-6);
            assert_relative_eq!(segment.start.z, 100.0 * t - 490.0 * t * t, epsilon = 1e-3);
            let t1 = t + 0.05;
            assert_relative_eq!(segment.end.z, 100.0 * t1 - 490.0 * t1 * t1, epsilon = 1e-3);
            assert_eq!(segment.start.xy(), Point2::origin());
            assert!(segment.hit.is_none());
        }

        for pair in segments.windows(2) {
            assert_relative_eq!(pair[1].time - pair[0].time, 0.05, epsilon = 1e-5);
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_custom_time_step_spaces_segments() {
        let sampler = TrajectorySampler::new(TrajectoryConfig {
            time_step: 0.125,
            max_steps: 8,
            ..TrajectoryConfig::default()
        });
        let segments = sampler.sample(
            Point3::origin(),
            Vector3::new(400.0, 0.0, 0.0),
            0.0,
            &NoHits,
        );

        assert_eq!(segments.len(), 8);
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.time, i as f32 * 0.125);
            assert_relative_eq!(segment.end.x - segment.start.x, 50.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_horizontal_motion_is_uniform() {
        let ballistic = Ballistic::new(
            Point3::new(10.0, 20.0, 30.0),
            Vector3::new(300.0, -200.0, 0.0),
            980.0,
        );

        let position = ballistic.position(0.5);
        assert_relative_eq!(position, Point3::new(160.0, -80.0, 30.0 - 122.5), epsilon = 1e-3);
    }

    #[test]
    fn test_stops_at_first_hit() {
        let sampler = TrajectorySampler::default();
        let raycast = HitOnQuery::new(3);

        let segments = sampler.sample_trajectory(
            Point3::new(0.0, 0.0, 100.0),
            Vector3::new(500.0, 0.0, 200.0),
            980.0,
            980,
            &raycast,
        );

        assert_eq!(segments.len(), 3);
        assert_eq!(raycast.queries.get(), 3);

        let last = segments[2];
        let (from, to) = raycast.segments.borrow()[2];
        assert_eq!(last.end, nalgebra::center(&from, &to));
        assert_eq!(last.hit.map(|hit| hit.actor), Some(ActorHandle(42)));
        assert!(segments[..2].iter().all(|segment| segment.hit.is_none()));
    }

    #[test]
    fn test_iterator_queries_lazily() {
        let sampler = TrajectorySampler::default();
        let raycast = HitOnQuery::new(usize::MAX);

        let mut path = sampler.iter(
            Point3::origin(),
            Vector3::new(100.0, 0.0, 0.0),
            980.0,
            980,
            &raycast,
        );
        assert_eq!(raycast.queries.get(), 0);

        path.next();
        path.next();
        assert_eq!(raycast.queries.get(), 2);
    }

    #[test]
    fn test_iterator_fused_after_hit() {
        let sampler = TrajectorySampler::default();
        let raycast = HitOnQuery::new(1);

        let mut path = sampler.iter(
            Point3::origin(),
            Vector3::new(100.0, 0.0, 0.0),
            980.0,
            980,
            &raycast,
        );
        assert!(path.next().is_some());
        assert!(path.next().is_none());
        assert!(path.next().is_none());
        assert_eq!(raycast.queries.get(), 1);
    }

    #[test]
    fn test_zero_steps_is_empty() {
        let sampler = TrajectorySampler::default();
        let raycast = HitOnQuery::new(1);

        let segments = sampler.sample_trajectory(
            Point3::origin(),
            Vector3::new(100.0, 0.0, 0.0),
            980.0,
            0,
            &raycast,
        );
        assert!(segments.is_empty());
        assert_eq!(raycast.queries.get(), 0);
    }

    #[test]
    fn test_lands_on_ground_plane() {
        let mut scene = StaticScene::new();
        let ground = scene.add(Shape::Plane {
            point: Point3::origin(),
            normal: Vector3::z(),
        });
        let sampler = TrajectorySampler::default();

        let segments = sampler.sample(
            Point3::new(0.0, 0.0, 100.0),
            Vector3::new(1000.0, 0.0, 0.0),
            980.0,
            &scene,
        );

        let last = segments.last().expect("path has segments");
        assert_eq!(last.hit.map(|hit| hit.actor), Some(ground));
        assert_relative_eq!(last.end.z, 0.0, epsilon = 1e-2);
        // Falls 100 units in sqrt(200/980) seconds
        assert_relative_eq!(last.end.x, 1000.0 * (200.0f32 / 980.0).sqrt(), epsilon = 0.5);
    }

    #[test]
    fn test_draw_marks_impact() {
        let sampler = TrajectorySampler::default();
        let raycast = HitOnQuery::new(4);
        let segments = sampler.sample(
            Point3::origin(),
            Vector3::new(100.0, 0.0, 100.0),
            980.0,
            &raycast,
        );

        let mut debug = DebugLines::new();
        sampler.draw(&segments, &mut debug);

        assert_eq!(debug.lines.len(), 4);
        assert!(debug.lines.iter().all(|line| line.color == Color::RED));
        assert_eq!(debug.lines[0].thickness, 3.0);
        assert_eq!(debug.spheres.len(), 1);
        assert_eq!(debug.spheres[0].center, segments[3].end);
        assert_eq!(debug.spheres[0].radius, 5.0);
        assert_eq!(debug.spheres[0].color, Color::BLUE);
    }
}
