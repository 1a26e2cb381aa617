use crate::prelude::*;

/// Hitscan trace that aims with the camera and fires from the muzzle.
///
/// The camera decides what the player is looking at; the muzzle decides
/// what actually gets hit, so geometry between the barrel and the aim point
/// still blocks the shot.
#[derive(Clone, Copy, Debug, Default)]
pub struct SightTracer {
    config: SightConfig,
}

impl SightTracer {
    pub fn new(config: SightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SightConfig {
        &self.config
    }

    /// Point the camera is looking at, or the end of its range on a miss
    pub fn aim_point<C, R>(&self, camera: &C, raycast: &R) -> Point3<f32>
    where
        C: CameraPoseService + ?Sized,
        R: RaycastService + ?Sized,
    {
        let pose = camera.camera_pose();
        let far = pose.position + pose.forward() * self.config.range;

        match raycast.raycast(pose.position, far) {
            Some(hit) => hit.point,
            None => far,
        }
    }

    /// End point of the muzzle trace for a given aim point
    pub fn muzzle_target(&self, origin: Point3<f32>, aim_point: Point3<f32>) -> Point3<f32> {
        origin + (aim_point - origin) * self.config.overshoot
    }

    /// Trace from `origin` toward what the camera is looking at
    pub fn trace_sight<C, R>(&self, origin: Point3<f32>, camera: &C, raycast: &R) -> Option<HitResult>
    where
        C: CameraPoseService + ?Sized,
        R: RaycastService + ?Sized,
    {
        let aim_point = self.aim_point(camera, raycast);
        let target = self.muzzle_target(origin, aim_point);
        let hit = raycast.raycast(origin, target);

        match &hit {
            Some(hit) => log::debug!(
                "Sight trace hit actor {} at ({:.1}, {:.1}, {:.1})",
                hit.actor.0,
                hit.point.x,
                hit.point.y,
                hit.point.z
            ),
            None => log::debug!("Sight trace missed"),
        }

        hit
    }
}
