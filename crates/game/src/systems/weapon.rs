use crate::prelude::*;

/// Fire one hitscan shot per fire press, from the muzzle toward the camera's aim
pub fn fire_weapon(
    config: Res<ControllerConfig>,
    scene: Res<StaticScene>,
    mut debug: ResMut<DebugLines>,
    mut query: Query<(&Transform, &mut CharacterController)>,
) {
    let tracer = SightTracer::new(config.sight);

    for (transform, mut controller) in query.iter_mut() {
        if !controller.fire_requested {
            continue;
        }
        controller.fire_requested = false;

        let camera = FollowCamera::new(transform, &controller, config.character.arm_length);
        let muzzle = controller.muzzle_position(transform, config.character.muzzle_offset);

        match tracer.trace_sight(muzzle, &camera, &*scene) {
            Some(hit) => {
                log::info!("Shot hit actor {} at distance {:.1}", hit.actor.0, hit.distance);
                debug.draw_line(muzzle, hit.point, Color::GREEN, 1.0);
            }
            None => {
                let aim_point = tracer.aim_point(&camera, &*scene);
                debug.draw_line(muzzle, tracer.muzzle_target(muzzle, aim_point), Color::GREEN, 1.0);
            }
        }
    }
}

/// Draw the projectile arc every frame the boom button is held
pub fn preview_trajectory(
    config: Res<ControllerConfig>,
    scene: Res<StaticScene>,
    mut debug: ResMut<DebugLines>,
    query: Query<(&Transform, &CharacterController)>,
) {
    let sampler = TrajectorySampler::new(config.trajectory);

    for (transform, controller) in query.iter() {
        if !controller.is_aiming {
            continue;
        }

        let muzzle = controller.muzzle_position(transform, config.character.muzzle_offset);
        let velocity = controller.aim_direction() * config.trajectory.launch_speed;
        let segments = sampler.sample(muzzle, velocity, config.trajectory.gravity, &*scene);

        log::trace!("Trajectory preview with {} segments", segments.len());
        sampler.draw(&segments, &mut *debug);
    }
}
