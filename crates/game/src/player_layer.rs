use crate::prelude::*;

use bevy_ecs::schedule::Schedule;
use fpspractice_engine::{Layer, LayerContext, LayerEvent, Result};
use std::time::Duration;

pub struct PlayerLayer {
    schedule: Schedule,
}

impl PlayerLayer {
    pub fn new(context: &LayerContext, config: ControllerConfig) -> Result<Self> {
        let config = config.validated()?;

        {
            let mut world = context.world()?;
            setup_world(
                &mut world,
                config,
                WindowViewport(context.window.clone()),
            );
        }

        log::info!("Player layer ready");
        Ok(Self {
            schedule: player_schedule(),
        })
    }
}

impl Layer for PlayerLayer {
    fn frame(&mut self, context: &LayerContext) -> Result<()> {
        let mut world = context.world()?;
        run_frame(&mut world, &mut self.schedule, context.delta_time);
        Ok(())
    }

    fn detach(&mut self, _context: &LayerContext) {}

    fn event(&mut self, context: &LayerContext, event: LayerEvent) {
        let LayerEvent::Touch(touch) = event else {
            return;
        };

        match context.world() {
            Ok(mut world) => {
                if let Some(mut controls) = world.get_resource_mut::<TouchControls>() {
                    controls.dispatcher.handle(&touch);
                }
            }
            Err(e) => log::error!("Touch {:?} dropped: {}", touch, e),
        }
    }
}

/// Insert the controller resources and spawn the player
pub fn setup_world(
    world: &mut World,
    config: ControllerConfig,
    viewport: impl ViewportService + Send + Sync + 'static,
) -> Entity {
    let queue = ZoneEventQueue::new();
    world.insert_resource(TouchControls::new(viewport, &config, &queue));
    world.insert_resource(queue);
    world.insert_resource(config);
    world.init_resource::<DebugLines>();
    world.init_resource::<StaticScene>();
    world.init_resource::<InputState>();
    world.init_resource::<Time>();

    world
        .spawn((
            Transform::from_position(Point3::new(0.0, 0.0, 96.0)),
            CharacterController::from_config(&config.character),
        ))
        .id()
}

pub fn player_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            crate::systems::apply_touch_look,
            crate::systems::apply_keyboard_input,
            crate::systems::handle_zone_events,
            crate::systems::integrate_character,
            crate::systems::fire_weapon,
            crate::systems::preview_trajectory,
        )
            .chain(),
    );
    schedule
}

/// Simulate one frame of `delta_time`
pub fn run_frame(world: &mut World, schedule: &mut Schedule, delta_time: Duration) {
    world.insert_resource(Time(delta_time));

    if let Some(mut controls) = world.get_resource_mut::<TouchControls>() {
        controls.dispatcher.set_delta_time(delta_time);
    }
    if let Some(mut debug) = world.get_resource_mut::<DebugLines>() {
        debug.clear();
    }

    schedule.run(world);
}

/// Ground plane and a few obstacles to shoot at
pub fn demo_scene() -> StaticScene {
    let mut scene = StaticScene::new();
    scene.add(Shape::Plane {
        point: Point3::origin(),
        normal: Vector3::z(),
    });
    scene.add(Shape::Aabb {
        min: Point3::new(800.0, -200.0, 0.0),
        max: Point3::new(900.0, 200.0, 300.0),
    });
    scene.add(Shape::Sphere {
        center: Point3::new(1500.0, 600.0, 150.0),
        radius: 150.0,
    });
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const VIEWPORT: ViewportSize = ViewportSize {
        width: 1000.0,
        height: 500.0,
    };

    fn world() -> (World, Entity, Schedule) {
        let mut world = World::new();
        let player = setup_world(&mut world, ControllerConfig::default(), VIEWPORT);
        world.insert_resource(demo_scene());
        (world, player, player_schedule())
    }

    fn touch(world: &mut World, finger: FingerId, action: TouchAction, x: f32, y: f32) {
        world
            .resource_mut::<TouchControls>()
            .dispatcher
            .handle(&TouchInput {
                finger,
                action,
                position: Point2::new(x, y),
            });
    }

    #[test]
    fn test_fire_press_shoots_once() {
        let (mut world, player, mut schedule) = world();

        touch(&mut world, 1, TouchAction::Began, 900.0, 450.0);
        run_frame(&mut world, &mut schedule, Duration::from_millis(16));

        let controller = world.get::<CharacterController>(player).unwrap();
        assert!(controller.is_firing);
        assert!(!controller.fire_requested);
        assert_eq!(world.resource::<DebugLines>().lines.len(), 1);

        // Holding the button does not fire again
        run_frame(&mut world, &mut schedule, Duration::from_millis(16));
        assert!(world.resource::<DebugLines>().is_empty());

        touch(&mut world, 1, TouchAction::Ended, 900.0, 450.0);
        run_frame(&mut world, &mut schedule, Duration::from_millis(16));
        assert!(!world.get::<CharacterController>(player).unwrap().is_firing);
    }

    #[test]
    fn test_boom_hold_previews_trajectory() {
        let (mut world, player, mut schedule) = world();

        touch(&mut world, 2, TouchAction::Began, 700.0, 450.0);
        run_frame(&mut world, &mut schedule, Duration::from_millis(16));

        assert!(world.get::<CharacterController>(player).unwrap().is_aiming);
        let debug = world.resource::<DebugLines>();
        assert!(!debug.lines.is_empty());
        // The arc ends on the wall or the ground
        assert_eq!(debug.spheres.len(), 1);

        touch(&mut world, 2, TouchAction::Ended, 700.0, 450.0);
        run_frame(&mut world, &mut schedule, Duration::from_millis(16));
        assert!(world.resource::<DebugLines>().is_empty());
    }

    #[test]
    fn test_drag_turns_player() {
        let (mut world, player, mut schedule) = world();
        run_frame(&mut world, &mut schedule, Duration::from_secs(1));

        touch(&mut world, 3, TouchAction::Began, 100.0, 100.0);
        touch(&mut world, 3, TouchAction::Moved, 120.0, 100.0);
        run_frame(&mut world, &mut schedule, Duration::from_secs(1));

        // 20 px * 0.05 * 45 deg/s * 1 s
        let controller = world.get::<CharacterController>(player).unwrap();
        assert_relative_eq!(controller.yaw, 45.0, epsilon = 1e-3);
    }

    #[test]
    fn test_camera_turn_raises_character_rates() {
        let (mut world, player, mut schedule) = world();

        touch(&mut world, 4, TouchAction::Began, 800.0, 100.0);
        run_frame(&mut world, &mut schedule, Duration::from_millis(16));

        let controller = world.get::<CharacterController>(player).unwrap();
        assert_eq!(controller.base_turn_rate, 225.0);
        assert!(controller.is_alt_down);

        touch(&mut world, 4, TouchAction::Ended, 800.0, 100.0);
        run_frame(&mut world, &mut schedule, Duration::from_millis(16));

        let controller = world.get::<CharacterController>(player).unwrap();
        assert_eq!(controller.base_turn_rate, 45.0);
        assert!(!controller.is_alt_down);
    }

    #[test]
    fn test_camera_turn_release_keeps_keyboard_alt_look() {
        let (mut world, player, mut schedule) = world();
        {
            let mut input = world.resource_mut::<InputState>();
            input.press_key(winit::keyboard::KeyCode::AltLeft);
            input.press_key(winit::keyboard::KeyCode::ArrowRight);
        }

        touch(&mut world, 4, TouchAction::Began, 800.0, 100.0);
        touch(&mut world, 4, TouchAction::Ended, 800.0, 100.0);
        run_frame(&mut world, &mut schedule, Duration::from_millis(16));

        let controller = world.get::<CharacterController>(player).unwrap();
        assert!(controller.is_alt_down);
        assert!(controller.use_controller_rotation_yaw);

        world
            .resource_mut::<InputState>()
            .release_key(winit::keyboard::KeyCode::AltLeft);
        run_frame(&mut world, &mut schedule, Duration::from_millis(16));
        touch(&mut world, 4, TouchAction::Began, 800.0, 100.0);
        touch(&mut world, 4, TouchAction::Ended, 800.0, 100.0);
        run_frame(&mut world, &mut schedule, Duration::from_millis(16));

        assert!(!world.get::<CharacterController>(player).unwrap().is_alt_down);
    }

    #[test]
    fn test_keyboard_moves_along_heading() {
        let (mut world, player, mut schedule) = world();

        world.resource_mut::<InputState>().press_key(winit::keyboard::KeyCode::KeyW);
        run_frame(&mut world, &mut schedule, Duration::from_millis(500));

        let transform = world.get::<Transform>(player).unwrap();
        assert_relative_eq!(transform.position, Point3::new(300.0, 0.0, 96.0), epsilon = 1e-2);
    }
}
