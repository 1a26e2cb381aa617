use crate::prelude::*;
use winit::keyboard::KeyCode;

/// Move touch look input and the current rate scalars onto the characters
pub fn apply_touch_look(
    mut controls: ResMut<TouchControls>,
    mut query: Query<&mut CharacterController>,
) {
    let (yaw, pitch) = controls.dispatcher.rotation_mut().take();
    let rates = controls.dispatcher.rates();

    for mut controller in query.iter_mut() {
        controller.base_turn_rate = rates.turn;
        controller.base_look_up_rate = rates.look_up;
        controller.add_yaw_input(yaw);
        controller.add_pitch_input(pitch);
    }
}

/// WASD to move, arrows to turn, arrows with Alt held drive the camera-turn axes
pub fn apply_keyboard_input(
    input: Res<InputState>,
    time: Res<Time>,
    mut query: Query<(&Transform, &mut CharacterController)>,
) {
    let dt = time.delta_seconds();
    let forward = input.axis(KeyCode::KeyW, KeyCode::KeyS);
    let right = input.axis(KeyCode::KeyD, KeyCode::KeyA);
    let turn = input.axis(KeyCode::ArrowRight, KeyCode::ArrowLeft);
    let look_up = input.axis(KeyCode::ArrowUp, KeyCode::ArrowDown);
    let alt = input.is_key_pressed(KeyCode::AltLeft);

    for (transform, mut controller) in query.iter_mut() {
        controller.move_forward(transform, forward);
        controller.move_right(transform, right);

        if alt {
            controller.cam_turn_at_rate(turn, dt);
            controller.cam_look_up_at_rate(look_up, dt);
        } else {
            controller.cam_turn = Vector2::zeros();
            controller.turn_at_rate(turn, dt);
            controller.look_up_at_rate(look_up, dt);
        }
    }
}

/// Zone notifications become character state
pub fn handle_zone_events(
    queue: Res<ZoneEventQueue>,
    mut query: Query<&mut CharacterController>,
) {
    let events = queue.drain();
    if events.is_empty() {
        return;
    }

    for mut controller in query.iter_mut() {
        for event in &events {
            match event {
                ZoneEvent::FireDown => {
                    controller.is_firing = true;
                    controller.fire_requested = true;
                }
                ZoneEvent::FireUp => controller.is_firing = false,
                ZoneEvent::JumpDown => controller.jump_requested = true,
                ZoneEvent::JumpUp => {}
                ZoneEvent::BoomDown => controller.is_aiming = true,
                ZoneEvent::BoomUp => controller.is_aiming = false,
                ZoneEvent::CamTurnDown => {
                    controller.is_alt_down = true;
                    controller.use_controller_rotation_yaw = true;
                }
                ZoneEvent::CamTurnUp => controller.release_cam_turn(),
            }
        }
    }
}

/// Apply queued rotation and movement to the transforms
pub fn integrate_character(
    time: Res<Time>,
    mut query: Query<(&mut Transform, &mut CharacterController)>,
) {
    let dt = time.delta_seconds();

    for (mut transform, mut controller) in query.iter_mut() {
        controller.apply_rotation_input();

        let mut movement = controller.take_movement();
        if movement.norm() > 1.0 {
            movement = movement.normalize();
        }

        if movement.norm_squared() > 0.0 {
            transform.position += movement * controller.move_speed * dt;
        }

        if controller.use_controller_rotation_yaw {
            transform.set_yaw(controller.yaw);
        } else if movement.xy().norm_squared() > 0.0 {
            // Body turns toward the direction it moves in
            transform.set_yaw(movement.y.atan2(movement.x).to_degrees());
        }

        if controller.jump_requested {
            controller.jump_requested = false;
            log::debug!(
                "Jump at ({:.1}, {:.1}, {:.1})",
                transform.position.x,
                transform.position.y,
                transform.position.z
            );
        }
    }
}
