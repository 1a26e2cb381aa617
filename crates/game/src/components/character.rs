use crate::prelude::*;

/// Playable character driven by touch zones and keyboard axes
#[derive(Component, Clone, Debug)]
pub struct CharacterController {
    /// Base turn rate, in deg/sec. Touch camera-turn scales this at runtime.
    pub base_turn_rate: f32,
    /// Base look up/down rate, in deg/sec
    pub base_look_up_rate: f32,
    /// Walk speed in units per second
    pub move_speed: f32,
    /// Control rotation yaw, in degrees
    pub yaw: f32,
    /// Control rotation pitch, in degrees; positive looks up
    pub pitch: f32,
    /// Last camera-turn rates applied (x = yaw, y = pitch). Kept for a camera
    /// recenter once both rates return to zero; nothing consumes it yet.
    pub cam_turn: Vector2<f32>,
    /// Body follows the control yaw instead of the movement direction
    pub use_controller_rotation_yaw: bool,
    pub is_alt_down: bool,
    /// Fire button is held
    pub is_firing: bool,
    /// A shot is queued for the next weapon update
    pub fire_requested: bool,
    pub jump_requested: bool,
    /// Trajectory preview is shown while the boom button is held
    pub is_aiming: bool,
    pending_movement: Vector3<f32>,
    pending_rotation: RotationAccumulator,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::from_config(&CharacterConfig::default())
    }
}

impl CharacterController {
    pub fn from_config(config: &CharacterConfig) -> Self {
        Self {
            base_turn_rate: config.base_turn_rate,
            base_look_up_rate: config.base_look_up_rate,
            move_speed: config.move_speed,
            yaw: 0.0,
            pitch: 0.0,
            cam_turn: Vector2::zeros(),
            use_controller_rotation_yaw: false,
            is_alt_down: false,
            is_firing: false,
            fire_requested: false,
            jump_requested: false,
            is_aiming: false,
            pending_movement: Vector3::zeros(),
            pending_rotation: RotationAccumulator::default(),
        }
    }

    pub fn turn_rates(&self) -> TurnRates {
        TurnRates {
            turn: self.base_turn_rate,
            look_up: self.base_look_up_rate,
        }
    }

    /// Forwards/backward input along the character's heading
    pub fn move_forward(&mut self, transform: &Transform, value: f32) {
        if value != 0.0 {
            self.add_movement_input(transform.yaw_forward(), value);
        }
    }

    /// Side to side input along the character's right axis
    pub fn move_right(&mut self, transform: &Transform, value: f32) {
        if value != 0.0 {
            self.add_movement_input(transform.yaw_right(), value);
        }
    }

    /// Turn at a normalized rate, 1.0 being the full base turn rate
    pub fn turn_at_rate(&mut self, rate: f32, delta_seconds: f32) {
        self.add_yaw_input(rate * self.base_turn_rate * delta_seconds);
    }

    /// Look up/down at a normalized rate, 1.0 being the full base look rate
    pub fn look_up_at_rate(&mut self, rate: f32, delta_seconds: f32) {
        self.add_pitch_input(rate * self.base_look_up_rate * delta_seconds);
    }

    /// Camera-turn yaw axis; any input hands body yaw to the controller
    pub fn cam_turn_at_rate(&mut self, rate: f32, delta_seconds: f32) {
        if rate != 0.0 {
            self.use_controller_rotation_yaw = true;
            self.is_alt_down = true;
        }
        self.cam_turn.x = rate;
        self.turn_at_rate(rate, delta_seconds);
    }

    /// Camera-turn pitch axis
    pub fn cam_look_up_at_rate(&mut self, rate: f32, delta_seconds: f32) {
        if rate != 0.0 {
            self.use_controller_rotation_yaw = true;
            self.is_alt_down = true;
        }
        self.cam_turn.y = rate;
        self.look_up_at_rate(rate, delta_seconds);
    }

    /// Camera-turn button released. Alt-look stays on while the keyboard
    /// camera-turn axes are still driving it.
    pub fn release_cam_turn(&mut self) {
        if self.cam_turn == Vector2::zeros() {
            self.is_alt_down = false;
            self.use_controller_rotation_yaw = false;
        }
    }

    /// Movement requested since the last call, as a direction scaled by input
    pub fn take_movement(&mut self) -> Vector3<f32> {
        std::mem::replace(&mut self.pending_movement, Vector3::zeros())
    }

    /// Fold queued yaw/pitch input into the control rotation
    pub fn apply_rotation_input(&mut self) {
        let (yaw, pitch) = self.pending_rotation.take();
        self.yaw = (self.yaw + yaw).rem_euclid(360.0);
        self.pitch = (self.pitch + pitch).clamp(-89.0, 89.0);
    }

    pub fn control_rotation(&self) -> UnitQuaternion<f32> {
        yaw_pitch_rotation(self.yaw, self.pitch)
    }

    /// Direction the character is aiming in
    pub fn aim_direction(&self) -> Vector3<f32> {
        self.control_rotation() * Vector3::x()
    }

    /// Muzzle in world space; `offset` is in the control yaw frame
    pub fn muzzle_position(&self, transform: &Transform, offset: Vector3<f32>) -> Point3<f32> {
        transform.position + yaw_pitch_rotation(self.yaw, 0.0) * offset
    }
}

impl RotationInput for CharacterController {
    fn add_yaw_input(&mut self, value: f32) {
        self.pending_rotation.add_yaw_input(value);
    }

    fn add_pitch_input(&mut self, value: f32) {
        self.pending_rotation.add_pitch_input(value);
    }
}

impl MovementInput for CharacterController {
    fn add_movement_input(&mut self, direction: Vector3<f32>, scale: f32) {
        self.pending_movement += direction * scale;
    }
}

/// Spring-arm camera trailing the character along its control rotation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FollowCamera {
    pub pivot: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub arm_length: f32,
}

impl FollowCamera {
    pub fn new(transform: &Transform, controller: &CharacterController, arm_length: f32) -> Self {
        Self {
            pivot: transform.position,
            rotation: controller.control_rotation(),
            arm_length,
        }
    }
}

impl CameraPoseService for FollowCamera {
    fn camera_pose(&self) -> CameraPose {
        let back = self.rotation * -Vector3::x();
        CameraPose::new(self.pivot + back * self.arm_length, self.rotation)
    }
}
