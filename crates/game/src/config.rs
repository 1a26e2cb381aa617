use crate::prelude::*;

use fpspractice_engine::Result;

/// Screen layout of the virtual control zones, in fractions of the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneLayout {
    /// Fire covers everything right of and below this corner
    pub fire_corner: Vector2<f32>,
    pub camera_turn_center: Vector2<f32>,
    pub jump_center: Vector2<f32>,
    /// Boom covers everything right of and below this corner
    pub boom_corner: Vector2<f32>,
    /// Squared pixel radius of the circular buttons
    pub button_radius_sq: f32,
}

impl Default for ZoneLayout {
    fn default() -> Self {
        Self {
            fire_corner: Vector2::new(0.8, 0.7),
            camera_turn_center: Vector2::new(0.8, 0.2),
            jump_center: Vector2::new(0.9, 0.6),
            boom_corner: Vector2::new(0.65, 0.7),
            button_radius_sq: 1000.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchConfig {
    pub layout: ZoneLayout,
    /// Factor applied to the turn and look-up rates while camera-turn is held
    pub turn_multiplier: f32,
    /// Pixels of finger travel to rate units
    pub move_scale: f32,
    /// Deltas at or below this many pixels on both axes count as a still finger
    pub jitter_threshold: f32,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            layout: ZoneLayout::default(),
            turn_multiplier: 5.0,
            move_scale: 0.05,
            jitter_threshold: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryConfig {
    /// Seconds between consecutive samples
    pub time_step: f32,
    pub max_steps: usize,
    /// Gravity used by the aim preview, in units per second squared
    pub gravity: f32,
    /// Muzzle speed used by the aim preview
    pub launch_speed: f32,
    pub line_thickness: f32,
    pub hit_marker_radius: f32,
    pub hit_marker_segments: u32,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            time_step: 0.05,
            max_steps: 980,
            gravity: 980.0,
            launch_speed: 1500.0,
            line_thickness: 3.0,
            hit_marker_radius: 5.0,
            hit_marker_segments: 10,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SightConfig {
    /// Length of the camera trace that finds the aim point
    pub range: f32,
    /// How far past the aim point the muzzle trace reaches, as a factor
    pub overshoot: f32,
}

impl Default for SightConfig {
    fn default() -> Self {
        Self {
            range: 5000.0,
            overshoot: 1.1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterConfig {
    /// Base turn rate, in deg/sec
    pub base_turn_rate: f32,
    /// Base look up/down rate, in deg/sec
    pub base_look_up_rate: f32,
    /// Walk speed in units per second
    pub move_speed: f32,
    /// Distance of the follow camera behind the character
    pub arm_length: f32,
    /// Muzzle position relative to the character, in its yaw frame
    pub muzzle_offset: Vector3<f32>,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            base_turn_rate: 45.0,
            base_look_up_rate: 45.0,
            move_speed: 600.0,
            arm_length: 300.0,
            muzzle_offset: Vector3::new(50.0, 20.0, 40.0),
        }
    }
}

/// Tuning of the whole controller
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct ControllerConfig {
    pub touch: TouchConfig,
    pub trajectory: TrajectoryConfig,
    pub sight: SightConfig,
    pub character: CharacterConfig,
}

impl ControllerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_touch(mut self, touch: TouchConfig) -> Self {
        self.touch = touch;
        self
    }

    pub fn with_trajectory(mut self, trajectory: TrajectoryConfig) -> Self {
        self.trajectory = trajectory;
        self
    }

    pub fn with_sight(mut self, sight: SightConfig) -> Self {
        self.sight = sight;
        self
    }

    pub fn with_character(mut self, character: CharacterConfig) -> Self {
        self.character = character;
        self
    }

    /// Reject tunings the controller cannot run with
    pub fn validated(self) -> Result<Self> {
        anyhow::ensure!(
            self.touch.turn_multiplier.is_finite() && self.touch.turn_multiplier > 0.0,
            "turn multiplier must be positive, got {}",
            self.touch.turn_multiplier
        );
        anyhow::ensure!(
            self.touch.layout.button_radius_sq > 0.0,
            "button radius must be positive"
        );
        anyhow::ensure!(
            self.touch.jitter_threshold >= 0.0,
            "jitter threshold cannot be negative"
        );
        anyhow::ensure!(
            self.trajectory.time_step.is_finite() && self.trajectory.time_step > 0.0,
            "trajectory time step must be positive, got {}",
            self.trajectory.time_step
        );
        anyhow::ensure!(
            self.sight.range > 0.0,
            "sight range must be positive, got {}",
            self.sight.range
        );
        anyhow::ensure!(
            self.sight.overshoot >= 1.0,
            "sight overshoot must reach the aim point, got {}",
            self.sight.overshoot
        );
        Ok(self)
    }
}
