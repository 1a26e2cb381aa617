use crate::prelude::*;

use std::sync::Arc;
use winit::window::Window;

/// Size of the viewport in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A viewport queried before the window is ready reports zero or garbage
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Reports the current viewport size
pub trait ViewportService {
    fn viewport_size(&self) -> ViewportSize;
}

impl ViewportService for ViewportSize {
    fn viewport_size(&self) -> ViewportSize {
        *self
    }
}

impl<T: ViewportService + ?Sized> ViewportService for Box<T> {
    fn viewport_size(&self) -> ViewportSize {
        (**self).viewport_size()
    }
}

/// Viewport backed by a live winit window
#[derive(Clone)]
pub struct WindowViewport(pub Arc<Window>);

impl ViewportService for WindowViewport {
    fn viewport_size(&self) -> ViewportSize {
        let size = self.0.inner_size();
        ViewportSize::new(size.width as f32, size.height as f32)
    }
}

/// Opaque handle of whatever the ray hit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorHandle(pub u32);

/// Nearest blocking surface along a traced segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    pub point: Point3<f32>,
    pub normal: Vector3<f32>,
    /// Distance from the segment start to `point`
    pub distance: f32,
    pub actor: ActorHandle,
}

/// Line trace against the visibility channel of the world.
///
/// Returns the first blocking surface between `from` and `to`, or `None` when
/// the segment is clear. A miss is an ordinary outcome.
pub trait RaycastService {
    fn raycast(&self, from: Point3<f32>, to: Point3<f32>) -> Option<HitResult>;
}

impl<T: RaycastService + ?Sized> RaycastService for &T {
    fn raycast(&self, from: Point3<f32>, to: Point3<f32>) -> Option<HitResult> {
        (**self).raycast(from, to)
    }
}

/// World position and orientation of the active viewpoint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

impl CameraPose {
    pub fn new(position: Point3<f32>, rotation: UnitQuaternion<f32>) -> Self {
        Self { position, rotation }
    }

    /// Builds a pose from yaw/pitch in degrees (Z up, X forward)
    pub fn from_yaw_pitch(position: Point3<f32>, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            rotation: yaw_pitch_rotation(yaw, pitch),
        }
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.rotation * Vector3::x()
    }
}

pub trait CameraPoseService {
    fn camera_pose(&self) -> CameraPose;
}

impl CameraPoseService for CameraPose {
    fn camera_pose(&self) -> CameraPose {
        *self
    }
}

/// Receives controller yaw/pitch deltas in degrees
pub trait RotationInput {
    fn add_yaw_input(&mut self, value: f32);
    fn add_pitch_input(&mut self, value: f32);
}

/// Rotation sink that sums deltas until drained
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationAccumulator {
    pub yaw: f32,
    pub pitch: f32,
}

impl RotationAccumulator {
    /// Returns the accumulated (yaw, pitch) and resets to zero
    pub fn take(&mut self) -> (f32, f32) {
        let taken = (self.yaw, self.pitch);
        *self = Self::default();
        taken
    }
}

impl RotationInput for RotationAccumulator {
    fn add_yaw_input(&mut self, value: f32) {
        self.yaw += value;
    }

    fn add_pitch_input(&mut self, value: f32) {
        self.pitch += value;
    }
}

/// Receives a world-space movement direction and a magnitude
pub trait MovementInput {
    fn add_movement_input(&mut self, direction: Vector3<f32>, scale: f32);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub [f32; 3]);

impl Color {
    pub const RED: Color = Color([1.0, 0.0, 0.0]);
    pub const GREEN: Color = Color([0.0, 1.0, 0.0]);
    pub const BLUE: Color = Color([0.0, 0.0, 1.0]);
}

/// Visualization sink for debug primitives drawn for a single frame
pub trait DebugDraw {
    fn draw_line(&mut self, start: Point3<f32>, end: Point3<f32>, color: Color, thickness: f32);
    fn draw_sphere(&mut self, center: Point3<f32>, radius: f32, segments: u32, color: Color);
}

/// Rotation for a yaw/pitch pair in degrees, positive pitch looking up
pub fn yaw_pitch_rotation(yaw: f32, pitch: f32) -> UnitQuaternion<f32> {
    UnitQuaternion::from_euler_angles(0.0, -pitch.to_radians(), yaw.to_radians())
}
