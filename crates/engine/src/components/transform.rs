use crate::prelude::*;

/// World placement. Z is up and X is forward.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

impl Transform {
    pub fn from_position(position: Point3<f32>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Heading around the up axis, in degrees
    pub fn yaw(&self) -> f32 {
        self.rotation.euler_angles().2.to_degrees()
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.rotation = UnitQuaternion::from_euler_angles(0.0, 0.0, yaw.to_radians());
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.rotation * Vector3::x()
    }

    /// Forward axis with pitch and roll discarded
    pub fn yaw_forward(&self) -> Vector3<f32> {
        UnitQuaternion::from_euler_angles(0.0, 0.0, self.yaw().to_radians()) * Vector3::x()
    }

    /// Right axis with pitch and roll discarded
    pub fn yaw_right(&self) -> Vector3<f32> {
        UnitQuaternion::from_euler_angles(0.0, 0.0, self.yaw().to_radians()) * Vector3::y()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }
}
