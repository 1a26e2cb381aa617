pub use bevy_ecs::prelude::*;
pub use nalgebra::{Point2, Point3, UnitQuaternion, Vector2, Vector3};

pub use crate::collision::*;
pub use crate::components::*;
pub use crate::debug_draw::*;
pub use crate::input::*;
pub use crate::services::*;
