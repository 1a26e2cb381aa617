use crate::prelude::*;

use std::fmt;

/// Virtual button regions on the touch screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchZone {
    Fire,
    CameraTurn,
    Jump,
    Boom,
}

impl TouchZone {
    pub const COUNT: usize = 4;

    /// Hit-test order; the first zone containing a touch wins
    pub const PRIORITY: [TouchZone; Self::COUNT] = [
        TouchZone::Fire,
        TouchZone::CameraTurn,
        TouchZone::Jump,
        TouchZone::Boom,
    ];

    pub fn index(self) -> usize {
        match self {
            TouchZone::Fire => 0,
            TouchZone::CameraTurn => 1,
            TouchZone::Jump => 2,
            TouchZone::Boom => 3,
        }
    }

    pub fn down_event(self) -> ZoneEvent {
        match self {
            TouchZone::Fire => ZoneEvent::FireDown,
            TouchZone::CameraTurn => ZoneEvent::CamTurnDown,
            TouchZone::Jump => ZoneEvent::JumpDown,
            TouchZone::Boom => ZoneEvent::BoomDown,
        }
    }

    pub fn up_event(self) -> ZoneEvent {
        match self {
            TouchZone::Fire => ZoneEvent::FireUp,
            TouchZone::CameraTurn => ZoneEvent::CamTurnUp,
            TouchZone::Jump => ZoneEvent::JumpUp,
            TouchZone::Boom => ZoneEvent::BoomUp,
        }
    }

    /// Geometric region of this zone under `layout`
    pub fn region(self, layout: &ZoneLayout) -> ZoneRegion {
        match self {
            TouchZone::Fire => ZoneRegion::Corner {
                min: layout.fire_corner,
            },
            TouchZone::CameraTurn => ZoneRegion::Circle {
                center: layout.camera_turn_center,
                radius_sq: layout.button_radius_sq,
            },
            TouchZone::Jump => ZoneRegion::Circle {
                center: layout.jump_center,
                radius_sq: layout.button_radius_sq,
            },
            TouchZone::Boom => ZoneRegion::Corner {
                min: layout.boom_corner,
            },
        }
    }
}

impl fmt::Display for TouchZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TouchZone::Fire => "fire",
            TouchZone::CameraTurn => "camera-turn",
            TouchZone::Jump => "jump",
            TouchZone::Boom => "boom",
        };
        f.write_str(name)
    }
}

/// Edge-triggered zone notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZoneEvent {
    FireDown,
    FireUp,
    JumpDown,
    JumpUp,
    BoomDown,
    BoomUp,
    CamTurnDown,
    CamTurnUp,
}

impl ZoneEvent {
    pub fn zone(self) -> TouchZone {
        match self {
            ZoneEvent::FireDown | ZoneEvent::FireUp => TouchZone::Fire,
            ZoneEvent::JumpDown | ZoneEvent::JumpUp => TouchZone::Jump,
            ZoneEvent::BoomDown | ZoneEvent::BoomUp => TouchZone::Boom,
            ZoneEvent::CamTurnDown | ZoneEvent::CamTurnUp => TouchZone::CameraTurn,
        }
    }

    pub fn is_down(self) -> bool {
        matches!(
            self,
            ZoneEvent::FireDown
                | ZoneEvent::JumpDown
                | ZoneEvent::BoomDown
                | ZoneEvent::CamTurnDown
        )
    }
}

/// Screen-space test shape, positioned in fractions of the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoneRegion {
    /// Strictly right of and below `min`, out to the bottom-right corner
    Corner { min: Vector2<f32> },
    /// Strictly within `radius_sq` squared pixels of `center`
    Circle { center: Vector2<f32>, radius_sq: f32 },
}

impl ZoneRegion {
    /// Fails closed: an invalid viewport contains nothing
    pub fn contains(&self, point: Point2<f32>, viewport: ViewportSize) -> bool {
        if !viewport.is_valid() {
            return false;
        }

        let extent = Vector2::new(viewport.width, viewport.height);
        match *self {
            ZoneRegion::Corner { min } => {
                let corner = min.component_mul(&extent);
                point.x > corner.x && point.y > corner.y
            }
            ZoneRegion::Circle { center, radius_sq } => {
                let center = center.component_mul(&extent);
                (point.coords - center).norm_squared() < radius_sq
            }
        }
    }
}

/// First zone in priority order that contains `point`
pub fn hit_test(point: Point2<f32>, viewport: ViewportSize, layout: &ZoneLayout) -> Option<TouchZone> {
    TouchZone::PRIORITY
        .into_iter()
        .find(|zone| zone.region(layout).contains(point, viewport))
}
