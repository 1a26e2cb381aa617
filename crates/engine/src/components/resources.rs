use crate::prelude::*;

use std::time::Duration;

/// Duration of the frame currently being simulated
#[derive(Resource, Default)]
pub struct Time(pub Duration);

impl Time {
    pub fn delta_seconds(&self) -> f32 {
        self.0.as_secs_f32()
    }
}
