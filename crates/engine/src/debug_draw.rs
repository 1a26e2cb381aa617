use crate::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugLine {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
    pub color: Color,
    pub thickness: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugSphere {
    pub center: Point3<f32>,
    pub radius: f32,
    pub segments: u32,
    pub color: Color,
}

/// Debug primitives queued for the current frame.
///
/// Nothing here is persistent: the frame loop clears the buffer before
/// systems run, so a primitive lives exactly one frame.
#[derive(Resource, Default)]
pub struct DebugLines {
    pub lines: Vec<DebugLine>,
    pub spheres: Vec<DebugSphere>,
}

impl DebugLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.spheres.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.spheres.is_empty()
    }
}

impl DebugDraw for DebugLines {
    fn draw_line(&mut self, start: Point3<f32>, end: Point3<f32>, color: Color, thickness: f32) {
        self.lines.push(DebugLine {
            start,
            end,
            color,
            thickness,
        });
    }

    fn draw_sphere(&mut self, center: Point3<f32>, radius: f32, segments: u32, color: Color) {
        self.spheres.push(DebugSphere {
            center,
            radius,
            segments,
            color,
        });
    }
}
