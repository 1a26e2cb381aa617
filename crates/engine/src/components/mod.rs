mod resources;
mod transform;

pub use resources::*;
pub use transform::*;
