pub use fpspractice_engine::prelude::*;

pub use crate::components::*;
pub use crate::config::*;
pub use crate::resources::*;
pub use crate::sight::*;
pub use crate::touch::*;
pub use crate::trajectory::*;
