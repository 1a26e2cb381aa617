mod dispatcher;
mod zone;

pub use dispatcher::*;
pub use zone::*;
