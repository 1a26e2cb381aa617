mod character;
mod weapon;

pub use character::*;
pub use weapon::*;
