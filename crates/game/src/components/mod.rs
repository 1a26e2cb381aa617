mod character;

pub use character::*;
