pub mod components;
pub mod config;
pub mod player_layer;
pub mod prelude;
pub mod resources;
pub mod sight;
pub mod systems;
pub mod touch;
pub mod trajectory;
