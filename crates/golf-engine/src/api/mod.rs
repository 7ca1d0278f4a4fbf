pub mod bindings;
pub mod config;
#[cfg(feature = "physics")]
pub mod game;
pub mod types;
