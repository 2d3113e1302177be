pub mod builder;
pub mod config;
pub mod engine;
pub mod fade;
pub mod interaction;
pub mod reveal;
pub mod surface;
pub mod trigger;
