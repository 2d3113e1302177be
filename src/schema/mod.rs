pub mod callback;
pub mod step;
pub mod template;
