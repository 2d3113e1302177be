//! Dialogue Sequencer: tick-driven playback of cutscene dialogue.
//!
//! Plays an authored, linear list of steps (text reveals, scripted events and
//! timed waits) while fading the UI layers around it and locking the player's
//! controller for the duration.

pub mod core;
pub mod schema;

pub use crate::core::builder::SequenceBuilder;
pub use crate::core::config::EngineConfig;
pub use crate::core::engine::{CompletionHandle, DialogueEngine, EngineState};
pub use crate::core::trigger::DialogueTrigger;
pub use crate::schema::callback::EventCallback;
pub use crate::schema::step::{DialogueStep, StepSequence, StepType};
pub use crate::schema::template::{DialogueTemplate, TemplateLibrary};
