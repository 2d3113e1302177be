use log::debug;
use std::rc::Rc;

use crate::core::builder::SequenceBuilder;
use crate::core::engine::DialogueEngine;
use crate::schema::step::{DialogueStep, StepSequence};
use crate::schema::template::DialogueTemplate;

/// Something in the world that starts dialogue: a template reference, or its
/// own override steps, plus the player-lock flags for the run.
#[derive(Debug, Clone)]
pub struct DialogueTrigger {
    pub template: Option<Rc<DialogueTemplate>>,
    pub lock_player: bool,
    pub unlock_player_on_end: bool,
    /// When non-empty, played instead of the template.
    pub runtime_steps: Vec<DialogueStep>,
}

impl Default for DialogueTrigger {
    fn default() -> Self {
        Self {
            template: None,
            lock_player: true,
            unlock_player_on_end: true,
            runtime_steps: Vec::new(),
        }
    }
}

impl DialogueTrigger {
    pub fn from_template(template: Rc<DialogueTemplate>) -> Self {
        Self {
            lock_player: template.lock_player,
            unlock_player_on_end: template.unlock_player_on_end,
            template: Some(template),
            ..Self::default()
        }
    }

    pub fn from_steps(steps: Vec<DialogueStep>) -> Self {
        Self {
            runtime_steps: steps,
            ..Self::default()
        }
    }

    /// Build this trigger's sequence without playing it.
    pub fn build_sequence(&self) -> Option<StepSequence> {
        SequenceBuilder::new()
            .lock_player(self.lock_player)
            .unlock_player_on_end(self.unlock_player_on_end)
            .build(&self.runtime_steps, self.template.as_deref())
    }

    /// Build a fresh sequence and hand it to `engine`. Returns whether
    /// playback started.
    pub fn trigger(&self, engine: &mut DialogueEngine) -> bool {
        match self.build_sequence() {
            Some(sequence) => engine.start_locked(sequence, self.lock_player),
            None => {
                debug!("[dialogue] trigger has nothing to play");
                false
            }
        }
    }
}
