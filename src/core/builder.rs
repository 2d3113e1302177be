/// Sequence building: turns templates or per-trigger overrides into a fresh,
/// independent `StepSequence`.
use log::debug;

use crate::schema::step::{DialogueStep, StepSequence};
use crate::schema::template::DialogueTemplate;

/// Builds run-once sequences.
///
/// Override steps are cloned with their event bindings intact, since those
/// bindings belong to the trigger that carries them. Template steps are cloned
/// with empty bindings so that one template can back any number of triggers
/// without sharing their scene wiring.
#[derive(Debug, Clone, Copy)]
pub struct SequenceBuilder {
    lock_player: bool,
    unlock_player_on_end: bool,
}

impl Default for SequenceBuilder {
    fn default() -> Self {
        Self {
            lock_player: true,
            unlock_player_on_end: true,
        }
    }
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock_player(mut self, lock_player: bool) -> Self {
        self.lock_player = lock_player;
        self
    }

    pub fn unlock_player_on_end(mut self, unlock_player_on_end: bool) -> Self {
        self.unlock_player_on_end = unlock_player_on_end;
        self
    }

    /// Build a sequence from `overrides` if there are any, otherwise from
    /// `template`. Returns `None` when neither yields a step, in which case
    /// nothing should be played.
    pub fn build(
        &self,
        overrides: &[DialogueStep],
        template: Option<&DialogueTemplate>,
    ) -> Option<StepSequence> {
        let steps: Vec<DialogueStep> = if !overrides.is_empty() {
            debug!("[dialogue] building from {} override steps", overrides.len());
            overrides.to_vec()
        } else if let Some(template) = template {
            debug!("[dialogue] building from template ({} steps)", template.steps.len());
            template.steps.iter().map(DialogueStep::detached).collect()
        } else {
            Vec::new()
        };

        if steps.is_empty() {
            return None;
        }

        Some(StepSequence::new(
            self.lock_player,
            self.unlock_player_on_end,
            steps,
        ))
    }
}
