use serde::{Deserialize, Serialize};

use super::callback::EventCallback;

/// What a dialogue step does when the engine reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StepType {
    /// Reveal one or more lines in the dialogue box.
    #[default]
    Text,
    /// Fire a scripted event, optionally waiting for it to report completion.
    Event,
    /// Pause for a fixed amount of time.
    Wait,
}

/// One unit of authored dialogue content.
///
/// Only the fields belonging to `kind` are read during playback; the others
/// are kept as authored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueStep {
    /// Diagnostic name, shown in logs only.
    #[serde(default = "default_step_name")]
    pub name: String,
    #[serde(default)]
    pub kind: StepType,
    #[serde(default)]
    pub text_lines: Vec<String>,
    #[serde(skip)]
    pub on_event: EventCallback,
    #[serde(default = "default_wait_for_completion")]
    pub wait_for_completion: bool,
    /// Seconds.
    #[serde(default = "default_wait_duration")]
    pub wait_duration: f32,
}

fn default_step_name() -> String {
    "Step".to_string()
}

fn default_wait_for_completion() -> bool {
    true
}

fn default_wait_duration() -> f32 {
    1.0
}

impl Default for DialogueStep {
    fn default() -> Self {
        Self {
            name: default_step_name(),
            kind: StepType::Text,
            text_lines: Vec::new(),
            on_event: EventCallback::unbound(),
            wait_for_completion: default_wait_for_completion(),
            wait_duration: default_wait_duration(),
        }
    }
}

impl DialogueStep {
    pub fn text<I, S>(name: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            kind: StepType::Text,
            text_lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn event(name: &str, on_event: EventCallback, wait_for_completion: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: StepType::Event,
            on_event,
            wait_for_completion,
            ..Self::default()
        }
    }

    pub fn wait(name: &str, seconds: f32) -> Self {
        Self {
            name: name.to_string(),
            kind: StepType::Wait,
            wait_duration: seconds.max(0.0),
            ..Self::default()
        }
    }

    /// A copy of this step with its event binding replaced by an empty one.
    pub fn detached(&self) -> Self {
        Self {
            on_event: EventCallback::unbound(),
            ..self.clone()
        }
    }
}

/// An ordered, run-once list of steps built for a single activation.
///
/// Has no mutators: once built, the steps and flags stay as they are until the
/// sequence is dropped.
#[derive(Debug, Clone)]
pub struct StepSequence {
    lock_player_on_start: bool,
    unlock_player_on_end: bool,
    steps: Vec<DialogueStep>,
}

impl StepSequence {
    pub fn new(lock_player_on_start: bool, unlock_player_on_end: bool, steps: Vec<DialogueStep>) -> Self {
        Self {
            lock_player_on_start,
            unlock_player_on_end,
            steps,
        }
    }

    pub fn lock_player_on_start(&self) -> bool {
        self.lock_player_on_start
    }

    pub fn unlock_player_on_end(&self) -> bool {
        self.unlock_player_on_end
    }

    pub fn steps(&self) -> &[DialogueStep] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&DialogueStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Total number of text lines across every Text step.
    pub fn line_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.kind == StepType::Text)
            .map(|step| step.text_lines.len())
            .sum()
    }
}
