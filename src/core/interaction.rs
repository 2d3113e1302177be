/// Interaction prompts that stand down while dialogue plays.
use crate::core::engine::DialogueEngine;
use crate::schema::callback::EventCallback;

/// An object the player can use.
#[derive(Debug, Clone, Default)]
pub struct Interactable {
    pub interact_text: String,
    pub on_interact: EventCallback,
}

impl Interactable {
    pub fn new(interact_text: &str, on_interact: EventCallback) -> Self {
        Self {
            interact_text: interact_text.to_string(),
            on_interact,
        }
    }

    pub fn interact(&self) {
        self.on_interact.invoke();
    }
}

/// What the HUD should show this frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionPrompt {
    /// Prompt label, `None` to show the plain crosshair.
    pub text: Option<String>,
    pub interacted: bool,
}

/// Per-frame interaction check, suppressed while dialogue is active.
pub struct InteractionGate;

impl InteractionGate {
    /// `focus` is whatever interactable the player is looking at this frame.
    pub fn poll(
        engine: &DialogueEngine,
        focus: Option<&Interactable>,
        interact_pressed: bool,
    ) -> InteractionPrompt {
        if engine.is_active() {
            return InteractionPrompt::default();
        }
        let Some(target) = focus else {
            return InteractionPrompt::default();
        };
        if interact_pressed {
            target.interact();
        }
        InteractionPrompt {
            text: Some(target.interact_text.clone()),
            interacted: interact_pressed,
        }
    }
}
