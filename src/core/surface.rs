/// Boundary interfaces consumed by the engine, plus in-memory implementations.
///
/// The engine never requires any of these to be present: a missing surface,
/// text display, gate or input source turns the matching operation into a
/// no-op.
use std::cell::RefCell;
use std::rc::Rc;

/// A fadeable UI layer (dialogue box, cutscene overlay, player HUD).
pub trait UiSurface {
    fn alpha(&self) -> f32;
    fn set_alpha(&mut self, alpha: f32);
    fn set_interactable(&mut self, _interactable: bool) {}
    fn set_blocking(&mut self, _blocking: bool) {}
}

/// The label that shows the line currently being revealed.
pub trait TextDisplay {
    fn set_text(&mut self, text: &str);
    fn set_visible_characters(&mut self, count: usize);
    fn clear(&mut self) {
        self.set_text("");
        self.set_visible_characters(0);
    }
}

/// The external movement controller the engine locks during dialogue.
pub trait PlayerGate {
    fn set_look(&mut self, enabled: bool);
    fn set_move(&mut self, enabled: bool);
    fn cancel_forced_look(&mut self);
}

/// Polled once per tick for the "advance" press.
pub trait InputSource {
    fn was_advance_pressed(&mut self) -> bool;
}

impl<T: UiSurface + ?Sized> UiSurface for Rc<RefCell<T>> {
    fn alpha(&self) -> f32 {
        self.borrow().alpha()
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.borrow_mut().set_alpha(alpha);
    }

    fn set_interactable(&mut self, interactable: bool) {
        self.borrow_mut().set_interactable(interactable);
    }

    fn set_blocking(&mut self, blocking: bool) {
        self.borrow_mut().set_blocking(blocking);
    }
}

impl<T: TextDisplay + ?Sized> TextDisplay for Rc<RefCell<T>> {
    fn set_text(&mut self, text: &str) {
        self.borrow_mut().set_text(text);
    }

    fn set_visible_characters(&mut self, count: usize) {
        self.borrow_mut().set_visible_characters(count);
    }

    fn clear(&mut self) {
        self.borrow_mut().clear();
    }
}

impl<T: PlayerGate + ?Sized> PlayerGate for Rc<RefCell<T>> {
    fn set_look(&mut self, enabled: bool) {
        self.borrow_mut().set_look(enabled);
    }

    fn set_move(&mut self, enabled: bool) {
        self.borrow_mut().set_move(enabled);
    }

    fn cancel_forced_look(&mut self) {
        self.borrow_mut().cancel_forced_look();
    }
}

impl<T: InputSource + ?Sized> InputSource for Rc<RefCell<T>> {
    fn was_advance_pressed(&mut self) -> bool {
        self.borrow_mut().was_advance_pressed()
    }
}

/// Plain in-memory surface state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGroup {
    pub alpha: f32,
    pub interactable: bool,
    pub blocks_raycasts: bool,
}

impl CanvasGroup {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            interactable: false,
            blocks_raycasts: false,
        }
    }

    /// Wrap for sharing between the engine and its host.
    pub fn shared(alpha: f32) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(alpha)))
    }
}

impl Default for CanvasGroup {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl UiSurface for CanvasGroup {
    fn alpha(&self) -> f32 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_interactable(&mut self, interactable: bool) {
        self.interactable = interactable;
    }

    fn set_blocking(&mut self, blocking: bool) {
        self.blocks_raycasts = blocking;
    }
}

/// In-memory text label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLabel {
    pub text: String,
    pub max_visible_characters: usize,
}

impl TextLabel {
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    /// The part of the text that is currently visible.
    pub fn visible_text(&self) -> String {
        self.text.chars().take(self.max_visible_characters).collect()
    }
}

impl TextDisplay for TextLabel {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_visible_characters(&mut self, count: usize) {
        self.max_visible_characters = count;
    }
}

/// Look/move flags of a first-person controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerFlags {
    pub can_look: bool,
    pub can_move: bool,
    pub is_force_looking: bool,
}

impl ControllerFlags {
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn is_locked(&self) -> bool {
        !self.can_look && !self.can_move
    }
}

impl Default for ControllerFlags {
    fn default() -> Self {
        Self {
            can_look: true,
            can_move: true,
            is_force_looking: false,
        }
    }
}

impl PlayerGate for ControllerFlags {
    fn set_look(&mut self, enabled: bool) {
        self.can_look = enabled;
    }

    fn set_move(&mut self, enabled: bool) {
        self.can_move = enabled;
    }

    fn cancel_forced_look(&mut self) {
        self.is_force_looking = false;
    }
}

/// Scripted presses, one entry per tick. Runs dry to "not pressed".
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    presses: std::collections::VecDeque<bool>,
}

impl ScriptedInput {
    pub fn new<I: IntoIterator<Item = bool>>(presses: I) -> Self {
        Self {
            presses: presses.into_iter().collect(),
        }
    }

    pub fn push(&mut self, pressed: bool) {
        self.presses.push_back(pressed);
    }
}

impl InputSource for ScriptedInput {
    fn was_advance_pressed(&mut self) -> bool {
        self.presses.pop_front().unwrap_or(false)
    }
}
