/// The dialogue engine: a single-slot, tick-driven player for step sequences.
///
/// One call to [`DialogueEngine::tick`] per frame drives every suspended
/// operation (fades, reveals, waits and event waits). Within a tick the engine
/// keeps moving through its phases until one of them has to wait for a later
/// frame.

use log::{debug, info, warn};
use std::cell::Cell;
use std::rc::Rc;

use crate::core::config::EngineConfig;
use crate::core::fade::FadeController;
use crate::core::reveal::TextRevealer;
use crate::core::surface::{InputSource, PlayerGate, TextDisplay, UiSurface};
use crate::schema::callback::EventCallback;
use crate::schema::step::{StepSequence, StepType};

/// Coarse, observable engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    Idle,
    EnteringScene,
    StepText,
    StepEvent,
    StepWait,
    ExitingScene,
}

/// Completes the engine's pending event wait from outside the engine.
///
/// Hand a clone to whatever finishes a scripted event (a screen fader, an
/// animation, an event subscriber). Calling [`complete`] outside an event wait
/// has no effect: the request is discarded when the next Event step begins.
///
/// Each handle belongs to one run. Once another run has started, completing
/// an older handle does nothing.
///
/// [`complete`]: CompletionHandle::complete
#[derive(Debug, Clone)]
pub struct CompletionHandle {
    run_id: u64,
    current_run: Rc<Cell<u64>>,
    requested: Rc<Cell<bool>>,
}

impl CompletionHandle {
    /// The run this handle completes events for.
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// False once a later run has started.
    pub fn is_current(&self) -> bool {
        self.current_run.get() == self.run_id
    }

    pub fn complete(&self) {
        if !self.is_current() {
            debug!(
                "[dialogue] dropped completion from run {} (current run {})",
                self.run_id,
                self.current_run.get()
            );
            return;
        }
        self.requested.set(true);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Starting,
    HudOut(FadeController),
    CutsceneIn(FadeController),
    StepStart,
    BoxIn(FadeController),
    Revealing(TextRevealer),
    AwaitAdvance,
    BoxOut(FadeController),
    AwaitEvent,
    Waiting { elapsed: f32, duration: f32 },
    CutsceneOut(FadeController),
    HudIn(FadeController),
}

enum Flow {
    Continue,
    Suspend,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    DialogueBox,
    Cutscene,
    Hud,
}

/// Plays one [`StepSequence`] at a time.
pub struct DialogueEngine {
    config: EngineConfig,
    dialogue_box: Option<Box<dyn UiSurface>>,
    cutscene_layer: Option<Box<dyn UiSurface>>,
    player_hud: Option<Box<dyn UiSurface>>,
    text_display: Option<Box<dyn TextDisplay>>,
    player_gate: Option<Box<dyn PlayerGate>>,

    sequence: Option<StepSequence>,
    phase: Phase,
    step_index: usize,
    line_index: usize,
    line_text: String,
    visible_chars: usize,
    run_id: u64,
    current_run: Rc<Cell<u64>>,
    unlock_player_on_end: bool,

    active: bool,
    revealing: bool,
    skip_requested: bool,
    advance_requested: bool,
    waiting_for_event: bool,
    completion: Rc<Cell<bool>>,
}

/// Builder for constructing a `DialogueEngine` with its collaborators.
#[derive(Default)]
pub struct DialogueEngineBuilder {
    config: EngineConfig,
    dialogue_box: Option<Box<dyn UiSurface>>,
    cutscene_layer: Option<Box<dyn UiSurface>>,
    player_hud: Option<Box<dyn UiSurface>>,
    text_display: Option<Box<dyn TextDisplay>>,
    player_gate: Option<Box<dyn PlayerGate>>,
}

impl DialogueEngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dialogue_box(mut self, surface: impl UiSurface + 'static) -> Self {
        self.dialogue_box = Some(Box::new(surface));
        self
    }

    pub fn cutscene_layer(mut self, surface: impl UiSurface + 'static) -> Self {
        self.cutscene_layer = Some(Box::new(surface));
        self
    }

    pub fn player_hud(mut self, surface: impl UiSurface + 'static) -> Self {
        self.player_hud = Some(Box::new(surface));
        self
    }

    pub fn text_display(mut self, display: impl TextDisplay + 'static) -> Self {
        self.text_display = Some(Box::new(display));
        self
    }

    pub fn player_gate(mut self, gate: impl PlayerGate + 'static) -> Self {
        self.player_gate = Some(Box::new(gate));
        self
    }

    pub fn build(self) -> DialogueEngine {
        DialogueEngine {
            config: self.config,
            dialogue_box: self.dialogue_box,
            cutscene_layer: self.cutscene_layer,
            player_hud: self.player_hud,
            text_display: self.text_display,
            player_gate: self.player_gate,
            sequence: None,
            phase: Phase::Idle,
            step_index: 0,
            line_index: 0,
            line_text: String::new(),
            visible_chars: 0,
            run_id: 0,
            current_run: Rc::new(Cell::new(0)),
            unlock_player_on_end: true,
            active: false,
            revealing: false,
            skip_requested: false,
            advance_requested: false,
            waiting_for_event: false,
            completion: Rc::new(Cell::new(false)),
        }
    }
}

impl DialogueEngine {
    pub fn builder() -> DialogueEngineBuilder {
        DialogueEngineBuilder::default()
    }

    /// An engine with no UI surfaces, text display or player gate.
    pub fn new(config: EngineConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Control surface
    // ------------------------------------------------------------------

    /// Start `sequence`, locking the player according to the sequence's own
    /// `lock_player_on_start` flag.
    pub fn start(&mut self, sequence: StepSequence) -> bool {
        let lock_player = sequence.lock_player_on_start();
        self.start_locked(sequence, lock_player)
    }

    /// Start `sequence`, cancelling whatever is playing first.
    ///
    /// An empty sequence is rejected and leaves the engine untouched. Returns
    /// whether playback was started.
    pub fn start_locked(&mut self, sequence: StepSequence, lock_player: bool) -> bool {
        if sequence.is_empty() {
            warn!("[dialogue] rejected a sequence with no steps");
            return false;
        }

        self.stop();

        self.run_id += 1;
        self.current_run.set(self.run_id);
        self.unlock_player_on_end = sequence.unlock_player_on_end();
        self.sequence = Some(sequence);
        self.step_index = 0;
        self.line_index = 0;
        self.active = true;

        self.set_player_lock(lock_player);
        if let Some(surface) = self.dialogue_box.as_mut() {
            surface.set_alpha(0.0);
        }

        self.phase = Phase::Starting;
        info!(
            "[dialogue] run {} started ({} steps, lock_player: {})",
            self.run_id,
            self.sequence.as_ref().map_or(0, StepSequence::len),
            lock_player
        );
        true
    }

    /// Cancel playback and reset the dialogue box and player lock at once.
    /// Safe to call at any time.
    pub fn stop(&mut self) {
        if self.active {
            info!(
                "[dialogue] run {} stopped at step {}",
                self.run_id, self.step_index
            );
        }

        self.phase = Phase::Idle;
        self.sequence = None;
        self.active = false;
        self.revealing = false;
        self.skip_requested = false;
        self.advance_requested = false;
        self.waiting_for_event = false;
        self.completion.set(false);

        if let Some(surface) = self.dialogue_box.as_mut() {
            surface.set_alpha(0.0);
            surface.set_blocking(false);
            surface.set_interactable(false);
        }

        self.set_player_lock(false);
    }

    /// Resolve the pending Event step's wait. The step moves on at the next
    /// tick. Does nothing unless an Event step is waiting.
    pub fn complete_external_event(&mut self) {
        if !self.waiting_for_event {
            return;
        }
        self.waiting_for_event = false;
        self.completion.set(true);
    }

    /// The "advance" signal: skips an in-progress reveal, otherwise moves past
    /// a completed line. Ignored while an Event step is waiting.
    pub fn request_advance(&mut self) {
        if !self.active || self.waiting_for_event {
            return;
        }
        if self.revealing {
            self.skip_requested = true;
            return;
        }
        self.advance_requested = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn lock_player(&mut self) {
        self.set_player_lock(true);
    }

    pub fn unlock_player(&mut self) {
        self.set_player_lock(false);
    }

    /// A handle for the current run, or for the next run to start when the
    /// engine is idle. Take a fresh handle for every run.
    pub fn completion_handle(&self) -> CompletionHandle {
        let run_id = if self.active {
            self.run_id
        } else {
            self.run_id + 1
        };
        CompletionHandle {
            run_id,
            current_run: Rc::clone(&self.current_run),
            requested: Rc::clone(&self.completion),
        }
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    pub fn state(&self) -> EngineState {
        match &self.phase {
            Phase::Idle => EngineState::Idle,
            Phase::Starting | Phase::HudOut(_) | Phase::CutsceneIn(_) => {
                EngineState::EnteringScene
            }
            Phase::StepStart => match self.current_step_kind() {
                Some(StepType::Text) => EngineState::StepText,
                Some(StepType::Event) => EngineState::StepEvent,
                Some(StepType::Wait) => EngineState::StepWait,
                None => EngineState::ExitingScene,
            },
            Phase::BoxIn(_) | Phase::Revealing(_) | Phase::AwaitAdvance | Phase::BoxOut(_) => {
                EngineState::StepText
            }
            Phase::AwaitEvent => EngineState::StepEvent,
            Phase::Waiting { .. } => EngineState::StepWait,
            Phase::CutsceneOut(_) | Phase::HudIn(_) => EngineState::ExitingScene,
        }
    }

    pub fn is_revealing(&self) -> bool {
        self.revealing
    }

    pub fn is_waiting_for_event(&self) -> bool {
        self.waiting_for_event
    }

    /// True while a fully revealed line waits for an advance.
    pub fn is_awaiting_advance(&self) -> bool {
        matches!(self.phase, Phase::AwaitAdvance)
    }

    pub fn current_step_index(&self) -> Option<usize> {
        self.sequence.as_ref()?;
        Some(self.step_index)
    }

    pub fn current_step_name(&self) -> Option<&str> {
        self.sequence
            .as_ref()?
            .get(self.step_index)
            .map(|step| step.name.as_str())
    }

    /// The line being revealed or waiting for an advance, if any.
    pub fn current_line(&self) -> Option<&str> {
        match self.phase {
            Phase::Revealing(_) | Phase::AwaitAdvance => Some(&self.line_text),
            _ => None,
        }
    }

    pub fn visible_characters(&self) -> usize {
        self.visible_chars
    }

    /// Incremented by every accepted start.
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    // ------------------------------------------------------------------
    // Ticking
    // ------------------------------------------------------------------

    /// Poll `input` for an advance press, then tick.
    pub fn update(&mut self, dt: f32, input: Option<&mut dyn InputSource>) {
        if self.active {
            if let Some(input) = input {
                if input.was_advance_pressed() {
                    self.request_advance();
                }
            }
        }
        self.tick(dt);
    }

    /// Advance playback by one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        let dt = dt.max(0.0);
        while let Flow::Continue = self.run_phase(dt) {}
    }

    fn run_phase(&mut self, dt: f32) -> Flow {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        match phase {
            Phase::Idle => Flow::Suspend,
            Phase::Starting => self.begin_hud_out(),
            Phase::HudOut(fade) => match self.drive_fade(Slot::Hud, fade, dt) {
                Some(fade) => self.suspend(Phase::HudOut(fade)),
                None => self.begin_cutscene_in(),
            },
            Phase::CutsceneIn(fade) => match self.drive_fade(Slot::Cutscene, fade, dt) {
                Some(fade) => self.suspend(Phase::CutsceneIn(fade)),
                None => self.goto(Phase::StepStart),
            },
            Phase::StepStart => self.begin_step(),
            Phase::BoxIn(fade) => match self.drive_fade(Slot::DialogueBox, fade, dt) {
                Some(fade) => self.suspend(Phase::BoxIn(fade)),
                None => self.begin_line(),
            },
            Phase::Revealing(mut reveal) => {
                if self.skip_requested {
                    reveal.skip();
                } else {
                    reveal.advance(dt);
                }
                self.show_visible(reveal.visible());
                if reveal.is_finished() {
                    self.revealing = false;
                    self.skip_requested = false;
                    self.advance_requested = false;
                    self.suspend(Phase::AwaitAdvance)
                } else {
                    self.suspend(Phase::Revealing(reveal))
                }
            }
            Phase::AwaitAdvance => {
                if !self.advance_requested {
                    return self.suspend(Phase::AwaitAdvance);
                }
                self.advance_requested = false;
                self.line_index += 1;
                if self.line_index < self.current_line_count() {
                    self.begin_line()
                } else {
                    self.begin_box_out()
                }
            }
            Phase::BoxOut(fade) => match self.drive_fade(Slot::DialogueBox, fade, dt) {
                Some(fade) => self.suspend(Phase::BoxOut(fade)),
                None => {
                    if let Some(display) = self.text_display.as_mut() {
                        display.clear();
                    }
                    self.line_text.clear();
                    self.visible_chars = 0;
                    self.finish_step()
                }
            },
            Phase::AwaitEvent => {
                if self.completion.replace(false) {
                    self.waiting_for_event = false;
                    self.finish_step()
                } else {
                    self.suspend(Phase::AwaitEvent)
                }
            }
            Phase::Waiting { elapsed, duration } => {
                let elapsed = elapsed + dt;
                if elapsed >= duration {
                    self.finish_step()
                } else {
                    self.suspend(Phase::Waiting { elapsed, duration })
                }
            }
            Phase::CutsceneOut(fade) => match self.drive_fade(Slot::Cutscene, fade, dt) {
                Some(fade) => self.suspend(Phase::CutsceneOut(fade)),
                None => self.begin_hud_in(),
            },
            Phase::HudIn(fade) => match self.drive_fade(Slot::Hud, fade, dt) {
                Some(fade) => self.suspend(Phase::HudIn(fade)),
                None => self.finish_run(),
            },
        }
    }

    fn goto(&mut self, phase: Phase) -> Flow {
        self.phase = phase;
        Flow::Continue
    }

    fn suspend(&mut self, phase: Phase) -> Flow {
        self.phase = phase;
        Flow::Suspend
    }

    // ------------------------------------------------------------------
    // Scene entry and exit
    // ------------------------------------------------------------------

    fn begin_hud_out(&mut self) -> Flow {
        match self.fade_for(Slot::Hud, 0.0) {
            Some(fade) => self.goto(Phase::HudOut(fade)),
            None => self.begin_cutscene_in(),
        }
    }

    fn begin_cutscene_in(&mut self) -> Flow {
        match self.fade_for(Slot::Cutscene, 1.0) {
            Some(fade) => self.goto(Phase::CutsceneIn(fade)),
            None => self.goto(Phase::StepStart),
        }
    }

    fn begin_exit(&mut self) -> Flow {
        debug!("[dialogue] run {} exiting scene", self.run_id);
        if let Some(surface) = self.dialogue_box.as_mut() {
            surface.set_alpha(0.0);
            surface.set_blocking(false);
            surface.set_interactable(false);
        }
        match self.fade_for(Slot::Cutscene, 0.0) {
            Some(fade) => self.goto(Phase::CutsceneOut(fade)),
            None => self.begin_hud_in(),
        }
    }

    fn begin_hud_in(&mut self) -> Flow {
        match self.fade_for(Slot::Hud, 1.0) {
            Some(fade) => self.goto(Phase::HudIn(fade)),
            None => self.finish_run(),
        }
    }

    fn finish_run(&mut self) -> Flow {
        if self.unlock_player_on_end {
            self.set_player_lock(false);
        }
        self.active = false;
        self.sequence = None;
        info!("[dialogue] run {} finished", self.run_id);
        self.suspend(Phase::Idle)
    }

    // ------------------------------------------------------------------
    // Steps
    // ------------------------------------------------------------------

    fn begin_step(&mut self) -> Flow {
        let Some(step) = self
            .sequence
            .as_ref()
            .and_then(|sequence| sequence.get(self.step_index))
        else {
            return self.begin_exit();
        };

        debug!(
            "[dialogue] triggering step {}: {} ({:?})",
            self.step_index, step.name, step.kind
        );
        let kind = step.kind;
        let has_lines = !step.text_lines.is_empty();
        let wait_for_completion = step.wait_for_completion;
        let wait_duration = step.wait_duration;
        let on_event = match kind {
            StepType::Event => step.on_event.clone(),
            _ => EventCallback::unbound(),
        };

        self.advance_requested = false;

        match kind {
            // Empty Text steps skip straight on, box fade included.
            StepType::Text if !has_lines => self.finish_step(),
            StepType::Text => {
                self.line_index = 0;
                match self.dialogue_box.as_mut() {
                    Some(surface) if surface.alpha() < 0.5 => {
                        surface.set_blocking(true);
                        surface.set_interactable(true);
                        let fade =
                            FadeController::from_surface(&**surface, 1.0, self.config.fade_duration);
                        self.goto(Phase::BoxIn(fade))
                    }
                    _ => self.begin_line(),
                }
            }
            StepType::Event => {
                self.completion.set(false);
                self.waiting_for_event = wait_for_completion;
                let failures = on_event.invoke();
                if failures > 0 {
                    warn!(
                        "[dialogue] {} subscriber(s) failed in event step {}",
                        failures, self.step_index
                    );
                }
                if !wait_for_completion {
                    return self.finish_step();
                }
                // A subscriber may have completed the event synchronously.
                if self.completion.replace(false) {
                    self.waiting_for_event = false;
                    self.finish_step()
                } else {
                    self.suspend(Phase::AwaitEvent)
                }
            }
            // NaN and infinite durations count as zero.
            StepType::Wait if !wait_duration.is_finite() || wait_duration <= 0.0 => {
                self.finish_step()
            }
            StepType::Wait => self.suspend(Phase::Waiting {
                elapsed: 0.0,
                duration: wait_duration,
            }),
        }
    }

    fn finish_step(&mut self) -> Flow {
        self.step_index += 1;
        self.goto(Phase::StepStart)
    }

    fn begin_line(&mut self) -> Flow {
        let line = self
            .sequence
            .as_ref()
            .and_then(|sequence| sequence.get(self.step_index))
            .and_then(|step| step.text_lines.get(self.line_index))
            .cloned()
            .unwrap_or_default();

        let reveal = TextRevealer::new(&line, self.config.reveal_interval);
        if let Some(display) = self.text_display.as_mut() {
            display.set_text(&line);
            display.set_visible_characters(0);
        }
        self.line_text = line;
        self.visible_chars = 0;
        self.revealing = true;
        self.skip_requested = false;
        self.suspend(Phase::Revealing(reveal))
    }

    fn begin_box_out(&mut self) -> Flow {
        match self.fade_for(Slot::DialogueBox, 0.0) {
            Some(fade) => self.goto(Phase::BoxOut(fade)),
            None => {
                if let Some(display) = self.text_display.as_mut() {
                    display.clear();
                }
                self.finish_step()
            }
        }
    }

    fn show_visible(&mut self, count: usize) {
        self.visible_chars = count;
        if let Some(display) = self.text_display.as_mut() {
            display.set_visible_characters(count);
        }
    }

    fn current_step_kind(&self) -> Option<StepType> {
        self.sequence
            .as_ref()?
            .get(self.step_index)
            .map(|step| step.kind)
    }

    fn current_line_count(&self) -> usize {
        self.sequence
            .as_ref()
            .and_then(|sequence| sequence.get(self.step_index))
            .map_or(0, |step| step.text_lines.len())
    }

    // ------------------------------------------------------------------
    // Collaborators
    // ------------------------------------------------------------------

    fn surface_mut(&mut self, slot: Slot) -> Option<&mut Box<dyn UiSurface>> {
        match slot {
            Slot::DialogueBox => self.dialogue_box.as_mut(),
            Slot::Cutscene => self.cutscene_layer.as_mut(),
            Slot::Hud => self.player_hud.as_mut(),
        }
    }

    /// A fade from the surface's current alpha, or `None` when the surface is
    /// missing.
    fn fade_for(&mut self, slot: Slot, target: f32) -> Option<FadeController> {
        let duration = self.config.fade_duration;
        self.surface_mut(slot)
            .map(|surface| FadeController::from_surface(&**surface, target, duration))
    }

    /// Step a fade on its surface. Returns the fade while it still needs
    /// frames, `None` once the surface sits at the target.
    fn drive_fade(&mut self, slot: Slot, mut fade: FadeController, dt: f32) -> Option<FadeController> {
        let next = fade.advance(dt);
        let surface = self.surface_mut(slot);
        match next {
            Some(alpha) => {
                if let Some(surface) = surface {
                    surface.set_alpha(alpha);
                }
                Some(fade)
            }
            None => {
                if let Some(surface) = surface {
                    surface.set_alpha(fade.target());
                }
                None
            }
        }
    }

    fn set_player_lock(&mut self, locked: bool) {
        let Some(gate) = self.player_gate.as_mut() else {
            return;
        };
        gate.set_look(!locked);
        gate.set_move(!locked);
        if !locked {
            gate.cancel_forced_look();
        }
    }
}
