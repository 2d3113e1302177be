/// Lighthouse demo: the supply-crate scene from start to finish.
///
/// The player walks up to a crate, sees the interaction prompt and opens it.
/// The scene fades the screen to black through a ScreenFader, holds, fades
/// back in and reads the crate's contents. The prompt stays hidden the whole
/// time dialogue is playing.
///
/// Run with: RUST_LOG=debug cargo run --example lighthouse

use dialogue_sequencer::core::config::EngineConfig;
use dialogue_sequencer::core::engine::DialogueEngine;
use dialogue_sequencer::core::fade::ScreenFader;
use dialogue_sequencer::core::interaction::{Interactable, InteractionGate};
use dialogue_sequencer::core::surface::{
    CanvasGroup, ControllerFlags, ScriptedInput, TextLabel, UiSurface,
};
use dialogue_sequencer::core::trigger::DialogueTrigger;
use dialogue_sequencer::schema::callback::EventCallback;
use dialogue_sequencer::schema::template::TemplateLibrary;
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

const DT: f32 = 1.0 / 30.0;

fn main() {
    let _ = pretty_env_logger::try_init();

    // --- Load scenes and tunables ---
    let mut library = TemplateLibrary::new();
    library
        .load_dir(Path::new("dialogue_data"))
        .expect("Failed to load dialogue templates");
    let config = EngineConfig::load_from_ron(Path::new("dialogue_data/config/engine.ron"))
        .expect("Failed to load engine config");

    // --- Scene objects ---
    let dialogue_box = CanvasGroup::shared(0.0);
    let cutscene = CanvasGroup::shared(0.0);
    let hud = CanvasGroup::shared(1.0);
    let label = TextLabel::shared();
    let player = ControllerFlags::shared();
    let black_screen = CanvasGroup::shared(0.0);

    let mut engine = DialogueEngine::builder()
        .config(config)
        .dialogue_box(Rc::clone(&dialogue_box))
        .cutscene_layer(Rc::clone(&cutscene))
        .player_hud(Rc::clone(&hud))
        .text_display(Rc::clone(&label))
        .player_gate(Rc::clone(&player))
        .build();

    let screen: Box<dyn UiSurface> = Box::new(Rc::clone(&black_screen));
    let fader = Rc::new(RefCell::new(
        ScreenFader::new(Some(screen), 0.6).with_completion(engine.completion_handle()),
    ));

    // --- The crate's trigger: the template's steps with this scene's wiring ---
    let template = library
        .require("supply_crate")
        .expect("supply_crate scene missing");
    let mut steps = template.steps.clone();
    for step in steps.iter_mut() {
        let fader = Rc::clone(&fader);
        match step.name.as_str() {
            "Fade out" => {
                step.on_event = EventCallback::from_fn(move || fader.borrow_mut().fade_out())
            }
            "Fade in" => {
                step.on_event = EventCallback::from_fn(move || fader.borrow_mut().fade_in())
            }
            _ => {}
        }
    }
    let crate_trigger = DialogueTrigger {
        lock_player: template.lock_player,
        unlock_player_on_end: template.unlock_player_on_end,
        ..DialogueTrigger::from_steps(steps)
    };

    let opened = Rc::new(Cell::new(false));
    let supply_crate = {
        let opened = Rc::clone(&opened);
        Interactable::new("Open crate", EventCallback::from_fn(move || opened.set(true)))
    };

    // --- Frame loop ---
    let mut input = ScriptedInput::default();
    let mut shown = String::new();
    let mut last_prompt = None;
    let mut hold = 0.0f32;

    for frame in 0..3_000 {
        let looking_at_crate = frame >= 15;
        let interact_pressed = frame == 30;

        let focus = if looking_at_crate { Some(&supply_crate) } else { None };
        let prompt = InteractionGate::poll(&engine, focus, interact_pressed);
        if prompt.text != last_prompt {
            match &prompt.text {
                Some(text) => println!("[prompt] {}", text),
                None => println!("[prompt] (hidden)"),
            }
            last_prompt = prompt.text.clone();
        }

        if opened.replace(false) {
            println!("\n--- Opening the supply crate ---\n");
            crate_trigger.trigger(&mut engine);
        }

        // Hold each finished line for a second, then press advance.
        if engine.is_awaiting_advance() {
            hold += DT;
            if hold >= 1.0 {
                hold = 0.0;
                input.push(true);
            }
        }

        fader.borrow_mut().tick(DT);
        engine.update(DT, Some(&mut input));

        let visible = label.borrow().visible_text();
        if engine.is_awaiting_advance() && visible != shown {
            println!("    \"{}\"", visible);
            shown = visible;
        }

        if frame > 30 && !engine.is_active() {
            break;
        }
    }

    println!("\n--- Scene over ---");
    println!("HUD alpha:        {:.2}", hud.borrow().alpha);
    println!("Cutscene alpha:   {:.2}", cutscene.borrow().alpha);
    println!("Black screen:     {:.2}", black_screen.borrow().alpha);
    println!("Player can move:  {}", player.borrow().can_move);
}
