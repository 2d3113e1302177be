/// Template loading and trigger integration tests.

use dialogue_sequencer::core::config::EngineConfig;
use dialogue_sequencer::core::engine::{DialogueEngine, EngineState};
use dialogue_sequencer::core::trigger::DialogueTrigger;
use dialogue_sequencer::schema::callback::EventCallback;
use dialogue_sequencer::schema::step::StepType;
use dialogue_sequencer::schema::template::{TemplateError, TemplateLibrary};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

fn fixture_library() -> TemplateLibrary {
    let _ = pretty_env_logger::try_init();
    let mut library = TemplateLibrary::new();
    library
        .load_from_ron(Path::new("tests/fixtures/templates.ron"))
        .unwrap();
    library
}

#[test]
fn fixture_templates_load() {
    let library = fixture_library();
    assert_eq!(
        library.names(),
        vec!["defaults", "greeting", "keeper_stays", "supply_crate"]
    );

    let crate_scene = library.get("supply_crate").unwrap();
    assert_eq!(crate_scene.steps.len(), 5);
    assert_eq!(crate_scene.count_of(StepType::Text), 2);
    assert_eq!(crate_scene.count_of(StepType::Event), 2);
    assert_eq!(crate_scene.count_of(StepType::Wait), 1);
    assert!(!crate_scene.steps[3].wait_for_completion);

    let keeper = library.get("keeper_stays").unwrap();
    assert!(keeper.lock_player);
    assert!(!keeper.unlock_player_on_end);
}

#[test]
fn omitted_fields_take_defaults() {
    let library = fixture_library();
    let template = library.get("defaults").unwrap();
    assert!(template.lock_player);
    assert!(template.unlock_player_on_end);

    let step = &template.steps[0];
    assert_eq!(step.name, "Step");
    assert_eq!(step.kind, StepType::Text);
    assert!(step.wait_for_completion);
    assert_eq!(step.wait_duration, 1.0);
    assert!(!step.on_event.is_bound());
}

#[test]
fn missing_file_is_io_error() {
    let mut library = TemplateLibrary::new();
    assert!(matches!(
        library.load_from_ron(Path::new("tests/fixtures/nope.ron")),
        Err(TemplateError::Io(_))
    ));
}

#[test]
fn shipped_scenes_load() {
    let mut library = TemplateLibrary::new();
    library.load_dir(Path::new("dialogue_data")).unwrap();
    assert!(library.get("supply_crate").is_some());
    assert!(library.get("arrival").is_some());
    assert!(!library.get("lamp_lit").unwrap().lock_player);

    let config = EngineConfig::load_from_ron(Path::new("dialogue_data/config/engine.ron")).unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn partial_config_keeps_defaults() {
    let config = EngineConfig::load_from_ron(Path::new("tests/fixtures/engine.ron")).unwrap();
    assert_eq!(config.fade_duration, 0.5);
    assert_eq!(config.reveal_interval, 0.02);
}

#[test]
fn template_trigger_plays_to_completion() {
    let library = fixture_library();
    let trigger = DialogueTrigger::from_template(library.require("greeting").unwrap());
    let mut engine = DialogueEngine::new(EngineConfig::instant());

    assert!(trigger.trigger(&mut engine));
    let mut lines = Vec::new();
    while engine.is_active() {
        engine.tick(0.1);
        if engine.is_awaiting_advance() {
            lines.push(engine.current_line().unwrap_or_default().to_string());
            engine.request_advance();
        }
    }
    assert_eq!(lines, vec!["Hello", "World"]);
}

#[test]
fn template_event_steps_need_external_completion() {
    let library = fixture_library();
    let trigger = DialogueTrigger::from_template(library.require("supply_crate").unwrap());
    let mut engine = DialogueEngine::new(EngineConfig::instant());
    trigger.trigger(&mut engine);

    for _ in 0..200 {
        if engine.is_awaiting_advance() {
            engine.request_advance();
        }
        engine.tick(0.1);
        if engine.is_waiting_for_event() {
            break;
        }
    }
    assert_eq!(engine.state(), EngineState::StepEvent);
    assert_eq!(engine.current_step_name(), Some("Fade out"));

    // Nothing bound to the template copy can complete it; the handle can.
    for _ in 0..20 {
        engine.tick(0.1);
    }
    assert!(engine.is_waiting_for_event());
    engine.completion_handle().complete();
    engine.tick(0.1);
    assert_eq!(engine.state(), EngineState::StepWait);
}

#[test]
fn override_steps_keep_their_bindings() {
    let library = fixture_library();
    let template = library.require("supply_crate").unwrap();
    let mut engine = DialogueEngine::new(EngineConfig::instant());

    let fired = Rc::new(Cell::new(0));
    let handle = engine.completion_handle();
    let mut steps = template.steps.clone();
    for step in steps.iter_mut().filter(|step| step.kind == StepType::Event) {
        let fired = Rc::clone(&fired);
        let handle = handle.clone();
        step.on_event = EventCallback::from_fn(move || {
            fired.set(fired.get() + 1);
            handle.complete();
        });
    }
    let trigger = DialogueTrigger::from_steps(steps);
    assert!(trigger.trigger(&mut engine));

    for _ in 0..1_000 {
        if !engine.is_active() {
            break;
        }
        if engine.is_awaiting_advance() {
            engine.request_advance();
        }
        engine.tick(0.1);
    }
    assert!(!engine.is_active());
    assert_eq!(fired.get(), 2);

    // The shared template is untouched.
    assert!(template.steps.iter().all(|step| !step.on_event.is_bound()));
}
