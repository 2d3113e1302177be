/// Sequence Player: plays one template headlessly and prints a transcript.
///
/// Usage: sequence_player <template_file_or_dir> <template_name>
///                        [--config <engine.ron>] [--dt <seconds>] [--hold <seconds>]
///
/// Every fully revealed line is held for --hold seconds (default 0.5) and then
/// advanced. Event steps are bound to a printer that completes the step at
/// once, so waiting events never stall the run.

use dialogue_sequencer::core::config::EngineConfig;
use dialogue_sequencer::core::engine::{DialogueEngine, EngineState};
use dialogue_sequencer::core::trigger::DialogueTrigger;
use dialogue_sequencer::schema::callback::EventCallback;
use dialogue_sequencer::schema::step::StepType;
use dialogue_sequencer::schema::template::TemplateLibrary;
use std::path::Path;
use std::process;

/// Ten simulated minutes.
const MAX_TICKS: usize = 36_000;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        process::exit(0);
    }

    let templates_path = &args[1];
    let template_name = &args[2];
    let mut config_path = None;
    let mut dt: f32 = 1.0 / 60.0;
    let mut hold: f32 = 0.5;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--dt" if i + 1 < args.len() => {
                i += 1;
                dt = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --dt must be a number of seconds");
                    process::exit(1);
                });
            }
            "--hold" if i + 1 < args.len() => {
                i += 1;
                hold = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --hold must be a number of seconds");
                    process::exit(1);
                });
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    if dt <= 0.0 {
        eprintln!("Error: --dt must be positive");
        process::exit(1);
    }

    let config = match config_path {
        Some(ref path) => EngineConfig::load_from_ron(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("ERROR: Failed to load config '{}': {}", path, e);
            process::exit(1);
        }),
        None => EngineConfig::default(),
    };

    let mut library = TemplateLibrary::new();
    let path = Path::new(templates_path);
    let loaded = if path.is_dir() {
        library.load_dir(path)
    } else {
        library.load_from_ron(path)
    };
    if let Err(e) = loaded {
        eprintln!("ERROR: Failed to load templates: {}", e);
        process::exit(1);
    }

    let template = match library.require(template_name) {
        Ok(template) => template,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            eprintln!("Available: {}", library.names().join(", "));
            process::exit(1);
        }
    };

    let mut engine = DialogueEngine::new(config);

    // Play the template's steps as overrides so the printers stay bound.
    let handle = engine.completion_handle();
    let mut steps = template.steps.clone();
    for step in steps.iter_mut().filter(|step| step.kind == StepType::Event) {
        let name = step.name.clone();
        let handle = handle.clone();
        step.on_event = EventCallback::from_fn(move || {
            println!("  * event '{}'", name);
            handle.complete();
        });
    }
    let trigger = DialogueTrigger {
        lock_player: template.lock_player,
        unlock_player_on_end: template.unlock_player_on_end,
        ..DialogueTrigger::from_steps(steps)
    };

    println!(
        "Playing '{}' ({} steps, fade {}s, reveal {}s/char, dt {}s)\n",
        template_name,
        template.steps.len(),
        config.fade_duration,
        config.reveal_interval,
        dt
    );

    if !trigger.trigger(&mut engine) {
        println!("Nothing to play.");
        return;
    }

    let mut time = 0.0f32;
    let mut held = 0.0f32;
    let mut last_step = None;
    let mut last_state = engine.state();

    for _ in 0..MAX_TICKS {
        if !engine.is_active() {
            break;
        }

        engine.tick(dt);
        time += dt;

        let state = engine.state();
        if state != last_state {
            if matches!(state, EngineState::EnteringScene | EngineState::ExitingScene) {
                println!("[{:>7.2}s] {:?}", time, state);
            }
            last_state = state;
        }

        let step = engine.current_step_index();
        if step != last_step {
            if let (Some(index), Some(name)) = (step, engine.current_step_name()) {
                println!("[{:>7.2}s] step {} '{}' ({:?})", time, index, name, state);
            }
            last_step = step;
        }

        if engine.is_awaiting_advance() {
            if held == 0.0 {
                println!("  > {}", engine.current_line().unwrap_or_default());
            }
            held += dt;
            if held >= hold {
                held = 0.0;
                engine.request_advance();
            }
        }
    }

    if engine.is_active() {
        eprintln!("\nERROR: sequence still running after {} ticks", MAX_TICKS);
        process::exit(1);
    }
    println!("\n[{:>7.2}s] finished", time);
}

fn print_usage() {
    println!("Usage: sequence_player <template_file_or_dir> <template_name>");
    println!("                       [--config <engine.ron>] [--dt <seconds>] [--hold <seconds>]");
}
