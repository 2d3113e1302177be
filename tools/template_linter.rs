/// Template Linter: checks dialogue templates before they ship.
///
/// Usage: template_linter <template_file_or_dir> [--strict]
///
/// Errors: templates with no steps, Wait steps with a negative, NaN or
/// infinite duration.
/// Warnings: Text steps with no lines, template Event steps that wait for
/// completion (their callbacks are cleared when a sequence is built from the
/// template, so only an external completion can resume them).
/// With --strict, warnings fail the run as well.

use dialogue_sequencer::schema::step::StepType;
use dialogue_sequencer::schema::template::{DialogueTemplate, TemplateLibrary};
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: template_linter <template_file_or_dir> [--strict]");
        process::exit(0);
    }

    let target = &args[1];
    let strict = args[2..].iter().any(|arg| arg == "--strict");

    let mut library = TemplateLibrary::new();
    let path = Path::new(target);

    let loaded = if path.is_file() {
        library.load_from_ron(path)
    } else if path.is_dir() {
        library.load_dir(path)
    } else {
        eprintln!("ERROR: Path '{}' does not exist", target);
        process::exit(1);
    };

    if let Err(e) = loaded {
        eprintln!("ERROR: Failed to load templates: {}", e);
        process::exit(1);
    }

    println!("Loaded {} templates", library.len());

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    for name in library.names() {
        if let Some(template) = library.get(name) {
            lint_template(name, &template, &mut errors, &mut warnings);
        }
    }

    println!("\n=== Template Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() && (!strict || warnings.is_empty()) {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_template(
    name: &str,
    template: &DialogueTemplate,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    if template.steps.is_empty() {
        errors.push(format!("Template '{}' has no steps and will never play", name));
        return;
    }

    for (index, step) in template.steps.iter().enumerate() {
        let label = format!("Template '{}' step {} ('{}')", name, index, step.name);
        match step.kind {
            StepType::Text => {
                if step.text_lines.is_empty() {
                    warnings.push(format!("{} is a Text step with no lines", label));
                }
                if step.text_lines.iter().any(|line| line.trim().is_empty()) {
                    warnings.push(format!("{} has a blank line", label));
                }
            }
            StepType::Event => {
                if step.wait_for_completion {
                    warnings.push(format!(
                        "{} waits for completion; triggers using this template must override it or complete it externally",
                        label
                    ));
                }
            }
            StepType::Wait => {
                if !step.wait_duration.is_finite() {
                    errors.push(format!(
                        "{} has a non-finite wait duration ({}); playback treats it as zero",
                        label, step.wait_duration
                    ));
                } else if step.wait_duration < 0.0 {
                    errors.push(format!(
                        "{} has a negative wait duration ({})",
                        label, step.wait_duration
                    ));
                } else if step.wait_duration == 0.0 {
                    warnings.push(format!("{} waits for zero seconds", label));
                }
            }
        }
    }

    if !template.lock_player && !template.unlock_player_on_end {
        warnings.push(format!(
            "Template '{}' sets unlock_player_on_end: false without locking the player",
            name
        ));
    }
}
