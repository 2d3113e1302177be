/// Dialogue templates: reusable, RON-authored step lists and their registry.
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

use super::step::{DialogueStep, StepType};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("template not found: {0}")]
    NotFound(String),
}

/// A long-lived dialogue asset shared by any number of triggers.
///
/// Playback never reads a template directly; it is always cloned into a fresh
/// sequence first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueTemplate {
    #[serde(default = "default_true")]
    pub lock_player: bool,
    #[serde(default = "default_true")]
    pub unlock_player_on_end: bool,
    #[serde(default)]
    pub steps: Vec<DialogueStep>,
}

fn default_true() -> bool {
    true
}

impl Default for DialogueTemplate {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl DialogueTemplate {
    pub fn new(steps: Vec<DialogueStep>) -> Self {
        Self {
            lock_player: true,
            unlock_player_on_end: true,
            steps,
        }
    }

    /// Count of steps of the given kind.
    pub fn count_of(&self, kind: StepType) -> usize {
        self.steps.iter().filter(|step| step.kind == kind).count()
    }
}

/// Named registry of loaded templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: FxHashMap<String, Rc<DialogueTemplate>>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any previous one with the same name.
    pub fn register(&mut self, name: &str, template: DialogueTemplate) {
        self.templates.insert(name.to_string(), Rc::new(template));
    }

    pub fn get(&self, name: &str) -> Option<Rc<DialogueTemplate>> {
        self.templates.get(name).cloned()
    }

    pub fn require(&self, name: &str) -> Result<Rc<DialogueTemplate>, TemplateError> {
        self.get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    /// Template names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Parse a RON map of template name to template and register every entry.
    pub fn parse_ron(&mut self, ron_str: &str) -> Result<(), TemplateError> {
        let entries: FxHashMap<String, DialogueTemplate> = ron::from_str(ron_str)?;
        for (name, template) in entries {
            self.register(&name, template);
        }
        Ok(())
    }

    /// Load templates from a RON file. The file should contain a map of
    /// template name to template definition.
    pub fn load_from_ron(&mut self, path: &Path) -> Result<(), TemplateError> {
        let contents = std::fs::read_to_string(path)?;
        self.parse_ron(&contents)
    }

    /// Load every `.ron` file in a directory. Later files override earlier
    /// names.
    pub fn load_dir(&mut self, dir: &Path) -> Result<(), TemplateError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                paths.push(path);
            }
        }
        paths.sort();
        for path in paths {
            self.load_from_ron(&path)?;
        }
        Ok(())
    }
}
