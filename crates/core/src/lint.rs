//! Authoring lint.
//!
//! Compilation recovers from authoring mistakes silently. This pass names
//! each recovery so an authoring surface can show it; it never changes what
//! the compiler produces.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::CompilerConfig;
use crate::label::LabelId;
use crate::script::{SceneRaw, ScriptRaw};
use crate::version::SCRIPT_SCHEMA_VERSION;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum LintIssue {
    SchemaVersionMismatch { found: String },
    SceneWithoutId { position: usize },
    DuplicateSceneId { id: String, positions: Vec<usize> },
    ReservedIdShadowed { id: String },
    UnknownStartScene { target: String },
    DanglingNext { scene: String, target: String },
    DanglingChoiceTarget { scene: String, choice: usize, target: String },
    EmptyScene { scene: String },
    UnreachableScene { scene: String },
    TooManyLines { scene: String, count: usize, limit: usize },
    TooManyChoices { scene: String, count: usize, limit: usize },
    TextTooLong { scene: String, length: usize, limit: usize },
    IdTooLong { id: String, limit: usize },
}

impl LintIssue {
    pub fn severity(&self) -> Severity {
        match self {
            Self::SchemaVersionMismatch { .. } | Self::EmptyScene { .. } => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaVersionMismatch { found } => write!(
                f,
                "schema version '{found}' differs from '{SCRIPT_SCHEMA_VERSION}'"
            ),
            Self::SceneWithoutId { position } => {
                write!(f, "scene #{position} has no id and is skipped")
            }
            Self::DuplicateSceneId { id, positions } => write!(
                f,
                "scene id '{id}' appears at {positions:?}; the last one is used"
            ),
            Self::ReservedIdShadowed { id } => write!(
                f,
                "scene id '{id}' is a reserved label; `next: \"{id}\"` reaches the reserved label"
            ),
            Self::UnknownStartScene { target } => {
                write!(f, "start scene '{target}' does not exist")
            }
            Self::DanglingNext { scene, target } => {
                write!(f, "scene '{scene}' continues to missing '{target}'")
            }
            Self::DanglingChoiceTarget {
                scene,
                choice,
                target,
            } => write!(
                f,
                "choice {choice} of scene '{scene}' targets missing '{target}'"
            ),
            Self::EmptyScene { scene } => {
                write!(f, "scene '{scene}' has no lines or choices")
            }
            Self::UnreachableScene { scene } => {
                write!(f, "scene '{scene}' cannot be reached from the cover")
            }
            Self::TooManyLines {
                scene,
                count,
                limit,
            } => write!(f, "scene '{scene}' has {count} lines (limit {limit})"),
            Self::TooManyChoices {
                scene,
                count,
                limit,
            } => write!(f, "scene '{scene}' has {count} choices (limit {limit})"),
            Self::TextTooLong {
                scene,
                length,
                limit,
            } => write!(
                f,
                "scene '{scene}' has a {length}-byte text (limit {limit})"
            ),
            Self::IdTooLong { id, limit } => {
                write!(f, "scene id '{id}' is longer than {limit} bytes")
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReport {
    pub issues: Vec<LintIssue>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity() == Severity::Warning)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LintIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Warning)
    }
}

/// Lists every silent recovery the compiler will make for `script`.
pub fn lint_script(script: &ScriptRaw, config: &CompilerConfig) -> LintReport {
    let limits = config.limits;
    let mut issues = Vec::new();

    if let Some(found) = script
        .script_schema_version
        .as_deref()
        .filter(|version| *version != SCRIPT_SCHEMA_VERSION)
    {
        issues.push(LintIssue::SchemaVersionMismatch {
            found: found.to_string(),
        });
    }

    let mut occurrences: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (position, scene) in script.scenes.iter().enumerate() {
        match scene_id(scene) {
            Some(id) => occurrences.entry(id).or_default().push(position),
            None => issues.push(LintIssue::SceneWithoutId { position }),
        }
    }
    for (id, positions) in &occurrences {
        if positions.len() > 1 {
            issues.push(LintIssue::DuplicateSceneId {
                id: id.to_string(),
                positions: positions.clone(),
            });
        }
        if LabelId::is_reserved_word(id) {
            issues.push(LintIssue::ReservedIdShadowed { id: id.to_string() });
        }
        if id.len() > limits.max_id_length {
            issues.push(LintIssue::IdTooLong {
                id: id.to_string(),
                limit: limits.max_id_length,
            });
        }
    }

    if let Some(target) = script
        .start_scene
        .as_deref()
        .filter(|target| !target.is_empty() && !occurrences.contains_key(target))
    {
        issues.push(LintIssue::UnknownStartScene {
            target: target.to_string(),
        });
    }

    let has_ending = script.ending.is_some();
    let resolves = |target: &str| match LabelId::reserved(target) {
        Some(LabelId::Ending) => has_ending,
        Some(_) => true,
        None => occurrences.contains_key(target),
    };

    for (position, scene) in script.scenes.iter().enumerate() {
        let Some(id) = scene_id(scene) else {
            continue;
        };
        if occurrences.get(id).and_then(|p| p.last()) != Some(&position) {
            continue;
        }
        let scene_name = id.to_string();

        if let Some(target) = non_empty(scene.next.as_deref()).filter(|t| !resolves(*t)) {
            issues.push(LintIssue::DanglingNext {
                scene: scene_name.clone(),
                target: target.to_string(),
            });
        }
        for (choice, raw) in scene.choices.iter().enumerate() {
            if let Some(target) = non_empty(raw.next.as_deref()).filter(|t| !resolves(*t)) {
                issues.push(LintIssue::DanglingChoiceTarget {
                    scene: scene_name.clone(),
                    choice,
                    target: target.to_string(),
                });
            }
        }
        if scene.dialogue.is_empty() && scene.choices.is_empty() {
            issues.push(LintIssue::EmptyScene {
                scene: scene_name.clone(),
            });
        }
        if scene.dialogue.len() > limits.max_lines_per_scene {
            issues.push(LintIssue::TooManyLines {
                scene: scene_name.clone(),
                count: scene.dialogue.len(),
                limit: limits.max_lines_per_scene,
            });
        }
        if scene.choices.len() > limits.max_choices_per_scene {
            issues.push(LintIssue::TooManyChoices {
                scene: scene_name.clone(),
                count: scene.choices.len(),
                limit: limits.max_choices_per_scene,
            });
        }
        let longest = scene
            .dialogue
            .iter()
            .filter_map(|line| line.text.as_deref())
            .chain(scene.choices.iter().filter_map(|c| c.label.as_deref()))
            .map(str::len)
            .max()
            .unwrap_or(0);
        if longest > limits.max_text_length {
            issues.push(LintIssue::TextTooLong {
                scene: scene_name,
                length: longest,
                limit: limits.max_text_length,
            });
        }
    }

    let graph = script.compile(config);
    let reachable: HashSet<&LabelId> = graph.reachable();
    for id in graph.label_ids().filter(|id| !reachable.contains(id)) {
        if let Some(scene) = id.as_scene() {
            issues.push(LintIssue::UnreachableScene {
                scene: scene.to_string(),
            });
        }
    }

    LintReport { issues }
}

fn scene_id(scene: &SceneRaw) -> Option<&str> {
    non_empty(scene.id.as_deref())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
#[path = "tests/lint_tests.rs"]
mod tests;
