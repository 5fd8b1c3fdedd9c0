//! Normalization of raw scripts into their canonical form.
//!
//! The canonical form is what the resolver and compiler work on: scenes with
//! unique non-empty ids in authored order, an id index, cover and ending cards
//! with every field filled, and a computed start label.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::CompilerConfig;
use crate::graph::{CoverCard, EndingCard, Line};
use crate::label::LabelId;
use crate::version::SCRIPT_SCHEMA_VERSION;

use super::raw::{ChoiceRaw, CoverRaw, EndingRaw, SceneRaw, ScriptRaw};

/// Scene id → position in [`ScriptCanonical::scenes`].
///
/// Normalization places a repeated id at its first position and fills it with
/// the content of its last occurrence, so every id maps to exactly one scene.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneIndex {
    positions: HashMap<String, usize>,
}

impl SceneIndex {
    /// Folds ids left to right; a repeated id keeps its last position.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let positions = ids
            .into_iter()
            .enumerate()
            .map(|(position, id)| (id.into(), position))
            .collect();
        Self { positions }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneCanonical {
    pub id: String,
    pub background: Option<String>,
    pub accent: Option<String>,
    pub lines: Vec<Line>,
    pub choices: Vec<ChoiceCanonical>,
    /// Explicit continuation reference, unresolved.
    pub next: Option<String>,
    /// Id of the scene that followed this one in the authored list, taken
    /// before duplicates were merged.
    pub fallback: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceCanonical {
    pub caption: String,
    /// Target reference, unresolved.
    pub next: Option<String>,
}

/// A script ready for compilation. Built only through [`normalize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptCanonical {
    pub cover: CoverCard,
    pub scenes: Vec<SceneCanonical>,
    pub index: SceneIndex,
    pub ending: Option<EndingCard>,
    pub start: Option<LabelId>,
    pub continue_caption: String,
}

impl ScriptCanonical {
    pub fn has_ending(&self) -> bool {
        self.ending.is_some()
    }

    pub fn scene(&self, id: &str) -> Option<&SceneCanonical> {
        self.index.position(id).and_then(|pos| self.scenes.get(pos))
    }
}

impl ScriptRaw {
    /// Normalizes this script. Never fails: see [`normalize`].
    pub fn normalize(&self, config: &CompilerConfig) -> ScriptCanonical {
        normalize_script(self, config)
    }
}

/// Normalizes a possibly-absent script.
///
/// `None` means the script is not configured; the caller renders that state.
pub fn normalize(raw: Option<&ScriptRaw>, config: &CompilerConfig) -> Option<ScriptCanonical> {
    raw.map(|script| normalize_script(script, config))
}

#[tracing::instrument(level = "debug", skip_all, fields(scenes = script.scenes.len()))]
fn normalize_script(script: &ScriptRaw, config: &CompilerConfig) -> ScriptCanonical {
    if let Some(version) = script.script_schema_version.as_deref() {
        if version != SCRIPT_SCHEMA_VERSION {
            tracing::warn!(
                found = version,
                expected = SCRIPT_SCHEMA_VERSION,
                "script schema version differs, reading it anyway"
            );
        }
    }

    let identified: Vec<(&str, &SceneRaw)> = script
        .scenes
        .iter()
        .enumerate()
        .filter_map(|(position, scene)| match scene_id(scene) {
            Some(id) => Some((id, scene)),
            None => {
                tracing::debug!(position, "dropping scene without id");
                None
            }
        })
        .collect();

    let mut last_seen: HashMap<&str, usize> = HashMap::new();
    for (position, &(id, _)) in identified.iter().enumerate() {
        if let Some(previous) = last_seen.insert(id, position) {
            tracing::debug!(id, previous, position, "duplicate scene id, later scene wins");
        }
    }

    // One scene per id, at its first position, with the content and sequential
    // fallback of its last occurrence.
    let mut scenes = Vec::with_capacity(last_seen.len());
    let mut positions = HashMap::with_capacity(last_seen.len());
    for &(id, _) in &identified {
        if positions.contains_key(id) {
            continue;
        }
        let Some(&last) = last_seen.get(id) else {
            continue;
        };
        if LabelId::is_reserved_word(id) {
            tracing::warn!(
                id,
                "scene id shadows a reserved label; references to it reach the reserved label"
            );
        }
        let (_, scene) = identified[last];
        let fallback = identified.get(last + 1).map(|&(next, _)| next.to_string());
        positions.insert(id.to_string(), scenes.len());
        scenes.push(canonical_scene(id, scene, fallback, config));
    }
    let index = SceneIndex { positions };

    let ending = script
        .ending
        .as_ref()
        .map(|ending| canonical_ending(ending, config));
    let start = start_label(script.start_scene.as_deref(), &scenes, &index, ending.is_some());

    ScriptCanonical {
        cover: canonical_cover(script.cover.as_ref(), config),
        scenes,
        index,
        ending,
        start,
        continue_caption: config.continue_caption.clone(),
    }
}

fn scene_id(scene: &SceneRaw) -> Option<&str> {
    scene.id.as_deref().filter(|id| !id.is_empty())
}

fn start_label(
    declared: Option<&str>,
    scenes: &[SceneCanonical],
    index: &SceneIndex,
    has_ending: bool,
) -> Option<LabelId> {
    if let Some(declared) = declared.filter(|id| index.contains(id)) {
        return Some(LabelId::scene(declared));
    }
    if let Some(declared) = declared {
        tracing::debug!(declared, "start scene not found, using first scene");
    }
    if let Some(first) = scenes.first() {
        return Some(LabelId::scene(first.id.clone()));
    }
    has_ending.then_some(LabelId::Ending)
}

fn canonical_scene(
    id: &str,
    scene: &SceneRaw,
    fallback: Option<String>,
    config: &CompilerConfig,
) -> SceneCanonical {
    SceneCanonical {
        id: id.to_string(),
        background: scene.background.clone(),
        accent: scene.accent.clone(),
        lines: scene
            .dialogue
            .iter()
            .map(|line| Line {
                speaker: line.speaker.clone().filter(|speaker| !speaker.is_empty()),
                text: line.text.clone().unwrap_or_default(),
            })
            .collect(),
        choices: scene
            .choices
            .iter()
            .enumerate()
            .map(|(index, choice)| canonical_choice(index, choice, config))
            .collect(),
        next: scene.next.clone().filter(|next| !next.is_empty()),
        fallback,
    }
}

fn canonical_choice(index: usize, choice: &ChoiceRaw, config: &CompilerConfig) -> ChoiceCanonical {
    ChoiceCanonical {
        caption: non_empty(choice.label.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| config.choice_caption_for(index)),
        next: choice.next.clone().filter(|next| !next.is_empty()),
    }
}

fn canonical_cover(cover: Option<&CoverRaw>, config: &CompilerConfig) -> CoverCard {
    let defaults = &config.cover;
    let cover = cover.cloned().unwrap_or_default();
    CoverCard {
        image: non_empty(cover.image.as_deref())
            .or_else(|| non_empty(cover.background.as_deref()))
            .map(str::to_string),
        title: or_default(cover.title.as_deref(), &defaults.title),
        subtitle: or_default(cover.subtitle.as_deref(), &defaults.subtitle),
        description: or_default(cover.description.as_deref(), &defaults.description),
        cta: or_default(cover.cta.as_deref(), &defaults.cta),
    }
}

fn canonical_ending(ending: &EndingRaw, config: &CompilerConfig) -> EndingCard {
    let defaults = &config.ending;
    EndingCard {
        image: non_empty(ending.image.as_deref()).map(str::to_string),
        title: or_default(ending.title.as_deref(), &defaults.title),
        message: or_default(ending.message.as_deref(), &defaults.message),
        cta: or_default(ending.cta.as_deref(), &defaults.cta),
    }
}

fn or_default(value: Option<&str>, default: &str) -> String {
    non_empty(value).unwrap_or(default).to_string()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
#[path = "tests/canonical_tests.rs"]
mod tests;
