//! Graph compilation.
//!
//! Emits the cover, one label per canonical scene in authored order, and the
//! ending when the script has one. Every continuation goes through
//! [`resolve_continuation`], so the result is dangle-free by construction and
//! compilation has no error path.

use crate::config::CompilerConfig;
use crate::error::{CgError, CgResult};
use crate::graph::{
    ChoiceBranch, Continuation, LabelContent, LabelGraph, LabelNode, SceneContent,
};
use crate::label::LabelId;
use crate::resolve::resolve_continuation;
use crate::script::{normalize, SceneCanonical, ScriptCanonical, ScriptRaw};

impl ScriptCanonical {
    /// Compiles the canonical script. Pure: equal inputs give equal graphs.
    pub fn compile(&self) -> LabelGraph {
        compile(self)
    }
}

impl ScriptRaw {
    /// Normalizes and compiles in one go.
    pub fn compile(&self, config: &CompilerConfig) -> LabelGraph {
        self.normalize(config).compile()
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(scenes = script.scenes.len()))]
pub fn compile(script: &ScriptCanonical) -> LabelGraph {
    let mut labels = Vec::with_capacity(script.scenes.len() + 2);
    labels.push(cover_label(script));

    for scene in &script.scenes {
        let fallback = scene.fallback.as_deref().map(LabelId::scene);
        labels.push(scene_label(script, scene, fallback.as_ref()));
    }

    if let Some(ending) = &script.ending {
        labels.push(LabelNode {
            id: LabelId::Ending,
            content: LabelContent::Ending(ending.clone()),
            continuation: Continuation::Continue {
                caption: ending.cta.clone(),
                target: LabelId::Cover,
            },
        });
    }

    tracing::debug!(labels = labels.len(), "compiled label graph");
    LabelGraph {
        labels,
        start: script.start.clone(),
    }
}

/// Normalizes and compiles a possibly-absent script.
///
/// `None` in, `None` out: the caller renders its "not configured" state.
pub fn compile_script(raw: Option<&ScriptRaw>, config: &CompilerConfig) -> Option<LabelGraph> {
    normalize(raw, config).map(|script| script.compile())
}

/// Parses, normalizes and compiles a JSON document.
///
/// This entry point must produce a graph, so a document that is `null` or
/// not an object surfaces as [`CgError::NotConfigured`].
pub fn compile_json(input: &str, config: &CompilerConfig) -> CgResult<LabelGraph> {
    let raw = ScriptRaw::from_json_with_limits(input, config.limits)?;
    compile_script(raw.as_ref(), config).ok_or(CgError::NotConfigured)
}

fn cover_label(script: &ScriptCanonical) -> LabelNode {
    let target = script
        .start
        .clone()
        .or_else(|| script.has_ending().then_some(LabelId::Ending));
    let continuation = match target {
        Some(target) => Continuation::Continue {
            caption: script.cover.cta.clone(),
            target,
        },
        None => Continuation::Terminal,
    };
    LabelNode {
        id: LabelId::Cover,
        content: LabelContent::Cover(script.cover.clone()),
        continuation,
    }
}

fn scene_label(
    script: &ScriptCanonical,
    scene: &SceneCanonical,
    fallback: Option<&LabelId>,
) -> LabelNode {
    let has_ending = script.has_ending();
    let next = resolve_continuation(scene.next.as_deref(), &script.index, fallback, has_ending);

    let continuation = if !scene.choices.is_empty() {
        Continuation::Menu {
            choices: scene
                .choices
                .iter()
                .enumerate()
                .map(|(index, choice)| ChoiceBranch {
                    index,
                    caption: choice.caption.clone(),
                    target: resolve_continuation(
                        choice.next.as_deref(),
                        &script.index,
                        Some(&next),
                        has_ending,
                    ),
                })
                .collect(),
        }
    } else if scene.lines.is_empty() {
        Continuation::Continue {
            caption: script.continue_caption.clone(),
            target: next,
        }
    } else {
        Continuation::AfterLastLine { target: next }
    };

    LabelNode {
        id: LabelId::scene(scene.id.clone()),
        content: LabelContent::Scene(SceneContent {
            background: scene.background.clone(),
            accent: scene.accent.clone(),
            lines: scene.lines.clone(),
        }),
        continuation,
    }
}

#[cfg(test)]
#[path = "tests/compile_tests.rs"]
mod tests;
