//! Continuation resolution.
//!
//! One policy turns any scene-level or choice-level reference into a label
//! that is guaranteed to exist in the compiled graph. First match wins:
//!
//! 1. `candidate` is a reserved word (`cover`, or `ending` when the script
//!    has one) or an existing scene id: use it.
//! 2. `fallback` is an existing scene: use it.
//! 3. The script has an ending: `ending`.
//! 4. Otherwise `cover`.
//!
//! For a scene's own continuation, `fallback` is the next scene in authored
//! order. For a choice, `fallback` is the scene's own resolved continuation.
//! Only scene fallbacks are taken; a reserved one falls to rules 3 and 4.

use crate::label::LabelId;
use crate::script::SceneIndex;

pub fn resolve_continuation(
    candidate: Option<&str>,
    index: &SceneIndex,
    fallback: Option<&LabelId>,
    has_ending: bool,
) -> LabelId {
    if let Some(candidate) = candidate.filter(|candidate| !candidate.is_empty()) {
        match LabelId::reserved(candidate) {
            Some(LabelId::Ending) if !has_ending => {
                tracing::debug!("reference to `ending` without an ending, falling back");
            }
            Some(reserved) => return reserved,
            None if index.contains(candidate) => return LabelId::scene(candidate),
            None => tracing::debug!(candidate, "dangling reference, falling back"),
        }
    }

    if let Some(fallback) = fallback {
        if let Some(id) = fallback.as_scene().filter(|id| index.contains(id)) {
            return LabelId::scene(id);
        }
    }

    if has_ending {
        LabelId::Ending
    } else {
        LabelId::Cover
    }
}

#[cfg(test)]
#[path = "tests/resolve_tests.rs"]
mod tests;
