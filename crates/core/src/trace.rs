//! Deterministic playthrough traces.
//!
//! A trace records what a reader would see when always taking the first
//! choice. Tests and the CLI use it to check that compiled stories play.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::graph::LabelGraph;
use crate::label::LabelId;
use crate::player::{PlayView, Player};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub step: usize,
    pub label: LabelId,
    pub view: PlayView,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayTrace {
    pub steps: Vec<TraceStep>,
}

impl PlayTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: usize, label: LabelId, view: PlayView) {
        self.steps.push(TraceStep { step, label, view });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Labels in the order they were entered, without consecutive repeats.
    pub fn label_path(&self) -> Vec<&LabelId> {
        let mut path: Vec<&LabelId> = Vec::new();
        for step in &self.steps {
            if path.last() != Some(&&step.label) {
                path.push(&step.label);
            }
        }
        path
    }
}

/// Plays `graph` from the cover for at most `max_steps` views, taking the
/// first option at every menu. Stops early at a label with no way forward.
pub fn run_headless(graph: Arc<LabelGraph>, max_steps: usize) -> PlayTrace {
    let mut player = Player::new(graph);
    let mut trace = PlayTrace::new();

    for step in 0..max_steps {
        let Ok(view) = player.view() else {
            break;
        };
        let is_menu = matches!(view, PlayView::Menu { .. });
        trace.push(step, player.current().clone(), view);
        let moved = if is_menu {
            player.choose(0).map(|_| ())
        } else {
            player.advance()
        };
        if let Err(err) = moved {
            tracing::debug!(%err, step, "playthrough stopped");
            break;
        }
    }

    trace
}
