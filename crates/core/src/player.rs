//! Minimal text playback over a compiled graph.
//!
//! This is a reference consumer of the label graph interface, used by tests
//! and the CLI trace command. Rendering engines implement their own.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::PlayError;
use crate::graph::{Continuation, LabelContent, LabelGraph, LabelNode};
use crate::label::LabelId;

/// What a reader sees at the current position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayView {
    Cover {
        title: String,
        subtitle: String,
        description: String,
        /// `None` when the cover leads nowhere.
        cta: Option<String>,
    },
    Line {
        speaker: Option<String>,
        text: String,
    },
    Menu {
        options: Vec<String>,
    },
    Continue {
        caption: String,
    },
    Ending {
        title: String,
        message: String,
        cta: String,
    },
}

/// Walks a graph starting at the cover.
#[derive(Clone, Debug)]
pub struct Player {
    graph: Arc<LabelGraph>,
    label: LabelId,
    /// Index of the shown line; equal to the line count once the scene's
    /// menu or continue control is showing.
    cursor: usize,
}

impl Player {
    pub fn new(graph: Arc<LabelGraph>) -> Self {
        Self {
            graph,
            label: LabelId::Cover,
            cursor: 0,
        }
    }

    pub fn graph(&self) -> &LabelGraph {
        &self.graph
    }

    pub fn current(&self) -> &LabelId {
        &self.label
    }

    pub fn view(&self) -> Result<PlayView, PlayError> {
        let node = self.node(&self.graph)?;
        let view = match &node.content {
            LabelContent::Cover(cover) => PlayView::Cover {
                title: cover.title.clone(),
                subtitle: cover.subtitle.clone(),
                description: cover.description.clone(),
                cta: match node.continuation {
                    Continuation::Terminal => None,
                    _ => Some(cover.cta.clone()),
                },
            },
            LabelContent::Ending(ending) => PlayView::Ending {
                title: ending.title.clone(),
                message: ending.message.clone(),
                cta: ending.cta.clone(),
            },
            LabelContent::Scene(scene) => match scene.lines.get(self.cursor) {
                Some(line) => PlayView::Line {
                    speaker: line.speaker.clone(),
                    text: line.text.clone(),
                },
                None => match &node.continuation {
                    Continuation::Menu { choices } => PlayView::Menu {
                        options: choices.iter().map(|choice| choice.caption.clone()).collect(),
                    },
                    Continuation::Continue { caption, .. } => PlayView::Continue {
                        caption: caption.clone(),
                    },
                    _ => return Err(PlayError::NoAffordance(self.label.clone())),
                },
            },
        };
        Ok(view)
    }

    /// Shows the next line, or follows the label's default continuation.
    pub fn advance(&mut self) -> Result<(), PlayError> {
        let graph = Arc::clone(&self.graph);
        let node = self.node(&graph)?;
        if let LabelContent::Scene(scene) = &node.content {
            let line_count = scene.lines.len();
            if self.cursor + 1 < line_count {
                self.cursor += 1;
                return Ok(());
            }
            if self.cursor < line_count {
                if let Continuation::AfterLastLine { target } = &node.continuation {
                    return self.jump(target);
                }
                self.cursor = line_count;
                return Ok(());
            }
        }
        match &node.continuation {
            Continuation::AfterLastLine { target } | Continuation::Continue { target, .. } => {
                self.jump(target)
            }
            Continuation::Menu { .. } => Err(PlayError::ChoiceRequired(self.label.clone())),
            Continuation::Terminal => Err(PlayError::NoAffordance(self.label.clone())),
        }
    }

    /// Picks a choice of the menu currently showing and returns its target.
    pub fn choose(&mut self, index: usize) -> Result<LabelId, PlayError> {
        let graph = Arc::clone(&self.graph);
        let node = self.node(&graph)?;
        let showing_menu = match &node.content {
            LabelContent::Scene(scene) => self.cursor >= scene.lines.len(),
            _ => false,
        };
        let Continuation::Menu { choices } = &node.continuation else {
            return Err(PlayError::NoChoiceHere(self.label.clone()));
        };
        if !showing_menu {
            return Err(PlayError::NoChoiceHere(self.label.clone()));
        }
        let branch = choices.get(index).ok_or(PlayError::InvalidChoice(index))?;
        self.jump(&branch.target)?;
        Ok(branch.target.clone())
    }

    /// Moves to the first line of `label`.
    pub fn jump(&mut self, label: &LabelId) -> Result<(), PlayError> {
        if !self.graph.contains(label) {
            return Err(PlayError::UnknownLabel(label.clone()));
        }
        self.label = label.clone();
        self.cursor = 0;
        Ok(())
    }

    fn node<'g>(&self, graph: &'g LabelGraph) -> Result<&'g LabelNode, PlayError> {
        graph
            .get(&self.label)
            .ok_or_else(|| PlayError::UnknownLabel(self.label.clone()))
    }
}

#[cfg(test)]
#[path = "tests/player_tests.rs"]
mod tests;
