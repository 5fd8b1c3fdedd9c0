//! Compiled label graph and its analysis.
//!
//! The graph is the narrow, serializable interface handed to a playback
//! engine: an ordered list of labels, each with renderable content and a
//! resolved continuation.
//!
//! # Contracts
//! - **Postcondition** (of compilation): every target returned by
//!   [`LabelGraph::targets`] names a label of the same graph.
//! - Cycles are expected (the ending returns to the cover); analysis here
//!   never rejects them.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::label::LabelId;

mod export;

pub use export::GraphEnvelope;

// =============================================================================
// Content
// =============================================================================

/// A displayable dialogue line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub speaker: Option<String>,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverCard {
    pub image: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub cta: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingCard {
    pub image: Option<String>,
    pub title: String,
    pub message: String,
    pub cta: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneContent {
    pub background: Option<String>,
    /// Opaque display color.
    pub accent: Option<String>,
    pub lines: Vec<Line>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LabelContent {
    Cover(CoverCard),
    Scene(SceneContent),
    Ending(EndingCard),
}

// =============================================================================
// Continuations
// =============================================================================

/// A selectable narrative choice with its resolved target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceBranch {
    pub index: usize,
    pub caption: String,
    pub target: LabelId,
}

/// How playback leaves a label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Continuation {
    /// Advancing past the final line jumps to `target`. Earlier lines carry no
    /// forced target.
    AfterLastLine { target: LabelId },
    /// A single default control, not a narrative choice.
    Continue { caption: String, target: LabelId },
    /// Only the choices lead on; there is no automatic advance.
    Menu { choices: Vec<ChoiceBranch> },
    /// No way forward (a cover with nothing to start).
    Terminal,
}

impl Continuation {
    /// Every label this continuation may jump to, in choice order.
    pub fn targets(&self) -> Vec<&LabelId> {
        match self {
            Self::AfterLastLine { target } | Self::Continue { target, .. } => vec![target],
            Self::Menu { choices } => choices.iter().map(|choice| &choice.target).collect(),
            Self::Terminal => Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelNode {
    pub id: LabelId,
    pub content: LabelContent,
    pub continuation: Continuation,
}

// =============================================================================
// Graph
// =============================================================================

/// Labels in emission order: cover, scenes in authored order, then ending.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelGraph {
    pub labels: Vec<LabelNode>,
    /// Where the cover leads, if anywhere.
    pub start: Option<LabelId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    AfterLastLine,
    Continue,
    Choice { index: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: LabelId,
    pub to: LabelId,
    pub kind: EdgeKind,
    pub caption: Option<String>,
}

/// Statistics about a compiled graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_labels: usize,
    pub scene_labels: usize,
    pub line_count: usize,
    pub choice_count: usize,
    pub edge_count: usize,
    pub reachable_labels: usize,
    pub unreachable_labels: usize,
}

impl LabelGraph {
    pub fn get(&self, id: &LabelId) -> Option<&LabelNode> {
        self.labels.iter().find(|node| &node.id == id)
    }

    pub fn contains(&self, id: &LabelId) -> bool {
        self.get(id).is_some()
    }

    pub fn cover(&self) -> Option<&LabelNode> {
        self.get(&LabelId::Cover)
    }

    pub fn ending(&self) -> Option<&LabelNode> {
        self.get(&LabelId::Ending)
    }

    pub fn label_ids(&self) -> impl Iterator<Item = &LabelId> {
        self.labels.iter().map(|node| &node.id)
    }

    /// Every emitted jump target, in label order.
    pub fn targets(&self) -> impl Iterator<Item = &LabelId> {
        self.labels
            .iter()
            .flat_map(|node| node.continuation.targets())
    }

    /// Targets that name no label of this graph. Empty for compiled graphs.
    pub fn dangling_targets(&self) -> Vec<&LabelId> {
        let known: HashSet<&LabelId> = self.label_ids().collect();
        self.targets().filter(|target| !known.contains(target)).collect()
    }

    pub fn edges(&self) -> Vec<GraphEdge> {
        let mut edges = Vec::new();
        for node in &self.labels {
            match &node.continuation {
                Continuation::AfterLastLine { target } => edges.push(GraphEdge {
                    from: node.id.clone(),
                    to: target.clone(),
                    kind: EdgeKind::AfterLastLine,
                    caption: None,
                }),
                Continuation::Continue { caption, target } => edges.push(GraphEdge {
                    from: node.id.clone(),
                    to: target.clone(),
                    kind: EdgeKind::Continue,
                    caption: Some(caption.clone()),
                }),
                Continuation::Menu { choices } => {
                    edges.extend(choices.iter().map(|choice| GraphEdge {
                        from: node.id.clone(),
                        to: choice.target.clone(),
                        kind: EdgeKind::Choice {
                            index: choice.index,
                        },
                        caption: Some(choice.caption.clone()),
                    }))
                }
                Continuation::Terminal => {}
            }
        }
        edges
    }

    /// Labels reachable from the cover, by BFS.
    pub fn reachable(&self) -> HashSet<&LabelId> {
        let mut visited: HashSet<&LabelId> = HashSet::new();
        let mut queue: VecDeque<&LabelNode> = VecDeque::new();
        if let Some(cover) = self.cover() {
            visited.insert(&cover.id);
            queue.push_back(cover);
        }
        while let Some(node) = queue.pop_front() {
            for target in node.continuation.targets() {
                let Some(next) = self.get(target) else {
                    continue;
                };
                if visited.insert(&next.id) {
                    queue.push_back(next);
                }
            }
        }
        visited
    }

    /// Labels no playthrough can reach, in label order.
    pub fn unreachable_labels(&self) -> Vec<&LabelId> {
        let reachable = self.reachable();
        self.label_ids()
            .filter(|id| !reachable.contains(id))
            .collect()
    }

    pub fn stats(&self) -> GraphStats {
        let reachable_labels = self.reachable().len();
        let scenes = self
            .labels
            .iter()
            .filter_map(|node| match &node.content {
                LabelContent::Scene(scene) => Some((scene, &node.continuation)),
                _ => None,
            });
        let mut stats = GraphStats {
            total_labels: self.labels.len(),
            reachable_labels,
            unreachable_labels: self.labels.len().saturating_sub(reachable_labels),
            edge_count: self.edges().len(),
            ..GraphStats::default()
        };
        for (scene, continuation) in scenes {
            stats.scene_labels += 1;
            stats.line_count += scene.lines.len();
            if let Continuation::Menu { choices } = continuation {
                stats.choice_count += choices.len();
            }
        }
        stats
    }
}

#[cfg(test)]
#[path = "tests/graph_tests.rs"]
mod tests;
