use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::*;
use crate::error::{CgError, CgResult};
use crate::version::GRAPH_FORMAT_VERSION;

/// Versioned wrapper written by [`LabelGraph::to_json`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEnvelope {
    pub graph_format_version: u16,
    pub fingerprint: String,
    pub graph: LabelGraph,
}

impl LabelGraph {
    /// SHA-256 of the graph's JSON form, hex encoded.
    ///
    /// Equal graphs always share a fingerprint, so it doubles as a cache key
    /// for playback collaborators.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        let digest = Sha256::digest(&bytes);
        digest.iter().map(|byte| format!("{byte:02x}")).collect()
    }

    pub fn to_envelope(&self) -> GraphEnvelope {
        GraphEnvelope {
            graph_format_version: GRAPH_FORMAT_VERSION,
            fingerprint: self.fingerprint(),
            graph: self.clone(),
        }
    }

    /// Serializes the graph inside a versioned envelope.
    pub fn to_json(&self) -> CgResult<String> {
        serde_json::to_string_pretty(&self.to_envelope()).map_err(|err| {
            CgError::Serialization {
                message: err.to_string(),
                src: String::new(),
                span: (0, 0).into(),
            }
        })
    }

    /// Exports the graph to DOT format for visualization with Graphviz.
    pub fn to_dot(&self) -> String {
        let reachable = self.reachable();
        let node_names: HashMap<&LabelId, String> = self
            .labels
            .iter()
            .enumerate()
            .map(|(position, node)| (&node.id, format!("n{position}")))
            .collect();

        let mut dot = String::from("digraph LabelGraph {\n");
        dot.push_str("    rankdir=TB;\n");
        dot.push_str("    node [shape=box];\n\n");

        for (position, node) in self.labels.iter().enumerate() {
            let color = if !reachable.contains(&node.id) {
                "red"
            } else if node.id == LabelId::Cover {
                "green"
            } else {
                "black"
            };
            let label = match &node.content {
                LabelContent::Cover(cover) => format!("[cover] {}", escape(&cover.title)),
                LabelContent::Ending(ending) => format!("[ending] {}", escape(&ending.title)),
                LabelContent::Scene(scene) => {
                    format!("[{}] {} lines", escape(&node.id.to_string()), scene.lines.len())
                }
            };
            let shape = match &node.continuation {
                Continuation::Menu { .. } => "diamond",
                Continuation::Terminal => "ellipse",
                _ => "box",
            };
            dot.push_str(&format!(
                "    n{position} [label=\"{label}\" shape={shape} color={color}];\n"
            ));
        }

        dot.push('\n');

        for edge in self.edges() {
            let (Some(from), Some(to)) = (node_names.get(&edge.from), node_names.get(&edge.to))
            else {
                continue;
            };
            let style = match edge.kind {
                EdgeKind::AfterLastLine => "solid",
                EdgeKind::Continue => "dashed",
                EdgeKind::Choice { .. } => "bold",
            };
            let label = edge
                .caption
                .as_deref()
                .map(|caption| format!(" label=\"{}\"", escape(caption)))
                .unwrap_or_default();
            dot.push_str(&format!("    {from} -> {to} [style={style}{label}];\n"));
        }

        dot.push_str("}\n");
        dot
    }
}

/// Makes `text` safe inside a quoted DOT string. Backslashes are doubled so
/// Graphviz escapes like `\n` and `\l` stay literal text.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "'")
}
