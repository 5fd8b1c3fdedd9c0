//! Label identifiers of the compiled graph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference word that always names the synthesized cover label.
pub const COVER_LABEL: &str = "cover";
/// Reference word that names the ending label when the script has one.
pub const ENDING_LABEL: &str = "ending";

/// Identifier of a node in a [`LabelGraph`](crate::LabelGraph).
///
/// The reserved labels live in their own variants, so a scene authored with
/// the id `cover` or `ending` still gets a distinct label. Serialized as
/// `{"kind":"cover"}`, `{"kind":"ending"}` or `{"kind":"scene","id":"..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum LabelId {
    Cover,
    Ending,
    Scene(String),
}

impl LabelId {
    pub fn scene(id: impl Into<String>) -> Self {
        Self::Scene(id.into())
    }

    /// Maps a reference word to its reserved label, if it is one.
    pub fn reserved(word: &str) -> Option<Self> {
        match word {
            COVER_LABEL => Some(Self::Cover),
            ENDING_LABEL => Some(Self::Ending),
            _ => None,
        }
    }

    pub fn is_reserved_word(word: &str) -> bool {
        Self::reserved(word).is_some()
    }

    pub fn as_scene(&self) -> Option<&str> {
        match self {
            Self::Scene(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cover => f.write_str(COVER_LABEL),
            Self::Ending => f.write_str(ENDING_LABEL),
            Self::Scene(id) => f.write_str(id),
        }
    }
}
