//! Compiler configuration.
//!
//! Holds the text used when the author leaves cover, ending, or choice fields
//! blank, plus the ingestion budgets. Every key is optional in TOML; missing
//! keys keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CgError, CgResult};
use crate::resource::ResourceLimiter;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub cover: CoverDefaults,
    pub ending: EndingDefaults,
    /// Caption of the control synthesized for scenes with no lines and no choices.
    pub continue_caption: String,
    /// Prefix for unlabeled choices, rendered as `"{prefix} {n}"` with `n` 1-based.
    pub choice_caption: String,
    pub limits: ResourceLimiter,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverDefaults {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub cta: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndingDefaults {
    pub title: String,
    pub message: String,
    pub cta: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            cover: CoverDefaults::default(),
            ending: EndingDefaults::default(),
            continue_caption: "Continue".to_string(),
            choice_caption: "Option".to_string(),
            limits: ResourceLimiter::default(),
        }
    }
}

impl Default for CoverDefaults {
    fn default() -> Self {
        Self {
            title: "A story for you".to_string(),
            subtitle: String::new(),
            description: String::new(),
            cta: "Start".to_string(),
        }
    }
}

impl Default for EndingDefaults {
    fn default() -> Self {
        Self {
            title: "The End".to_string(),
            message: String::new(),
            cta: "Back to start".to_string(),
        }
    }
}

impl CompilerConfig {
    pub fn from_toml_str(input: &str) -> CgResult<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Loads a config file from disk.
    pub fn load(path: impl AsRef<Path>) -> CgResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CgError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub(crate) fn choice_caption_for(&self, index: usize) -> String {
        format!("{} {}", self.choice_caption, index + 1)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
