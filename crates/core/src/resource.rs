use serde::{Deserialize, Serialize};

/// Size budgets for authored scripts.
///
/// Only `max_script_bytes` and `max_scenes` are enforced at ingestion; the
/// per-scene budgets are reported by the lint pass and never block compilation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimiter {
    pub max_script_bytes: usize,
    pub max_scenes: usize,
    pub max_lines_per_scene: usize,
    pub max_choices_per_scene: usize,
    pub max_text_length: usize,
    pub max_id_length: usize,
}

impl Default for ResourceLimiter {
    fn default() -> Self {
        Self {
            max_script_bytes: 512 * 1024,
            max_scenes: 512,
            max_lines_per_scene: 256,
            max_choices_per_scene: 8,
            max_text_length: 4_096,
            max_id_length: 64,
        }
    }
}

impl ResourceLimiter {
    /// Returns a limiter that accepts anything; useful for trusted fixtures.
    pub fn unbounded() -> Self {
        Self {
            max_script_bytes: usize::MAX,
            max_scenes: usize::MAX,
            max_lines_per_scene: usize::MAX,
            max_choices_per_scene: usize::MAX,
            max_text_length: usize::MAX,
            max_id_length: usize::MAX,
        }
    }
}
