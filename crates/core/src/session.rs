//! Compilation memoized on script identity.
//!
//! A rendering surface asks for the graph on every frame; the graph is only
//! rebuilt when it is handed a different script allocation.

use std::sync::Arc;

use crate::config::CompilerConfig;
use crate::graph::LabelGraph;
use crate::script::ScriptRaw;

#[derive(Debug, Default)]
pub struct ScriptSession {
    config: CompilerConfig,
    cached: Option<(Arc<ScriptRaw>, Arc<LabelGraph>)>,
    compiles: usize,
}

impl ScriptSession {
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            cached: None,
            compiles: 0,
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Returns the graph for `script`, compiling only when `script` is not the
    /// allocation seen last time. `None` means "not configured".
    pub fn graph(&mut self, script: Option<&Arc<ScriptRaw>>) -> Option<Arc<LabelGraph>> {
        let Some(script) = script else {
            self.cached = None;
            return None;
        };
        if let Some((cached_script, graph)) = &self.cached {
            if Arc::ptr_eq(cached_script, script) {
                return Some(Arc::clone(graph));
            }
        }
        let graph = Arc::new(script.compile(&self.config));
        self.compiles += 1;
        tracing::debug!(compiles = self.compiles, "script changed, recompiled");
        self.cached = Some((Arc::clone(script), Arc::clone(&graph)));
        Some(graph)
    }

    /// How many times this session actually compiled.
    pub fn compile_count(&self) -> usize {
        self.compiles
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
