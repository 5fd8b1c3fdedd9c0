//! Compiler for CG countdown stories.
//!
//! A loosely-structured JSON script (cover, ordered scenes, optional ending)
//! is normalized into a canonical form and compiled into a [`LabelGraph`]
//! whose every jump target exists. Compilation never fails; only parsing and
//! configuration can.

mod compile;
mod config;
mod error;
mod graph;
mod label;
mod lint;
mod player;
mod resolve;
mod resource;
mod script;
mod session;
mod trace;
mod version;

pub use compile::{compile, compile_json, compile_script};
pub use config::{CompilerConfig, CoverDefaults, EndingDefaults};
pub use error::{CgError, CgResult, PlayError};
pub use graph::{
    ChoiceBranch, Continuation, CoverCard, EdgeKind, EndingCard, GraphEdge, GraphEnvelope,
    GraphStats, LabelContent, LabelGraph, LabelNode, Line, SceneContent,
};
pub use label::{LabelId, COVER_LABEL, ENDING_LABEL};
pub use lint::{lint_script, LintIssue, LintReport, Severity};
pub use player::{PlayView, Player};
pub use resolve::resolve_continuation;
pub use resource::ResourceLimiter;
pub use script::{
    normalize, script_json_schema, ChoiceCanonical, ChoiceRaw, CoverRaw, EndingRaw, LineRaw,
    SceneCanonical, SceneIndex, SceneRaw, ScriptCanonical, ScriptRaw,
};
pub use session::ScriptSession;
pub use trace::{run_headless, PlayTrace, TraceStep};
pub use version::{GRAPH_FORMAT_VERSION, SCRIPT_SCHEMA_VERSION};
