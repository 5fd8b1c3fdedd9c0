//! Format versioning constants for scripts and compiled graphs.

/// Schema version written by authoring surfaces that know this format.
/// Older or newer documents are still ingested; the mismatch is only reported.
pub const SCRIPT_SCHEMA_VERSION: &str = "1.0";

/// Version of the exported label graph envelope.
/// Increment when `LabelGraph` serialization changes.
pub const GRAPH_FORMAT_VERSION: u16 = 1;
