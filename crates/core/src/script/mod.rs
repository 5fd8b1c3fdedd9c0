mod canonical;
mod lenient;
mod raw;

pub use canonical::{normalize, ChoiceCanonical, SceneCanonical, SceneIndex, ScriptCanonical};
pub use raw::{
    script_json_schema, ChoiceRaw, CoverRaw, EndingRaw, LineRaw, SceneRaw, ScriptRaw,
};

#[cfg(test)]
#[path = "tests/raw_tests.rs"]
mod raw_tests;
