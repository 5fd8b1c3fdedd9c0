#![allow(dead_code)]

use cg_script::{compile_json, CompilerConfig, LabelGraph, LabelId};

/// Compiles a JSON script with the default config.
pub fn compile_str(script_json: &str) -> LabelGraph {
    compile_json(script_json, &CompilerConfig::default()).expect("compile script")
}

/// The label ids of `graph` in emission order, as their reference words.
pub fn label_order(graph: &LabelGraph) -> Vec<String> {
    graph.label_ids().map(ToString::to_string).collect()
}

pub fn targets_of<'g>(graph: &'g LabelGraph, id: &LabelId) -> Vec<&'g LabelId> {
    graph
        .get(id)
        .map(|node| node.continuation.targets())
        .unwrap_or_default()
}

/// A small advent-calendar day with a branch, a loop back and an ending.
pub const ADVENT_DAY: &str = r##"{
    "script_schema_version": "1.0",
    "cover": { "title": "Day 12", "subtitle": "For Robin", "cta": "Open the door" },
    "startScene": "door",
    "scenes": [
        {
            "id": "door",
            "background": "bg/door.png",
            "dialogue": [
                { "speaker": "Elf", "text": "You found door twelve." },
                { "speaker": "Elf", "text": "Peek inside?" }
            ],
            "choices": [
                { "label": "Peek", "next": "gift" },
                { "label": "Not yet", "next": "cover" }
            ]
        },
        {
            "id": "gift",
            "accent": "#b22222",
            "dialogue": [{ "text": "A tiny wooden sled." }],
            "next": "ending"
        }
    ],
    "ending": { "title": "See you tomorrow", "cta": "Close" }
}"##;
