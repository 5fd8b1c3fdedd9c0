use serde_json::json;

use super::*;
use crate::config::CompilerConfig;
use crate::script::ScriptRaw;

fn compiled(value: serde_json::Value) -> LabelGraph {
    ScriptRaw::from_value(value)
        .expect("decodes")
        .expect("object script")
        .compile(&CompilerConfig::default())
}

fn branching() -> LabelGraph {
    compiled(json!({
        "cover": { "title": "Day \"24\"" },
        "scenes": [
            {
                "id": "hub",
                "dialogue": [{ "text": "Pick one" }],
                "choices": [{ "label": "Left", "next": "left" }, { "label": "Right", "next": "right" }]
            },
            { "id": "left", "dialogue": [{ "text": "L" }], "next": "ending" },
            { "id": "right", "dialogue": [{ "text": "R" }, { "text": "R2" }], "next": "ending" },
            { "id": "orphan", "dialogue": [{ "text": "never shown" }] }
        ],
        "ending": {}
    }))
}

fn scene_node(id: &str, continuation: Continuation) -> LabelNode {
    LabelNode {
        id: LabelId::scene(id),
        content: LabelContent::Scene(SceneContent {
            background: None,
            accent: None,
            lines: Vec::new(),
        }),
        continuation,
    }
}

#[test]
fn lookup_by_label_id() {
    let graph = branching();
    assert!(graph.cover().is_some());
    assert!(graph.ending().is_some());
    assert!(graph.contains(&LabelId::scene("orphan")));
    assert!(!graph.contains(&LabelId::scene("missing")));
}

#[test]
fn compiled_graph_has_no_dangling_targets() {
    assert!(branching().dangling_targets().is_empty());
}

#[test]
fn dangling_targets_are_detected_in_hand_built_graphs() {
    let graph = LabelGraph {
        labels: vec![scene_node(
            "a",
            Continuation::AfterLastLine {
                target: LabelId::scene("b"),
            },
        )],
        start: None,
    };
    assert_eq!(graph.dangling_targets(), [&LabelId::scene("b")]);
}

#[test]
fn edges_follow_continuations() {
    let graph = branching();
    let edges = graph.edges();

    let from_hub: Vec<&GraphEdge> = edges
        .iter()
        .filter(|edge| edge.from == LabelId::scene("hub"))
        .collect();
    assert_eq!(from_hub.len(), 2);
    assert_eq!(from_hub[1].kind, EdgeKind::Choice { index: 1 });
    assert_eq!(from_hub[1].caption.as_deref(), Some("Right"));

    let cover_edge = edges
        .iter()
        .find(|edge| edge.from == LabelId::Cover)
        .expect("cover edge");
    assert_eq!(cover_edge.kind, EdgeKind::Continue);
    assert_eq!(cover_edge.to, LabelId::scene("hub"));
}

#[test]
fn reachability_starts_at_the_cover() {
    let graph = branching();
    assert_eq!(graph.unreachable_labels(), [&LabelId::scene("orphan")]);

    let reachable = graph.reachable();
    assert!(reachable.contains(&LabelId::Ending));
    assert!(reachable.contains(&LabelId::scene("right")));
}

#[test]
fn stats_summarize_the_graph() {
    let stats = branching().stats();
    assert_eq!(
        stats,
        GraphStats {
            total_labels: 6,
            scene_labels: 4,
            line_count: 5,
            choice_count: 2,
            // cover, 2 choices, left, right, orphan, ending
            edge_count: 7,
            reachable_labels: 5,
            unreachable_labels: 1,
        }
    );
}

#[test]
fn dot_export_marks_start_and_unreachable_labels() {
    let dot = branching().to_dot();
    assert!(dot.starts_with("digraph LabelGraph {"));
    assert!(dot.contains("n0 [label=\"[cover] Day '24'\" shape=box color=green]"));
    assert!(dot.contains("n1 [label=\"[hub] 1 lines\" shape=diamond color=black]"));
    assert!(dot.contains("n4 [label=\"[orphan] 1 lines\" shape=box color=red]"));
    assert!(dot.contains("n1 -> n2 [style=bold label=\"Left\"]"));
    assert!(dot.contains("n0 -> n1 [style=dashed label=\"Start\"]"));
    assert!(dot.contains("n2 -> n5 [style=solid]"));
    assert!(dot.trim_end().ends_with('}'));
}

#[test]
fn dot_export_keeps_backslashes_literal() {
    let graph = compiled(json!({
        "cover": { "title": "C:\\new", "cta": "Go\\" },
        "scenes": [{ "id": "a\\b", "choices": [{ "label": "\\\"x\\", "next": "a\\b" }] }]
    }));
    let dot = graph.to_dot();

    assert!(dot.contains(r#"n0 [label="[cover] C:\\new" shape=box color=green]"#));
    assert!(dot.contains(r#"n0 -> n1 [style=dashed label="Go\\"]"#));
    assert!(dot.contains(r#"n1 [label="[a\\b] 0 lines" shape=diamond color=black]"#));
    assert!(dot.contains(r#"n1 -> n1 [style=bold label="\\'x\\"]"#));
}

#[test]
fn envelope_carries_version_and_fingerprint() {
    let graph = branching();
    let json = graph.to_json().expect("serialize");
    let envelope: GraphEnvelope = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(envelope.graph_format_version, crate::GRAPH_FORMAT_VERSION);
    assert_eq!(envelope.fingerprint, graph.fingerprint());
    assert_eq!(envelope.fingerprint.len(), 64);
    assert_eq!(envelope.graph, graph);
}

#[test]
fn fingerprint_changes_with_content() {
    let a = compiled(json!({ "scenes": [{ "id": "a" }] }));
    let b = compiled(json!({ "scenes": [{ "id": "b" }] }));
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn label_ids_serialize_with_reserved_kinds() {
    let graph = compiled(json!({ "scenes": [{ "id": "cover" }], "ending": {} }));
    let value = serde_json::to_value(&graph).expect("to json");

    assert_eq!(value["labels"][0]["id"], json!({ "kind": "cover" }));
    assert_eq!(value["labels"][1]["id"], json!({ "kind": "scene", "id": "cover" }));
    assert_eq!(value["labels"][2]["id"], json!({ "kind": "ending" }));
    assert_eq!(value["labels"][1]["continuation"]["type"], "continue");
}
