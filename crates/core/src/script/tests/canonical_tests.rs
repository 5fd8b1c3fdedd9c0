use serde_json::json;

use super::*;

fn raw(value: serde_json::Value) -> ScriptRaw {
    ScriptRaw::from_value(value)
        .expect("decodes")
        .expect("object script")
}

fn ids(script: &ScriptCanonical) -> Vec<&str> {
    script.scenes.iter().map(|scene| scene.id.as_str()).collect()
}

#[test]
fn absent_script_normalizes_to_none() {
    assert_eq!(normalize(None, &CompilerConfig::default()), None);
}

#[test]
fn scenes_without_id_are_dropped_in_order() {
    let script = raw(json!({
        "scenes": [{ "id": "a" }, {}, { "id": "" }, { "id": "b" }, { "id": null }, { "id": "c" }]
    }))
    .normalize(&CompilerConfig::default());

    assert_eq!(ids(&script), ["a", "b", "c"]);
    assert_eq!(script.index.position("b"), Some(1));
    assert_eq!(script.index.len(), 3);
}

#[test]
fn duplicate_ids_keep_the_last_occurrence() {
    let script = raw(json!({
        "scenes": [
            { "id": "a", "dialogue": [{ "text": "first" }] },
            { "id": "b" },
            { "id": "a", "dialogue": [{ "text": "second" }] }
        ]
    }))
    .normalize(&CompilerConfig::default());

    assert_eq!(ids(&script), ["a", "b"]);
    let a = script.scene("a").expect("scene a");
    assert_eq!(a.lines[0].text, "second");
    assert_eq!(script.start, Some(LabelId::scene("a")));
}

#[test]
fn fallbacks_follow_the_authored_list_before_merging() {
    let script = raw(json!({
        "scenes": [{ "id": "A" }, { "id": "X" }, {}, { "id": "B" }, { "id": "X" }]
    }))
    .normalize(&CompilerConfig::default());

    assert_eq!(ids(&script), ["A", "X", "B"]);
    let fallbacks: Vec<Option<&str>> = script
        .scenes
        .iter()
        .map(|scene| scene.fallback.as_deref())
        .collect();
    assert_eq!(fallbacks, [Some("X"), None, Some("X")]);
}

#[test]
fn declared_start_scene_wins_when_it_exists() {
    let script = raw(json!({
        "startScene": "b",
        "scenes": [{ "id": "a" }, { "id": "b" }]
    }))
    .normalize(&CompilerConfig::default());

    assert_eq!(script.start, Some(LabelId::scene("b")));
}

#[test]
fn unknown_start_scene_falls_back_to_first_scene() {
    let script = raw(json!({
        "startScene": "nowhere",
        "scenes": [{ "id": "a" }, { "id": "b" }]
    }))
    .normalize(&CompilerConfig::default());

    assert_eq!(script.start, Some(LabelId::scene("a")));
}

#[test]
fn start_is_ending_without_scenes_and_absent_without_both() {
    let config = CompilerConfig::default();
    let with_ending = raw(json!({ "scenes": [], "ending": {} })).normalize(&config);
    assert_eq!(with_ending.start, Some(LabelId::Ending));

    let bare = raw(json!({})).normalize(&config);
    assert_eq!(bare.start, None);
    assert!(!bare.has_ending());
}

#[test]
fn cover_defaults_fill_missing_fields() {
    let config = CompilerConfig::default();
    let script = raw(json!({
        "cover": { "background": "bg/cover.png", "title": "", "subtitle": "For Sam" }
    }))
    .normalize(&config);

    assert_eq!(script.cover.image.as_deref(), Some("bg/cover.png"));
    assert_eq!(script.cover.title, config.cover.title);
    assert_eq!(script.cover.subtitle, "For Sam");
    assert_eq!(script.cover.cta, config.cover.cta);
}

#[test]
fn cover_image_takes_precedence_over_background() {
    let script = raw(json!({ "cover": { "image": "a.png", "background": "b.png" } }))
        .normalize(&CompilerConfig::default());
    assert_eq!(script.cover.image.as_deref(), Some("a.png"));
}

#[test]
fn ending_defaults_fill_missing_fields() {
    let config = CompilerConfig::default();
    let script = raw(json!({ "ending": { "message": "See you tomorrow" } })).normalize(&config);

    let ending = script.ending.expect("ending supplied");
    assert_eq!(ending.title, config.ending.title);
    assert_eq!(ending.message, "See you tomorrow");
    assert_eq!(ending.cta, config.ending.cta);
    assert_eq!(ending.image, None);
}

#[test]
fn unlabeled_choices_get_numbered_captions() {
    let script = raw(json!({
        "scenes": [{ "id": "a", "choices": [{ "label": "Left" }, {}, { "label": "" }] }]
    }))
    .normalize(&CompilerConfig::default());

    let captions: Vec<&str> = script.scenes[0]
        .choices
        .iter()
        .map(|choice| choice.caption.as_str())
        .collect();
    assert_eq!(captions, ["Left", "Option 2", "Option 3"]);
}

#[test]
fn lines_default_missing_text_and_empty_speaker() {
    let script = raw(json!({
        "scenes": [{ "id": "a", "dialogue": [{ "speaker": "" }, { "speaker": "Elf", "text": "Hi" }] }]
    }))
    .normalize(&CompilerConfig::default());

    let lines = &script.scenes[0].lines;
    assert_eq!(lines[0], Line { speaker: None, text: String::new() });
    assert_eq!(lines[1].speaker.as_deref(), Some("Elf"));
}

#[test]
fn reserved_scene_ids_stay_distinct_scenes() {
    let script = raw(json!({ "scenes": [{ "id": "cover" }, { "id": "ending" }] }))
        .normalize(&CompilerConfig::default());

    assert_eq!(ids(&script), ["cover", "ending"]);
    assert_eq!(script.start, Some(LabelId::scene("cover")));
    assert!(!script.has_ending());
}

#[test]
fn scene_index_fold_is_last_wins() {
    let index = SceneIndex::from_ids(["a", "b", "a"]);
    assert_eq!(index.position("a"), Some(2));
    assert_eq!(index.position("b"), Some(1));
    assert!(!index.contains("c"));
}
