/// Determinism tests - rendering the same inputs always yields the same tree
///
/// HashMap-backed toggle states and variable values must not leak iteration
/// order into the output.

use blockcast_transform::{
    render_embed, scan_toggle_markers, scan_variable_markers, Audience, CustomInsertion,
    EmbedConfig, InternalNote,
};
use blockcast_tree::{tree_from_value, Node};
use serde_json::json;
use std::collections::HashMap;

fn proposal() -> Node {
    tree_from_value(json!({
        "type": "doc",
        "content": [
            { "type": "heading", "attrs": { "level": 1 }, "content": [{ "type": "text", "text": "Proposal for {{client}}" }] },
            { "type": "paragraph", "content": [
                { "type": "text", "text": "Dear {{contact}}, " },
                { "type": "text", "text": "{{toggle:intro}}thanks for meeting us.{{/toggle:intro}}", "marks": [{ "type": "em" }] }
            ]},
            { "type": "bulletList", "content": [
                { "type": "listItem", "content": [
                    { "type": "paragraph", "content": [{ "type": "text", "text": "Term: {{term}} months" }] }
                ]},
                { "type": "listItem", "content": [
                    { "type": "paragraph", "content": [{ "type": "text", "text": "{{toggle:support}}Support included{{/toggle:support}}" }] }
                ]}
            ]},
            { "type": "paragraph", "content": [{ "type": "text", "text": "Regards, {{owner}}." }] }
        ]
    }))
    .expect("Failed to parse")
}

fn config() -> EmbedConfig {
    EmbedConfig {
        variable_values: HashMap::from([
            ("client".to_string(), "Acme".to_string()),
            ("contact".to_string(), "Jo".to_string()),
            ("term".to_string(), "12".to_string()),
        ]),
        toggle_states: HashMap::from([
            ("intro".to_string(), true),
            ("support".to_string(), false),
        ]),
        custom_insertions: vec![CustomInsertion {
            position: 1,
            text: "Custom terms apply.".to_string(),
        }],
        internal_notes: vec![
            InternalNote {
                position: 3,
                content: "Owner unset".to_string(),
            },
            InternalNote {
                position: 0,
                content: "Check name".to_string(),
            },
        ],
        ..EmbedConfig::default()
    }
}

#[test]
fn test_render_determinism() {
    let source = proposal();
    let results: Vec<String> = (0..10)
        .map(|_| {
            let rendered = render_embed(&source, &config(), Audience::Internal);
            serde_json::to_string(&rendered).expect("Failed to serialize")
        })
        .collect();

    for i in 1..results.len() {
        assert_eq!(results[0], results[i], "Render {} differs from render 0", i);
    }
}

#[test]
fn test_scan_determinism() {
    let source = proposal();
    for _ in 0..10 {
        assert_eq!(
            scan_variable_markers(&source),
            vec!["client", "contact", "term", "owner"]
        );
        let toggles: Vec<String> = scan_toggle_markers(&source)
            .into_iter()
            .map(|marker| marker.name)
            .collect();
        assert_eq!(toggles, vec!["intro", "support"]);
    }
}
