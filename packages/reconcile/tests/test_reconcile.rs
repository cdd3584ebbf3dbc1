use blockcast_fingerprint::SourceRecord;
use blockcast_reconcile::{build_ghost_diff, is_stale, reconcile_embed, DiffKind, StalenessBasis};
use blockcast_transform::EmbedConfig;
use blockcast_tree::tree_from_value;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;

fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().expect("Invalid timestamp")
}

#[test]
fn test_fingerprints_override_timestamps() {
    let newer = Some(at("2024-06-02T09:00:00Z"));
    let older = Some(at("2024-06-01T09:00:00Z"));
    assert!(!is_stale(Some("f1"), Some("f1"), newer, older));
    assert!(is_stale(None, None, newer, older));
    assert!(!is_stale(None, None, older, newer));
}

#[test]
fn test_diff_is_independent_of_toggle_visibility() {
    let old = tree_from_value(json!({
        "type": "doc",
        "content": [
            { "type": "paragraph", "content": [{ "type": "text", "text": "Hello {{client}}." }] },
            { "type": "paragraph", "content": [{ "type": "text", "text": "{{toggle:sla}}99.9% uptime{{/toggle:sla}}" }] }
        ]
    }))
    .unwrap();
    let new = tree_from_value(json!({
        "type": "doc",
        "content": [
            { "type": "paragraph", "content": [{ "type": "text", "text": "Hello {{client}}." }] },
            { "type": "paragraph", "content": [{ "type": "text", "text": "{{toggle:sla}}99.99% uptime{{/toggle:sla}}" }] }
        ]
    }))
    .unwrap();
    let values = HashMap::from([("client".to_string(), "Acme".to_string())]);

    for enabled in [true, false] {
        let states = HashMap::from([("sla".to_string(), enabled)]);
        let diff = build_ghost_diff(&old, &new, &values, &states);
        assert_eq!(diff.line_diff[0].kind, DiffKind::Unchanged);
        assert_eq!(diff.line_diff[0].text, "Hello Acme.");
        assert_eq!(diff.summary.added, 1);
        assert_eq!(diff.summary.removed, 1);

        let removed = diff
            .line_diff
            .iter()
            .find(|line| line.kind == DiffKind::Removed)
            .unwrap();
        if enabled {
            assert_eq!(removed.text, "99.9% uptime");
        } else {
            assert_eq!(removed.text, "[toggle:sla]99.9% uptime[/toggle:sla]");
        }
    }
}

#[test]
fn test_reconcile_from_json_records() {
    let source: SourceRecord = serde_json::from_value(json!({
        "id": "src-7",
        "name": "Payment terms",
        "category": "legal",
        "content": {
            "type": "doc",
            "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "Net 45" }] }]
        },
        "updatedAt": "2024-06-02T09:00:00Z"
    }))
    .unwrap();
    let embed: EmbedConfig = serde_json::from_value(json!({
        "lastSyncedAt": "2024-06-01T09:00:00Z",
        "syncedContent": {
            "type": "doc",
            "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "Net 30" }] }]
        }
    }))
    .unwrap();

    let result = reconcile_embed(&source, &embed);
    assert!(result.verdict.stale);
    assert_eq!(result.verdict.basis, StalenessBasis::TimestampNewer);

    let diff = result.diff.unwrap();
    let texts: Vec<(DiffKind, &str)> = diff
        .line_diff
        .iter()
        .map(|line| (line.kind, line.text.as_str()))
        .collect();
    assert_eq!(
        texts,
        vec![(DiffKind::Removed, "Net 30"), (DiffKind::Added, "Net 45")]
    );

    let wire = serde_json::to_value(&diff).unwrap();
    assert_eq!(wire["lineDiff"][0]["kind"], "removed");
    assert!(wire.get("oldGhostTree").is_some());
}
