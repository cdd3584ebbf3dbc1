/// Fingerprint stability tests
///
/// A fingerprint must ignore key order, identity and timestamps, and must
/// change whenever a semantic field changes.
use blockcast_fingerprint::{
    compute_content_fingerprint, fingerprint_value, refresh_content_hash, DocumentationLink,
    SourceRecord, Toggle, Variable,
};
use blockcast_tree::Node;
use serde_json::{json, Value};

fn sample_source() -> SourceRecord {
    let mut source = SourceRecord::new(
        "src-1",
        "Onboarding intro",
        Node::doc(vec![Node::paragraph(vec![Node::text(
            "Welcome {{client}}. {{toggle:vip}}Priority support.{{/toggle:vip}}",
        )])]),
    );
    source.category = "sales".to_string();
    source.variables = vec![Variable {
        name: "client".to_string(),
        description: Some("Client display name".to_string()),
        example: Some("Acme".to_string()),
        required: true,
    }];
    source.toggles = vec![Toggle::new("vip")];
    source.documentation_links = vec![DocumentationLink {
        url: "https://example.com/docs".to_string(),
        anchor: "Docs".to_string(),
    }];
    source
}

fn fingerprint(source: &SourceRecord) -> String {
    compute_content_fingerprint(source).expect("fingerprint")
}

#[test]
fn test_key_order_does_not_change_fingerprint() {
    let left: Value = serde_json::from_str(
        r#"{"name":"A","category":"c","content":{"type":"doc","content":[{"type":"paragraph","attrs":{"x":1,"y":2},"content":[]}]}}"#,
    )
    .unwrap();
    let right: Value = serde_json::from_str(
        r#"{"content":{"content":[{"content":[],"attrs":{"y":2,"x":1},"type":"paragraph"}],"type":"doc"},"category":"c","name":"A"}"#,
    )
    .unwrap();

    assert_eq!(
        fingerprint_value(&left).unwrap(),
        fingerprint_value(&right).unwrap()
    );
}

#[test]
fn test_identity_and_timestamps_do_not_change_fingerprint() {
    let original = sample_source();
    let mut resaved = sample_source();
    resaved.id = "src-2".to_string();
    resaved.source_page_id = Some("98765".to_string());
    resaved.created_at = Some("2024-01-01T00:00:00Z".parse().unwrap());
    resaved.updated_at = Some("2024-06-01T12:30:00Z".parse().unwrap());
    resaved.content_hash = Some("stale".to_string());

    assert_eq!(fingerprint(&original), fingerprint(&resaved));
}

#[test]
fn test_semantic_changes_change_fingerprint() {
    let base = fingerprint(&sample_source());

    let mut content = sample_source();
    content.content = Node::doc(vec![Node::paragraph(vec![Node::text("Different")])]);

    let mut name = sample_source();
    name.name = "Renamed".to_string();

    let mut category = sample_source();
    category.category = "support".to_string();

    let mut description = sample_source();
    description.variables[0].description = Some("Legal entity name".to_string());

    let mut toggle = sample_source();
    toggle.toggles[0].name = "premium".to_string();

    let mut links = sample_source();
    links.documentation_links.clear();

    for (label, changed) in [
        ("content", content),
        ("name", name),
        ("category", category),
        ("variables[].description", description),
        ("toggles[].name", toggle),
        ("documentationLinks", links),
    ] {
        assert_ne!(base, fingerprint(&changed), "{} change must alter fingerprint", label);
    }
}

#[test]
fn test_typed_and_untyped_paths_agree() {
    let source = sample_source();
    let value = serde_json::to_value(&source).unwrap();
    assert_eq!(fingerprint(&source), fingerprint_value(&value).unwrap());
}

#[test]
fn test_host_record_matches_its_typed_form() {
    let host = json!({
        "id": "s1",
        "name": "Terms",
        "content": {
            "type": "doc",
            "version": 1,
            "content": [{
                "type": "paragraph",
                "attrs": {},
                "content": [{ "type": "text", "text": "Hello {{client}}", "marks": [] }]
            }]
        },
        "variables": [{ "name": "client" }]
    });

    let typed: SourceRecord = serde_json::from_value(host.clone()).unwrap();
    assert_eq!(typed.content.extra.get("version"), Some(&json!(1)));
    assert_eq!(fingerprint(&typed), fingerprint_value(&host).unwrap());

    let explicit = json!({
        "name": "Terms",
        "category": "",
        "content": host["content"].clone(),
        "variables": [{ "name": "client", "required": false }],
        "toggles": [],
        "documentationLinks": []
    });
    assert_eq!(
        fingerprint_value(&host).unwrap(),
        fingerprint_value(&explicit).unwrap()
    );
}

#[test]
fn test_doc_version_is_semantic() {
    let doc = |version: u64| json!({ "name": "A", "content": { "type": "doc", "version": version, "content": [] } });
    assert_ne!(
        fingerprint_value(&doc(1)).unwrap(),
        fingerprint_value(&doc(2)).unwrap()
    );
}

#[test]
fn test_refresh_content_hash_reports_changes() {
    let mut source = sample_source();
    assert!(refresh_content_hash(&mut source).unwrap());
    assert!(!refresh_content_hash(&mut source).unwrap());

    source.name = "Renamed".to_string();
    assert!(refresh_content_hash(&mut source).unwrap());
    assert_eq!(source.content_hash, Some(fingerprint(&source)));
}

#[test]
fn test_fingerprint_is_deterministic() {
    let value = json!({ "name": "A", "content": { "type": "doc", "content": [] } });
    let results: Vec<String> = (0..10).map(|_| fingerprint_value(&value).unwrap()).collect();
    for i in 1..results.len() {
        assert_eq!(results[0], results[i], "Run {} differs from run 0", i);
    }
}
