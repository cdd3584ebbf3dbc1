use wasm_bindgen::prelude::*;

mod api;

use blockcast_transform::{ANNOTATION_COLOR, ANNOTATION_CONTRACT_VERSION, ANNOTATION_SECTION_TITLE};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(error: api::ApiError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Sort object keys recursively
#[wasm_bindgen(js_name = normalizeTree)]
pub fn normalize_tree_js(json: &str) -> Result<String, JsValue> {
    api::normalize_tree_json(json).map_err(js_error)
}

/// Hex SHA-256 fingerprint of a source record's semantic fields
#[wasm_bindgen(js_name = computeContentFingerprint)]
pub fn compute_content_fingerprint_js(source_json: &str) -> Result<String, JsValue> {
    api::content_fingerprint_json(source_json).map_err(js_error)
}

#[wasm_bindgen(js_name = scanVariableMarkers)]
pub fn scan_variable_markers_js(tree_json: &str) -> Result<String, JsValue> {
    api::scan_variables_json(tree_json).map_err(js_error)
}

#[wasm_bindgen(js_name = scanToggleMarkers)]
pub fn scan_toggle_markers_js(tree_json: &str) -> Result<String, JsValue> {
    api::scan_toggles_json(tree_json).map_err(js_error)
}

#[wasm_bindgen(js_name = filterByToggles)]
pub fn filter_by_toggles_js(tree_json: &str, toggle_states_json: &str) -> Result<String, JsValue> {
    api::filter_by_toggles_json(tree_json, toggle_states_json).map_err(js_error)
}

/// Toggle filter that keeps disabled content, tagged `toggleGhost`
#[wasm_bindgen(js_name = ghostFilter)]
pub fn ghost_filter_js(tree_json: &str, toggle_states_json: &str) -> Result<String, JsValue> {
    api::ghost_filter_json(tree_json, toggle_states_json).map_err(js_error)
}

#[wasm_bindgen(js_name = substituteVariables)]
pub fn substitute_variables_js(tree_json: &str, variable_values_json: &str) -> Result<String, JsValue> {
    api::substitute_variables_json(tree_json, variable_values_json).map_err(js_error)
}

#[wasm_bindgen(js_name = indexParagraphs)]
pub fn index_paragraphs_js(tree_json: &str) -> Result<String, JsValue> {
    api::index_paragraphs_json(tree_json).map_err(js_error)
}

#[wasm_bindgen(js_name = insertCustomParagraphs)]
pub fn insert_custom_paragraphs_js(tree_json: &str, insertions_json: &str) -> Result<String, JsValue> {
    api::insert_custom_paragraphs_json(tree_json, insertions_json).map_err(js_error)
}

#[wasm_bindgen(js_name = insertAnnotations)]
pub fn insert_annotations_js(tree_json: &str, notes_json: &str) -> Result<String, JsValue> {
    api::insert_annotations_json(tree_json, notes_json).map_err(js_error)
}

/// Remove internal annotations before a tree leaves for a client
#[wasm_bindgen(js_name = stripAnnotations)]
pub fn strip_annotations_js(tree_json: &str) -> Result<String, JsValue> {
    api::strip_annotations_json(tree_json).map_err(js_error)
}

/// Reserved color carried by every annotation mark
#[wasm_bindgen(js_name = annotationColor)]
pub fn annotation_color_js() -> String {
    ANNOTATION_COLOR.to_string()
}

#[wasm_bindgen(js_name = annotationSectionTitle)]
pub fn annotation_section_title_js() -> String {
    ANNOTATION_SECTION_TITLE.to_string()
}

#[wasm_bindgen(js_name = annotationContractVersion)]
pub fn annotation_contract_version_js() -> u32 {
    ANNOTATION_CONTRACT_VERSION
}

/// Timestamps are RFC 3339 strings
#[wasm_bindgen(js_name = isStale)]
pub fn is_stale_js(
    source_fingerprint: Option<String>,
    synced_fingerprint: Option<String>,
    source_updated_at: Option<String>,
    last_synced_at: Option<String>,
) -> bool {
    api::staleness(
        source_fingerprint.as_deref(),
        synced_fingerprint.as_deref(),
        source_updated_at.as_deref(),
        last_synced_at.as_deref(),
    )
    .stale
}

#[wasm_bindgen(js_name = buildGhostDiff)]
pub fn build_ghost_diff_js(
    old_tree_json: &str,
    new_tree_json: &str,
    variable_values_json: &str,
    toggle_states_json: &str,
) -> Result<String, JsValue> {
    api::ghost_diff_json(
        old_tree_json,
        new_tree_json,
        variable_values_json,
        toggle_states_json,
    )
    .map_err(js_error)
}

/// Full render: toggles, variables, custom paragraphs, then annotations for
/// the `internal` audience
#[wasm_bindgen(js_name = renderEmbed)]
pub fn render_embed_js(tree_json: &str, embed_config_json: &str, audience: &str) -> Result<String, JsValue> {
    api::render_embed_json(tree_json, embed_config_json, audience).map_err(js_error)
}
