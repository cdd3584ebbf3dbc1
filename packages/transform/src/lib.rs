//! # Blockcast transforms
//!
//! Pure functions from a Source's render tree plus an embed's configuration to
//! the tree a viewer sees. Every pass takes `&Node` and returns a new tree.
//!
//! Marker syntax embedded in text leaves:
//!
//! - `{{name}}` variable placeholder
//! - `{{toggle:name}} ... {{/toggle:name}}` optional block, which may span
//!   several leaves and paragraphs
//!
//! [`render_embed`] composes the passes in their fixed order.

pub mod annotations;
pub mod embed;
pub mod insertions;
pub mod markers;
pub mod paragraphs;
pub mod pipeline;
pub mod toggles;
pub mod variables;

pub use annotations::{
    insert_annotations, insert_annotations_with, strip_annotations, superscript, InternalNote,
    ANNOTATION_COLOR, ANNOTATION_CONTRACT_VERSION, ANNOTATION_SECTION_ATTR, ANNOTATION_SECTION_TITLE,
};
pub use embed::{Audience, EmbedConfig};
pub use insertions::{insert_custom_paragraphs, insert_custom_paragraphs_with, CustomInsertion};
pub use markers::{
    merge_toggles, merge_variables, missing_required_variables, scan_toggle_markers,
    scan_variable_markers, strip_toggle_markers, ToggleMarker,
};
pub use paragraphs::{index_paragraphs, last_sentence, Addressing, ParagraphInfo};
pub use pipeline::{render_embed, render_ghost};
pub use toggles::{filter_by_toggles, find_toggle_ranges, ghost_filter, ToggleRange, GHOST_ATTR};
pub use variables::substitute_variables;
