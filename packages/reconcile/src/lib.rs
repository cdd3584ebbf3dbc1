//! # Blockcast reconcile
//!
//! Tells an embed whether its Source moved on since the last sync, and shows
//! what changed. Nothing here performs I/O; callers fetch the current Source
//! and pass whatever they have. Missing data resolves to "not stale".

pub mod diff;
pub mod staleness;

pub use diff::{build_ghost_diff, ghost_text, line_diff, DiffKind, DiffLine, DiffSummary, GhostDiff};
pub use staleness::{check_staleness, is_stale, StalenessBasis, StalenessVerdict};

use blockcast_fingerprint::{compute_content_fingerprint, SourceRecord};
use blockcast_transform::EmbedConfig;
use serde::Serialize;
use tracing::{instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub verdict: StalenessVerdict,
    /// Present when the embed is stale and kept a copy of the synced content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<GhostDiff>,
}

/// Compare an embed against the current state of its source.
///
/// The source fingerprint is its stored `contentHash`, recomputed when absent.
#[instrument(skip_all, fields(source = %source.id))]
pub fn reconcile_embed(source: &SourceRecord, embed: &EmbedConfig) -> Reconciliation {
    let fingerprint = match &source.content_hash {
        Some(hash) => Some(hash.clone()),
        None => compute_content_fingerprint(source)
            .map_err(|error| warn!(%error, "Could not fingerprint source"))
            .ok(),
    };

    let verdict = check_staleness(
        fingerprint.as_deref(),
        embed.synced_content_hash.as_deref(),
        source.updated_at,
        embed.last_synced_at,
    );

    let diff = match (&embed.synced_content, verdict.stale) {
        (Some(synced), true) => Some(build_ghost_diff(
            synced,
            &source.content,
            &embed.variable_values,
            &embed.toggle_states,
        )),
        _ => None,
    };

    Reconciliation { verdict, diff }
}
