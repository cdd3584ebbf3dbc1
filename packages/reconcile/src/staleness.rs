use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What a staleness verdict was decided on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StalenessBasis {
    FingerprintMatch,
    FingerprintMismatch,
    /// Fingerprints unavailable, the source was updated after the last sync
    TimestampNewer,
    TimestampNotNewer,
    /// Not enough data to decide; reported as fresh
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StalenessVerdict {
    pub stale: bool,
    pub basis: StalenessBasis,
}

impl StalenessVerdict {
    fn new(stale: bool, basis: StalenessBasis) -> Self {
        Self { stale, basis }
    }
}

fn present(fingerprint: Option<&str>) -> Option<&str> {
    fingerprint.filter(|value| !value.is_empty())
}

/// Decide whether an embed is behind its source.
///
/// Fingerprints win when both are present. Otherwise the timestamps decide,
/// and with neither the embed counts as fresh. Empty fingerprint strings are
/// treated as missing.
pub fn check_staleness(
    source_fingerprint: Option<&str>,
    synced_fingerprint: Option<&str>,
    source_updated_at: Option<DateTime<Utc>>,
    last_synced_at: Option<DateTime<Utc>>,
) -> StalenessVerdict {
    let verdict = match (present(source_fingerprint), present(synced_fingerprint)) {
        (Some(source), Some(synced)) if source == synced => {
            StalenessVerdict::new(false, StalenessBasis::FingerprintMatch)
        }
        (Some(_), Some(_)) => StalenessVerdict::new(true, StalenessBasis::FingerprintMismatch),
        _ => match (source_updated_at, last_synced_at) {
            (Some(updated), Some(synced)) if updated > synced => {
                StalenessVerdict::new(true, StalenessBasis::TimestampNewer)
            }
            (Some(_), Some(_)) => StalenessVerdict::new(false, StalenessBasis::TimestampNotNewer),
            _ => StalenessVerdict::new(false, StalenessBasis::Unknown),
        },
    };

    debug!(stale = verdict.stale, basis = ?verdict.basis, "Checked staleness");
    verdict
}

pub fn is_stale(
    source_fingerprint: Option<&str>,
    synced_fingerprint: Option<&str>,
    source_updated_at: Option<DateTime<Utc>>,
    last_synced_at: Option<DateTime<Utc>>,
) -> bool {
    check_staleness(
        source_fingerprint,
        synced_fingerprint,
        source_updated_at,
        last_synced_at,
    )
    .stale
}
