use crate::models::VersionRecord;

/// Returns the records newest first. The caller's slice is left untouched; the
/// returned references point at the very same records.
pub fn order_for_display(versions: &[VersionRecord]) -> Vec<&VersionRecord> {
    versions.iter().rev().collect()
}
