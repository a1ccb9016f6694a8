//! Tracks each asset's `ValidationStatus` across scan rounds (spec §4.7
//! state machine). Keyed by `(chain_id, address)` rather than owned by
//! the asset descriptor itself, since the same asset can be revalidated
//! many times without the descriptor changing.

use dashmap::DashMap;
use types::asset::ValidationStatus;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey {
    pub chain_id: u64,
    pub address: String,
}

#[derive(Debug, Clone)]
struct Entry {
    status: ValidationStatus,
    /// Config version this status was computed against; a config swap
    /// invalidates any entry not matching the new version.
    config_version: String,
}

/// Table of per-asset admission state, reset to `pending` whenever the
/// config plane applies a new snapshot.
pub struct AdmissionTable {
    entries: DashMap<AssetKey, Entry>,
}

impl AdmissionTable {
    pub fn new() -> Self {
        Self { entries: DashMap::new() }
    }

    pub fn status(&self, key: &AssetKey) -> ValidationStatus {
        self.entries.get(key).map(|e| e.status).unwrap_or(ValidationStatus::Pending)
    }

    /// Attempts the transition, returning whether it was legal under the
    /// spec §4.7 state machine; illegal transitions are no-ops.
    pub fn transition(&self, key: &AssetKey, next: ValidationStatus, config_version: &str) -> bool {
        let current = self.status(key);
        if !current.can_transition_to(next) {
            return false;
        }
        self.entries.insert(
            key.clone(),
            Entry { status: next, config_version: config_version.to_string() },
        );
        true
    }

    /// Spec §4.7: "Any config swap transitions all valid/rejected assets
    /// back to pending." Entries already on the new version (re-entered
    /// after the swap) are left alone.
    pub fn reset_for_new_config(&self, new_version: &str) {
        for mut entry in self.entries.iter_mut() {
            if entry.config_version != new_version
                && matches!(entry.status, ValidationStatus::Valid | ValidationStatus::Rejected)
            {
                entry.status = ValidationStatus::Pending;
            }
        }
    }
}

impl Default for AdmissionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> AssetKey {
        AssetKey { chain_id: 56, address: "0xweth".into() }
    }

    #[test]
    fn new_asset_starts_pending() {
        let table = AdmissionTable::new();
        assert_eq!(table.status(&key()), ValidationStatus::Pending);
    }

    #[test]
    fn full_cycle_to_valid_then_config_swap_resets_to_pending() {
        let table = AdmissionTable::new();
        let k = key();
        assert!(table.transition(&k, ValidationStatus::Validating, "v1"));
        assert!(table.transition(&k, ValidationStatus::Valid, "v1"));
        assert_eq!(table.status(&k), ValidationStatus::Valid);

        table.reset_for_new_config("v2");
        assert_eq!(table.status(&k), ValidationStatus::Pending);
    }

    #[test]
    fn rejected_cannot_jump_straight_to_valid() {
        let table = AdmissionTable::new();
        let k = key();
        table.transition(&k, ValidationStatus::Validating, "v1");
        table.transition(&k, ValidationStatus::Rejected, "v1");
        assert!(!table.transition(&k, ValidationStatus::Valid, "v1"));
        assert_eq!(table.status(&k), ValidationStatus::Rejected);
    }
}
