//! Asset (token) descriptor and admission state machine (spec §3, §4.7).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDescriptor {
    pub chain_id: u64,
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
    /// Pre-computed external signal, `0..=100`. The engine never collects
    /// raw token-safety signals itself (spec §1 non-goal).
    pub safety_score: u8,
    pub flags: HashSet<String>,
}

impl AssetDescriptor {
    pub fn is_valid(&self) -> bool {
        self.safety_score <= 100
    }
}

/// Orchestrator admission status (spec §4.7 state machine).
///
/// ```text
/// pending --validate()--> validating --> valid       (publishable)
///                                 \--> rejected    (terminal until config changes)
/// ```
/// Any config swap moves `valid`/`rejected` assets back to `pending`; status
/// never jumps directly between `rejected` and `valid` without re-entering
/// `validating`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationStatus {
    Pending,
    Validating,
    Valid,
    Rejected,
}

impl ValidationStatus {
    /// Whether a direct transition from `self` to `next` is legal under the
    /// state machine in spec §4.7.
    pub fn can_transition_to(self, next: ValidationStatus) -> bool {
        use ValidationStatus::*;
        matches!(
            (self, next),
            (Pending, Validating)
                | (Validating, Valid)
                | (Validating, Rejected)
                | (Valid, Pending)
                | (Rejected, Pending)
                | (Valid, Validating) // re-validation on snapshot staleness
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ValidationStatus::*;

    #[test]
    fn rejected_cannot_jump_directly_to_valid() {
        assert!(!Rejected.can_transition_to(Valid));
        assert!(!Valid.can_transition_to(Rejected));
        assert!(Rejected.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Validating));
    }
}
