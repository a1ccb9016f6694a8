//! The four outbound event kinds (spec §4.9, §6).

use types::config_snapshot::ConfigSummary;
use types::opportunity::Opportunity;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ConfigApplied { version: String, summary: ConfigSummary },
    OpportunityNew(Opportunity),
    AssetValidated { trace_id: String, asset: String },
    AssetRejected { trace_id: String, asset: String, reason: String },
}
