//! Shared data models re-exported for database layer consumers.

pub use crate::api::{
    BenchmarkRow, CaseDataset, CaseFlag, CaseMilestone, CaseRecord, DayOfWeekFlagRow, FlagCategory,
    FlagRollup, RoomFlagCount, SurgeonFlagCount, WeeklyFlagRow, WeeklyUtilizationRow,
    WeeklyVolumePoint,
};

/// Surgeon-level and facility-level benchmark rows for one procedure.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkPair {
    pub surgeon: Option<BenchmarkRow>,
    pub facility: Option<BenchmarkRow>,
}

impl BenchmarkPair {
    /// Resolve the pair from a raw row set: the surgeon-level row matching
    /// both surgeon and procedure, and the facility-level row (no surgeon)
    /// matching the procedure.
    pub fn resolve(rows: &[BenchmarkRow], surgeon_id: &str, procedure_name: &str) -> Self {
        let surgeon = rows
            .iter()
            .find(|row| {
                row.procedure_name == procedure_name
                    && row.surgeon_id.as_deref() == Some(surgeon_id)
            })
            .cloned();
        let facility = rows
            .iter()
            .find(|row| row.procedure_name == procedure_name && row.surgeon_id.is_none())
            .cloned();
        Self { surgeon, facility }
    }
}
