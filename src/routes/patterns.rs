use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =========================================================
// Flag pattern types
// =========================================================

/// Pre-aggregated flag counts for one week.
///
/// The `total` field is reproduced from the category counts server-side;
/// [`WeeklyFlagRow::category_sum`] recomputes it for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyFlagRow {
    /// Monday of the ISO week
    pub week_start: NaiveDate,
    pub fcots: u32,
    pub timing: u32,
    pub turnover: u32,
    pub delay: u32,
    pub financial: u32,
    pub quality: u32,
    pub total: u32,
}

impl WeeklyFlagRow {
    /// Sum of the per-category counts. Must equal `total`.
    pub fn category_sum(&self) -> u32 {
        self.fcots + self.timing + self.turnover + self.delay + self.financial + self.quality
    }
}

/// Pre-aggregated flag counts for one weekday across the date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOfWeekFlagRow {
    /// 0 = Monday .. 6 = Sunday
    pub day_index: u32,
    pub weekday: String,
    pub total: u32,
}

/// Flag count for one operating room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFlagCount {
    pub room_id: String,
    pub count: u32,
}

/// Flag count for one surgeon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurgeonFlagCount {
    pub surgeon_id: String,
    pub count: u32,
}

/// Complete pre-aggregated flag rollup supplied by the data layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagRollup {
    pub weekly: Vec<WeeklyFlagRow>,
    pub by_day: Vec<DayOfWeekFlagRow>,
    pub by_room: Vec<RoomFlagCount>,
    pub by_surgeon: Vec<SurgeonFlagCount>,
    pub total_flags: u32,
}

/// The six recognized pattern kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    DaySpike,
    EquipmentCascade,
    TrendImprovement,
    TrendDeterioration,
    RoomConcentration,
    RecurringSurgeon,
}

/// Severity tier attached to a detected pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSeverity {
    Critical,
    Warning,
    Good,
}

/// One detected pattern instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedPattern {
    pub kind: PatternKind,
    pub severity: PatternSeverity,
    pub title: String,
    /// Short badge value, e.g. "14 flags" or "+38%"
    pub metric: String,
    pub description: String,
}

/// Complete flag-pattern analysis response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagPatternData {
    pub patterns: Vec<DetectedPattern>,
    pub weekly: Vec<WeeklyFlagRow>,
    pub by_day: Vec<DayOfWeekFlagRow>,
    pub total_flags: u32,
}

/// Route function name constant for flag patterns
pub const GET_FLAG_PATTERNS: &str = "get_flag_pattern_data";

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_week() -> WeeklyFlagRow {
        WeeklyFlagRow {
            week_start: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            fcots: 2,
            timing: 3,
            turnover: 1,
            delay: 4,
            financial: 0,
            quality: 1,
            total: 11,
        }
    }

    #[test]
    fn test_category_sum_matches_total() {
        let row = sample_week();
        assert_eq!(row.category_sum(), row.total);
    }

    #[test]
    fn test_weekly_flag_row_clone() {
        let row = sample_week();
        let cloned = row;
        assert_eq!(cloned, row);
    }

    #[test]
    fn test_pattern_kind_serialization() {
        let json = serde_json::to_string(&PatternKind::DaySpike).unwrap();
        assert_eq!(json, "\"day_spike\"");
        let json = serde_json::to_string(&PatternKind::EquipmentCascade).unwrap();
        assert_eq!(json, "\"equipment_cascade\"");
    }

    #[test]
    fn test_pattern_severity_serialization() {
        let json = serde_json::to_string(&PatternSeverity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }

    #[test]
    fn test_flag_pattern_data_debug() {
        let data = FlagPatternData {
            patterns: vec![],
            weekly: vec![],
            by_day: vec![],
            total_flags: 0,
        };
        let debug_str = format!("{:?}", data);
        assert!(debug_str.contains("FlagPatternData"));
    }

    #[test]
    fn test_const_value() {
        assert_eq!(GET_FLAG_PATTERNS, "get_flag_pattern_data");
    }
}
