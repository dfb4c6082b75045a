use serde::{Deserialize, Serialize};

// =========================================================
// Case timeline types
// =========================================================

/// A single milestone entry on a case timeline, in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseTimelineItem {
    pub label: String,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
    /// Pairing tag linking this milestone to its counterpart (e.g. the
    /// start and end of anesthesia share a tag)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair_group: Option<String>,
    pub has_issue: bool,
}

/// Computed bracket span over a pair group, with its assigned render lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketRange {
    pub group: String,
    /// Index of the first member milestone
    pub start: usize,
    /// Index of the last member milestone
    pub end: usize,
    pub color: String,
    pub has_issue: bool,
    pub lane: usize,
}

/// Case timeline dataset with bracket layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseTimelineData {
    pub case_id: i64,
    pub original_case_id: String,
    pub items: Vec<CaseTimelineItem>,
    pub brackets: Vec<BracketRange>,
    pub lane_count: usize,
    pub bracket_area_width: f64,
}

/// Route function name constant for the case timeline
pub const GET_CASE_TIMELINE: &str = "get_case_timeline_data";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_range_clone() {
        let range = BracketRange {
            group: "anesthesia".to_string(),
            start: 0,
            end: 3,
            color: "#0ea5e9".to_string(),
            has_issue: false,
            lane: 0,
        };
        let cloned = range.clone();
        assert_eq!(cloned, range);
    }

    #[test]
    fn test_bracket_range_debug() {
        let range = BracketRange {
            group: "anesthesia".to_string(),
            start: 1,
            end: 2,
            color: "#0ea5e9".to_string(),
            has_issue: true,
            lane: 1,
        };
        let debug_str = format!("{:?}", range);
        assert!(debug_str.contains("BracketRange"));
    }

    #[test]
    fn test_case_timeline_data_debug() {
        let data = CaseTimelineData {
            case_id: 7,
            original_case_id: "case-7".to_string(),
            items: vec![],
            brackets: vec![],
            lane_count: 0,
            bracket_area_width: 0.0,
        };
        let debug_str = format!("{:?}", data);
        assert!(debug_str.contains("CaseTimelineData"));
    }

    #[test]
    fn test_const_value() {
        assert_eq!(GET_CASE_TIMELINE, "get_case_timeline_data");
    }
}
