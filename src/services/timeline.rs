//! Case timeline bracket layout.
//!
//! Milestones on a case timeline can carry a pairing tag (e.g. anesthesia
//! start/end). Each tag with at least two members becomes a bracket spanning
//! its first and last member index. Brackets are packed onto render lanes so
//! overlapping spans never share a lane.

use crate::api::{BracketRange, CaseId, CaseTimelineData, CaseTimelineItem, DatasetId};
use crate::db::get_repository;
use std::collections::{HashMap, HashSet};

/// Horizontal pixels consumed per bracket lane.
const LANE_WIDTH: f64 = 14.0;
/// Gap between the bracket area and the timeline content.
const BRACKET_MARGIN: f64 = 8.0;

/// Bracket color palette, cycled in group-encounter order.
const PALETTE: [&str; 6] = [
    "#3b82f6", "#8b5cf6", "#ec4899", "#f59e0b", "#10b981", "#06b6d4",
];

fn spans_overlap(a: &BracketRange, b: &BracketRange) -> bool {
    !(a.end < b.start || b.end < a.start)
}

/// Compute bracket ranges and lane assignments for an ordered milestone
/// sequence.
///
/// Groups with fewer than two members are dropped. Lane packing is greedy:
/// widest span first, each taking the lowest lane free of overlaps. Colors
/// come from `color_overrides` when present, otherwise round-robin from the
/// palette in the order groups are first encountered.
pub fn compute_brackets(
    items: &[CaseTimelineItem],
    issue_groups: &HashSet<String>,
    color_overrides: &HashMap<String, String>,
) -> Vec<BracketRange> {
    let mut member_indices: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut group_order: Vec<&str> = Vec::new();

    for (index, item) in items.iter().enumerate() {
        if let Some(group) = item.pair_group.as_deref() {
            let entry = member_indices.entry(group).or_default();
            if entry.is_empty() {
                group_order.push(group);
            }
            entry.push(index);
        }
    }

    let mut ranges: Vec<BracketRange> = Vec::new();
    let mut palette_cursor = 0usize;
    for group in group_order {
        let members = &member_indices[group];
        if members.len() < 2 {
            // A lone tagged milestone is not a pair.
            continue;
        }
        let start = *members.iter().min().unwrap_or(&0);
        let end = *members.iter().max().unwrap_or(&0);
        let color = match color_overrides.get(group) {
            Some(color) => color.clone(),
            None => {
                let color = PALETTE[palette_cursor % PALETTE.len()].to_string();
                palette_cursor += 1;
                color
            }
        };
        ranges.push(BracketRange {
            group: group.to_string(),
            start,
            end,
            color,
            has_issue: issue_groups.contains(group),
            lane: 0,
        });
    }

    // Widest spans claim lanes first so nested pairs stack outward-in.
    ranges.sort_by(|a, b| {
        let width_a = a.end - a.start;
        let width_b = b.end - b.start;
        width_b.cmp(&width_a).then(a.start.cmp(&b.start))
    });

    let mut placed: Vec<BracketRange> = Vec::new();
    for mut range in ranges {
        let mut lane = 0usize;
        loop {
            let occupied = placed
                .iter()
                .any(|other| other.lane == lane && spans_overlap(other, &range));
            if !occupied {
                break;
            }
            lane += 1;
        }
        range.lane = lane;
        placed.push(range);
    }

    placed.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    placed
}

/// Number of lanes consumed by a bracket set.
pub fn lane_count(brackets: &[BracketRange]) -> usize {
    brackets.iter().map(|b| b.lane + 1).max().unwrap_or(0)
}

/// Pixel width reserved for the bracket area. Zero when there are no
/// brackets.
pub fn bracket_area_width(lanes: usize) -> f64 {
    if lanes == 0 {
        return 0.0;
    }
    LANE_WIDTH * lanes as f64 + BRACKET_MARGIN
}

/// Get timeline data with bracket layout for one case.
pub async fn get_case_timeline_data(
    dataset_id: DatasetId,
    case_id: CaseId,
) -> Result<CaseTimelineData, String> {
    let repo = get_repository().map_err(|e| format!("Failed to get repository: {}", e))?;

    let case = repo
        .fetch_case(dataset_id, case_id)
        .await
        .map_err(|e| format!("Failed to fetch case: {}", e))?;

    let mut items: Vec<CaseTimelineItem> = case
        .milestones
        .iter()
        .map(|m| CaseTimelineItem {
            label: m.label.clone(),
            recorded_at: m.recorded_at,
            pair_group: m.pair_group.clone(),
            has_issue: m.has_issue,
        })
        .collect();
    items.sort_by_key(|item| item.recorded_at);

    let issue_groups: HashSet<String> = items
        .iter()
        .filter(|item| item.has_issue)
        .filter_map(|item| item.pair_group.clone())
        .collect();

    let brackets = compute_brackets(&items, &issue_groups, &HashMap::new());
    let lanes = lane_count(&brackets);

    Ok(CaseTimelineData {
        case_id: case_id.value(),
        original_case_id: case.original_case_id.clone(),
        items,
        brackets,
        lane_count: lanes,
        bracket_area_width: bracket_area_width(lanes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(label: &str, minute: u32, pair_group: Option<&str>) -> CaseTimelineItem {
        CaseTimelineItem {
            label: label.to_string(),
            recorded_at: Utc.with_ymd_and_hms(2026, 3, 2, 8, minute, 0).unwrap(),
            pair_group: pair_group.map(|g| g.to_string()),
            has_issue: false,
        }
    }

    fn tagged(tags: &[Option<&str>]) -> Vec<CaseTimelineItem> {
        tags.iter()
            .enumerate()
            .map(|(i, tag)| item(&format!("m{}", i), i as u32, *tag))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let brackets = compute_brackets(&[], &HashSet::new(), &HashMap::new());
        assert!(brackets.is_empty());
        assert_eq!(lane_count(&brackets), 0);
    }

    #[test]
    fn test_singleton_group_dropped() {
        let items = tagged(&[Some("a"), None, None]);
        let brackets = compute_brackets(&items, &HashSet::new(), &HashMap::new());
        assert!(brackets.is_empty());
    }

    #[test]
    fn test_nested_pairs_take_separate_lanes() {
        let items = tagged(&[Some("outer"), Some("inner"), Some("inner"), Some("outer")]);
        let brackets = compute_brackets(&items, &HashSet::new(), &HashMap::new());

        assert_eq!(brackets.len(), 2);
        let outer = brackets.iter().find(|b| b.group == "outer").unwrap();
        let inner = brackets.iter().find(|b| b.group == "inner").unwrap();
        assert_eq!((outer.start, outer.end, outer.lane), (0, 3, 0));
        assert_eq!((inner.start, inner.end, inner.lane), (1, 2, 1));
    }

    #[test]
    fn test_disjoint_pairs_share_lane() {
        let items = tagged(&[Some("first"), Some("first"), None, Some("second"), Some("second")]);
        let brackets = compute_brackets(&items, &HashSet::new(), &HashMap::new());

        assert_eq!(brackets.len(), 2);
        assert!(brackets.iter().all(|b| b.lane == 0));
        let first = brackets.iter().find(|b| b.group == "first").unwrap();
        let second = brackets.iter().find(|b| b.group == "second").unwrap();
        assert_eq!((first.start, first.end), (0, 1));
        assert_eq!((second.start, second.end), (3, 4));
    }

    #[test]
    fn test_no_same_lane_overlap_invariant() {
        let items = tagged(&[
            Some("a"),
            Some("b"),
            Some("c"),
            Some("a"),
            Some("b"),
            Some("c"),
            Some("d"),
            Some("d"),
        ]);
        let brackets = compute_brackets(&items, &HashSet::new(), &HashMap::new());

        for b in &brackets {
            assert!(b.start <= b.end);
        }
        for (i, a) in brackets.iter().enumerate() {
            for b in brackets.iter().skip(i + 1) {
                if a.lane == b.lane {
                    assert!(
                        a.end < b.start || b.end < a.start,
                        "{} and {} overlap on lane {}",
                        a.group,
                        b.group,
                        a.lane
                    );
                }
            }
        }
    }

    #[test]
    fn test_issue_flag_marks_whole_group() {
        let items = tagged(&[Some("a"), Some("a")]);
        let issues: HashSet<String> = ["a".to_string()].into_iter().collect();
        let brackets = compute_brackets(&items, &issues, &HashMap::new());
        assert!(brackets[0].has_issue);
    }

    #[test]
    fn test_color_override_beats_palette() {
        let items = tagged(&[Some("a"), Some("a"), Some("b"), Some("b")]);
        let overrides: HashMap<String, String> =
            [("b".to_string(), "#123456".to_string())].into_iter().collect();
        let brackets = compute_brackets(&items, &HashSet::new(), &overrides);

        let a = brackets.iter().find(|b| b.group == "a").unwrap();
        let b = brackets.iter().find(|b| b.group == "b").unwrap();
        assert_eq!(a.color, PALETTE[0]);
        assert_eq!(b.color, "#123456");
    }

    #[test]
    fn test_palette_round_robin_by_encounter_order() {
        let items = tagged(&[
            Some("x"),
            Some("y"),
            Some("x"),
            Some("y"),
            Some("z"),
            Some("z"),
        ]);
        let brackets = compute_brackets(&items, &HashSet::new(), &HashMap::new());

        let color_of = |g: &str| brackets.iter().find(|b| b.group == g).unwrap().color.clone();
        assert_eq!(color_of("x"), PALETTE[0]);
        assert_eq!(color_of("y"), PALETTE[1]);
        assert_eq!(color_of("z"), PALETTE[2]);
    }

    #[test]
    fn test_bracket_area_width() {
        assert_eq!(bracket_area_width(0), 0.0);
        assert_eq!(bracket_area_width(1), LANE_WIDTH + BRACKET_MARGIN);
        assert_eq!(bracket_area_width(3), LANE_WIDTH * 3.0 + BRACKET_MARGIN);
    }
}
