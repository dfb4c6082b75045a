//! Flag pattern detection.
//!
//! Classifies pre-aggregated weekly and day-of-week flag rollups into named
//! pattern instances with severity tiers. The rollups arrive already summed
//! from the data layer; nothing here re-derives raw event data.

use crate::api::{
    DatasetId, DetectedPattern, FlagPatternData, FlagRollup, PatternKind, PatternSeverity,
    WeeklyFlagRow,
};
use crate::algorithms::{classify_trend, mean, TrendDirection};
use crate::db::get_repository;
use crate::models::FacilityConfig;
use chrono::NaiveDate;

/// A day must exceed the other days' average by this factor to spike.
const SPIKE_RATIO: f64 = 2.0;
/// Spike severity escalates to critical at this factor.
const SPIKE_CRITICAL_RATIO: f64 = 3.0;
/// Minimum flag count for a day to qualify as a spike.
const SPIKE_MIN_COUNT: u32 = 5;

/// Share of a week's flags that timing/turnover/delay must hold together.
const CASCADE_SHARE: f64 = 0.7;
/// Minimum weekly total for a cascade week.
const CASCADE_MIN_WEEK_TOTAL: u32 = 5;

/// Percent rise at which a deteriorating trend becomes critical.
const TREND_CRITICAL_PERCENT: f64 = 50.0;
/// Minimum number of weekly points for trend classification.
const TREND_MIN_WEEKS: usize = 4;

/// Share of all flags concentrated in one room to report.
const CONCENTRATION_SHARE: f64 = 0.4;
/// Concentration severity escalates to critical at this share.
const CONCENTRATION_CRITICAL_SHARE: f64 = 0.6;
/// Minimum total flags before concentration is meaningful.
const CONCENTRATION_MIN_TOTAL: u32 = 10;

/// Share of all flags attached to one surgeon to report.
const RECURRING_SHARE: f64 = 0.3;
/// Minimum flag count for a recurring-surgeon pattern.
const RECURRING_MIN_COUNT: u32 = 5;

fn severity_rank(severity: PatternSeverity) -> u8 {
    match severity {
        PatternSeverity::Critical => 0,
        PatternSeverity::Warning => 1,
        PatternSeverity::Good => 2,
    }
}

fn detect_day_spikes(rollup: &FlagRollup, patterns: &mut Vec<DetectedPattern>) {
    let active: Vec<_> = rollup.by_day.iter().filter(|d| d.total > 0).collect();
    if active.len() < 2 {
        return;
    }

    for day in &rollup.by_day {
        if day.total < SPIKE_MIN_COUNT {
            continue;
        }
        let others: Vec<f64> = rollup
            .by_day
            .iter()
            .filter(|other| other.day_index != day.day_index)
            .map(|other| other.total as f64)
            .collect();
        let others_mean = match mean(&others) {
            Some(value) if value > 0.0 => value,
            _ => continue,
        };
        let ratio = day.total as f64 / others_mean;
        if ratio < SPIKE_RATIO {
            continue;
        }

        let severity = if ratio >= SPIKE_CRITICAL_RATIO {
            PatternSeverity::Critical
        } else {
            PatternSeverity::Warning
        };
        patterns.push(DetectedPattern {
            kind: PatternKind::DaySpike,
            severity,
            title: format!("{} spike", day.weekday),
            metric: format!("{} flags", day.total),
            description: format!(
                "{} accounts for {} flags against an average of {:.1} on other days",
                day.weekday, day.total, others_mean
            ),
        });
    }
}

fn detect_equipment_cascade(rollup: &FlagRollup, patterns: &mut Vec<DetectedPattern>) {
    let cascade_weeks: Vec<&WeeklyFlagRow> = rollup
        .weekly
        .iter()
        .filter(|week| {
            if week.total < CASCADE_MIN_WEEK_TOTAL {
                return false;
            }
            if week.timing == 0 || week.turnover == 0 || week.delay == 0 {
                return false;
            }
            let related = (week.timing + week.turnover + week.delay) as f64;
            related / week.total as f64 >= CASCADE_SHARE
        })
        .collect();

    if cascade_weeks.is_empty() {
        return;
    }

    let severity = if rollup.weekly.len() >= 2 && cascade_weeks.len() * 2 >= rollup.weekly.len() {
        PatternSeverity::Critical
    } else {
        PatternSeverity::Warning
    };
    patterns.push(DetectedPattern {
        kind: PatternKind::EquipmentCascade,
        severity,
        title: "Equipment cascade".to_string(),
        metric: format!("{} weeks", cascade_weeks.len()),
        description: format!(
            "timing, turnover, and delay flags co-occur in {} of {} weeks, suggesting a shared root cause",
            cascade_weeks.len(),
            rollup.weekly.len()
        ),
    });
}

fn dominant_category(weekly: &[WeeklyFlagRow]) -> Option<(&'static str, u32)> {
    let mut sums = [
        ("fcots", 0u32),
        ("timing", 0u32),
        ("turnover", 0u32),
        ("delay", 0u32),
        ("financial", 0u32),
        ("quality", 0u32),
    ];
    for week in weekly {
        sums[0].1 += week.fcots;
        sums[1].1 += week.timing;
        sums[2].1 += week.turnover;
        sums[3].1 += week.delay;
        sums[4].1 += week.financial;
        sums[5].1 += week.quality;
    }
    sums.into_iter().max_by_key(|(_, count)| *count)
}

fn detect_trend(
    rollup: &FlagRollup,
    facility: &FacilityConfig,
    patterns: &mut Vec<DetectedPattern>,
) {
    if rollup.weekly.len() < TREND_MIN_WEEKS {
        return;
    }
    let totals: Vec<f64> = rollup.weekly.iter().map(|week| week.total as f64).collect();
    let stats = classify_trend(&totals);

    let metric = match stats.percent_change {
        Some(pct) => format!("{:+.0}%", pct),
        None => format!("{:+.1}/week", stats.second_half_avg - stats.first_half_avg),
    };

    match stats.direction {
        TrendDirection::Decreasing => {
            patterns.push(DetectedPattern {
                kind: PatternKind::TrendImprovement,
                severity: PatternSeverity::Good,
                title: "Flag volume improving".to_string(),
                metric,
                description: format!(
                    "weekly flags fell from an average of {:.1} to {:.1}",
                    stats.first_half_avg, stats.second_half_avg
                ),
            });
        }
        TrendDirection::Increasing => {
            let severity = match stats.percent_change {
                Some(pct) if pct >= TREND_CRITICAL_PERCENT => PatternSeverity::Critical,
                _ => PatternSeverity::Warning,
            };
            let mut description = format!(
                "weekly flags rose from an average of {:.1} to {:.1}",
                stats.first_half_avg, stats.second_half_avg
            );
            if let Some(("fcots", count)) = dominant_category(&rollup.weekly) {
                if count > 0 {
                    description.push_str(&format!(
                        "; first-case starts outside the {:.0}-minute grace window dominate",
                        facility.fcots_grace_minutes
                    ));
                }
            }
            patterns.push(DetectedPattern {
                kind: PatternKind::TrendDeterioration,
                severity,
                title: "Flag volume deteriorating".to_string(),
                metric,
                description,
            });
        }
        TrendDirection::Stable => {}
    }
}

fn detect_room_concentration(rollup: &FlagRollup, patterns: &mut Vec<DetectedPattern>) {
    if rollup.total_flags < CONCENTRATION_MIN_TOTAL {
        return;
    }
    let top = match rollup.by_room.iter().max_by_key(|room| room.count) {
        Some(top) => top,
        None => return,
    };
    let share = top.count as f64 / rollup.total_flags as f64;
    if share < CONCENTRATION_SHARE {
        return;
    }

    let severity = if share >= CONCENTRATION_CRITICAL_SHARE {
        PatternSeverity::Critical
    } else {
        PatternSeverity::Warning
    };
    patterns.push(DetectedPattern {
        kind: PatternKind::RoomConcentration,
        severity,
        title: format!("Flags concentrated in {}", top.room_id),
        metric: format!("{:.0}%", share * 100.0),
        description: format!(
            "{} holds {} of {} flags in the period",
            top.room_id, top.count, rollup.total_flags
        ),
    });
}

fn detect_recurring_surgeon(rollup: &FlagRollup, patterns: &mut Vec<DetectedPattern>) {
    if rollup.total_flags == 0 {
        return;
    }
    let top = match rollup.by_surgeon.iter().max_by_key(|surgeon| surgeon.count) {
        Some(top) => top,
        None => return,
    };
    if top.count < RECURRING_MIN_COUNT {
        return;
    }
    let share = top.count as f64 / rollup.total_flags as f64;
    if share < RECURRING_SHARE {
        return;
    }

    patterns.push(DetectedPattern {
        kind: PatternKind::RecurringSurgeon,
        severity: PatternSeverity::Warning,
        title: format!("Recurring flags for {}", top.surgeon_id),
        metric: format!("{} flags", top.count),
        description: format!(
            "{} is attached to {} of {} flags in the period",
            top.surgeon_id, top.count, rollup.total_flags
        ),
    });
}

/// Detect all pattern instances in a flag rollup, most severe first.
pub fn detect_patterns(rollup: &FlagRollup, facility: &FacilityConfig) -> Vec<DetectedPattern> {
    let mut patterns = Vec::new();

    detect_day_spikes(rollup, &mut patterns);
    detect_equipment_cascade(rollup, &mut patterns);
    detect_trend(rollup, facility, &mut patterns);
    detect_room_concentration(rollup, &mut patterns);
    detect_recurring_surgeon(rollup, &mut patterns);

    patterns.sort_by_key(|pattern| severity_rank(pattern.severity));
    patterns
}

/// Get flag pattern analysis for a dataset over an optional date range.
pub async fn get_flag_pattern_data(
    dataset_id: DatasetId,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    facility: &FacilityConfig,
) -> Result<FlagPatternData, String> {
    let repo = get_repository().map_err(|e| format!("Failed to get repository: {}", e))?;

    let rollup = repo
        .fetch_flag_rollup(dataset_id, start, end)
        .await
        .map_err(|e| format!("Failed to fetch flag rollup: {}", e))?;

    let patterns = detect_patterns(&rollup, facility);

    Ok(FlagPatternData {
        patterns,
        weekly: rollup.weekly,
        by_day: rollup.by_day,
        total_flags: rollup.total_flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DayOfWeekFlagRow, RoomFlagCount, SurgeonFlagCount};

    fn week(start: (i32, u32, u32), counts: [u32; 6]) -> WeeklyFlagRow {
        WeeklyFlagRow {
            week_start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            fcots: counts[0],
            timing: counts[1],
            turnover: counts[2],
            delay: counts[3],
            financial: counts[4],
            quality: counts[5],
            total: counts.iter().sum(),
        }
    }

    fn day(index: u32, name: &str, total: u32) -> DayOfWeekFlagRow {
        DayOfWeekFlagRow {
            day_index: index,
            weekday: name.to_string(),
            total,
        }
    }

    fn empty_rollup() -> FlagRollup {
        FlagRollup {
            weekly: vec![],
            by_day: vec![],
            by_room: vec![],
            by_surgeon: vec![],
            total_flags: 0,
        }
    }

    fn kinds(patterns: &[DetectedPattern]) -> Vec<PatternKind> {
        patterns.iter().map(|p| p.kind).collect()
    }

    #[test]
    fn test_empty_rollup_no_patterns() {
        let patterns = detect_patterns(&empty_rollup(), &FacilityConfig::default());
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_day_spike_detected() {
        let mut rollup = empty_rollup();
        rollup.by_day = vec![
            day(0, "Monday", 12),
            day(1, "Tuesday", 3),
            day(2, "Wednesday", 2),
            day(3, "Thursday", 4),
            day(4, "Friday", 3),
        ];
        rollup.total_flags = 24;

        let patterns = detect_patterns(&rollup, &FacilityConfig::default());
        assert_eq!(kinds(&patterns), vec![PatternKind::DaySpike]);
        // 12 vs mean 3.0 on the other days: 4x is critical
        assert_eq!(patterns[0].severity, PatternSeverity::Critical);
        assert_eq!(patterns[0].metric, "12 flags");
        assert!(patterns[0].title.contains("Monday"));
    }

    #[test]
    fn test_day_spike_below_floor_ignored() {
        let mut rollup = empty_rollup();
        rollup.by_day = vec![day(0, "Monday", 4), day(1, "Tuesday", 1), day(2, "Wednesday", 1)];
        rollup.total_flags = 6;

        let patterns = detect_patterns(&rollup, &FacilityConfig::default());
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_equipment_cascade_detected() {
        let mut rollup = empty_rollup();
        rollup.weekly = vec![
            week((2026, 3, 2), [0, 3, 2, 3, 0, 1]),
            week((2026, 3, 9), [1, 0, 0, 0, 0, 0]),
        ];
        rollup.total_flags = 10;

        let patterns = detect_patterns(&rollup, &FacilityConfig::default());
        assert_eq!(kinds(&patterns), vec![PatternKind::EquipmentCascade]);
        // 1 of 2 weeks qualifies, which reaches half
        assert_eq!(patterns[0].severity, PatternSeverity::Critical);
    }

    #[test]
    fn test_trend_improvement_good() {
        let mut rollup = empty_rollup();
        rollup.weekly = vec![
            week((2026, 2, 2), [3, 2, 2, 3, 0, 0]),
            week((2026, 2, 9), [4, 2, 2, 2, 0, 0]),
            week((2026, 2, 16), [1, 1, 0, 1, 0, 0]),
            week((2026, 2, 23), [1, 0, 1, 1, 0, 0]),
        ];
        rollup.total_flags = 27;

        let patterns = detect_patterns(&rollup, &FacilityConfig::default());
        let improvement = patterns
            .iter()
            .find(|p| p.kind == PatternKind::TrendImprovement)
            .unwrap();
        assert_eq!(improvement.severity, PatternSeverity::Good);
    }

    #[test]
    fn test_trend_deterioration_critical_mentions_grace_window() {
        let mut rollup = empty_rollup();
        rollup.weekly = vec![
            week((2026, 2, 2), [2, 0, 0, 0, 0, 0]),
            week((2026, 2, 9), [2, 0, 0, 0, 0, 0]),
            week((2026, 2, 16), [5, 0, 1, 0, 0, 0]),
            week((2026, 2, 23), [6, 1, 0, 0, 0, 0]),
        ];
        rollup.total_flags = 17;

        let patterns = detect_patterns(&rollup, &FacilityConfig::default());
        let deterioration = patterns
            .iter()
            .find(|p| p.kind == PatternKind::TrendDeterioration)
            .unwrap();
        // 2.0 -> 6.5 weekly average is beyond the 50% critical threshold
        assert_eq!(deterioration.severity, PatternSeverity::Critical);
        assert!(deterioration.description.contains("grace window"));
    }

    #[test]
    fn test_trend_needs_enough_weeks() {
        let mut rollup = empty_rollup();
        rollup.weekly = vec![
            week((2026, 2, 2), [1, 0, 0, 0, 0, 0]),
            week((2026, 2, 9), [9, 0, 0, 0, 0, 0]),
        ];
        rollup.total_flags = 10;

        let patterns = detect_patterns(&rollup, &FacilityConfig::default());
        assert!(patterns
            .iter()
            .all(|p| p.kind != PatternKind::TrendDeterioration));
    }

    #[test]
    fn test_room_concentration_detected() {
        let mut rollup = empty_rollup();
        rollup.by_room = vec![
            RoomFlagCount {
                room_id: "or-3".to_string(),
                count: 9,
            },
            RoomFlagCount {
                room_id: "or-1".to_string(),
                count: 3,
            },
        ];
        rollup.total_flags = 12;

        let patterns = detect_patterns(&rollup, &FacilityConfig::default());
        assert_eq!(kinds(&patterns), vec![PatternKind::RoomConcentration]);
        // 9 of 12 is 75%, beyond the critical share
        assert_eq!(patterns[0].severity, PatternSeverity::Critical);
        assert!(patterns[0].title.contains("or-3"));
    }

    #[test]
    fn test_recurring_surgeon_detected() {
        let mut rollup = empty_rollup();
        rollup.by_surgeon = vec![
            SurgeonFlagCount {
                surgeon_id: "dr-patel".to_string(),
                count: 6,
            },
            SurgeonFlagCount {
                surgeon_id: "dr-kim".to_string(),
                count: 4,
            },
        ];
        rollup.total_flags = 10;

        let patterns = detect_patterns(&rollup, &FacilityConfig::default());
        assert_eq!(kinds(&patterns), vec![PatternKind::RecurringSurgeon]);
        assert_eq!(patterns[0].metric, "6 flags");
    }

    #[test]
    fn test_patterns_sorted_by_severity() {
        let mut rollup = empty_rollup();
        // Improving trend (good) plus a critical room concentration.
        rollup.weekly = vec![
            week((2026, 2, 2), [3, 2, 2, 0, 0, 0]),
            week((2026, 2, 9), [4, 2, 2, 0, 0, 0]),
            week((2026, 2, 16), [1, 1, 0, 0, 0, 0]),
            week((2026, 2, 23), [1, 0, 1, 0, 0, 0]),
        ];
        rollup.by_room = vec![RoomFlagCount {
            room_id: "or-2".to_string(),
            count: 15,
        }];
        rollup.total_flags = 19;

        let patterns = detect_patterns(&rollup, &FacilityConfig::default());
        assert!(patterns.len() >= 2);
        assert_eq!(patterns[0].severity, PatternSeverity::Critical);
        assert_eq!(patterns.last().unwrap().severity, PatternSeverity::Good);
    }
}
