//! Weekly volume trends and volume-vs-utilization divergence.
//!
//! Computes trend stats over weekly case counts, pairs them with the
//! pre-computed utilization series, and classifies the combined movement
//! into one of five narrative categories.

use crate::api::{
    ChangeDirection, DatasetId, DirectionDelta, DivergenceAssessment, DivergenceCategory,
    VolumeTrendsData, WeeklyVolumePoint,
};
use crate::algorithms::{classify_trend, TrendDirection, TrendStats};
use crate::db::get_repository;
use crate::models::FacilityConfig;

/// Default number of trailing weeks analyzed.
pub const DEFAULT_TREND_WEEKS: usize = 12;

fn to_change_direction(direction: TrendDirection) -> ChangeDirection {
    match direction {
        TrendDirection::Increasing => ChangeDirection::Increase,
        TrendDirection::Decreasing => ChangeDirection::Decrease,
        TrendDirection::Stable => ChangeDirection::Unchanged,
    }
}

fn direction_delta(stats: &TrendStats) -> DirectionDelta {
    DirectionDelta {
        direction: to_change_direction(stats.direction),
        delta: stats.second_half_avg - stats.first_half_avg,
    }
}

/// Classify combined volume/utilization movement into a narrative category.
///
/// The mapping is exhaustive over the 3x3 direction grid: the four
/// corner combinations each get their own category and every combination
/// involving `Unchanged` falls through to the stable narrative.
pub fn classify_divergence(
    volume: DirectionDelta,
    utilization: DirectionDelta,
) -> DivergenceAssessment {
    use ChangeDirection::*;

    let (category, diverging, headline, description) = match (volume.direction, utilization.direction)
    {
        (Increase, Increase) => (
            DivergenceCategory::EfficientGrowth,
            false,
            "Efficient growth".to_string(),
            format!(
                "case volume is up {:+.1}/week and utilization is keeping pace at {:+.1} points",
                volume.delta, utilization.delta
            ),
        ),
        (Decrease, Decrease) => (
            DivergenceCategory::DecliningPipeline,
            false,
            "Declining pipeline".to_string(),
            format!(
                "case volume is down {:+.1}/week and utilization is falling with it ({:+.1} points)",
                volume.delta, utilization.delta
            ),
        ),
        (Increase, Decrease) => (
            DivergenceCategory::SchedulingGap,
            true,
            "Scheduling gap".to_string(),
            format!(
                "case volume is up {:+.1}/week while utilization dropped {:+.1} points; added cases are not filling OR time",
                volume.delta, utilization.delta
            ),
        ),
        (Decrease, Increase) => (
            DivergenceCategory::Consolidation,
            false,
            "Tighter packing".to_string(),
            format!(
                "case volume is down {:+.1}/week but the remaining schedule packs tighter ({:+.1} points)",
                volume.delta, utilization.delta
            ),
        ),
        (Unchanged, _) | (_, Unchanged) => (
            DivergenceCategory::Stable,
            false,
            "Stable".to_string(),
            "volume and utilization are holding steady".to_string(),
        ),
    };

    DivergenceAssessment {
        category,
        diverging,
        headline,
        description,
    }
}

/// Compute trend stats and the divergence assessment from weekly points.
///
/// Divergence requires a utilization series; without one the response
/// carries volume stats only.
pub fn compute_volume_trends(
    points: &[WeeklyVolumePoint],
    facility: &FacilityConfig,
) -> VolumeTrendsData {
    let volume_series: Vec<f64> = points.iter().map(|p| p.case_count as f64).collect();
    let volume = classify_trend(&volume_series);

    let utilization_series: Vec<f64> = points
        .iter()
        .filter_map(|p| p.utilization_percent)
        .collect();
    let utilization = if utilization_series.len() >= 2 {
        Some(classify_trend(&utilization_series))
    } else {
        None
    };

    let divergence = utilization.as_ref().map(|util_stats| {
        let mut assessment = classify_divergence(direction_delta(&volume), direction_delta(util_stats));
        if util_stats.second_half_avg < facility.utilization_target_percent {
            assessment.description.push_str(&format!(
                "; utilization sits below the {:.0}% facility target",
                facility.utilization_target_percent
            ));
        }
        assessment
    });

    VolumeTrendsData {
        points: points.to_vec(),
        volume,
        utilization,
        divergence,
    }
}

/// Get volume trends for the trailing weeks of a dataset.
pub async fn get_volume_trends_data(
    dataset_id: DatasetId,
    weeks: usize,
    facility: &FacilityConfig,
) -> Result<VolumeTrendsData, String> {
    let repo = get_repository().map_err(|e| format!("Failed to get repository: {}", e))?;

    let points = repo
        .fetch_weekly_volume(dataset_id, weeks)
        .await
        .map_err(|e| format!("Failed to fetch weekly volume: {}", e))?;

    Ok(compute_volume_trends(&points, facility))
}
