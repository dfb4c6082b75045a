// ============================================================================
// JSON Parsing Functions
// ============================================================================
//
// These functions provide string-based parsing and validation for uploaded
// case datasets. Malformed required fields fail here, before anything is
// stored; silently coercing them would risk incorrect financial or
// scheduling output downstream.

use crate::api::{CaseDataset, CaseRecord};
use anyhow::{bail, Context, Result};

#[derive(serde::Deserialize)]
struct DatasetInput {
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub facility_id: String,
    #[serde(default)]
    pub checksum: String,
    #[serde(default)]
    pub cases: Vec<CaseRecord>,
    #[serde(default)]
    pub benchmarks: Vec<crate::api::BenchmarkRow>,
    #[serde(default)]
    pub weekly_utilization: Vec<crate::api::WeeklyUtilizationRow>,
}

fn validate_input_dataset(dataset_json: &str) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(dataset_json).context("Invalid dataset JSON")?;
    let has_cases = value.as_object().and_then(|obj| obj.get("cases")).is_some();
    if !has_cases {
        bail!("Missing required 'cases' field");
    }
    Ok(())
}

fn validate_case(case: &CaseRecord) -> Result<()> {
    let id = if case.original_case_id.is_empty() {
        "<unnamed>"
    } else {
        &case.original_case_id
    };

    if !case.scheduled_duration_minutes.is_finite() || case.scheduled_duration_minutes <= 0.0 {
        bail!(
            "Case '{}': scheduled_duration_minutes must be a positive number, got {}",
            id,
            case.scheduled_duration_minutes
        );
    }
    if let Some(actual) = case.actual_duration_minutes {
        if !actual.is_finite() || actual < 0.0 {
            bail!(
                "Case '{}': actual_duration_minutes must be non-negative, got {}",
                id,
                actual
            );
        }
    }
    for item in &case.cost_items {
        if !item.amount.is_finite() || item.amount < 0.0 {
            bail!(
                "Case '{}': cost item '{}' has invalid amount {}",
                id,
                item.category,
                item.amount
            );
        }
    }
    Ok(())
}

/// Parse a case dataset from a JSON string.
///
/// Deserializes the dataset using Serde, validates the numeric invariants
/// of every case, and computes the content checksum when the upload did not
/// carry one.
pub fn parse_dataset_json_str(dataset_json: &str) -> Result<CaseDataset> {
    validate_input_dataset(dataset_json)?;

    let input: DatasetInput = serde_json::from_str(dataset_json)
        .context("Failed to deserialize dataset JSON using Serde")?;

    for case in &input.cases {
        validate_case(case)?;
    }

    for benchmark in &input.benchmarks {
        if benchmark.procedure_name.is_empty() {
            bail!("Benchmark rows require a procedure_name");
        }
    }

    let mut dataset = CaseDataset {
        id: input.id,
        name: input.name,
        facility_id: input.facility_id,
        checksum: input.checksum,
        cases: input.cases,
        benchmarks: input.benchmarks,
        weekly_utilization: input.weekly_utilization,
    };

    // Compute checksum if not provided
    if dataset.checksum.is_empty() {
        dataset.checksum = crate::db::checksum::calculate_checksum(dataset_json);
    }

    Ok(dataset)
}
