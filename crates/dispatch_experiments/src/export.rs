//! Result export: JSON for dashboards, CSV (parameters joined with metrics)
//! for spreadsheets and notebooks.

use std::path::Path;

use crate::metrics::SolveMetrics;
use crate::parameters::ParameterSet;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export results as a pretty-printed JSON array.
pub fn export_to_json(
    results: &[SolveMetrics],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(results, file)
}

/// Export results with their parameters to CSV, one row per run.
///
/// `results[i]` must belong to `parameter_sets[i]`.
///
/// # Errors
///
/// Fails when there is nothing to export, when the two slices differ in
/// length, or on any I/O or CSV error.
pub fn export_to_csv(
    results: &[SolveMetrics],
    parameter_sets: &[ParameterSet],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_to_csv_impl(results, parameter_sets, file)
}
