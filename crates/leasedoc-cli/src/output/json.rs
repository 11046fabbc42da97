use leasedoc_core::error::LeaseError;
use leasedoc_core::model::ParsedSchedule;

/// The record list alone, as consumed downstream.
pub fn render(parsed: &ParsedSchedule) -> Result<String, LeaseError> {
    Ok(serde_json::to_string_pretty(&parsed.records)?)
}
