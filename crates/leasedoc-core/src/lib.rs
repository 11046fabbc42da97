//! Structured lease records from the "Schedule of notices of leases" in a
//! property register.
//!
//! Page text comes from a layout-preserving extractor; [`parsing`] splits it
//! into logical records and rebuilds the four schedule columns from their
//! character offsets.

pub mod config;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;

use config::{ParserConfig, Template};
use error::LeaseError;
use extraction::{ensure_pdf, PageText, PdfExtractor};
use model::ParsedSchedule;

/// Main API entry point: parse the lease schedule out of a register PDF.
pub fn parse_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    config: &ParserConfig,
) -> Result<ParsedSchedule, LeaseError> {
    ensure_pdf(pdf_bytes)?;

    let pages = extractor.extract_pages(pdf_bytes)?;
    log::debug!(
        "Extracted {} page(s) with {}",
        pages.len(),
        extractor.backend_name()
    );

    parse_pages(&pages, config)
}

/// Parse already-extracted page text.
pub fn parse_pages(
    pages: &[PageText],
    config: &ParserConfig,
) -> Result<ParsedSchedule, LeaseError> {
    let template = Template::compile(config)?;
    let parsed = parsing::parse_schedule(pages, &template)?;
    log::info!("Parsed {} lease record(s)", parsed.records.len());
    Ok(parsed)
}
