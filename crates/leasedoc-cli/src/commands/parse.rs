use leasedoc_core::config::{load_config, ParserConfig};
use leasedoc_core::error::LeaseError;
use leasedoc_core::extraction::pdftotext::PdftotextExtractor;
use leasedoc_core::extraction::split_layout_pages;
use leasedoc_core::model::ParsedSchedule;
use std::path::{Path, PathBuf};

use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    strict: bool,
) -> Result<(), LeaseError> {
    let mut config = match config_file {
        Some(path) => load_config(&path)?,
        None => ParserConfig::default(),
    };
    config.require_reconciliation |= strict;

    let parsed = match parse_input(&input_file, &config) {
        Ok(parsed) => parsed,
        Err(LeaseError::EmptyDocument) => {
            eprintln!(
                "No schedule of notices of leases found in {}",
                input_file.display()
            );
            ParsedSchedule::default()
        }
        Err(e) => return Err(e),
    };

    report_diagnostics(&parsed);

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = output::json::render(&parsed)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Parsed {} lease record(s), written to {}",
                parsed.records.len(),
                path.display()
            );
        }
        None => match output_format {
            "json" => println!("{}", output::json::render(&parsed)?),
            _ => output::table::print(&parsed),
        },
    }

    Ok(())
}

fn parse_input(input_file: &Path, config: &ParserConfig) -> Result<ParsedSchedule, LeaseError> {
    let is_text = input_file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));

    if is_text {
        let text = std::fs::read_to_string(input_file)?;
        let pages = split_layout_pages(&text);
        log::debug!("Read {} page(s) from {}", pages.len(), input_file.display());
        leasedoc_core::parse_pages(&pages, config)
    } else {
        let pdf_bytes = std::fs::read(input_file)?;
        if !PdftotextExtractor::is_available() {
            return Err(LeaseError::PdftotextNotFound);
        }
        let extractor = PdftotextExtractor::new();
        leasedoc_core::parse_pdf(&pdf_bytes, &extractor, config)
    }
}

fn report_diagnostics(parsed: &ParsedSchedule) {
    for w in &parsed.warnings {
        match (w.page, w.record) {
            (_, Some(record)) => eprintln!("  warning (record {record}): {}", w.reason),
            (Some(page), None) => eprintln!("  warning (page {page}): {}", w.reason),
            (None, None) => eprintln!("  warning: {}", w.reason),
        }
    }

    let best_effort = &parsed.reconciliation.best_effort_records;
    if parsed.reconciliation.reconciled && !best_effort.is_empty() {
        let list: Vec<String> = best_effort.iter().map(|n| n.to_string()).collect();
        eprintln!(
            "  {} record(s) parsed before column offsets settled: {}",
            best_effort.len(),
            list.join(", ")
        );
    }
}
