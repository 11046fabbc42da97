use leasedoc_core::config::{load_config, ParserConfig};
use leasedoc_core::error::LeaseError;
use std::path::Path;

pub fn show() -> Result<(), LeaseError> {
    let json = serde_json::to_string_pretty(&ParserConfig::default())?;
    println!("{json}");
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), LeaseError> {
    let config = load_config(file)?;
    println!("Valid config: {}", file.display());
    println!("  Table header:    {}", config.table_header);
    println!("  Start marker:    {}", config.start_marker);
    println!("  Footer pattern:  {}", config.footer_pattern);
    println!("  End of register: {}", config.end_of_register);
    if config.require_reconciliation {
        println!("  Reconciliation:  required");
    }
    Ok(())
}
