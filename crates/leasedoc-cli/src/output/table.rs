use leasedoc_core::model::{LeaseRecord, ParsedSchedule};

const WRAP: usize = 60;

pub fn print(parsed: &ParsedSchedule) {
    if parsed.records.is_empty() {
        println!("No lease records.");
        return;
    }

    for (i, record) in parsed.records.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_record(record);
    }

    println!();
    match (&parsed.reconciliation.offsets, parsed.reconciliation.reconciled_at) {
        (Some(offsets), Some(at)) => {
            println!(
                "{} record(s); column offsets {} settled at record {}",
                parsed.records.len(),
                offsets,
                at
            );
        }
        _ => println!(
            "{} record(s); column offsets never settled (descriptions are best-effort)",
            parsed.records.len()
        ),
    }
}

fn print_record(record: &LeaseRecord) {
    println!(
        "=== {} ({}) ===",
        record.number,
        record.title.as_deref().unwrap_or("-")
    );
    print_field(
        "Registration",
        record.registration_date_with_plan_ref.as_deref(),
    );
    print_field("Property", record.property_description.as_deref());
    print_field("Lease term", record.date_with_term.as_deref());
    for note in &record.notes {
        print_field("Note", Some(note.replace('\n', " ").as_str()));
    }
}

fn print_field(label: &str, value: Option<&str>) {
    let lines = wrap(value.unwrap_or("-"), WRAP);
    for (i, line) in lines.iter().enumerate() {
        let label = if i == 0 { label } else { "" };
        println!("  {:<12}  {}", label, line);
    }
}

/// Greedy word wrap for terminal output.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}
