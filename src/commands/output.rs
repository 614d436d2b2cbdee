//! Shared console output for build reports

use console::style;

use crate::index::BuildReport;
use crate::parse::Warning;

/// Print parse warnings grouped under a header, in discovery order
pub fn print_warnings(warnings: &[Warning]) {
    if warnings.is_empty() {
        return;
    }

    println!(
        "{} {} warning{}:",
        style("!").yellow(),
        warnings.len(),
        if warnings.len() == 1 { "" } else { "s" }
    );
    for warning in warnings {
        println!(
            "  {}:{} {} {}",
            warning.filename,
            warning.line,
            style(format!("[{}]", warning.kind.as_str())).yellow(),
            warning.message
        );
    }
}

/// Print resource counts and the report's problem lists
pub fn print_summary(report: &BuildReport) {
    let documented = report.root.resources.documented().count();
    println!("  Files: {}", report.files.len());
    println!("  Resources: {}", documented);
    println!("  Documents: {}", report.root.documents.len());

    let missing = report.without_examples();
    if !missing.is_empty() {
        println!(
            "\n{} {} resource{} without examples:",
            style("!").yellow(),
            missing.len(),
            if missing.len() == 1 { "" } else { "s" }
        );
        for resource in missing {
            println!("    {}", resource);
        }
    }

    let duplicates = report.duplicate_params();
    if !duplicates.is_empty() {
        println!("\n{} Duplicate parameter names:", style("!").yellow());
        for (resource, names) in duplicates {
            println!("    {}: {}", resource, names.join(", "));
        }
    }
}
