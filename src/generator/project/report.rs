use super::run::{AggregateOutcome, RunReport};

/// Render the human-facing summary of a run.
///
/// One `<config path>: <reason>` line per failed module, then the aggregate
/// header status and the counts.
pub fn format_report(report: &RunReport) -> String {
    let mut lines = Vec::new();
    let failed: Vec<_> = report.failed().collect();

    if !failed.is_empty() {
        lines.push("❌ Failed modules:".to_string());
        for outcome in &failed {
            let reason = outcome
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "failed".to_string());
            // Schema errors already lead with the config label.
            let prefix = format!("{}: ", outcome.label);
            let reason = reason.strip_prefix(&prefix).unwrap_or(&reason);
            lines.push(format!("   {prefix}{reason}"));
        }
        lines.push(String::new());
    }

    lines.push(match &report.aggregate {
        AggregateOutcome::Skipped => "ℹ️  No variable template, aggregate header skipped".to_string(),
        AggregateOutcome::Written {
            path,
            fields,
            unchanged: true,
        } => format!(
            "✅ Variable header up to date: {} ({fields} field(s))",
            path.display()
        ),
        AggregateOutcome::Written { path, fields, .. } => format!(
            "✅ Variable header written: {} ({fields} field(s))",
            path.display()
        ),
        AggregateOutcome::Checked { path, fields } => format!(
            "✅ Variable header checked: {} ({fields} field(s))",
            path.display()
        ),
        AggregateOutcome::Failed(error) => format!("❌ Variable header failed: {error}"),
    });

    let verb = if report.dry_run { "checked" } else { "generated" };
    lines.push(String::new());
    lines.push("📋 Module Generation:".to_string());
    lines.push(format!(
        "   {} module(s) {verb}, {} unchanged, {} failed",
        report.succeeded_count(),
        report.unchanged_count(),
        report.failed_count()
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Print [`format_report`] to stdout.
pub fn print_report(report: &RunReport) {
    print!("{}", format_report(report));
}
