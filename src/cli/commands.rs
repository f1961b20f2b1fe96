use crate::config::{CliOverrides, JobConfig, ParseOptions};
use crate::core::{column_index_to_letter, RowTransformer};
use crate::error::ParserResult;
use crate::table::{self, STDOUT_PATH};
use crate::types::{RawTable, RunReport};
use colored::Colorize;
use std::fmt::Display;
use std::path::PathBuf;

/// Status output that moves to stderr when the table itself goes to stdout
struct Console {
    use_stderr: bool,
}

impl Console {
    fn line(&self, text: impl Display) {
        if self.use_stderr {
            eprintln!("{}", text);
        } else {
            println!("{}", text);
        }
    }
}

/// Execute the parse command
///
/// Reads `input`, transforms the query-string column and writes the result
/// to the resolved output path. Returns the run report.
pub fn parse(
    input: PathBuf,
    overrides: CliOverrides,
    config: Option<PathBuf>,
    json: bool,
    verbose: bool,
) -> ParserResult<RunReport> {
    let job = config.as_deref().map(JobConfig::load).transpose()?;
    let options = ParseOptions::resolve(job, overrides)?;

    let console = Console {
        use_stderr: options.output.as_os_str() == STDOUT_PATH,
    };

    if !json {
        console.line("🔎 Query Parser - Extracting query strings".bold().green());
        console.line(format!("   File: {}", input.display()));
        console.line(format!(
            "   Column: {}   Items: {}",
            options.column.to_uppercase().bright_yellow().bold(),
            options.mode.to_string().cyan()
        ));
        console.line("");
    }

    // Validate the letter before reading anything
    let transformer = RowTransformer::from_letter(&options.column, options.mode)?;

    if verbose && !json {
        console.line("📖 Reading input...".cyan());
    }
    let raw = table::read_table(&input, options.sheet.as_deref())?;

    if verbose && !json {
        console.line(format!(
            "   Found {} data rows, {} header columns",
            raw.data_rows().len(),
            raw.width()
        ));
        console.line("🧮 Transforming rows...".cyan());
    }

    let output = transformer.run(&raw)?;
    table::write_table(&output.table, &options.output)?;

    let report = output.report;

    if json {
        console.line(serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }

    if verbose {
        for skipped in &report.skipped {
            console.line(format!(
                "   {} row {}: {}",
                "skipped".yellow(),
                skipped.row,
                skipped.reason
            ));
        }
    }

    console.line(format!(
        "{} Wrote {} rows × {} columns to {}",
        "✅ Done!".bold().green(),
        report.emitted_rows,
        report.columns.len(),
        display_output(&options.output).bright_blue()
    ));
    if report.skipped_rows > 0 {
        console.line(format!(
            "   {} {} row(s) could not be decoded and were left out",
            "⚠️".yellow(),
            report.skipped_rows
        ));
    }

    Ok(report)
}

fn display_output(path: &std::path::Path) -> String {
    if path.as_os_str() == STDOUT_PATH {
        "stdout".to_string()
    } else {
        path.display().to_string()
    }
}

/// Header cells paired with their column letters
pub fn describe_columns(raw: &RawTable) -> Vec<(String, String)> {
    raw.header()
        .unwrap_or(&[])
        .iter()
        .enumerate()
        .map(|(idx, cell)| (column_index_to_letter(idx), cell.display_lossy()))
        .collect()
}

/// Execute the columns command - list header cells with their letters
pub fn columns(input: PathBuf, sheet: Option<String>) -> ParserResult<()> {
    println!("{}", "🔎 Query Parser - Columns".bold().green());
    println!("   File: {}\n", input.display());

    let raw = table::read_table(&input, sheet.as_deref())?;
    let sample = raw.data_rows().first();

    for (idx, (letter, name)) in describe_columns(&raw).into_iter().enumerate() {
        let preview = sample
            .and_then(|row| row.get(idx))
            .map(|cell| truncate(&cell.display_lossy(), 48))
            .unwrap_or_default();
        println!(
            "   {:>3}  {:<24} {}",
            letter.bright_yellow().bold(),
            name.bright_blue(),
            preview.dimmed()
        );
    }

    println!();
    println!("   {} data rows", raw.data_rows().len());
    Ok(())
}

/// Shorten `text` to at most `max` characters, marking the cut with "…"
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
