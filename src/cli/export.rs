//! CLI commands for data export
//!
//! Provides commands for exporting data in various formats.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use crate::error::{ExpenseError, ExpenseResult};
use crate::export::{csv, json, yaml};
use crate::storage::Storage;

use super::expense::FilterArgs;

/// Export format options for full exports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the budget and every expense
    All {
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
    },

    /// Export expenses to CSV
    Expenses {
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show export information without writing anything
    Info,
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> ExpenseResult<()> {
    match cmd {
        ExportCommands::All { output, format } => handle_export_all(storage, output, format),
        ExportCommands::Expenses { output, filter } => {
            handle_export_expenses(storage, output, filter)
        }
        ExportCommands::Info => handle_export_info(storage),
    }
}

fn open_output(output: Option<&Path>) -> ExpenseResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                ExpenseError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

/// Handle full export
fn handle_export_all(
    storage: &Storage,
    output: Option<PathBuf>,
    format: ExportFormat,
) -> ExpenseResult<()> {
    let mut writer = open_output(output.as_deref())?;

    match format {
        ExportFormat::Json => json::export_full_json(storage, &mut writer)?,
        ExportFormat::Yaml => yaml::export_full_yaml(storage, &mut writer)?,
    }
    writer.flush()?;

    if let Some(path) = output {
        println!("Full ledger exported to: {}", path.display());
    }
    Ok(())
}

/// Handle CSV expense export
fn handle_export_expenses(
    storage: &Storage,
    output: Option<PathBuf>,
    filter: FilterArgs,
) -> ExpenseResult<()> {
    let filter = filter.to_filter()?;
    let mut writer = open_output(output.as_deref())?;

    let count = csv::export_expenses_csv(storage, &filter, &mut writer)?;
    writer.flush()?;

    if let Some(path) = output {
        println!("Exported {} expenses to: {}", count, path.display());
    }
    Ok(())
}

/// Show export information
fn handle_export_info(storage: &Storage) -> ExpenseResult<()> {
    let export = json::FullExport::from_storage(storage)?;

    println!("Export Information");
    println!("==================\n");

    println!("Schema Version: {}", export.schema_version);
    println!("App Version:    {}", export.app_version);
    println!();

    println!("Data Summary:");
    println!("  Budget:    {}", export.budget);
    println!("  Expenses:  {}", export.metadata.expense_count);
    println!("  Spent:     {}", export.metadata.total_spent);
    println!("  Tags:      {}", export.metadata.tags.join(", "));
    println!();

    if let Some(earliest) = &export.metadata.earliest_expense {
        println!("Expense Date Range:");
        println!("  Earliest: {}", earliest);
    }
    if let Some(latest) = &export.metadata.latest_expense {
        println!("  Latest:   {}", latest);
    }

    println!("\nExamples:");
    println!("  expense export all --output backup.json");
    println!("  expense export all --format yaml");
    println!("  expense export expenses --tag food --output food.csv");

    Ok(())
}
