//! Report CLI commands
//!
//! Spending totals grouped by day, month or year.

use clap::Args;

use crate::config::Settings;
use crate::display::format_period_report;
use crate::error::ExpenseResult;
use crate::export::export_period_totals_csv;
use crate::models::Granularity;
use crate::services::ExpenseService;
use crate::storage::Storage;

/// Arguments of `report`
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Period size: day, month or year (anything else means day)
    #[arg(short, long)]
    pub by: Option<String>,

    /// Only count expenses with any of these tags (repeatable or comma-separated)
    #[arg(short, long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Earliest date (inclusive); ignored if it does not parse
    #[arg(long)]
    pub from: Option<String>,

    /// Latest date (inclusive); ignored if it does not parse
    #[arg(long)]
    pub to: Option<String>,

    /// Print CSV instead of a chart
    #[arg(long)]
    pub csv: bool,
}

impl ReportArgs {
    /// Granularity requested on the command line, or the configured default
    pub fn granularity(&self, settings: &Settings) -> Granularity {
        self.by
            .as_deref()
            .map(Granularity::parse_lenient)
            .unwrap_or(settings.default_granularity)
    }
}

/// Handle the report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    args: ReportArgs,
) -> ExpenseResult<()> {
    let granularity = args.granularity(settings);
    let totals = ExpenseService::new(storage).group_by(
        granularity,
        &args.tags,
        args.from.as_deref(),
        args.to.as_deref(),
    )?;

    if args.csv {
        export_period_totals_csv(&totals, std::io::stdout().lock())?;
    } else {
        print!("{}", format_period_report(&totals, granularity, settings));
    }

    Ok(())
}
