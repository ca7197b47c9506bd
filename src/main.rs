use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_tracker::cli::{
    handle_budget_command, handle_expense_command, handle_export_command, handle_report_command,
    handle_sync_command, seed_demo, BudgetCommands, ExpenseCommands, ExportCommands, ReportArgs,
    SyncArgs,
};
use expense_tracker::config::{ExpensePaths, Settings};
use expense_tracker::logging::init_tracing;
use expense_tracker::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "expense",
    author = "Kaylee Beyene",
    version,
    about = "Track expenses against a budget from the terminal",
    long_about = "Record what you spend, tag it, and see where the money goes by \
                  day, month or year. Expenses live in a local ledger that can be \
                  synchronized with a per-user remote store."
)]
struct Cli {
    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Expense(ExpenseCommands),

    /// Budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Spending totals per day, month or year
    Report(ReportArgs),

    /// Synchronize with the remote store
    Sync(SyncArgs),

    /// Export data
    #[command(subcommand)]
    Export(ExportCommands),

    /// Show the most recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// Record a few sample expenses into an empty ledger
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Initialize paths and settings
    let paths = ExpensePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Report(args)) => {
            handle_report_command(&storage, &settings, args)?;
        }
        Some(Commands::Sync(args)) => {
            handle_sync_command(&storage, &settings, args)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, cmd)?;
        }
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            println!("Initializing expense tracker at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'expense add <description> <amount>' to record an expense,");
            println!("or 'expense demo' to load a few samples.");
        }
        Some(Commands::Config) => {
            println!("Expense Tracker Configuration");
            println!("=============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Ledger file:      {}", paths.ledger_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Remote directory: {}", settings.remote_dir(&paths).display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:     {}", settings.currency_symbol);
            println!("  Date format:         {}", settings.date_format);
            println!("  Default granularity: {}", settings.default_granularity);
            println!(
                "  Remote user:         {}",
                settings.remote.user.as_deref().unwrap_or("(not set)")
            );
        }
        Some(Commands::Demo) => {
            let added = seed_demo(&storage)?;
            if added == 0 {
                println!("The ledger already has expenses; nothing added.");
            } else {
                println!("Added {} sample expenses.", added);
            }
        }
        None => {
            println!("Expense tracker - track spending against a budget");
            println!();
            println!("Run 'expense --help' for usage information.");
        }
    }

    Ok(())
}
