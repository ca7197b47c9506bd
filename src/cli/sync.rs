//! Remote sync CLI commands
//!
//! Every command acts on the remote store first and then reloads the local
//! ledger from it. A failed remote call leaves local data untouched.

use clap::{Args, Subcommand};

use crate::config::Settings;
use crate::display::format_expense_table;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{parse_date_like, Expense, ExpenseId};
use crate::storage::Storage;
use crate::sync::{DirectoryRemote, SyncService};

/// Arguments of `sync`
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Remote user whose expenses are synchronized (defaults to the configured user)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: SyncCommands,
}

/// Sync subcommands
#[derive(Subcommand, Debug)]
pub enum SyncCommands {
    /// Replace local expenses with the remote collection
    Pull,

    /// Upload local expenses, then pull
    Push,

    /// Create an expense remotely, then pull
    Add {
        /// What the money was spent on
        description: String,
        /// Amount spent
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Date of the expense, defaults to now
        #[arg(short, long)]
        date: Option<String>,
        /// Tags (repeatable or comma-separated)
        #[arg(short, long = "tag", value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Delete a remote expense, then pull
    Delete {
        /// Remote expense ID
        id: String,
    },
}

fn resolve_user(args_user: Option<String>, settings: &Settings) -> ExpenseResult<String> {
    args_user
        .or_else(|| settings.remote.user.clone())
        .ok_or_else(|| {
            ExpenseError::Config(
                "No remote user given. Pass --user or set remote.user in config.json".into(),
            )
        })
}

/// Handle a sync command
pub fn handle_sync_command(
    storage: &Storage,
    settings: &Settings,
    args: SyncArgs,
) -> ExpenseResult<()> {
    let user = resolve_user(args.user, settings)?;
    let remote = DirectoryRemote::new(settings.remote_dir(storage.paths()));
    let service = SyncService::new(storage, remote);

    match args.command {
        SyncCommands::Pull => {
            let count = service.pull(&user)?;
            println!("Pulled {} expense(s) for {}", count, user);
        }

        SyncCommands::Push => {
            let summary = service.push(&user)?;
            println!(
                "Pushed to {}: {} created, {} updated",
                user, summary.created, summary.updated
            );
        }

        SyncCommands::Add {
            description,
            amount,
            date,
            tags,
        } => {
            if description.trim().is_empty() {
                return Err(ExpenseError::Validation(
                    "Description cannot be empty".into(),
                ));
            }
            if !amount.is_finite() || amount < 0.0 {
                return Err(ExpenseError::Validation(format!(
                    "Amount must be a non-negative number, got {}",
                    amount
                )));
            }
            if let Some(date) = date.as_deref().filter(|d| parse_date_like(d).is_none()) {
                return Err(ExpenseError::Validation(format!(
                    "Unrecognized date: '{}'",
                    date
                )));
            }

            let expense = Expense::new(description.trim(), amount, date.as_deref(), tags);
            let id = service.add(&user, &expense)?;
            println!("Created {} for {}", id, user);
        }

        SyncCommands::Delete { id } => {
            let expense_id: ExpenseId = id
                .trim()
                .parse()
                .map_err(|_| ExpenseError::Validation(format!("Invalid expense ID: '{}'", id)))?;
            service.delete(&user, expense_id)?;
            println!("Deleted {} for {}", expense_id, user);
        }
    }

    let expenses = storage.ledger.read(|ledger| ledger.list().to_vec())?;
    print!("{}", format_expense_table(&expenses, settings));

    Ok(())
}
