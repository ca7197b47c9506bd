//! Budget CLI commands
//!
//! Implements CLI commands for setting and reviewing the budget.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_budget_summary;
use crate::error::ExpenseResult;
use crate::services::ExpenseService;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Set the budget
    Set {
        /// New budget amount
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },

    /// Show the budget, total spent and remaining balance
    Show,
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> ExpenseResult<()> {
    let service = ExpenseService::new(storage);

    match cmd {
        BudgetCommands::Set { amount } => {
            service.set_budget(amount)?;
            println!("{}", service.describe_budget()?);
        }
        BudgetCommands::Show => {
            let summary = service.summary()?;
            println!("{}", service.describe_budget()?);
            println!();
            print!("{}", format_budget_summary(&summary, settings));
        }
    }

    Ok(())
}
