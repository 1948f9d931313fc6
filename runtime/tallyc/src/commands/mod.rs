//! One module per subcommand. Each returns the text to print so that the
//! binary stays a thin shell around them.

mod check_digit;
mod format;
mod sql;

pub use check_digit::check_digit;
pub use format::format;
pub use sql::run_script;

use crate::cli::Commands;
use crate::CliError;

pub fn dispatch(command: Commands) -> Result<String, CliError> {
    match command {
        Commands::Format(args) => format(&args),
        Commands::CheckDigit(args) => check_digit(&args),
        Commands::Sql(args) => run_script(&args),
    }
}
