use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Tally runtime tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a value through an edit picture
    Format(FormatArgs),
    /// Compute a modulus-10 or modulus-11 check digit
    CheckDigit(CheckDigitArgs),
    /// Run a script of SQL commands, one per line
    Sql(SqlArgs),
}

#[derive(Args, Clone, Debug)]
pub struct FormatArgs {
    /// Edit picture, e.g. `ZZ9.99`
    pub picture: String,
    /// Value to render; numbers are edited digit by digit
    #[arg(allow_hyphen_values = true)]
    pub value: String,
    /// Integer digits of the numeric source
    #[arg(long)]
    pub width: Option<u8>,
    /// Fraction digits of the numeric source
    #[arg(long, default_value_t = 0)]
    pub scale: u8,
}

#[derive(Args, Clone, Debug)]
pub struct CheckDigitArgs {
    /// 10 or 11
    pub modulus: u8,
    /// Digits followed by their check digit
    pub digits: String,
    /// One weight digit per body digit
    pub weights: String,
}

#[derive(Args, Clone, Debug)]
pub struct SqlArgs {
    /// Script file; blank lines and lines starting with `#` are skipped
    pub script: PathBuf,
    /// TOML driver configuration
    #[arg(long, env = "TALLY_CONFIG")]
    pub config: Option<PathBuf>,
    /// Result columns captured per fetch
    #[arg(long, default_value_t = 8)]
    pub columns: usize,
}
