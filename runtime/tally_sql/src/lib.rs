//! Embedded SQL for the Tally runtime.
//!
//! Programs hand the runtime a command string plus parameter and result
//! values; this crate turns that into driver calls.
//!
//! - [`translate`]: the [`Session`] entry point and verb dispatch.
//! - [`command`]: clause extraction, parameter substitution and option
//!   parsing, all on plain text.
//! - [`manager`]: connection and cursor tables over a [`Driver`].
//! - [`memory`]: a [`Driver`] over tables held in memory.
//!
//! Status codes follow the legacy integer convention (see [`status::code`])
//! and map to condition flags through [`status::flags_for`].

pub mod command;
pub mod config;
pub mod driver;
mod error;
pub mod manager;
pub mod memory;
pub mod status;
pub mod translate;

pub use config::{ConfigError, SqlConfig};
pub use driver::{Diagnostic, Driver, DriverStatus, FetchOrientation};
pub use error::SqlError;
pub use status::{SqlOutcome, SqlStatus};
pub use translate::Session;
