//! Library half of the `tally` binary: argument definitions and the
//! subcommands, kept out of `main.rs` so they can be tested.

pub mod cli;
pub mod commands;

use std::sync::Once;

use tally_value::CondFlags;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Nothing is installed unless `RUST_LOG` is
/// set, e.g. `RUST_LOG=tally_sql=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Failure of a subcommand.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] tally_sql::ConfigError),

    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("modulus must be 10 or 11, got {0}")]
    Modulus(u8),

    #[error("{what} is longer than {max} bytes")]
    TooLong { what: &'static str, max: usize },
}

/// Flag names joined with `|`, or `-` when none is set.
pub fn flag_names(flags: CondFlags) -> String {
    if flags.is_empty() {
        return "-".to_owned();
    }
    flags
        .iter_names()
        .map(|(name, _)| name)
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flag_names_join() {
        assert_eq!(flag_names(CondFlags::empty()), "-");
        assert_eq!(flag_names(CondFlags::OVER), "OVER");
        assert_eq!(flag_names(CondFlags::EOS | CondFlags::LESS), "EOS|LESS");
    }
}
