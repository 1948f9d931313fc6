use crate::status::code;

/// Failure of a SQL command.
///
/// Everything except [`SqlError::Driver`] is detected locally; its text is
/// what `sqlmsg` reports. A driver failure leaves its diagnostic with the
/// manager instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SqlError {
    #[error("Could not build command string: {stage}")]
    BuildCommand { stage: u8 },

    #[error("Exceeded maximum cursors")]
    CursorTableFull,

    #[error("Exceeded maximum connections [{max}]")]
    ConnectionTableFull { max: usize },

    #[error("CONNECTION keyword appeared more than once")]
    DuplicateConnectionKeyword,

    #[error("Connection name never seen before")]
    UnknownConnection,

    #[error("Attempt to {action} when not connected")]
    NotConnected { action: &'static str },

    #[error("You may not have both CONNECTION and USING clauses")]
    ConnectionAndCursor,

    #[error("Unable to parse select statement : {stage}")]
    SelectSyntax { stage: u8 },

    #[error("Illegal LOCK Option")]
    IllegalLock,

    #[error("Illegal SCROLL Option")]
    IllegalScroll,

    #[error("Unable to parse fetch command : {stage}")]
    FetchSyntax { stage: u8 },

    #[error("no database driver is loaded")]
    DriverNotLoaded,

    /// The driver refused the call; read the diagnostic for details.
    #[error("driver call failed with status {code}")]
    Driver { code: i32 },
}

impl SqlError {
    /// Legacy integer status of the failure.
    pub const fn code(&self) -> i32 {
        match self {
            SqlError::CursorTableFull => code::NO_MEMORY,
            SqlError::DriverNotLoaded => code::NOT_FOUND,
            SqlError::Driver { code } => *code,
            _ => code::ERROR,
        }
    }

    /// Failures whose message lives in the local message slot.
    pub const fn is_local(&self) -> bool {
        !matches!(self, SqlError::Driver { .. })
    }

    /// Both ways a command can find its connection closed.
    pub const fn is_not_connected(&self) -> bool {
        matches!(
            self,
            SqlError::UnknownConnection | SqlError::NotConnected { .. }
        )
    }
}
