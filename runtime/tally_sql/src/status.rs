//! Status codes and their condition-flag reading.

use tally_value::CondFlags;

/// Integer status codes reported to programs.
pub mod code {
    pub const SUCCESS: i32 = 0;
    pub const SUCCESS_WITH_INFO: i32 = 1;
    pub const NO_DATA: i32 = 100;
    pub const ERROR: i32 = -1;
    pub const INVALID_HANDLE: i32 = -2;
    pub const NO_MEMORY: i32 = -3;
    pub const NOT_FOUND: i32 = -5;
    pub const INVALID_PARAMETER: i32 = -6;
}

/// Non-failing outcome of a command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SqlStatus {
    Success,
    /// Succeeded; the driver left a diagnostic worth reading.
    SuccessWithInfo,
    /// No row was available.
    NoData,
}

impl SqlStatus {
    pub const fn code(self) -> i32 {
        match self {
            SqlStatus::Success => code::SUCCESS,
            SqlStatus::SuccessWithInfo => code::SUCCESS_WITH_INFO,
            SqlStatus::NoData => code::NO_DATA,
        }
    }
}

/// What [`Session::run`](crate::Session::run) hands back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SqlOutcome {
    pub code: i32,
    pub flags: CondFlags,
}

impl SqlOutcome {
    pub fn from_code(code: i32) -> Self {
        SqlOutcome {
            code,
            flags: flags_for(code),
        }
    }
}

/// Condition flags for a status code: no data is `OVER`, any failure is
/// `LESS`, plain success is `EQUAL`. Success with info sets nothing.
pub fn flags_for(code: i32) -> CondFlags {
    match code {
        code::NO_DATA => CondFlags::OVER,
        c if c < 0 => CondFlags::LESS,
        code::SUCCESS => CondFlags::EQUAL,
        _ => CondFlags::empty(),
    }
}

/// The flag bits a command can change.
pub const SQL_FLAGS: CondFlags = CondFlags::EQUAL.union(CondFlags::LESS).union(CondFlags::OVER);
