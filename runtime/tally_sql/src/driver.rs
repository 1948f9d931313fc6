//! The seam between the manager and a database driver.
//!
//! A driver speaks in opaque handles and plain text. Column data comes back
//! as text in [`BoundColumn`] buffers sized by the manager; converting it
//! into tagged values is the manager's job.

use std::fmt;

use serde::Deserialize;

use crate::status::SqlStatus;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnHandle(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StmtHandle(pub u32);

/// Successful return of a driver call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriverStatus {
    Success,
    SuccessWithInfo(Diagnostic),
    NoData,
}

impl From<&DriverStatus> for SqlStatus {
    fn from(status: &DriverStatus) -> Self {
        match status {
            DriverStatus::Success => SqlStatus::Success,
            DriverStatus::SuccessWithInfo(_) => SqlStatus::SuccessWithInfo,
            DriverStatus::NoData => SqlStatus::NoData,
        }
    }
}

/// One diagnostic record: a five-character state, message text and an
/// optional native error code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub state: String,
    pub text: String,
    pub native: i32,
}

impl Diagnostic {
    pub fn new(state: &str, text: impl Into<String>) -> Self {
        Diagnostic {
            state: state.to_owned(),
            text: text.into(),
            native: 0,
        }
    }

    #[must_use]
    pub fn with_native(mut self, native: i32) -> Self {
        self.native = native;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.state, self.text)?;
        if self.native != 0 {
            write!(f, ": (#{})", self.native)?;
        }
        Ok(())
    }
}

/// How to reach a data source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectRequest {
    /// A complete `KEY=value;` connection string.
    ConnectionString(String),
    /// Data source name, user and password passed separately.
    Credentials {
        server: String,
        user: String,
        password: String,
    },
}

impl ConnectRequest {
    /// The data source the request names, if any.
    pub fn server(&self) -> Option<&str> {
        match self {
            ConnectRequest::Credentials { server, .. } => Some(server),
            ConnectRequest::ConnectionString(text) => text
                .split(';')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| key.trim().eq_ignore_ascii_case("DSN"))
                .map(|(_, value)| value.trim()),
        }
    }
}

/// Column types the manager sizes buffers for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    Char,
    VarChar,
    LongVarChar,
    Real,
    Float,
    Double,
    Timestamp,
    Binary,
    VarBinary,
    LongVarBinary,
    Integer,
    SmallInt,
    Decimal,
    Numeric,
    Date,
}

impl SqlType {
    /// Bytes of text buffer needed for a column of this type and precision,
    /// terminator included.
    pub fn work_buffer_size(self, precision: usize) -> usize {
        match self {
            SqlType::Char | SqlType::VarChar | SqlType::LongVarChar => precision + 3,
            SqlType::Real | SqlType::Float | SqlType::Double | SqlType::Timestamp => {
                precision + 10
            }
            SqlType::Binary | SqlType::VarBinary | SqlType::LongVarBinary => precision * 2 + 4,
            SqlType::Integer => 13,
            SqlType::SmallInt | SqlType::Decimal | SqlType::Numeric | SqlType::Date => {
                precision + 4
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDesc {
    pub name: String,
    pub sql_type: SqlType,
    pub precision: usize,
}

/// A result column bound to a text buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundColumn {
    pub sql_type: SqlType,
    pub precision: usize,
    /// Fixed-size text buffer; a driver writes at most `len() - 1` bytes.
    pub buffer: Vec<u8>,
    /// Bytes written by the last fetch, `None` for SQL NULL.
    pub len: Option<usize>,
}

impl BoundColumn {
    pub fn new(desc: &ColumnDesc) -> Self {
        BoundColumn {
            sql_type: desc.sql_type,
            precision: desc.precision,
            buffer: vec![0; desc.sql_type.work_buffer_size(desc.precision)],
            len: None,
        }
    }

    /// Text of the last fetch, or `None` for SQL NULL.
    pub fn data(&self) -> Option<&[u8]> {
        self.len.map(|n| &self.buffer[..n.min(self.buffer.len())])
    }

    /// Store `text`, truncated to the buffer's capacity.
    pub fn store(&mut self, text: Option<&[u8]>) {
        self.len = text.map(|text| {
            let n = text.len().min(self.buffer.len().saturating_sub(1));
            self.buffer[..n].copy_from_slice(&text[..n]);
            n
        });
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FetchOrientation {
    Next,
    First,
    Last,
    Prior,
    Relative(i64),
    Absolute(i64),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lock {
    ReadOnly,
    OptByTime,
    OptByValue,
    Fetch,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Scroll {
    Forward,
    Dynamic,
    Keyset,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CursorOptions {
    pub lock: Option<Lock>,
    pub scroll: Option<Scroll>,
}

impl CursorOptions {
    pub fn is_empty(&self) -> bool {
        self.lock.is_none() && self.scroll.is_none()
    }
}

/// A database driver.
///
/// Calls block until the driver answers. A failing call returns the
/// diagnostic describing it; the manager reports it with status `-1`.
pub trait Driver {
    fn connect(&mut self, request: &ConnectRequest)
        -> Result<(ConnHandle, DriverStatus), Diagnostic>;

    /// Whether the connection can fetch other than forward by one row.
    fn supports_extended_fetch(&self, conn: ConnHandle) -> bool;

    fn disconnect(&mut self, conn: ConnHandle) -> Result<DriverStatus, Diagnostic>;

    fn allocate_statement(&mut self, conn: ConnHandle) -> Result<StmtHandle, Diagnostic>;

    fn set_cursor_name(&mut self, stmt: StmtHandle, name: &str)
        -> Result<DriverStatus, Diagnostic>;

    fn set_cursor_options(
        &mut self,
        stmt: StmtHandle,
        options: CursorOptions,
    ) -> Result<DriverStatus, Diagnostic>;

    fn execute(&mut self, stmt: StmtHandle, sql: &str) -> Result<DriverStatus, Diagnostic>;

    /// Result columns of the last execution; 0 when there is no result set.
    fn column_count(&mut self, stmt: StmtHandle) -> usize;

    /// Describe column `index` (0-based).
    fn describe_column(&mut self, stmt: StmtHandle, index: usize)
        -> Result<ColumnDesc, Diagnostic>;

    /// Announce that column `index` will be read into a buffer of
    /// `capacity` bytes.
    fn bind_column(
        &mut self,
        stmt: StmtHandle,
        index: usize,
        capacity: usize,
    ) -> Result<DriverStatus, Diagnostic>;

    /// Move the cursor and store the row into `columns`. Returns
    /// [`DriverStatus::NoData`] when the move leaves the result set.
    fn fetch(
        &mut self,
        stmt: StmtHandle,
        orientation: FetchOrientation,
        columns: &mut [BoundColumn],
    ) -> Result<DriverStatus, Diagnostic>;

    fn free_statement(&mut self, stmt: StmtHandle);
}
