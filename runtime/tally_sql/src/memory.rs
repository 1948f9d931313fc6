//! A driver over tables held in memory.
//!
//! `SELECT ... FROM <table>` produces the table's rows; every other
//! statement succeeds without touching data. Each executed statement and
//! connect request is appended to a journal the caller can share, so a
//! test can see exactly what the translator sent.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::config::MemoryConfig;
use crate::driver::{
    BoundColumn, ColumnDesc, ConnHandle, ConnectRequest, CursorOptions, Diagnostic, Driver,
    DriverStatus, FetchOrientation, StmtHandle,
};

/// Statements and connect requests seen by a [`MemoryDriver`], in order.
pub type Journal = Rc<RefCell<Vec<String>>>;

struct Table {
    columns: Vec<ColumnDesc>,
    rows: Rc<[Vec<Option<String>>]>,
}

struct ResultSet {
    columns: Vec<ColumnDesc>,
    rows: Rc<[Vec<Option<String>>]>,
    /// Current row; `-1` before the first, `rows.len()` after the last.
    position: i64,
}

struct Statement {
    conn: ConnHandle,
    result: Option<ResultSet>,
}

pub struct MemoryDriver {
    tables: FxHashMap<String, Table>,
    extended_fetch: bool,
    reject_servers: Vec<String>,
    connections: FxHashMap<ConnHandle, ()>,
    statements: FxHashMap<StmtHandle, Statement>,
    next_handle: u32,
    journal: Journal,
}

impl MemoryDriver {
    pub fn from_config(config: &MemoryConfig) -> Self {
        let tables = config
            .tables
            .iter()
            .map(|table| {
                let columns = table
                    .columns
                    .iter()
                    .map(|c| ColumnDesc {
                        name: c.name.clone(),
                        sql_type: c.sql_type,
                        precision: c.precision,
                    })
                    .collect();
                let rows: Vec<Vec<Option<String>>> = table
                    .rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|cell| (*cell != config.null_token).then(|| cell.clone()))
                            .collect()
                    })
                    .collect();
                (
                    table.name.to_ascii_lowercase(),
                    Table {
                        columns,
                        rows: rows.into(),
                    },
                )
            })
            .collect();
        MemoryDriver {
            tables,
            extended_fetch: config.extended_fetch,
            reject_servers: config.reject_servers.clone(),
            connections: FxHashMap::default(),
            statements: FxHashMap::default(),
            next_handle: 1,
            journal: Journal::default(),
        }
    }

    /// A handle on the journal that stays valid after the driver is boxed.
    pub fn journal(&self) -> Journal {
        Rc::clone(&self.journal)
    }

    fn handle(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn statement(&mut self, stmt: StmtHandle) -> Result<&mut Statement, Diagnostic> {
        self.statements
            .get_mut(&stmt)
            .ok_or_else(|| Diagnostic::new("HY010", "statement handle is not allocated"))
    }
}

/// Table named after the `FROM` keyword of a query, lowercased.
fn table_name(sql: &str) -> Option<String> {
    let mut words = sql.split_ascii_whitespace();
    words.find(|w| w.eq_ignore_ascii_case("FROM"))?;
    let name = words.next()?.trim_end_matches([';', ',', ')']);
    Some(name.to_ascii_lowercase())
}

impl Driver for MemoryDriver {
    fn connect(
        &mut self,
        request: &ConnectRequest,
    ) -> Result<(ConnHandle, DriverStatus), Diagnostic> {
        let entry = match request {
            ConnectRequest::ConnectionString(text) => format!("connect {text}"),
            ConnectRequest::Credentials { server, user, .. } => {
                format!("connect server={server} user={user}")
            }
        };
        self.journal.borrow_mut().push(entry);
        if let Some(server) = request.server() {
            if self.reject_servers.iter().any(|s| s == server) {
                return Err(Diagnostic::new(
                    "08001",
                    format!("Unable to connect to data source {server}"),
                ));
            }
        }
        let conn = ConnHandle(self.handle());
        self.connections.insert(conn, ());
        Ok((conn, DriverStatus::Success))
    }

    fn supports_extended_fetch(&self, _conn: ConnHandle) -> bool {
        self.extended_fetch
    }

    fn disconnect(&mut self, conn: ConnHandle) -> Result<DriverStatus, Diagnostic> {
        if self.connections.remove(&conn).is_none() {
            return Err(Diagnostic::new("08003", "Connection not open"));
        }
        self.statements.retain(|_, s| s.conn != conn);
        Ok(DriverStatus::Success)
    }

    fn allocate_statement(&mut self, conn: ConnHandle) -> Result<StmtHandle, Diagnostic> {
        if !self.connections.contains_key(&conn) {
            return Err(Diagnostic::new("08003", "Connection not open"));
        }
        let stmt = StmtHandle(self.handle());
        self.statements.insert(stmt, Statement { conn, result: None });
        Ok(stmt)
    }

    fn set_cursor_name(&mut self, stmt: StmtHandle, _name: &str) -> Result<DriverStatus, Diagnostic> {
        self.statement(stmt)?;
        Ok(DriverStatus::Success)
    }

    fn set_cursor_options(
        &mut self,
        stmt: StmtHandle,
        _options: CursorOptions,
    ) -> Result<DriverStatus, Diagnostic> {
        self.statement(stmt)?;
        Ok(DriverStatus::Success)
    }

    fn execute(&mut self, stmt: StmtHandle, sql: &str) -> Result<DriverStatus, Diagnostic> {
        self.journal.borrow_mut().push(sql.to_owned());
        let is_query = sql
            .split_ascii_whitespace()
            .next()
            .is_some_and(|verb| verb.eq_ignore_ascii_case("SELECT"));
        let result = if is_query {
            let name = table_name(sql).unwrap_or_default();
            let table = self.tables.get(&name).ok_or_else(|| {
                Diagnostic::new("42S02", format!("Base table or view not found: {name}"))
            })?;
            Some(ResultSet {
                columns: table.columns.clone(),
                rows: Rc::clone(&table.rows),
                position: -1,
            })
        } else {
            None
        };
        self.statement(stmt)?.result = result;
        Ok(DriverStatus::Success)
    }

    fn column_count(&mut self, stmt: StmtHandle) -> usize {
        self.statements
            .get(&stmt)
            .and_then(|s| s.result.as_ref())
            .map_or(0, |r| r.columns.len())
    }

    fn describe_column(&mut self, stmt: StmtHandle, index: usize) -> Result<ColumnDesc, Diagnostic> {
        self.statement(stmt)?
            .result
            .as_ref()
            .and_then(|r| r.columns.get(index))
            .cloned()
            .ok_or_else(|| Diagnostic::new("07009", "Invalid descriptor index"))
    }

    fn bind_column(
        &mut self,
        stmt: StmtHandle,
        index: usize,
        _capacity: usize,
    ) -> Result<DriverStatus, Diagnostic> {
        self.describe_column(stmt, index)?;
        Ok(DriverStatus::Success)
    }

    fn fetch(
        &mut self,
        stmt: StmtHandle,
        orientation: FetchOrientation,
        columns: &mut [BoundColumn],
    ) -> Result<DriverStatus, Diagnostic> {
        let Some(result) = self.statement(stmt)?.result.as_mut() else {
            return Err(Diagnostic::new("24000", "Invalid cursor state"));
        };
        let count = result.rows.len() as i64;
        let target = match orientation {
            FetchOrientation::Next => result.position + 1,
            FetchOrientation::Prior => result.position - 1,
            FetchOrientation::First => 0,
            FetchOrientation::Last => count - 1,
            FetchOrientation::Relative(n) => result.position + n,
            FetchOrientation::Absolute(n) if n > 0 => n - 1,
            FetchOrientation::Absolute(n) if n < 0 => count + n,
            FetchOrientation::Absolute(_) => -1,
        };
        if target < 0 || target >= count {
            result.position = if target < 0 { -1 } else { count };
            return Ok(DriverStatus::NoData);
        }
        result.position = target;
        let row = &result.rows[target as usize];
        for (column, cell) in columns.iter_mut().zip(row) {
            column.store(cell.as_deref().map(str::as_bytes));
        }
        Ok(DriverStatus::Success)
    }

    fn free_statement(&mut self, stmt: StmtHandle) {
        self.statements.remove(&stmt);
    }
}
