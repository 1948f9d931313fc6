//! Connection and cursor tables over a [`Driver`].
//!
//! Both tables have a fixed capacity chosen at construction. Entries are
//! addressed by stable indices ([`ConnectionId`], [`CursorId`]); a name
//! keeps its slot across disconnects, so reconnecting reuses it. The
//! default connection (empty name) lives in one extra slot past the named
//! capacity.
//!
//! Driver failures are reported as [`SqlError::Driver`] after the driver's
//! diagnostic is recorded; the most recent diagnostic wins and reading it
//! clears it.

use std::fmt;

use rustc_hash::FxHashMap;
use tally_bridge::from_text;
use tally_value::set_null;

use crate::config::Limits;
use crate::driver::{
    BoundColumn, ConnHandle, ConnectRequest, CursorOptions, Diagnostic, Driver, DriverStatus,
    FetchOrientation, StmtHandle,
};
use crate::error::SqlError;
use crate::status::{code, SqlStatus};

/// Index of a connection slot.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(usize);

impl ConnectionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionId({})", self.0)
    }
}

/// Index of a cursor slot.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct CursorId(usize);

impl CursorId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for CursorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CursorId({})", self.0)
    }
}

#[derive(Default)]
struct Connection {
    name: String,
    handle: Option<ConnHandle>,
    extended_fetch: bool,
    connected: bool,
}

#[derive(Default)]
struct Cursor {
    name: String,
    stmt: Option<StmtHandle>,
    columns: Vec<BoundColumn>,
}

/// Connection fields gathered by a `CONNECT` command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectParams {
    pub server: String,
    pub user: String,
    pub password: String,
    /// Extra `KEY=value;` text appended to a built connection string.
    pub extra: String,
    /// Command text after the verb; the connection string when every
    /// other field is empty.
    pub raw: String,
}

impl ConnectParams {
    fn request(&self) -> ConnectRequest {
        if !self.server.is_empty() && self.extra.is_empty() {
            return ConnectRequest::Credentials {
                server: self.server.clone(),
                user: self.user.clone(),
                password: self.password.clone(),
            };
        }
        let fields = [&self.server, &self.user, &self.password, &self.extra];
        if fields.iter().all(|f| f.is_empty()) {
            return ConnectRequest::ConnectionString(self.raw.clone());
        }
        let mut text = String::new();
        for (key, value) in [("DSN", &self.server), ("UID", &self.user), ("PWD", &self.password)] {
            if !value.is_empty() {
                text.push_str(key);
                text.push('=');
                text.push_str(value);
                text.push(';');
            }
        }
        text.push_str(&self.extra);
        ConnectRequest::ConnectionString(text)
    }
}

fn driver_error() -> SqlError {
    SqlError::Driver { code: code::ERROR }
}

pub struct Manager {
    driver: Box<dyn Driver>,
    /// Named slots followed by the default connection.
    connections: Vec<Connection>,
    cursors: Vec<Cursor>,
    owners: FxHashMap<CursorId, ConnectionId>,
    diagnostic: Option<Diagnostic>,
}

impl Manager {
    pub fn new(driver: Box<dyn Driver>, limits: &Limits) -> Self {
        Manager {
            driver,
            connections: (0..=limits.max_connections)
                .map(|_| Connection::default())
                .collect(),
            cursors: (0..limits.max_cursors).map(|_| Cursor::default()).collect(),
            owners: FxHashMap::default(),
            diagnostic: None,
        }
    }

    pub fn default_connection(&self) -> ConnectionId {
        ConnectionId(self.connections.len() - 1)
    }

    fn named_slots(&self) -> usize {
        self.connections.len() - 1
    }

    /// Look up a connection by name; the empty name is the default slot.
    pub fn find_connection(&self, name: &str) -> Option<ConnectionId> {
        if name.is_empty() {
            return Some(self.default_connection());
        }
        self.connections[..self.named_slots()]
            .iter()
            .position(|c| c.name == name)
            .map(ConnectionId)
    }

    /// Look up a connection by name, claiming a free slot for a new name.
    pub fn connection_for_connect(&mut self, name: &str) -> Result<ConnectionId, SqlError> {
        if let Some(id) = self.find_connection(name) {
            return Ok(id);
        }
        let max = self.named_slots();
        let slot = self.connections[..max]
            .iter()
            .position(|c| c.name.is_empty())
            .ok_or(SqlError::ConnectionTableFull { max })?;
        self.connections[slot].name = name.to_owned();
        Ok(ConnectionId(slot))
    }

    /// Look up a cursor by name, claiming a free slot for a new name.
    pub fn cursor(&mut self, name: &str) -> Result<CursorId, SqlError> {
        if let Some(slot) = self.cursors.iter().position(|c| c.name == name) {
            return Ok(CursorId(slot));
        }
        let slot = self
            .cursors
            .iter()
            .position(|c| c.name.is_empty())
            .ok_or(SqlError::CursorTableFull)?;
        self.cursors[slot].name = name.to_owned();
        Ok(CursorId(slot))
    }

    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.connections.get(id.0).is_some_and(|c| c.connected)
    }

    /// Remember that `cursor` runs on `conn`.
    pub fn associate(&mut self, cursor: CursorId, conn: ConnectionId) {
        self.owners.insert(cursor, conn);
    }

    /// The connection a cursor runs on; the default connection when the
    /// cursor has never been associated.
    pub fn cursor_connection(&self, cursor: CursorId) -> ConnectionId {
        self.owners
            .get(&cursor)
            .copied()
            .unwrap_or_else(|| self.default_connection())
    }

    /// Take the last driver diagnostic, clearing it.
    pub fn take_diagnostic(&mut self) -> Option<Diagnostic> {
        self.diagnostic.take()
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(%diagnostic, "driver diagnostic");
        self.diagnostic = Some(diagnostic);
    }

    fn fail(&mut self, diagnostic: Diagnostic) -> SqlError {
        self.record(diagnostic);
        driver_error()
    }

    /// Keep the diagnostic of a success-with-info and map the status.
    fn absorb(&mut self, status: DriverStatus) -> SqlStatus {
        let mapped = SqlStatus::from(&status);
        if let DriverStatus::SuccessWithInfo(diagnostic) = status {
            self.record(diagnostic);
        }
        mapped
    }

    fn check<T>(&mut self, result: Result<T, Diagnostic>) -> Result<T, SqlError> {
        result.map_err(|diagnostic| self.fail(diagnostic))
    }

    fn handle(&mut self, id: ConnectionId, caller: &str) -> Result<ConnHandle, SqlError> {
        match self.connections.get(id.0).and_then(|c| c.handle) {
            Some(handle) => Ok(handle),
            None => Err(self.fail(Diagnostic::new(
                "HY013",
                format!("bad connection number passed into {caller}, {}", id.0),
            ))),
        }
    }

    fn check_cursor(&mut self, id: CursorId, caller: &str) -> Result<(), SqlError> {
        if self.cursors.get(id.0).is_some_and(|c| !c.name.is_empty()) {
            return Ok(());
        }
        Err(self.fail(Diagnostic::new(
            "HY013",
            format!("bad cursor number passed into {caller}, {}", id.0),
        )))
    }

    /// Open `id` with the given fields.
    #[tracing::instrument(level = "debug", skip_all, fields(conn = id.0))]
    pub fn connect(&mut self, id: ConnectionId, params: &ConnectParams) -> Result<SqlStatus, SqlError> {
        if self.is_connected(id) {
            tracing::debug!(conn = id.0, "reconnecting an open connection");
            // the slot is reused whatever the old handle reports
            let _ = self.disconnect(id);
        }
        let request = params.request();
        let connected = self.driver.connect(&request);
        let (handle, status) = self.check(connected)?;
        let extended_fetch = self.driver.supports_extended_fetch(handle);
        let conn = &mut self.connections[id.0];
        conn.handle = Some(handle);
        conn.extended_fetch = extended_fetch;
        conn.connected = true;
        Ok(self.absorb(status))
    }

    /// Close every cursor on `id`, then the connection itself.
    #[tracing::instrument(level = "debug", skip_all, fields(conn = id.0))]
    pub fn disconnect(&mut self, id: ConnectionId) -> Result<SqlStatus, SqlError> {
        let owned: Vec<CursorId> = self
            .owners
            .iter()
            .filter(|(_, owner)| **owner == id)
            .map(|(cursor, _)| *cursor)
            .collect();
        for cursor in owned {
            self.close_cursor(cursor);
        }
        let handle = self.handle(id, "disconnect")?;
        let conn = &mut self.connections[id.0];
        conn.handle = None;
        conn.connected = false;
        let status = self.driver.disconnect(handle);
        let status = self.check(status)?;
        Ok(self.absorb(status))
    }

    /// Disconnect every open connection, ignoring failures.
    pub fn disconnect_all(&mut self) {
        for slot in 0..self.connections.len() {
            let id = ConnectionId(slot);
            if self.is_connected(id) {
                if let Err(err) = self.disconnect(id) {
                    tracing::debug!(conn = slot, %err, "disconnect failed while closing all");
                }
            }
        }
    }

    /// Drop the cursor's statement and columns and free its slot.
    pub fn close_cursor(&mut self, id: CursorId) {
        let Some(cursor) = self.cursors.get_mut(id.0) else {
            return;
        };
        if let Some(stmt) = cursor.stmt.take() {
            self.driver.free_statement(stmt);
        }
        cursor.name.clear();
        cursor.columns.clear();
        self.owners.remove(&id);
    }

    /// Give `cursor` a fresh statement on `conn`, named after the cursor.
    fn prepare(
        &mut self,
        conn: ConnHandle,
        cursor: CursorId,
        options: CursorOptions,
    ) -> Result<StmtHandle, SqlError> {
        let slot = &mut self.cursors[cursor.0];
        if let Some(stmt) = slot.stmt.take() {
            self.driver.free_statement(stmt);
        }
        slot.columns.clear();
        let name = slot.name.clone();

        let allocated = self.driver.allocate_statement(conn);
        let stmt = self.check(allocated)?;
        self.cursors[cursor.0].stmt = Some(stmt);
        let named = self.driver.set_cursor_name(stmt, &name);
        let status = self.check(named)?;
        self.absorb(status);
        if !options.is_empty() {
            let set = self.driver.set_cursor_options(stmt, options);
            let status = self.check(set)?;
            self.absorb(status);
        }
        Ok(stmt)
    }

    /// Describe and bind every result column of `stmt` to the cursor.
    fn bind_columns(&mut self, cursor: CursorId, stmt: StmtHandle) -> Result<(), SqlError> {
        let count = self.driver.column_count(stmt);
        let mut columns = Vec::with_capacity(count);
        for index in 0..count {
            let described = self.driver.describe_column(stmt, index);
            let desc = self.check(described)?;
            let column = BoundColumn::new(&desc);
            let bound = self.driver.bind_column(stmt, index, column.buffer.len());
            let status = self.check(bound)?;
            self.absorb(status);
            columns.push(column);
        }
        tracing::debug!(cursor = cursor.0, columns = count, "bound result columns");
        self.cursors[cursor.0].columns = columns;
        Ok(())
    }

    fn execute_on_cursor(
        &mut self,
        conn: ConnHandle,
        cursor: CursorId,
        sql: &str,
        options: CursorOptions,
    ) -> Result<SqlStatus, SqlError> {
        let stmt = self.prepare(conn, cursor, options)?;
        let executed = self.driver.execute(stmt, sql);
        let status = self.check(executed)?;
        let status = self.absorb(status);
        self.bind_columns(cursor, stmt)?;
        Ok(status)
    }

    fn execute_once(&mut self, conn: ConnHandle, sql: &str) -> Result<SqlStatus, SqlError> {
        let allocated = self.driver.allocate_statement(conn);
        let stmt = self.check(allocated)?;
        let executed = self.driver.execute(stmt, sql);
        self.driver.free_statement(stmt);
        let status = self.check(executed)?;
        Ok(self.absorb(status))
    }

    /// Run a query on `cursor`, binding its result columns.
    #[tracing::instrument(level = "debug", skip_all, fields(conn = conn.0, cursor = cursor.0))]
    pub fn select(
        &mut self,
        conn: ConnectionId,
        cursor: CursorId,
        sql: &str,
        options: CursorOptions,
    ) -> Result<SqlStatus, SqlError> {
        self.check_cursor(cursor, "select")?;
        let handle = self.handle(conn, "select")?;
        self.execute_on_cursor(handle, cursor, sql, options)
    }

    /// Run a statement, on `cursor` when one is given and on a temporary
    /// statement otherwise.
    #[tracing::instrument(level = "debug", skip_all, fields(conn = conn.0))]
    pub fn exec_direct(
        &mut self,
        conn: ConnectionId,
        cursor: Option<CursorId>,
        sql: &str,
    ) -> Result<SqlStatus, SqlError> {
        let handle = self.handle(conn, "exec_direct")?;
        match cursor {
            Some(cursor) => {
                self.check_cursor(cursor, "exec_direct")?;
                self.execute_on_cursor(handle, cursor, sql, CursorOptions::default())
            }
            None => self.execute_once(handle, sql),
        }
    }

    /// Run a positioned or searched `UPDATE`/`DELETE`.
    #[tracing::instrument(level = "debug", skip_all, fields(conn = conn.0))]
    pub fn update_delete(&mut self, conn: ConnectionId, sql: &str) -> Result<SqlStatus, SqlError> {
        let handle = self.handle(conn, "update_delete")?;
        self.execute_once(handle, sql)
    }

    /// Move `cursor` and store the row into `into`, one destination per
    /// bound column. SQL NULL marks the destination null.
    #[tracing::instrument(level = "debug", skip_all, fields(cursor = cursor.0, ?orientation))]
    pub fn fetch(
        &mut self,
        cursor: CursorId,
        orientation: FetchOrientation,
        into: &mut [&mut [u8]],
    ) -> Result<SqlStatus, SqlError> {
        self.check_cursor(cursor, "fetch")?;
        let slot = &self.cursors[cursor.0];
        let Some(stmt) = slot.stmt.filter(|_| !slot.columns.is_empty()) else {
            return Ok(SqlStatus::NoData);
        };
        let conn = self.cursor_connection(cursor);
        let extended = self.connections[conn.0].extended_fetch;
        if orientation != FetchOrientation::Next && !extended {
            return Err(self.fail(Diagnostic::new(
                "IM001",
                "Driver does not support SQLExtendedFetch",
            )));
        }

        let columns = &mut self.cursors[cursor.0].columns;
        let fetched = self.driver.fetch(stmt, orientation, columns);
        let status = self.check(fetched)?;
        if status == DriverStatus::NoData {
            return Ok(SqlStatus::NoData);
        }
        for (column, dest) in self.cursors[cursor.0].columns.iter().zip(into.iter_mut()) {
            match column.data() {
                None => set_null(dest, true),
                Some(text) => {
                    if let Err(err) = from_text(text, dest) {
                        tracing::debug!(%err, "fetched column did not convert");
                    }
                }
            }
        }
        Ok(self.absorb(status))
    }
}
