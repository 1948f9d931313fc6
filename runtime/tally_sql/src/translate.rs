//! The `SQL` verb: one command string in, one status out.
//!
//! A [`Session`] owns the manager and the two pieces of state that outlive
//! a call: the last status code and the local message slot. Each
//! [`Session::run`] renders the command to text, substitutes parameters,
//! strips the connection and cursor clauses and dispatches on the verb.

use tally_bridge::{from_text, to_text};

use crate::command::{
    build_command, close_target, parse_connect, parse_fetch, parse_select_options,
    take_connection_clause, take_cursor_clause, verb, TABLE_CURSOR,
};
use crate::config::{DriverConfig, Limits, SqlConfig};
use crate::driver::Driver;
use crate::error::SqlError;
use crate::manager::{ConnectionId, CursorId, Manager};
use crate::memory::MemoryDriver;
use crate::status::{code, SqlOutcome, SqlStatus};

pub struct Session {
    manager: Option<Manager>,
    limits: Limits,
    last_code: i32,
    local_error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session with no driver; every command fails until one is loaded.
    pub fn new() -> Self {
        Session {
            manager: None,
            limits: Limits::default(),
            last_code: code::SUCCESS,
            local_error: None,
        }
    }

    pub fn with_driver(driver: Box<dyn Driver>, limits: Limits) -> Self {
        Session {
            manager: Some(Manager::new(driver, &limits)),
            limits,
            ..Self::new()
        }
    }

    /// Replace the driver with the one `config` describes. Open
    /// connections on the old driver are closed first.
    pub fn load_driver(&mut self, config: &SqlConfig) {
        self.close_all();
        let driver: Box<dyn Driver> = match &config.driver {
            DriverConfig::Memory(memory) => Box::new(MemoryDriver::from_config(memory)),
        };
        tracing::debug!(limits = ?config.limits, "driver loaded");
        self.limits = config.limits;
        self.manager = Some(Manager::new(driver, &config.limits));
    }

    /// Run one command. `from` holds the `:<n>` parameters; fetched columns
    /// land in `into`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, command: &[u8], from: &[&[u8]], into: &mut [&mut [u8]]) -> SqlOutcome {
        self.local_error = None;
        let code = match self.execute(command, from, into) {
            Ok(status) => status.code(),
            Err(err) => {
                if err.is_local() {
                    tracing::debug!(%err, "command rejected");
                    self.local_error = Some(err.to_string());
                }
                err.code()
            }
        };
        self.last_code = code;
        SqlOutcome::from_code(code)
    }

    /// Status code of the last [`run`](Self::run).
    pub fn last_code(&self) -> i32 {
        self.last_code
    }

    /// The pending message: a local failure first, then the driver's last
    /// diagnostic. Reading clears it; nothing pending reads as empty.
    pub fn message(&mut self) -> String {
        if let Some(text) = self.local_error.take() {
            return text;
        }
        self.manager
            .as_mut()
            .and_then(Manager::take_diagnostic)
            .map(|diagnostic| diagnostic.to_string())
            .unwrap_or_default()
    }

    /// [`message`](Self::message) written into a text value, truncated to
    /// its capacity.
    pub fn message_into(&mut self, dest: &mut [u8]) {
        let text = self.message();
        if let Err(err) = from_text(text.as_bytes(), dest) {
            tracing::debug!(%err, "message did not fit its destination");
        }
    }

    /// Disconnect every open connection.
    pub fn close_all(&mut self) {
        if let Some(manager) = self.manager.as_mut() {
            manager.disconnect_all();
        }
    }

    fn execute(
        &mut self,
        command: &[u8],
        from: &[&[u8]],
        into: &mut [&mut [u8]],
    ) -> Result<SqlStatus, SqlError> {
        let limit = self.limits.command_size;
        let manager = self.manager.as_mut().ok_or(SqlError::DriverNotLoaded)?;

        let text = to_text(command, limit).map_err(|_| SqlError::BuildCommand { stage: 1 })?;
        let text = String::from_utf8_lossy(&text);
        let verb = verb(&text).ok_or(SqlError::BuildCommand { stage: 2 })?;
        let mut sql =
            build_command(&text, from, limit).map_err(|_| SqlError::BuildCommand { stage: 3 })?;

        let cursor_name = if verb == "CREATE" {
            None
        } else {
            take_cursor_clause(&mut sql)
        };
        let cursor = manager.cursor(cursor_name.as_deref().unwrap_or(TABLE_CURSOR))?;
        tracing::debug!(%verb, cursor = cursor.index(), named_cursor = cursor_name.is_some(), "dispatch");

        match verb.as_str() {
            "CONNECT" => {
                let connect = parse_connect(&sql, from)?;
                let conn = manager.connection_for_connect(&connect.name)?;
                manager.connect(conn, &connect.params)
            }
            "CLOSE" => {
                let target = match close_target(&sql) {
                    Some(name) => match manager.cursor(name) {
                        Ok(id) => id,
                        Err(_) => return Ok(SqlStatus::Success),
                    },
                    None => cursor,
                };
                manager.close_cursor(target);
                Ok(SqlStatus::Success)
            }
            "COMMIT" | "CREATE" | "ALTER" | "DROP" | "ROLLBACK" => {
                let action = match verb.as_str() {
                    "COMMIT" => "COMMIT",
                    "CREATE" => "CREATE",
                    "ALTER" => "alter table",
                    "DROP" => "drop table",
                    _ => "rollback",
                };
                let conn = resolve(manager, &mut sql, action)?;
                manager.exec_direct(conn, None, &sql)
            }
            "DISCONNECT" => {
                let conn = resolve(manager, &mut sql, "disconnect")?;
                manager.disconnect(conn)
            }
            "DELETE" | "UPDATE" => {
                let action = if verb == "DELETE" { "delete" } else { "update" };
                positioned(manager, sql, cursor_name.as_deref(), cursor, action)
            }
            "SELECT" => {
                let conn = resolve(manager, &mut sql, "select")?;
                let (sql, options) = parse_select_options(&sql)?;
                let result = manager.select(conn, cursor, &sql, options);
                manager.associate(cursor, conn);
                result
            }
            "FETCH" => {
                let conn = manager.cursor_connection(cursor);
                ensure_connected(manager, conn, "fetch")?;
                let orientation = parse_fetch(&sql)?;
                manager.fetch(cursor, orientation, into)
            }
            _ => {
                let conn = resolve(manager, &mut sql, "execute an SQL statement")?;
                let cursor = cursor_name.is_some().then_some(cursor);
                let result = manager.exec_direct(conn, cursor, &sql);
                if let Some(cursor) = cursor {
                    manager.associate(cursor, conn);
                }
                result
            }
        }
    }
}

fn ensure_connected(
    manager: &Manager,
    conn: ConnectionId,
    action: &'static str,
) -> Result<(), SqlError> {
    if manager.is_connected(conn) {
        Ok(())
    } else {
        Err(SqlError::NotConnected { action })
    }
}

/// Strip a `CONNECTION` clause and check that the connection it names (or
/// the default) is open.
fn resolve(
    manager: &Manager,
    sql: &mut String,
    action: &'static str,
) -> Result<ConnectionId, SqlError> {
    let conn = match take_connection_clause(sql) {
        Some(name) => manager
            .find_connection(&name)
            .ok_or(SqlError::UnknownConnection)?,
        None => manager.default_connection(),
    };
    ensure_connected(manager, conn, action)?;
    Ok(conn)
}

/// `UPDATE` and `DELETE`: either a cursor clause, which runs on the
/// cursor's connection as `... OF <cursor>`, or a connection clause.
fn positioned(
    manager: &mut Manager,
    mut sql: String,
    cursor_name: Option<&str>,
    cursor: CursorId,
    action: &'static str,
) -> Result<SqlStatus, SqlError> {
    let named = take_connection_clause(&mut sql);
    let conn = match (cursor_name, named) {
        (Some(_), Some(_)) => return Err(SqlError::ConnectionAndCursor),
        (Some(_), None) => manager.cursor_connection(cursor),
        (None, Some(name)) => manager
            .find_connection(&name)
            .ok_or(SqlError::UnknownConnection)?,
        (None, None) => manager.default_connection(),
    };
    ensure_connected(manager, conn, action)?;
    if let Some(name) = cursor_name {
        if !sql.ends_with(|c: char| c.is_ascii_whitespace()) {
            sql.push(' ');
        }
        sql.push_str("OF ");
        sql.push_str(name);
    }
    manager.update_delete(conn, &sql)
}
