/// CRUD Gateway Module
///
/// Runs generated statements on one owned connection. A gateway is `Send`
/// but not `Sync`. Use one gateway per thread or per request; sharing one
/// across workers needs a pool, which this crate does not provide.

use super::predicate::Predicate;
use super::statement::{
    build_delete, build_insert, build_select, build_select_where, build_update, SqlStatement,
};
use crate::core::db::{connect, Connection, ConnectionConfig, Record, RowSet, Value};
use crate::core::{Result, TablekitError};
use std::collections::HashSet;
use tracing::debug;

/// Outcome of an insert, update or delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Rows changed by the statement
    pub rows_affected: usize,
    /// Rowid of the most recent successful insert on this connection
    pub last_insert_rowid: i64,
}

/// Parameterized insert/select/update/delete over arbitrary tables
///
/// ```no_run
/// use tablekit::{ConnectionConfig, CrudGateway, Predicate, Record};
///
/// let config = ConnectionConfig::new("data", "app.db", "", "");
/// let rows = CrudGateway::scoped(&config, |db| {
///     db.insert("users", &Record::new().with_value("name", "Ann").with_value("age", 30))?;
///     db.update("users", &Record::new().with_value("age", 31), &Predicate::eq("name", "Ann"))?;
///     db.select("users", &Record::new().with_value("age", 31))
/// })?;
/// assert_eq!(rows.len(), 1);
/// # Ok::<(), tablekit::TablekitError>(())
/// ```
#[derive(Debug)]
pub struct CrudGateway {
    conn: Connection,
}

impl CrudGateway {
    /// Wraps an already open connection
    pub fn new(conn: Connection) -> Self {
        CrudGateway { conn }
    }

    /// Opens a connection for `config` and wraps it
    pub fn connect(config: &ConnectionConfig) -> Result<Self> {
        Ok(CrudGateway::new(connect(config)?))
    }

    /// Runs `f` against a fresh gateway and closes the connection afterwards,
    /// whether or not `f` succeeded. An error from `f` takes precedence over
    /// an error from closing.
    pub fn scoped<T, F>(config: &ConnectionConfig, f: F) -> Result<T>
    where
        F: FnOnce(&CrudGateway) -> Result<T>,
    {
        let gateway = CrudGateway::connect(config)?;
        let outcome = f(&gateway);
        let closed = gateway.close();
        let value = outcome?;
        closed?;
        Ok(value)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Releases the underlying connection
    pub fn close(self) -> Result<()> {
        self.conn.close()
    }

    /// Inserts one row built from `data`
    pub fn insert(&self, table: &str, data: &Record) -> Result<ExecutionResult> {
        let stmt = build_insert(table, data)?;
        self.execute(&stmt)
    }

    /// Returns rows matching every equality in `conditions`; all rows when empty
    pub fn select(&self, table: &str, conditions: &Record) -> Result<RowSet> {
        let stmt = build_select(table, conditions)?;
        self.query(&stmt)
    }

    pub fn select_all(&self, table: &str) -> Result<RowSet> {
        self.select(table, &Record::new())
    }

    pub fn select_where(&self, table: &str, predicate: &Predicate) -> Result<RowSet> {
        let stmt = build_select_where(table, predicate)?;
        self.query(&stmt)
    }

    /// Sets the columns in `data` on every row matching `predicate`
    pub fn update(&self, table: &str, data: &Record, predicate: &Predicate) -> Result<ExecutionResult> {
        let stmt = build_update(table, data, predicate)?;
        self.execute(&stmt)
    }

    /// Removes every row matching `predicate`
    pub fn delete(&self, table: &str, predicate: &Predicate) -> Result<ExecutionResult> {
        let stmt = build_delete(table, predicate)?;
        self.execute(&stmt)
    }

    /// Prepares `stmt` and binds every value to its named placeholder.
    ///
    /// Fails if a binding has no matching placeholder or if the SQL has
    /// placeholders left without a value.
    fn prepare_and_bind(&self, stmt: &SqlStatement) -> Result<rusqlite::Statement<'_>> {
        debug!(sql = %stmt.sql, params = ?stmt.placeholders(), "preparing statement");
        let mut prepared = self
            .conn
            .raw()
            .prepare(&stmt.sql)
            .map_err(|e| TablekitError::Prepare(format!("{} ({})", e, stmt.sql)))?;

        let mut bound = HashSet::new();
        for (name, value) in &stmt.params {
            let index = prepared
                .parameter_index(name)
                .map_err(|e| TablekitError::Bind(format!("{}: {}", name, e)))?
                .ok_or_else(|| {
                    TablekitError::Bind(format!("no placeholder named {} in {}", name, stmt.sql))
                })?;
            if !bound.insert(index) {
                return Err(TablekitError::Bind(format!(
                    "placeholder {} is bound more than once in {}",
                    name, stmt.sql
                )));
            }
            prepared
                .raw_bind_parameter(index, value)
                .map_err(|e| TablekitError::Bind(format!("{}: {}", name, e)))?;
        }

        let expected = prepared.parameter_count();
        if bound.len() != expected {
            return Err(TablekitError::Bind(format!(
                "{} of {} placeholders bound in {}",
                bound.len(),
                expected,
                stmt.sql
            )));
        }
        Ok(prepared)
    }

    fn execute(&self, stmt: &SqlStatement) -> Result<ExecutionResult> {
        let mut prepared = self.prepare_and_bind(stmt)?;
        let rows_affected = prepared
            .raw_execute()
            .map_err(|e| TablekitError::Execution(e.to_string()))?;
        let result = ExecutionResult {
            rows_affected,
            last_insert_rowid: self.conn.raw().last_insert_rowid(),
        };
        debug!(rows_affected, "statement executed");
        Ok(result)
    }

    fn query(&self, stmt: &SqlStatement) -> Result<RowSet> {
        let mut prepared = self.prepare_and_bind(stmt)?;
        let columns: Vec<String> = prepared.column_names().into_iter().map(String::from).collect();

        let mut rows = prepared.raw_query();
        let mut result = RowSet::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| TablekitError::Execution(e.to_string()))?
        {
            let mut record = Record::new();
            for (i, column) in columns.iter().enumerate() {
                let value = row
                    .get_ref(i)
                    .map_err(|e| TablekitError::Execution(e.to_string()))?;
                record.set(column, Value::from(value));
            }
            result.push(record);
        }
        debug!(row_count = result.len(), "query returned");
        Ok(result)
    }
}
