/// Statement Builder Module
///
/// SQL text builders for the four CRUD operations. Building is pure:
/// identifiers are validated and values are collected as named bindings,
/// but nothing touches a connection. The gateway prepares and executes the
/// result.

use super::identifier::{validate_column, validate_table};
use super::predicate::Predicate;
use crate::core::db::{Record, Value};
use crate::core::{Result, TablekitError};

/// Generated SQL plus the values to bind, keyed by placeholder name
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<(String, Value)>,
}

impl SqlStatement {
    /// Placeholder names in binding order
    pub fn placeholders(&self) -> Vec<&str> {
        self.params.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// `INSERT INTO t (a, b) VALUES (:a, :b)`
pub fn build_insert(table: &str, data: &Record) -> Result<SqlStatement> {
    let table = validate_table(table)?;
    if data.is_empty() {
        return Err(TablekitError::EmptyData("insert".to_string()));
    }

    let mut columns = Vec::with_capacity(data.len());
    let mut placeholders = Vec::with_capacity(data.len());
    let mut params = Vec::with_capacity(data.len());
    for (column, value) in data.iter() {
        let column = validate_column(column)?;
        let placeholder = format!(":{}", column);
        columns.push(column);
        placeholders.push(placeholder.clone());
        params.push((placeholder, value.clone()));
    }

    Ok(SqlStatement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        ),
        params,
    })
}

/// `SELECT * FROM t [WHERE a = :a AND b = :b]`
pub fn build_select(table: &str, conditions: &Record) -> Result<SqlStatement> {
    let table = validate_table(table)?;
    let mut sql = format!("SELECT * FROM {}", table);
    let mut params = Vec::with_capacity(conditions.len());

    if !conditions.is_empty() {
        let mut terms = Vec::with_capacity(conditions.len());
        for (column, value) in conditions.iter() {
            let column = validate_column(column)?;
            let placeholder = format!(":{}", column);
            terms.push(format!("{} = {}", column, placeholder));
            params.push((placeholder, value.clone()));
        }
        sql.push_str(" WHERE ");
        sql.push_str(&terms.join(" AND "));
    }

    Ok(SqlStatement { sql, params })
}

/// `SELECT * FROM t WHERE <predicate>`
pub fn build_select_where(table: &str, predicate: &Predicate) -> Result<SqlStatement> {
    let table = validate_table(table)?;
    let mut params = Vec::new();
    let clause = predicate.compile_into(&mut params)?;
    Ok(SqlStatement {
        sql: format!("SELECT * FROM {} WHERE {}", table, clause),
        params,
    })
}

/// `UPDATE t SET a=:a, b=:b WHERE <predicate>`
pub fn build_update(table: &str, data: &Record, predicate: &Predicate) -> Result<SqlStatement> {
    let table = validate_table(table)?;
    if data.is_empty() {
        return Err(TablekitError::EmptyData("update".to_string()));
    }

    let mut assignments = Vec::with_capacity(data.len());
    let mut params = Vec::with_capacity(data.len());
    for (column, value) in data.iter() {
        let column = validate_column(column)?;
        let placeholder = format!(":{}", column);
        assignments.push(format!("{}={}", column, placeholder));
        params.push((placeholder, value.clone()));
    }
    let clause = predicate.compile_into(&mut params)?;

    Ok(SqlStatement {
        sql: format!("UPDATE {} SET {} WHERE {}", table, assignments.join(", "), clause),
        params,
    })
}

/// `DELETE FROM t WHERE <predicate>`
pub fn build_delete(table: &str, predicate: &Predicate) -> Result<SqlStatement> {
    let table = validate_table(table)?;
    let mut params = Vec::new();
    let clause = predicate.compile_into(&mut params)?;
    Ok(SqlStatement {
        sql: format!("DELETE FROM {} WHERE {}", table, clause),
        params,
    })
}
