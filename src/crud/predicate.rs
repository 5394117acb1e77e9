/// Predicate Module
///
/// Structured row filters for update, delete and select. A `Predicate`
/// compiles to a WHERE clause whose values are all bound to `@pN`
/// placeholders. `Predicate::Raw` keeps the older "trusted SQL fragment"
/// style available, with a tokenizer check that the fragment is a single
/// expression.

use super::identifier::validate_column;
use crate::core::db::{Record, Value};
use crate::core::{Result, TablekitError};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};

/// A filter over table rows
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(String, Value),
    NotEq(String, Value),
    Gt(String, Value),
    Ge(String, Value),
    Lt(String, Value),
    Le(String, Value),
    Like(String, String),
    /// Inclusive range
    Between(String, Value, Value),
    In(String, Vec<Value>),
    IsNull(String),
    IsNotNull(String),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    /// Caller-trusted SQL fragment with optional named parameters.
    /// Parameter names include their prefix, e.g. `:name`.
    Raw { sql: String, params: Vec<(String, Value)> },
}

/// WHERE clause text plus its bound values
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPredicate {
    pub sql: String,
    pub params: Vec<(String, Value)>,
}

impl Predicate {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Predicate::Eq(column.to_string(), value.into())
    }

    pub fn not_eq(column: &str, value: impl Into<Value>) -> Self {
        Predicate::NotEq(column.to_string(), value.into())
    }

    pub fn gt(column: &str, value: impl Into<Value>) -> Self {
        Predicate::Gt(column.to_string(), value.into())
    }

    pub fn ge(column: &str, value: impl Into<Value>) -> Self {
        Predicate::Ge(column.to_string(), value.into())
    }

    pub fn lt(column: &str, value: impl Into<Value>) -> Self {
        Predicate::Lt(column.to_string(), value.into())
    }

    pub fn le(column: &str, value: impl Into<Value>) -> Self {
        Predicate::Le(column.to_string(), value.into())
    }

    pub fn like(column: &str, pattern: &str) -> Self {
        Predicate::Like(column.to_string(), pattern.to_string())
    }

    pub fn between(column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Predicate::Between(column.to_string(), low.into(), high.into())
    }

    pub fn in_list<V: Into<Value>>(column: &str, values: impl IntoIterator<Item = V>) -> Self {
        Predicate::In(column.to_string(), values.into_iter().map(Into::into).collect())
    }

    pub fn is_null(column: &str) -> Self {
        Predicate::IsNull(column.to_string())
    }

    pub fn is_not_null(column: &str) -> Self {
        Predicate::IsNotNull(column.to_string())
    }

    pub fn raw(sql: &str) -> Self {
        Predicate::Raw { sql: sql.to_string(), params: Vec::new() }
    }

    pub fn raw_with_params(sql: &str, params: Vec<(String, Value)>) -> Self {
        Predicate::Raw { sql: sql.to_string(), params }
    }

    /// ANDed equality on every column of the record, in record order
    pub fn all_eq(conditions: &Record) -> Self {
        Predicate::And(
            conditions
                .iter()
                .map(|(column, value)| Predicate::Eq(column.to_string(), value.clone()))
                .collect(),
        )
    }

    /// Combines with another predicate, flattening nested ANDs
    pub fn and(self, other: Predicate) -> Self {
        match self {
            Predicate::And(mut parts) => {
                parts.push(other);
                Predicate::And(parts)
            }
            first => Predicate::And(vec![first, other]),
        }
    }

    /// Combines with another predicate, flattening nested ORs
    pub fn or(self, other: Predicate) -> Self {
        match self {
            Predicate::Or(mut parts) => {
                parts.push(other);
                Predicate::Or(parts)
            }
            first => Predicate::Or(vec![first, other]),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    /// Compiles the predicate on its own, numbering placeholders from `@p1`
    pub fn compile(&self) -> Result<CompiledPredicate> {
        let mut params = Vec::new();
        let sql = self.compile_into(&mut params)?;
        Ok(CompiledPredicate { sql, params })
    }

    /// Appends this predicate's bound values to `params` and returns its SQL.
    ///
    /// Placeholders continue numbering from the `@pN` values already in
    /// `params`, so data placeholders (`:col`) never collide with them.
    pub(crate) fn compile_into(&self, params: &mut Vec<(String, Value)>) -> Result<String> {
        let sql = match self {
            Predicate::Eq(column, value) => comparison(column, "=", value, params)?,
            Predicate::NotEq(column, value) => comparison(column, "<>", value, params)?,
            Predicate::Gt(column, value) => comparison(column, ">", value, params)?,
            Predicate::Ge(column, value) => comparison(column, ">=", value, params)?,
            Predicate::Lt(column, value) => comparison(column, "<", value, params)?,
            Predicate::Le(column, value) => comparison(column, "<=", value, params)?,
            Predicate::Like(column, pattern) => {
                comparison(column, "LIKE", &Value::Text(pattern.clone()), params)?
            }
            Predicate::Between(column, low, high) => {
                let column = validate_column(column)?;
                let low = bind(low, params);
                let high = bind(high, params);
                format!("{} BETWEEN {} AND {}", column, low, high)
            }
            Predicate::In(column, values) => {
                let column = validate_column(column)?;
                if values.is_empty() {
                    return Err(TablekitError::InvalidPredicate(format!(
                        "IN list for {} is empty",
                        column
                    )));
                }
                let placeholders: Vec<String> = values.iter().map(|v| bind(v, params)).collect();
                format!("{} IN ({})", column, placeholders.join(", "))
            }
            Predicate::IsNull(column) => format!("{} IS NULL", validate_column(column)?),
            Predicate::IsNotNull(column) => format!("{} IS NOT NULL", validate_column(column)?),
            Predicate::And(parts) => join(parts, "AND", params)?,
            Predicate::Or(parts) => join(parts, "OR", params)?,
            Predicate::Not(inner) => format!("NOT ({})", inner.compile_into(params)?),
            Predicate::Raw { sql, params: raw_params } => {
                check_fragment(sql)?;
                for (name, value) in raw_params {
                    if params.iter().any(|(existing, _)| existing == name) {
                        return Err(TablekitError::InvalidPredicate(format!(
                            "parameter {} is already bound in this statement",
                            name
                        )));
                    }
                    params.push((name.clone(), value.clone()));
                }
                sql.clone()
            }
        };
        Ok(sql)
    }
}

/// Binds one value under the first free `@pN` name and returns that name
fn bind(value: &Value, params: &mut Vec<(String, Value)>) -> String {
    let mut next = params.iter().filter(|(name, _)| name.starts_with("@p")).count() + 1;
    let mut name = format!("@p{}", next);
    while params.iter().any(|(existing, _)| *existing == name) {
        next += 1;
        name = format!("@p{}", next);
    }
    params.push((name.clone(), value.clone()));
    name
}

fn comparison(
    column: &str,
    operator: &str,
    value: &Value,
    params: &mut Vec<(String, Value)>,
) -> Result<String> {
    let column = validate_column(column)?;
    let placeholder = bind(value, params);
    Ok(format!("{} {} {}", column, operator, placeholder))
}

fn join(parts: &[Predicate], keyword: &str, params: &mut Vec<(String, Value)>) -> Result<String> {
    if parts.is_empty() {
        return Err(TablekitError::InvalidPredicate(format!("{} with no terms", keyword)));
    }
    let mut rendered = Vec::with_capacity(parts.len());
    for part in parts {
        let sql = part.compile_into(params)?;
        let nested = matches!(part, Predicate::And(p) | Predicate::Or(p) if p.len() > 1)
            || matches!(part, Predicate::Raw { .. });
        rendered.push(if nested { format!("({})", sql) } else { sql });
    }
    Ok(rendered.join(&format!(" {} ", keyword)))
}

/// Rejects raw fragments that could end the statement or hide trailing SQL
fn check_fragment(sql: &str) -> Result<()> {
    if sql.trim().is_empty() {
        return Err(TablekitError::InvalidPredicate("empty SQL fragment".to_string()));
    }
    let dialect = SQLiteDialect {};
    let tokens = Tokenizer::new(&dialect, sql)
        .tokenize()
        .map_err(|e| TablekitError::InvalidPredicate(format!("{:?}", e)))?;
    let unbalanced = || {
        TablekitError::InvalidPredicate(format!("fragment {:?} has unbalanced parentheses", sql))
    };
    // Depth must never drop below zero, or the fragment could close a
    // group opened around it.
    let mut depth = 0usize;
    for token in tokens {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.checked_sub(1).ok_or_else(unbalanced)?,
            Token::SemiColon => {
                return Err(TablekitError::InvalidPredicate(format!(
                    "fragment {:?} contains a statement separator",
                    sql
                )))
            }
            Token::Whitespace(Whitespace::SingleLineComment { .. })
            | Token::Whitespace(Whitespace::MultiLineComment(_)) => {
                return Err(TablekitError::InvalidPredicate(format!(
                    "fragment {:?} contains a comment",
                    sql
                )))
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(unbalanced());
    }
    Ok(())
}
