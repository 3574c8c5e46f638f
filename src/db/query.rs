//! Query execution helper.
//!
//! Every handler talks to the database through the same small contract:
//! a SQL template with positional placeholders plus a parallel list of
//! parameter values ([`SqlQuery`]). Values are always bound as parameters,
//! never spliced into the SQL text.
//!
//! # Read path
//!
//! [`fetch_records`] returns rows as string-keyed [`Record`]s built from the
//! result column names; [`fetch_rows`] returns plain ordered tuples.
//!
//! # Write path
//!
//! [`execute`] and [`execute_returning`] run the statement in its own
//! transaction, commit on success and roll back explicitly on failure.
//!
//! # Failures
//!
//! Errors are logged here and returned to the caller, so "no rows" and
//! "query failed" stay distinguishable.

use serde_json::Value;
use sqlx::{Postgres, error::ErrorKind, postgres::PgArguments, query::Query};

use super::{
    DbPool,
    record::{self, Record},
};

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i32),
    BigInt(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    /// Bound as a NULL of type `text`; only valid for text-typed targets.
    Null,
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::BigInt(value)
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        SqlParam::Float(value)
    }
}

impl From<bool> for SqlParam {
    fn from(value: bool) -> Self {
        SqlParam::Bool(value)
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlParam::Null, Into::into)
    }
}

/// A parameterized statement assembled from a base template and optional predicates.
///
/// Placeholders already present in the base template are filled with [`SqlQuery::bind`]
/// in order. Predicates added with [`SqlQuery::filter`] use `?` as their placeholder,
/// which is rewritten to the next `$n` so the SQL and the parameter list stay aligned.
/// Predicates are joined with `AND` under a single `WHERE`, so the base template
/// must not contain its own `WHERE` when filters are used.
///
/// ```ignore
/// let mut query = SqlQuery::new("SELECT name FROM vet");
/// query
///     .filter("state = ?", "CA")
///     .filter("rating >= ?", 4.0)
///     .order_by("rating DESC, name");
/// assert_eq!(query.sql(), "SELECT name FROM vet WHERE state = $1 AND rating >= $2 ORDER BY rating DESC, name");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlQuery {
    base: String,
    predicates: Vec<String>,
    order_by: Option<String>,
    params: Vec<SqlParam>,
}

impl SqlQuery {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            base: sql.into(),
            ..Self::default()
        }
    }

    /// Bind the value for the next placeholder of the base template.
    pub fn bind(mut self, value: impl Into<SqlParam>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Add a predicate whose single `?` placeholder takes `value`.
    pub fn filter(&mut self, fragment: &str, value: impl Into<SqlParam>) -> &mut Self {
        debug_assert!(fragment.contains('?'), "predicate has no placeholder");

        self.params.push(value.into());
        let placeholder = format!("${}", self.params.len());
        self.predicates.push(fragment.replacen('?', &placeholder, 1));
        self
    }

    /// Add a predicate only when a value is present.
    pub fn filter_opt<T: Into<SqlParam>>(&mut self, fragment: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.filter(fragment, value);
        }
        self
    }

    pub fn order_by(&mut self, clause: &str) -> &mut Self {
        self.order_by = Some(clause.to_string());
        self
    }

    /// The full SQL text.
    pub fn sql(&self) -> String {
        let mut sql = self.base.trim_end().to_string();

        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }

        if let Some(ref order_by) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }

        sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }
}

/// Attach every parameter to a sqlx query in placeholder order.
fn build<'q>(sql: &'q str, params: &'q [SqlParam]) -> Query<'q, Postgres, PgArguments> {
    params
        .iter()
        .fold(sqlx::query(sql), |query, param| match param {
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::BigInt(v) => query.bind(*v),
            SqlParam::Float(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v.as_str()),
            SqlParam::Bool(v) => query.bind(*v),
            SqlParam::Null => query.bind(None::<String>),
        })
}

/// Constraint violations are client mistakes the handlers turn into 400/404.
fn is_constraint_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|e| !matches!(e.kind(), ErrorKind::Other))
}

fn log_failure(sql: &str, error: &sqlx::Error) {
    if is_constraint_violation(error) {
        tracing::warn!(sql = %sql, "Constraint violation: {}", error);
    } else {
        tracing::error!(sql = %sql, "Database error: {}", error);
    }
}

/// Run a read query and return every row as a column-keyed record.
pub async fn fetch_records(pool: &DbPool, query: &SqlQuery) -> Result<Vec<Record>, sqlx::Error> {
    let sql = query.sql();
    tracing::debug!(sql = %sql, params = query.params().len(), "fetch records");

    let rows = build(&sql, query.params())
        .fetch_all(pool)
        .await
        .inspect_err(|e| log_failure(&sql, e))?;

    Ok(rows.iter().map(record::to_record).collect())
}

/// Run a read query expected to match at most one row.
pub async fn fetch_record(pool: &DbPool, query: &SqlQuery) -> Result<Option<Record>, sqlx::Error> {
    let sql = query.sql();
    tracing::debug!(sql = %sql, params = query.params().len(), "fetch record");

    let row = build(&sql, query.params())
        .fetch_optional(pool)
        .await
        .inspect_err(|e| log_failure(&sql, e))?;

    Ok(row.as_ref().map(record::to_record))
}

/// Run a read query and return rows as ordered tuples.
pub async fn fetch_rows(pool: &DbPool, query: &SqlQuery) -> Result<Vec<Vec<Value>>, sqlx::Error> {
    let sql = query.sql();
    tracing::debug!(sql = %sql, params = query.params().len(), "fetch rows");

    let rows = build(&sql, query.params())
        .fetch_all(pool)
        .await
        .inspect_err(|e| log_failure(&sql, e))?;

    Ok(rows.iter().map(record::to_tuple).collect())
}

/// Run a write statement in its own transaction and return the number of affected rows.
pub async fn execute(pool: &DbPool, query: &SqlQuery) -> Result<u64, sqlx::Error> {
    let sql = query.sql();
    tracing::debug!(sql = %sql, params = query.params().len(), "execute");

    let mut tx = pool.begin().await?;
    match build(&sql, query.params()).execute(&mut *tx).await {
        Ok(result) => {
            tx.commit().await?;
            Ok(result.rows_affected())
        }
        Err(e) => {
            log_failure(&sql, &e);
            tx.rollback().await?;
            Err(e)
        }
    }
}

/// Run a write statement with a `RETURNING` clause in its own transaction.
pub async fn execute_returning(
    pool: &DbPool,
    query: &SqlQuery,
) -> Result<Option<Record>, sqlx::Error> {
    let sql = query.sql();
    tracing::debug!(sql = %sql, params = query.params().len(), "execute returning");

    let mut tx = pool.begin().await?;
    match build(&sql, query.params()).fetch_optional(&mut *tx).await {
        Ok(row) => {
            tx.commit().await?;
            Ok(row.as_ref().map(record::to_record))
        }
        Err(e) => {
            log_failure(&sql, &e);
            tx.rollback().await?;
            Err(e)
        }
    }
}
