//! Row to JSON conversion for column-aware queries.
//!
//! Values are decoded according to the column's PostgreSQL type. `NUMERIC`
//! columns are not decodable without an extra decimal crate, so queries cast
//! them to `float8` in SQL (`p.price::float8 AS price`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Number, Value};
use sqlx::{
    Column, Decode, Postgres, Row, Type, TypeInfo,
    postgres::{PgColumn, PgRow},
};

/// A result row keyed by column name (after `AS` aliasing).
pub type Record = serde_json::Map<String, Value>;

/// Pair each value of `row` with its result column name.
pub fn to_record(row: &PgRow) -> Record {
    row.columns()
        .iter()
        .map(|column| (column.name().to_string(), cell(row, column)))
        .collect()
}

/// Values of `row` in result column order.
pub fn to_tuple(row: &PgRow) -> Vec<Value> {
    row.columns().iter().map(|column| cell(row, column)).collect()
}

fn cell(row: &PgRow, column: &PgColumn) -> Value {
    let index = column.ordinal();
    let value = match column.type_info().name() {
        "INT2" => get::<i16>(row, index).map(Value::from),
        "INT4" => get::<i32>(row, index).map(Value::from),
        "INT8" => get::<i64>(row, index).map(Value::from),
        "FLOAT4" => get::<f32>(row, index)
            .and_then(|v| Number::from_f64(f64::from(v)))
            .map(Value::Number),
        "FLOAT8" => get::<f64>(row, index)
            .and_then(Number::from_f64)
            .map(Value::Number),
        "BOOL" => get::<bool>(row, index).map(Value::Bool),
        "DATE" => get::<NaiveDate>(row, index).map(|d| Value::String(d.format("%Y-%m-%d").to_string())),
        "TIME" => get::<NaiveTime>(row, index).map(|t| Value::String(t.format("%H:%M:%S").to_string())),
        "TIMESTAMP" => get::<NaiveDateTime>(row, index)
            .map(|d| Value::String(d.format("%Y-%m-%d %H:%M:%S").to_string())),
        "TIMESTAMPTZ" => get::<DateTime<Utc>>(row, index).map(|d| Value::String(d.to_rfc3339())),
        "JSON" | "JSONB" => get::<Value>(row, index),
        _ => get::<String>(row, index).map(Value::String),
    };

    value.unwrap_or(Value::Null)
}

/// Decode a nullable column, treating both SQL NULL and undecodable types as absent.
fn get<'r, T>(row: &'r PgRow, index: usize) -> Option<T>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    match row.try_get::<Option<T>, _>(index) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Column {} could not be decoded: {}", index, e);
            None
        }
    }
}
