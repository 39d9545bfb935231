//! Builds parameterized CREATE TABLE, INSERT, and SELECT from a model schema.

use crate::model::Record;
use crate::schema::ModelSchema;
use serde_json::Value;

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

/// `CREATE TABLE IF NOT EXISTS <table> (<clauses>)`. Idempotent by construction.
pub fn create_table(schema: &ModelSchema) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
        schema.table(),
        schema.column_defs().join(", ")
    )
}

/// INSERT over every declared field in declaration order; values taken from
/// the record, absent fields bound as NULL so the store can fill defaults
/// (e.g. the rowid for an INTEGER PRIMARY KEY).
pub fn insert(schema: &ModelSchema, record: &Record) -> QueryBuf {
    let names: Vec<String> = schema.field_names().map(|n| format!("\"{}\"", n)).collect();
    let placeholders: Vec<&str> = schema.field_names().map(|_| "?").collect();
    let params = schema
        .field_names()
        .map(|n| record.get(n).cloned().unwrap_or(Value::Null))
        .collect();
    QueryBuf {
        sql: format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            schema.table(),
            names.join(", "),
            placeholders.join(", ")
        ),
        params,
    }
}

/// Whole-table fetch. The result is materialized eagerly by the caller.
pub fn select_all(schema: &ModelSchema) -> String {
    format!("SELECT * FROM \"{}\"", schema.table())
}
