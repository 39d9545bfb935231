//! Active-record mapper: per-schema create-table, save, and fetch-all,
//! mediated by the injected [`RecordStore`].

use crate::error::AppError;
use crate::schema::ModelSchema;
use crate::sql;
use crate::store::RecordStore;
use serde_json::Value;
use std::sync::Arc;

/// One in-memory record: declared fields by name. Absent fields read as
/// null and bind as NULL on save. Mutated only through `set`; persisted
/// only through an explicit [`Model::save`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    values: serde_json::Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) -> &mut Self {
        self.values.insert(field.into(), value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Keyword-match a stored row onto the declared fields: unknown columns
    /// are ignored, missing columns stay absent.
    fn from_row(schema: &ModelSchema, row: &Value) -> Self {
        let mut record = Record::new();
        if let Value::Object(columns) = row {
            for name in schema.field_names() {
                if let Some(v) = columns.get(name) {
                    record.set(name, v.clone());
                }
            }
        }
        record
    }
}

/// A model type bound to its table and to the process-wide store.
#[derive(Clone)]
pub struct Model {
    schema: Arc<ModelSchema>,
    store: RecordStore,
}

impl Model {
    pub fn bind(schema: Arc<ModelSchema>, store: RecordStore) -> Self {
        Model { schema, store }
    }

    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    /// `CREATE TABLE IF NOT EXISTS`; safe to call any number of times.
    pub async fn create_table(&self) -> Result<(), AppError> {
        let ddl = sql::create_table(&self.schema);
        self.store.execute(&ddl, &[]).await?;
        Ok(())
    }

    /// Insert the record's declared fields in declaration order. On success
    /// the identity field is filled in from the store-assigned rowid when
    /// the schema declares an INTEGER PRIMARY KEY; callers must not rely on
    /// the identity before save returns.
    pub async fn save(&self, record: &mut Record) -> Result<(), AppError> {
        let q = sql::insert(&self.schema, record);
        let done = self.store.execute(&q.sql, &q.params).await?;
        if let Some(id_field) = self.schema.rowid_field() {
            if record.get(id_field).map_or(true, Value::is_null) {
                record.set(id_field, Value::from(done.last_insert_rowid));
            }
        }
        Ok(())
    }

    /// Fetch the whole table, eagerly materialized in storage order. Bounded
    /// by available memory; this mapper has no pagination.
    pub async fn all(&self) -> Result<Vec<Record>, AppError> {
        let rows = self.store.fetch_all(&sql::select_all(&self.schema), &[]).await?;
        Ok(rows
            .iter()
            .map(|row| Record::from_row(&self.schema, row))
            .collect())
    }
}
