//! Declarative model schemas: ordered field declarations bound to one table.
//!
//! A schema is built once, at application startup, through [`SchemaBuilder`]
//! (or [`ModelSchema::from_declarations`] for dynamic input) and is immutable
//! afterwards. Field order is declaration order and determines both column
//! order in DDL and positional binding order on insert.

use crate::error::SchemaError;
use serde_json::Value;

/// Column definition for one field: either a bare type affinity or an
/// ordered run of clause tokens (type plus constraints).
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnClause {
    Scalar(String),
    Tokens(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub name: String,
    pub clause: ColumnClause,
}

impl FieldDecl {
    /// Rendered column clause, e.g. `"name" TEXT` or
    /// `"id" INTEGER PRIMARY KEY AUTOINCREMENT`.
    pub fn column_def(&self) -> String {
        match &self.clause {
            ColumnClause::Scalar(t) => format!("\"{}\" {}", self.name, t),
            ColumnClause::Tokens(tokens) => {
                format!("\"{}\" {}", self.name, tokens.join(" "))
            }
        }
    }

    fn tokens_upper(&self) -> String {
        match &self.clause {
            ColumnClause::Scalar(t) => t.to_uppercase(),
            ColumnClause::Tokens(tokens) => tokens.join(" ").to_uppercase(),
        }
    }
}

/// Identifiers that would need quoting or collide with SQL keywords are
/// rejected outright rather than silently trusted.
const RESERVED_WORDS: &[&str] = &[
    "select", "insert", "update", "delete", "create", "drop", "alter", "table",
    "index", "from", "where", "group", "order", "join", "union", "values",
    "primary", "key", "null", "not", "and", "or", "set", "into", "default",
    "references", "constraint", "transaction", "commit", "rollback",
];

fn validate_identifier(name: &str) -> Result<(), SchemaError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid_start || !valid_rest {
        return Err(SchemaError::InvalidIdentifier(name.to_string()));
    }
    if RESERVED_WORDS.contains(&name) {
        return Err(SchemaError::ReservedWord(name.to_string()));
    }
    Ok(())
}

/// One model type: a table name plus its ordered field declarations.
#[derive(Clone, Debug)]
pub struct ModelSchema {
    table: String,
    fields: Vec<FieldDecl>,
}

impl ModelSchema {
    pub fn builder(table: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            table: table.into(),
            fields: Vec::new(),
        }
    }

    /// Build a schema from dynamic declarations: a string value is a scalar
    /// type affinity, an array of strings is a token sequence, and anything
    /// else (nested arrays, objects, numbers) fails here rather than at
    /// query time.
    pub fn from_declarations(
        table: impl Into<String>,
        declarations: &[(&str, Value)],
    ) -> Result<Self, SchemaError> {
        let mut builder = Self::builder(table);
        for (name, decl) in declarations {
            match decl {
                Value::String(t) => {
                    builder = builder.field(*name, t.clone());
                }
                Value::Array(items) => {
                    let mut tokens = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            Value::String(s) => tokens.push(s.clone()),
                            _ => {
                                return Err(SchemaError::BadDeclaration {
                                    field: (*name).to_string(),
                                })
                            }
                        }
                    }
                    builder = builder.field_tokens(*name, tokens);
                }
                _ => {
                    return Err(SchemaError::BadDeclaration {
                        field: (*name).to_string(),
                    })
                }
            }
        }
        builder.build()
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// Field names in declared order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Column clauses in declared order, for CREATE TABLE.
    pub fn column_defs(&self) -> Vec<String> {
        self.fields.iter().map(FieldDecl::column_def).collect()
    }

    /// Whether the store assigns the identity: true when an INTEGER field
    /// is declared PRIMARY KEY (SQLite rowid alias), so `save` can read
    /// back `last_insert_rowid`.
    pub fn rowid_field(&self) -> Option<&str> {
        self.fields.iter().find_map(|f| {
            let def = f.tokens_upper();
            (def.contains("INTEGER") && def.contains("PRIMARY KEY")).then_some(f.name.as_str())
        })
    }
}

pub struct SchemaBuilder {
    table: String,
    fields: Vec<FieldDecl>,
}

impl SchemaBuilder {
    pub fn field(mut self, name: impl Into<String>, type_affinity: impl Into<String>) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            clause: ColumnClause::Scalar(type_affinity.into()),
        });
        self
    }

    pub fn field_tokens<I, S>(mut self, name: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.push(FieldDecl {
            name: name.into(),
            clause: ColumnClause::Tokens(tokens.into_iter().map(Into::into).collect()),
        });
        self
    }

    pub fn build(self) -> Result<ModelSchema, SchemaError> {
        validate_identifier(&self.table)?;
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields(self.table));
        }
        let mut seen = std::collections::HashSet::new();
        for f in &self.fields {
            validate_identifier(&f.name)?;
            if !seen.insert(f.name.as_str()) {
                return Err(SchemaError::DuplicateField(f.name.clone()));
            }
        }
        Ok(ModelSchema {
            table: self.table,
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_schema() -> ModelSchema {
        ModelSchema::builder("user")
            .field_tokens("id", ["INTEGER", "PRIMARY KEY", "AUTOINCREMENT"])
            .field("name", "TEXT")
            .field("email", "TEXT")
            .build()
            .unwrap()
    }

    #[test]
    fn column_defs_follow_declaration_order() {
        let schema = user_schema();
        assert_eq!(
            schema.column_defs(),
            vec![
                "\"id\" INTEGER PRIMARY KEY AUTOINCREMENT",
                "\"name\" TEXT",
                "\"email\" TEXT",
            ]
        );
        let names: Vec<_> = schema.field_names().collect();
        assert_eq!(names, vec!["id", "name", "email"]);
    }

    #[test]
    fn scalar_and_token_clauses_render_the_same_shape() {
        let schema = ModelSchema::builder("post")
            .field("title", "TEXT NOT NULL")
            .field_tokens("body", ["TEXT", "NOT NULL"])
            .build()
            .unwrap();
        assert_eq!(schema.column_defs()[0], "\"title\" TEXT NOT NULL");
        assert_eq!(schema.column_defs()[1], "\"body\" TEXT NOT NULL");
    }

    #[test]
    fn from_declarations_accepts_strings_and_string_arrays() {
        let schema = ModelSchema::from_declarations(
            "user",
            &[
                ("id", json!(["INTEGER", "PRIMARY KEY", "AUTOINCREMENT"])),
                ("name", json!("TEXT")),
            ],
        )
        .unwrap();
        assert_eq!(schema.fields().len(), 2);
        assert_eq!(schema.rowid_field(), Some("id"));
    }

    #[test]
    fn from_declarations_rejects_nested_structures() {
        let err = ModelSchema::from_declarations("user", &[("id", json!([["INTEGER"]]))])
            .unwrap_err();
        assert!(matches!(err, SchemaError::BadDeclaration { field } if field == "id"));

        let err = ModelSchema::from_declarations("user", &[("n", json!(42))]).unwrap_err();
        assert!(matches!(err, SchemaError::BadDeclaration { .. }));
    }

    #[test]
    fn reserved_and_malformed_identifiers_fail_at_build() {
        let err = ModelSchema::builder("select").field("a", "TEXT").build().unwrap_err();
        assert!(matches!(err, SchemaError::ReservedWord(_)));

        let err = ModelSchema::builder("User").field("a", "TEXT").build().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidIdentifier(_)));

        let err = ModelSchema::builder("user")
            .field("name", "TEXT")
            .field("name", "TEXT")
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField(_)));

        let err = ModelSchema::builder("user").build().unwrap_err();
        assert!(matches!(err, SchemaError::NoFields(_)));
    }

    #[test]
    fn rowid_field_requires_integer_primary_key() {
        let schema = ModelSchema::builder("tag")
            .field_tokens("id", ["TEXT", "PRIMARY KEY"])
            .field("label", "TEXT")
            .build()
            .unwrap();
        assert_eq!(schema.rowid_field(), None);
    }
}
