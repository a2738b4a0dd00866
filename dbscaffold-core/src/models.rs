//! Core data models for the schema representation.
//!
//! These types are backend independent: both schema sources produce the
//! same raw metadata shapes, and the classifier turns them into the
//! `Table`/`Column` graph consumed by the emitter.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::naming::camel_case;

/// Supported database backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    MySql,
    Postgres,
    Sqlite,
}

impl Backend {
    /// Parses a backend name as given on the command line.
    ///
    /// # Errors
    /// Returns a configuration error for unknown names. `sqlite` parses
    /// successfully; it is rejected later as an unsupported driver.
    pub fn parse(name: &str) -> crate::Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(crate::error::ScaffoldError::configuration(format!(
                "Unknown database driver '{}': must be one of mysql, postgres or sqlite",
                other
            ))),
        }
    }

    /// Lowercase driver key used in configuration and the source registry.
    pub fn key(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::MySql => write!(f, "MySQL"),
            Backend::Postgres => write!(f, "PostgreSQL"),
            Backend::Sqlite => write!(f, "SQLite"),
        }
    }
}

/// Foreign key of a single local column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub column: String,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// One row of constraint metadata as reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintRow {
    pub constraint_name: String,
    pub constraint_type: String,
    pub column_name: String,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub referenced_column: String,
    pub ordinal_position: i64,
}

impl ConstraintRow {
    /// Builds a PRIMARY KEY row.
    pub fn primary_key(column: &str, ordinal_position: i64) -> Self {
        Self {
            constraint_name: "PRIMARY".to_string(),
            constraint_type: "PRIMARY KEY".to_string(),
            column_name: column.to_string(),
            referenced_schema: String::new(),
            referenced_table: String::new(),
            referenced_column: String::new(),
            ordinal_position,
        }
    }

    /// Builds the row of a single-column UNIQUE constraint.
    pub fn unique(column: &str) -> Self {
        Self::unique_member(&format!("{}_key", column), column, 1)
    }

    /// Builds one column row of a possibly composite UNIQUE constraint.
    pub fn unique_member(constraint: &str, column: &str, ordinal_position: i64) -> Self {
        Self {
            constraint_name: constraint.to_string(),
            constraint_type: "UNIQUE".to_string(),
            ..Self::primary_key(column, ordinal_position)
        }
    }

    /// Builds a FOREIGN KEY row.
    pub fn foreign_key(column: &str, schema: &str, table: &str, referenced_column: &str) -> Self {
        Self {
            constraint_name: format!("{}_fkey", column),
            constraint_type: "FOREIGN KEY".to_string(),
            column_name: column.to_string(),
            referenced_schema: schema.to_string(),
            referenced_table: table.to_string(),
            referenced_column: referenced_column.to_string(),
            ordinal_position: 1,
        }
    }
}

/// Key constraints of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableConstraints {
    /// Single-column primary key, if any
    pub primary_key: Option<String>,
    /// Set when any primary-key row has an ordinal position other than 1
    pub composite_primary_key: bool,
    /// Columns that are unique on their own
    pub unique_keys: Vec<String>,
    pub foreign_keys: BTreeMap<String, ForeignKey>,
}

impl TableConstraints {
    /// Folds constraint rows into table constraints.
    ///
    /// A composite primary key clears the primary key no matter in which
    /// order its rows arrive. Only UNIQUE constraints over a single column
    /// yield unique keys.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = ConstraintRow>,
    {
        let mut constraints = Self::default();
        let mut unique_constraints: Vec<(String, Vec<String>)> = Vec::new();

        for row in rows {
            match row.constraint_type.as_str() {
                "PRIMARY KEY" => {
                    if row.ordinal_position == 1 {
                        constraints.primary_key = Some(row.column_name);
                    } else {
                        constraints.composite_primary_key = true;
                    }
                }
                "UNIQUE" => {
                    match unique_constraints
                        .iter_mut()
                        .find(|(name, _)| *name == row.constraint_name)
                    {
                        Some((_, columns)) => {
                            if !columns.contains(&row.column_name) {
                                columns.push(row.column_name);
                            }
                        }
                        None => unique_constraints.push((row.constraint_name, vec![row.column_name])),
                    }
                }
                "FOREIGN KEY" => {
                    constraints.foreign_keys.insert(
                        row.column_name.clone(),
                        ForeignKey {
                            column: row.column_name,
                            referenced_schema: row.referenced_schema,
                            referenced_table: row.referenced_table,
                            referenced_column: row.referenced_column,
                        },
                    );
                }
                other => {
                    tracing::trace!("Ignoring constraint type '{}'", other);
                }
            }
        }

        if constraints.composite_primary_key {
            constraints.primary_key = None;
        }

        for (_, mut columns) in unique_constraints {
            if columns.len() == 1
                && let Some(column) = columns.pop()
                && !constraints.unique_keys.contains(&column)
            {
                constraints.unique_keys.push(column);
            }
        }

        constraints
    }

    /// True if the table has exactly one primary-key column.
    pub fn has_single_primary_key(&self) -> bool {
        self.primary_key.is_some() && !self.composite_primary_key
    }
}

/// Tables that cannot be the target of a generated relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    tables: BTreeSet<String>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: impl Into<String>) {
        self.tables.insert(table.into());
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains(table)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(String::as_str)
    }
}

/// Raw column metadata as reported by a schema source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawColumn {
    pub name: String,
    /// Native type name, e.g. `varchar`
    pub data_type: String,
    /// Full native type string, e.g. `varchar(255)` or `int(10) unsigned`
    pub column_type: String,
    pub is_nullable: bool,
    pub default_value: Option<String>,
    /// Extra marker, e.g. `auto_increment` or `on update CURRENT_TIMESTAMP`
    pub extra: String,
}

impl RawColumn {
    pub fn is_auto_increment(&self) -> bool {
        self.extra.eq_ignore_ascii_case(AUTO_INCREMENT)
    }
}

/// Extra marker for auto-increment columns.
pub const AUTO_INCREMENT: &str = "auto_increment";

/// Extra marker for columns refreshed on every update.
pub const ON_UPDATE_CURRENT_TIMESTAMP: &str = "on update CURRENT_TIMESTAMP";

/// Temporal column kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemporalKind {
    Date,
    DateTime,
    Timestamp,
    Time,
}

impl TemporalKind {
    /// Classifies a native temporal type name.
    ///
    /// Postgres spells out zone handling (`timestamp without time zone`),
    /// so matching is by prefix with the longest names checked first.
    pub fn from_native(data_type: &str) -> Option<Self> {
        let lower = data_type.to_lowercase();
        if lower.starts_with("datetime") {
            Some(Self::DateTime)
        } else if lower.starts_with("timestamp") {
            Some(Self::Timestamp)
        } else if lower.starts_with("date") {
            Some(Self::Date)
        } else if lower.starts_with("time") {
            Some(Self::Time)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Time => "time",
        }
    }
}

/// Precision and scale of a fixed-point column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimalSpec {
    pub digits: String,
    pub scale: String,
}

/// Relation semantics of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RelationKind {
    #[default]
    None,
    BelongsToForeignKey,
}

/// Per-column classification flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tag {
    /// Source column name, always retained
    pub column: String,
    pub auto_generated: bool,
    pub primary_key_explicit: bool,
    pub nullable: bool,
    pub unique: bool,
    pub size: Option<String>,
    pub decimal: Option<DecimalSpec>,
    pub temporal: Option<TemporalKind>,
    /// Backend type passed through verbatim (uuid, json, interval, ...)
    pub native_type: Option<String>,
    /// Refreshed with the current time on every update
    pub auto_now: bool,
    /// Set to the current time on insert
    pub auto_now_add: bool,
    pub relation: RelationKind,
    pub default_value: Option<String>,
}

impl Tag {
    pub fn for_column(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ..Self::default()
        }
    }
}

/// Target type of a generated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// Target primitive, e.g. `int64` or `time.Time`
    Primitive(String),
    /// Pointer to another generated entity
    Relation { entity: String },
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Primitive(name) => write!(f, "{}", name),
            FieldType::Relation { entity } => write!(f, "*{}", entity),
        }
    }
}

/// A classified column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Derived field identifier
    pub name: String,
    pub field_type: FieldType,
    pub tag: Tag,
}

/// A table with its classified columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub primary_key: Option<String>,
    pub unique_keys: Vec<String>,
    pub foreign_keys: BTreeMap<String, ForeignKey>,
    pub columns: Vec<Column>,
    /// Set when any column needs the temporal import
    pub imports_time: bool,
}

impl Table {
    /// Creates a table from its resolved constraints, with no columns yet.
    pub fn new(name: impl Into<String>, constraints: TableConstraints) -> Self {
        Self {
            name: name.into(),
            primary_key: constraints.primary_key,
            unique_keys: constraints.unique_keys,
            foreign_keys: constraints.foreign_keys,
            columns: Vec::new(),
            imports_time: false,
        }
    }

    /// Generated entity type name.
    pub fn entity_name(&self) -> String {
        camel_case(&self.name)
    }

    /// True if the table has a usable single-column primary key and can
    /// therefore get a controller and route.
    pub fn has_primary_key(&self) -> bool {
        self.primary_key.as_deref().is_some_and(|pk| !pk.is_empty())
    }

    pub fn column(&self, source_name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.tag.column == source_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!(Backend::parse("mysql").unwrap(), Backend::MySql);
        assert_eq!(Backend::parse("postgres").unwrap(), Backend::Postgres);
        assert_eq!(Backend::parse("PostgreSQL").unwrap(), Backend::Postgres);
        assert_eq!(Backend::parse("sqlite").unwrap(), Backend::Sqlite);
        assert!(Backend::parse("oracle").is_err());
        assert_eq!(Backend::MySql.key(), "mysql");
        assert_eq!(Backend::Postgres.to_string(), "PostgreSQL");
    }

    #[test]
    fn test_single_primary_key() {
        let constraints = TableConstraints::from_rows(vec![ConstraintRow::primary_key("id", 1)]);
        assert_eq!(constraints.primary_key.as_deref(), Some("id"));
        assert!(constraints.has_single_primary_key());
    }

    #[test]
    fn test_composite_primary_key_is_cleared() {
        let constraints = TableConstraints::from_rows(vec![
            ConstraintRow::primary_key("post_id", 1),
            ConstraintRow::primary_key("tag_id", 2),
        ]);
        assert_eq!(constraints.primary_key, None);
        assert!(constraints.composite_primary_key);
        assert!(!constraints.has_single_primary_key());
    }

    #[test]
    fn test_composite_primary_key_rows_out_of_order() {
        let constraints = TableConstraints::from_rows(vec![
            ConstraintRow::primary_key("tag_id", 2),
            ConstraintRow::primary_key("post_id", 1),
        ]);
        assert_eq!(constraints.primary_key, None);
        assert!(constraints.composite_primary_key);
    }

    #[test]
    fn test_unique_and_foreign_keys() {
        let constraints = TableConstraints::from_rows(vec![
            ConstraintRow::primary_key("id", 1),
            ConstraintRow::unique("slug"),
            ConstraintRow::unique("slug"),
            ConstraintRow::foreign_key("user_id", "app", "users", "id"),
            ConstraintRow {
                constraint_type: "CHECK".to_string(),
                ..ConstraintRow::unique("price")
            },
        ]);

        assert_eq!(constraints.unique_keys, vec!["slug".to_string()]);
        let fk = &constraints.foreign_keys["user_id"];
        assert_eq!(fk.referenced_table, "users");
        assert_eq!(fk.referenced_schema, "app");
        assert_eq!(fk.referenced_column, "id");
        assert_eq!(constraints.foreign_keys.len(), 1);
    }

    #[test]
    fn test_composite_unique_is_not_a_unique_key() {
        let constraints = TableConstraints::from_rows(vec![
            ConstraintRow::unique_member("room_slot_key", "room", 1),
            ConstraintRow::unique_member("room_slot_key", "slot", 2),
            ConstraintRow::unique_member("code_key", "code", 1),
            ConstraintRow::unique_member("room_key", "room", 1),
        ]);
        assert_eq!(
            constraints.unique_keys,
            vec!["code".to_string(), "room".to_string()]
        );
    }

    #[test]
    fn test_temporal_kind_from_native() {
        assert_eq!(TemporalKind::from_native("date"), Some(TemporalKind::Date));
        assert_eq!(TemporalKind::from_native("datetime"), Some(TemporalKind::DateTime));
        assert_eq!(TemporalKind::from_native("timestamp"), Some(TemporalKind::Timestamp));
        assert_eq!(
            TemporalKind::from_native("timestamp without time zone"),
            Some(TemporalKind::Timestamp)
        );
        assert_eq!(
            TemporalKind::from_native("time with time zone"),
            Some(TemporalKind::Time)
        );
        assert_eq!(TemporalKind::from_native("varchar"), None);
    }

    #[test]
    fn test_field_type_display() {
        assert_eq!(FieldType::Primitive("int64".into()).to_string(), "int64");
        assert_eq!(
            FieldType::Relation {
                entity: "Users".into()
            }
            .to_string(),
            "*Users"
        );
    }

    #[test]
    fn test_table_primary_key_usability() {
        let table = Table::new("logs", TableConstraints::default());
        assert!(!table.has_primary_key());
        assert_eq!(table.entity_name(), "Logs");

        let constraints = TableConstraints::from_rows(vec![ConstraintRow::primary_key("id", 1)]);
        let table = Table::new("user_profiles", constraints);
        assert!(table.has_primary_key());
        assert_eq!(table.entity_name(), "UserProfiles");
    }
}
