//! MySQL type table and classification rules.

use crate::adapters::{ClassificationRules, TypeMapper};
use crate::models::Backend;

/// MySQL native type names and their target primitives.
pub const MYSQL_TYPES: &[(&str, &str)] = &[
    // Integers
    ("int", "int"),
    ("integer", "int"),
    ("tinyint", "int8"),
    ("smallint", "int16"),
    ("mediumint", "int32"),
    ("bigint", "int64"),
    ("int unsigned", "uint"),
    ("integer unsigned", "uint"),
    ("tinyint unsigned", "uint8"),
    ("smallint unsigned", "uint16"),
    ("mediumint unsigned", "uint32"),
    ("bigint unsigned", "uint64"),
    ("bit", "uint64"),
    ("year", "int16"),
    ("bool", "bool"),
    ("boolean", "bool"),
    // Enumerations
    ("enum", "string"),
    ("set", "string"),
    // Character and text
    ("varchar", "string"),
    ("char", "string"),
    ("tinytext", "string"),
    ("mediumtext", "string"),
    ("text", "string"),
    ("longtext", "string"),
    ("json", "string"),
    // Blobs
    ("blob", "string"),
    ("tinyblob", "string"),
    ("mediumblob", "string"),
    ("longblob", "string"),
    ("binary", "string"),
    ("varbinary", "string"),
    // Temporal
    ("date", "time.Time"),
    ("datetime", "time.Time"),
    ("timestamp", "time.Time"),
    ("time", "time.Time"),
    // Floating and fixed point
    ("float", "float32"),
    ("double", "float64"),
    ("decimal", "float64"),
];

/// Builds the MySQL type mapper.
pub fn mysql_type_mapper() -> TypeMapper {
    TypeMapper::new(Backend::MySql, MYSQL_TYPES.iter().copied())
}

/// MySQL classification rules.
///
/// Unsigned integers are remapped; a current-timestamp default alone never
/// marks a column as set on insert.
pub fn mysql_rules() -> ClassificationRules {
    ClassificationRules {
        signed_integer_types: &["int", "tinyint", "smallint", "mediumint", "bigint"],
        string_types: &["char", "varchar"],
        temporal_types: &["date", "datetime", "timestamp", "time"],
        temporal_prefixes: &[],
        decimal_types: &["decimal"],
        binary_types: &["binary", "varbinary"],
        bit_types: &["bit"],
        opaque_types: &[],
        unsigned_remap: true,
        auto_now_on_create: false,
    }
}
