//! Column classification: raw column metadata to generated fields.
//!
//! Rules are applied per column in order, the first match wins:
//! 1. primary key column
//! 2. foreign key to a table that is not blacklisted
//! 3. scalar column, refined by the backend's type families

use crate::Result;
use crate::adapters::{ClassificationRules, TypeMapper};
use crate::error::ScaffoldError;
use crate::models::{
    Blacklist, Column, DecimalSpec, FieldType, RawColumn, RelationKind, Table, Tag, TemporalKind,
};
use crate::naming::{PRIMARY_KEY_IDENTIFIER, camel_case, field_identifier};
use regex::Regex;
use std::sync::OnceLock;

/// Target type of every primary key field
pub const PRIMARY_KEY_TYPE: &str = "int";

/// Target type that needs the temporal import
pub const TIME_TYPE: &str = "time.Time";

const SEQUENCE_DEFAULT_PREFIX: &str = "nextval(";

/// Pre-compiled full-type patterns.
struct TypeShapePatterns {
    /// `name(N)`
    sized: Regex,
    /// `name(D,S)` with optional trailing modifiers
    decimal: Regex,
    /// `name[(N)] modifiers`
    modifiers: Regex,
}

impl TypeShapePatterns {
    fn instance() -> &'static Self {
        static PATTERNS: OnceLock<TypeShapePatterns> = OnceLock::new();
        PATTERNS.get_or_init(|| Self {
            sized: Regex::new(r"^[a-z ]+\((\d+)\)(?:\s+[a-z]+)*$").expect("Invalid sized type pattern"),
            decimal: Regex::new(r"^[a-z ]+\((\d+),\s*(\d+)\)(?:\s+[a-z]+)*$")
                .expect("Invalid decimal type pattern"),
            modifiers: Regex::new(r"^[a-z]+(?:\(\d+\))?\s*(.*)$").expect("Invalid modifier pattern"),
        })
    }
}

/// Extracts the size of a `name(N)` full type.
///
/// A full type that is just the bare type name has no size.
///
/// # Errors
/// Returns `StructuredType` for any other shape
pub fn extract_size(full_type: &str, data_type: &str) -> Result<Option<String>> {
    let full_type = full_type.trim();
    if full_type == data_type {
        return Ok(None);
    }

    TypeShapePatterns::instance()
        .sized
        .captures(full_type)
        .and_then(|captures| captures.get(1))
        .map(|size| Some(size.as_str().to_string()))
        .ok_or_else(|| ScaffoldError::structured_type(full_type, "name(size)"))
}

/// Extracts precision and scale of a `name(D,S)` full type.
///
/// A full type that is just the bare type name has no precision.
///
/// # Errors
/// Returns `StructuredType` for any other shape
pub fn extract_decimal(full_type: &str, data_type: &str) -> Result<Option<DecimalSpec>> {
    let full_type = full_type.trim();
    if full_type == data_type {
        return Ok(None);
    }

    let captures = TypeShapePatterns::instance()
        .decimal
        .captures(full_type)
        .ok_or_else(|| ScaffoldError::structured_type(full_type, "name(digits,scale)"))?;

    Ok(Some(DecimalSpec {
        digits: captures[1].to_string(),
        scale: captures[2].to_string(),
    }))
}

/// True if the modifiers after an integer type include `unsigned`.
pub fn is_unsigned(full_type: &str) -> bool {
    TypeShapePatterns::instance()
        .modifiers
        .captures(full_type.trim())
        .and_then(|captures| captures.get(1))
        .is_some_and(|modifiers| {
            modifiers
                .as_str()
                .split_whitespace()
                .any(|modifier| modifier.eq_ignore_ascii_case("unsigned"))
        })
}

/// True if a default expression means "the current time".
pub fn is_current_timestamp(default_value: &str) -> bool {
    let lower = default_value.trim().to_lowercase();
    if lower == "now()" {
        return true;
    }
    match lower.strip_prefix("current_timestamp") {
        Some("") => true,
        Some(precision) => precision
            .strip_prefix('(')
            .and_then(|p| p.strip_suffix(')'))
            .is_some_and(|digits| digits.chars().all(|c| c.is_ascii_digit())),
        None => false,
    }
}

/// True if an extra marker means "refreshed on every update".
pub fn is_on_update_current_timestamp(extra: &str) -> bool {
    let lower = extra.trim().to_lowercase();
    lower
        .strip_prefix("on update ")
        .is_some_and(is_current_timestamp)
}

/// Turns raw columns into classified fields.
pub struct ColumnClassifier<'a> {
    type_mapper: &'a TypeMapper,
    rules: ClassificationRules,
    blacklist: &'a Blacklist,
}

impl<'a> ColumnClassifier<'a> {
    pub fn new(type_mapper: &'a TypeMapper, rules: ClassificationRules, blacklist: &'a Blacklist) -> Self {
        Self {
            type_mapper,
            rules,
            blacklist,
        }
    }

    /// Appends classified columns to `table`, in the order given.
    ///
    /// # Errors
    /// Returns `UnsupportedType` or `StructuredType` for the first column
    /// that cannot be classified; the table is left partially filled.
    pub fn classify(&self, table: &mut Table, raw_columns: &[RawColumn]) -> Result<()> {
        for raw in raw_columns {
            let column = self.classify_column(table, raw)?;
            if column.tag.temporal.is_some() || column.field_type == FieldType::Primitive(TIME_TYPE.to_string()) {
                table.imports_time = true;
            }
            table.columns.push(column);
        }

        tracing::debug!(
            "Classified {} columns of table '{}'",
            table.columns.len(),
            table.name
        );
        Ok(())
    }

    fn classify_column(&self, table: &Table, raw: &RawColumn) -> Result<Column> {
        // Every column type must be known, keys included
        let target = self.type_mapper.map(&raw.data_type)?;

        if table.primary_key.as_deref() == Some(raw.name.as_str()) {
            return Ok(Self::primary_key_column(raw));
        }

        if let Some(fk) = table.foreign_keys.get(&raw.name)
            && !self.blacklist.contains(&fk.referenced_table)
        {
            let mut tag = Tag::for_column(&raw.name);
            tag.relation = RelationKind::BelongsToForeignKey;
            tag.nullable = raw.is_nullable;
            return Ok(Column {
                name: field_identifier(&raw.name),
                field_type: FieldType::Relation {
                    entity: camel_case(&fk.referenced_table),
                },
                tag,
            });
        }

        self.scalar_column(table, raw, target)
    }

    fn primary_key_column(raw: &RawColumn) -> Column {
        let mut tag = Tag::for_column(&raw.name);
        if raw.is_auto_increment() {
            tag.auto_generated = true;
        } else {
            tag.primary_key_explicit = true;
        }
        Column {
            name: PRIMARY_KEY_IDENTIFIER.to_string(),
            field_type: FieldType::Primitive(PRIMARY_KEY_TYPE.to_string()),
            tag,
        }
    }

    fn scalar_column(&self, table: &Table, raw: &RawColumn, mut target: String) -> Result<Column> {
        let data_type = raw.data_type.as_str();
        let mut tag = Tag::for_column(&raw.name);
        tag.nullable = raw.is_nullable;
        tag.unique = table.unique_keys.iter().any(|uk| uk == &raw.name);

        if self.rules.unsigned_remap
            && self.rules.is_signed_integer(data_type)
            && is_unsigned(&raw.column_type)
            && !raw.is_auto_increment()
        {
            target = self.type_mapper.map_unsigned(data_type)?;
        }

        if self.rules.is_string(data_type) {
            tag.size = extract_size(&raw.column_type, data_type)?;
        }

        let default_is_now = raw.default_value.as_deref().is_some_and(is_current_timestamp);
        if self.rules.is_temporal(data_type) {
            tag.temporal = TemporalKind::from_native(data_type);
            if default_is_now && is_on_update_current_timestamp(&raw.extra) {
                tag.auto_now = true;
            } else if default_is_now && self.rules.auto_now_on_create {
                tag.auto_now_add = true;
            }
        }

        if self.rules.is_decimal(data_type) {
            tag.decimal = extract_decimal(&raw.column_type, data_type)?;
        }

        if self.rules.is_binary(data_type) || self.rules.is_bit(data_type) {
            tag.size = extract_size(&raw.column_type, data_type)?;
        }

        if self.rules.is_opaque(data_type) {
            tag.native_type = Some(data_type.to_string());
        }

        tag.default_value = raw
            .default_value
            .as_deref()
            .filter(|value| {
                !value.is_empty()
                    && !is_current_timestamp(value)
                    && !value.starts_with(SEQUENCE_DEFAULT_PREFIX)
                    && !raw.is_auto_increment()
            })
            .map(str::to_string);

        Ok(Column {
            name: field_identifier(&raw.name),
            field_type: FieldType::Primitive(target),
            tag,
        })
    }
}
