//! Identifier and file-name derivation for generated sources.

/// Field identifier reserved for the primary key.
pub const PRIMARY_KEY_IDENTIFIER: &str = "Id";

/// Source column name that collides with the primary-key identifier.
pub const RESERVED_COLUMN_NAME: &str = "id";

/// Identifier given to a non-key column named `id`.
pub const RENAMED_ID_IDENTIFIER: &str = "Id_RENAME";

const TEST_SUFFIX: &str = "_test";

/// Converts a snake_case source name to an UpperCamelCase identifier.
///
/// Tokens are split on `_`, trimmed, and get their first character
/// uppercased; the rest of each token is kept as is.
///
/// ```rust
/// use dbscaffold_core::naming::camel_case;
///
/// assert_eq!(camel_case("user_id"), "UserId");
/// assert_eq!(camel_case("users"), "Users");
/// ```
pub fn camel_case(source: &str) -> String {
    source
        .split('_')
        .map(|token| {
            let token = token.trim_matches(' ');
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Derives the field identifier of a non-primary-key column.
///
/// A column literally named `id` that is not the primary key would collide
/// with the primary-key field and is renamed.
pub fn field_identifier(source: &str) -> String {
    if source == RESERVED_COLUMN_NAME {
        RENAMED_ID_IDENTIFIER.to_string()
    } else {
        camel_case(source)
    }
}

/// Output file stem for a table.
///
/// Go treats `*_test.go` files as tests, so every trailing `_test` is
/// collapsed to `test`.
///
/// ```rust
/// use dbscaffold_core::naming::file_stem;
///
/// assert_eq!(file_stem("ab_test"), "abtest");
/// assert_eq!(file_stem("users"), "users");
/// ```
pub fn file_stem(table_name: &str) -> String {
    let mut stem = table_name.to_string();
    while stem.ends_with(TEST_SUFFIX) {
        let cut = stem.len().saturating_sub(TEST_SUFFIX.len());
        stem.replace_range(cut..=cut, "");
    }
    stem
}

/// Route namespace segment for a table.
pub fn route_segment(table_name: &str) -> String {
    table_name.replace('_', "-")
}
