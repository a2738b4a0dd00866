//! Constraint phase: key constraints for every table and the blacklist.
//!
//! This phase runs to completion before any column is classified, so the
//! blacklist is final by the time relations are decided.

use crate::Result;
use crate::adapters::SchemaSource;
use crate::models::{Blacklist, Table, TableConstraints};

/// Tables with their key constraints, in processing order, plus the
/// tables that cannot be relation targets.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConstraints {
    pub tables: Vec<Table>,
    pub blacklist: Blacklist,
}

impl ResolvedConstraints {
    /// Builds tables and the blacklist from already collected constraints.
    ///
    /// A table without a single-column primary key is blacklisted.
    pub fn from_constraints<I, S>(constraints: I) -> Self
    where
        I: IntoIterator<Item = (S, TableConstraints)>,
        S: Into<String>,
    {
        let mut resolved = Self::default();

        for (name, table_constraints) in constraints {
            let name = name.into();
            if !table_constraints.has_single_primary_key() {
                tracing::debug!(
                    "Table '{}' has no single-column primary key, it cannot be a relation target",
                    name
                );
                resolved.blacklist.insert(name.clone());
            }
            resolved.tables.push(Table::new(name, table_constraints));
        }

        resolved
    }
}

/// Resolves constraints for all candidate tables.
pub struct ConstraintResolver;

impl ConstraintResolver {
    /// Queries constraints of every table in order.
    ///
    /// # Errors
    /// Returns the first `SchemaQuery` error; the phase is all or nothing.
    pub async fn resolve(
        source: &dyn SchemaSource,
        table_names: &[String],
    ) -> Result<ResolvedConstraints> {
        let mut collected = Vec::with_capacity(table_names.len());
        for name in table_names {
            let constraints = source.discover_constraints(name).await?;
            collected.push((name.clone(), constraints));
        }

        let resolved = ResolvedConstraints::from_constraints(collected);
        tracing::info!(
            "Resolved constraints for {} tables ({} blacklisted)",
            resolved.tables.len(),
            resolved.blacklist.len()
        );
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConstraintRow;

    #[test]
    fn test_blacklist_contains_tables_without_usable_key() {
        let resolved = ResolvedConstraints::from_constraints(vec![
            (
                "users",
                TableConstraints::from_rows(vec![ConstraintRow::primary_key("id", 1)]),
            ),
            ("audit_log", TableConstraints::default()),
            (
                "post_tags",
                TableConstraints::from_rows(vec![
                    ConstraintRow::primary_key("post_id", 1),
                    ConstraintRow::primary_key("tag_id", 2),
                ]),
            ),
        ]);

        assert!(!resolved.blacklist.contains("users"));
        assert!(resolved.blacklist.contains("audit_log"));
        assert!(resolved.blacklist.contains("post_tags"));
        assert_eq!(resolved.blacklist.len(), 2);
    }

    #[test]
    fn test_tables_keep_processing_order() {
        let resolved = ResolvedConstraints::from_constraints(vec![
            ("zebra", TableConstraints::default()),
            ("alpha", TableConstraints::default()),
        ]);
        let names: Vec<_> = resolved.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["zebra", "alpha"]);
        assert!(resolved.tables.iter().all(|t| t.columns.is_empty()));
    }

    #[test]
    fn test_table_carries_constraints() {
        let resolved = ResolvedConstraints::from_constraints(vec![(
            "posts",
            TableConstraints::from_rows(vec![
                ConstraintRow::primary_key("id", 1),
                ConstraintRow::unique("slug"),
                ConstraintRow::foreign_key("user_id", "app", "users", "id"),
            ]),
        )]);

        let posts = &resolved.tables[0];
        assert_eq!(posts.primary_key.as_deref(), Some("id"));
        assert_eq!(posts.unique_keys, vec!["slug".to_string()]);
        assert!(posts.foreign_keys.contains_key("user_id"));
    }
}
