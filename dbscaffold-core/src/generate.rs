//! Generation pipeline: introspect, classify and emit.
//!
//! The run is strictly sequential. Constraints of every listed table are
//! resolved before any column is classified, and artifacts are emitted in
//! the fixed order models, controllers, router.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::adapters::{SchemaSource, open_source};
use crate::classify::ColumnClassifier;
use crate::constraints::ConstraintResolver;
use crate::emit::{EmitReport, Emitter, OverwritePolicy, OverwritePrompt, SourceFormatter};
use crate::error::ScaffoldError;
use crate::models::{Backend, Table};

/// Set of artifact kinds to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mode(u8);

impl Mode {
    pub const MODEL: Self = Self(0b001);
    pub const CONTROLLER: Self = Self(0b010);
    pub const ROUTER: Self = Self(0b100);
    pub const ALL: Self = Self(0b111);

    /// Parses `m`, `mc`, `r` or `all`.
    ///
    /// # Errors
    /// Returns a configuration error for any other value.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "m" => Ok(Self::MODEL),
            "mc" => Ok(Self::MODEL.union(Self::CONTROLLER)),
            "r" => Ok(Self::ROUTER),
            "all" => Ok(Self::ALL),
            other => Err(ScaffoldError::configuration(format!(
                "Invalid generation mode '{}': must be one of m, mc, r or all",
                other
            ))),
        }
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::ALL
    }
}

/// Restriction of the processed tables to a named subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    names: Option<BTreeSet<String>>,
}

impl TableFilter {
    /// Parses a comma-separated list. Blank entries are ignored and an
    /// empty list selects every table.
    ///
    /// ```rust
    /// use dbscaffold_core::generate::TableFilter;
    ///
    /// let filter = TableFilter::parse("users, ,posts");
    /// assert!(filter.allows("posts"));
    /// assert!(!filter.allows("tags"));
    /// assert!(TableFilter::parse("").allows("tags"));
    /// ```
    pub fn parse(value: &str) -> Self {
        let names: BTreeSet<String> = value
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            names: (!names.is_empty()).then_some(names),
        }
    }

    pub fn allows(&self, table: &str) -> bool {
        self.names.as_ref().is_none_or(|names| names.contains(table))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_none()
    }

    /// Keeps allowed tables in their original order. Unknown names are
    /// silently ignored.
    pub fn apply(&self, tables: Vec<String>) -> Vec<String> {
        tables.into_iter().filter(|t| self.allows(t)).collect()
    }
}

/// Emission settings of a run.
#[derive(Default)]
pub struct GenerateOptions {
    /// Import path of the output root in the generated code
    pub package_path: String,
    pub overwrite: OverwritePolicy,
    pub prompt: Option<Box<dyn OverwritePrompt>>,
    pub formatter: Option<SourceFormatter>,
}

impl std::fmt::Debug for GenerateOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateOptions")
            .field("package_path", &self.package_path)
            .field("overwrite", &self.overwrite)
            .field("prompt", &self.prompt.is_some())
            .field("formatter", &self.formatter)
            .finish()
    }
}

/// A validated generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub backend: Backend,
    pub connection_string: String,
    pub mode: Mode,
    pub table_filter: TableFilter,
    pub output_root: PathBuf,
}

impl GenerateRequest {
    /// Validates the raw entry-point arguments.
    ///
    /// # Errors
    /// Returns a configuration error for an unknown backend or mode.
    pub fn parse(
        backend: &str,
        connection_string: &str,
        mode: &str,
        table_filter: &str,
        output_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            backend: Backend::parse(backend)?,
            connection_string: connection_string.to_string(),
            mode: Mode::parse(mode)?,
            table_filter: TableFilter::parse(table_filter),
            output_root: output_root.into(),
        })
    }
}

/// Outcome of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    pub tables: Vec<String>,
    /// Tables without a usable primary key
    pub blacklisted: Vec<String>,
    pub files: EmitReport,
}

/// Drives one generation run against a schema source.
#[derive(Debug)]
pub struct Orchestrator {
    mode: Mode,
    table_filter: TableFilter,
    emitter: Emitter,
}

impl Orchestrator {
    pub fn new(
        mode: Mode,
        table_filter: TableFilter,
        output_root: &Path,
        options: GenerateOptions,
    ) -> Self {
        let mut emitter = Emitter::new(output_root, options.package_path)
            .with_overwrite(options.overwrite)
            .with_formatter(options.formatter);
        if let Some(prompt) = options.prompt {
            emitter = emitter.with_prompt(prompt);
        }

        Self {
            mode,
            table_filter,
            emitter,
        }
    }

    /// Runs the pipeline against an open source. The source is left open.
    ///
    /// # Errors
    /// Any schema-level failure aborts the run. File-level failures are
    /// only counted in the summary.
    pub async fn run_with_source(mut self, source: &dyn SchemaSource) -> Result<GenerationSummary> {
        tracing::info!("Analyzing {} database tables", source.backend());

        // The blacklist covers every listed table, selected or not
        let table_names = source.list_tables().await?;
        let resolved = ConstraintResolver::resolve(source, &table_names).await?;
        let blacklist = resolved.blacklist;
        let mut tables: Vec<Table> = resolved
            .tables
            .into_iter()
            .filter(|table| self.table_filter.allows(&table.name))
            .collect();
        if tables.is_empty() {
            tracing::warn!("No tables selected for generation");
        }

        let classifier = ColumnClassifier::new(source.type_mapper(), source.rules(), &blacklist);
        for table in &mut tables {
            let raw_columns = source.discover_columns(&table.name).await?;
            classifier.classify(table, &raw_columns)?;
        }

        self.emit(&tables).await;

        let report = self.emitter.report();
        tracing::info!(
            "Generated {} files for {} tables ({} skipped, {} failed)",
            report.written,
            tables.len(),
            report.skipped,
            report.failed
        );

        Ok(GenerationSummary {
            tables: tables.iter().map(|t| t.name.clone()).collect(),
            blacklisted: blacklist.iter().map(str::to_string).collect(),
            files: report,
        })
    }

    /// Runs the pipeline and closes the source, on success and on every
    /// error path.
    ///
    /// # Errors
    /// See [`Orchestrator::run_with_source`].
    pub async fn run_and_close(self, source: Box<dyn SchemaSource>) -> Result<GenerationSummary> {
        let result = self.run_with_source(source.as_ref()).await;
        source.close().await;
        result
    }

    async fn emit(&mut self, tables: &[Table]) {
        if self.mode.contains(Mode::MODEL) {
            tracing::info!("Creating model files");
            for table in tables {
                self.emitter.emit_model(table).await;
            }
        }

        if self.mode.contains(Mode::CONTROLLER) {
            tracing::info!("Creating controller files");
            for table in tables {
                self.emitter.emit_controller(table).await;
            }
        }

        if self.mode.contains(Mode::ROUTER) {
            tracing::info!("Creating router file");
            self.emitter.emit_router(tables).await;
        }
    }
}

/// Generates application code from a live database.
///
/// The connection is closed on success and on every error path.
///
/// # Errors
/// Configuration errors for an unknown backend or mode,
/// `UnsupportedDriver` for `sqlite`, and any schema-level failure.
pub async fn generate_appcode(
    backend: &str,
    connection_string: &str,
    mode: &str,
    table_filter: &str,
    output_root: &Path,
    options: GenerateOptions,
) -> Result<GenerationSummary> {
    let request = GenerateRequest::parse(
        backend,
        connection_string,
        mode,
        table_filter,
        output_root,
    )?;
    run(request, options).await
}

/// Runs a validated request.
///
/// # Errors
/// See [`generate_appcode`].
pub async fn run(request: GenerateRequest, options: GenerateOptions) -> Result<GenerationSummary> {
    let source = open_source(request.backend, &request.connection_string).await?;

    Orchestrator::new(
        request.mode,
        request.table_filter,
        &request.output_root,
        options,
    )
    .run_and_close(source)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("m").unwrap(), Mode::MODEL);
        assert_eq!(Mode::parse("mc").unwrap().bits(), 0b011);
        assert_eq!(Mode::parse("r").unwrap(), Mode::ROUTER);
        assert_eq!(Mode::parse("all").unwrap(), Mode::ALL);
    }

    #[test]
    fn test_mode_parse_rejects_unknown() {
        for value in ["", "c", "mr", "ALL", "models"] {
            let err = Mode::parse(value).unwrap_err();
            assert!(matches!(err, ScaffoldError::Configuration { .. }), "{}", value);
        }
    }

    #[test]
    fn test_mode_contains() {
        let mc = Mode::parse("mc").unwrap();
        assert!(mc.contains(Mode::MODEL));
        assert!(mc.contains(Mode::CONTROLLER));
        assert!(!mc.contains(Mode::ROUTER));
        assert!(Mode::ALL.contains(Mode::ROUTER));
    }

    #[test]
    fn test_table_filter() {
        let filter = TableFilter::parse(" users,,posts ,");
        assert!(!filter.is_empty());
        assert_eq!(
            filter.apply(vec!["tags".into(), "posts".into(), "users".into()]),
            vec!["posts".to_string(), "users".to_string()]
        );

        assert!(TableFilter::parse("").is_empty());
        assert!(TableFilter::parse(" , ").is_empty());
    }

    #[test]
    fn test_unknown_filter_names_are_ignored() {
        let filter = TableFilter::parse("missing");
        assert!(filter.apply(vec!["users".into()]).is_empty());
    }

    #[test]
    fn test_request_parse() {
        let request = GenerateRequest::parse(
            "postgresql",
            "postgres://localhost/app",
            "mc",
            "users",
            "/srv/app",
        )
        .unwrap();
        assert_eq!(request.backend, Backend::Postgres);
        assert!(request.mode.contains(Mode::CONTROLLER));
        assert!(request.table_filter.allows("users"));

        assert!(GenerateRequest::parse("oracle", "", "all", "", "/srv").is_err());
        assert!(GenerateRequest::parse("mysql", "", "x", "", "/srv").is_err());
    }

    #[tokio::test]
    async fn test_sqlite_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_appcode(
            "sqlite",
            "sqlite://app.db",
            "all",
            "",
            dir.path(),
            GenerateOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ScaffoldError::UnsupportedDriver { .. }));
    }

    #[tokio::test]
    async fn test_bad_mode_fails_before_connecting() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_appcode(
            "mysql",
            "mysql://root@127.0.0.1:1/none",
            "everything",
            "",
            dir.path(),
            GenerateOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ScaffoldError::Configuration { .. }));
    }
}
