//! Source emission: template rendering and file output.
//!
//! Each artifact kind lands in its own directory under the output root.
//! A failed write is reported and skips only that file.

mod blueprint;
mod formatter;
mod render;
pub mod templates;

pub use blueprint::Blueprint;
pub use formatter::SourceFormatter;
pub use render::{
    render_controller, render_model, render_namespace, render_router, render_struct, render_tag,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ScaffoldError;
use crate::models::Table;
use crate::naming::file_stem;

/// Router output file name
pub const ROUTER_FILE_NAME: &str = "router.go";

const SOURCE_EXTENSION: &str = "go";

/// Kind of generated artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Model,
    Controller,
    Router,
}

impl ArtifactKind {
    /// Directory under the output root.
    pub fn directory(self) -> &'static str {
        match self {
            Self::Model => "models",
            Self::Controller => "controllers",
            Self::Router => "routers",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::Controller => write!(f, "controller"),
            Self::Router => write!(f, "router"),
        }
    }
}

/// What to do when a target file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Ask the configured `OverwritePrompt`
    #[default]
    Prompt,
    Always,
    Never,
}

impl OverwritePolicy {
    /// Parses `prompt`, `always` or `never`.
    ///
    /// # Errors
    /// Returns a configuration error for any other value.
    pub fn parse(value: &str) -> crate::Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "prompt" => Ok(Self::Prompt),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(ScaffoldError::configuration(format!(
                "Unknown overwrite policy '{}': must be one of prompt, always or never",
                other
            ))),
        }
    }
}

/// Asks whether an existing file may be replaced.
#[async_trait]
pub trait OverwritePrompt: Send + Sync {
    /// Returns `true` to overwrite `path`.
    async fn confirm_overwrite(&self, path: &Path) -> bool;
}

/// Result of a single emission
#[derive(Debug)]
pub enum EmitOutcome {
    Written(PathBuf),
    Skipped(PathBuf),
    Failed(ScaffoldError),
}

impl EmitOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

/// Running totals of an emitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EmitReport {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Writes rendered artifacts under an output root.
pub struct Emitter {
    output_root: PathBuf,
    package_path: String,
    overwrite: OverwritePolicy,
    prompt: Option<Box<dyn OverwritePrompt>>,
    formatter: Option<SourceFormatter>,
    report: EmitReport,
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("output_root", &self.output_root)
            .field("package_path", &self.package_path)
            .field("overwrite", &self.overwrite)
            .field("prompt", &self.prompt.is_some())
            .field("formatter", &self.formatter)
            .field("report", &self.report)
            .finish()
    }
}

impl Emitter {
    pub fn new(output_root: impl Into<PathBuf>, package_path: impl Into<String>) -> Self {
        Self {
            output_root: output_root.into(),
            package_path: package_path.into(),
            overwrite: OverwritePolicy::default(),
            prompt: None,
            formatter: None,
            report: EmitReport::default(),
        }
    }

    #[must_use]
    pub fn with_overwrite(mut self, policy: OverwritePolicy) -> Self {
        self.overwrite = policy;
        self
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: Box<dyn OverwritePrompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Option<SourceFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn report(&self) -> EmitReport {
        self.report
    }

    /// Target path of an artifact. `table` is ignored for the router.
    pub fn artifact_path(&self, kind: ArtifactKind, table: &Table) -> PathBuf {
        let directory = self.output_root.join(kind.directory());
        match kind {
            ArtifactKind::Router => directory.join(ROUTER_FILE_NAME),
            ArtifactKind::Model | ArtifactKind::Controller => {
                directory.join(format!("{}.{}", file_stem(&table.name), SOURCE_EXTENSION))
            }
        }
    }

    /// Emits the model of a table.
    pub async fn emit_model(&mut self, table: &Table) -> EmitOutcome {
        let path = self.artifact_path(ArtifactKind::Model, table);
        let source = render_model(table, &self.package_path);
        self.write_artifact(ArtifactKind::Model, path, source).await
    }

    /// Emits the controller of a table, or nothing if the table has no
    /// usable primary key.
    pub async fn emit_controller(&mut self, table: &Table) -> Option<EmitOutcome> {
        if !table.has_primary_key() {
            tracing::debug!("No controller for '{}': no usable primary key", table.name);
            return None;
        }
        let path = self.artifact_path(ArtifactKind::Controller, table);
        let source = render_controller(table, &self.package_path);
        Some(
            self.write_artifact(ArtifactKind::Controller, path, source)
                .await,
        )
    }

    /// Emits the single router for all tables.
    pub async fn emit_router(&mut self, tables: &[Table]) -> EmitOutcome {
        let path = self
            .output_root
            .join(ArtifactKind::Router.directory())
            .join(ROUTER_FILE_NAME);
        let source = render_router(tables, &self.package_path);
        self.write_artifact(ArtifactKind::Router, path, source).await
    }

    async fn write_artifact(
        &mut self,
        kind: ArtifactKind,
        path: PathBuf,
        source: String,
    ) -> EmitOutcome {
        let outcome = self.write_source(kind, path, source).await;
        match &outcome {
            EmitOutcome::Written(_) => self.report.written = self.report.written.saturating_add(1),
            EmitOutcome::Skipped(_) => self.report.skipped = self.report.skipped.saturating_add(1),
            EmitOutcome::Failed(_) => self.report.failed = self.report.failed.saturating_add(1),
        }
        outcome
    }

    async fn write_source(&self, kind: ArtifactKind, path: PathBuf, source: String) -> EmitOutcome {
        if tokio::fs::try_exists(&path).await.unwrap_or(false) && !self.may_overwrite(&path).await
        {
            tracing::warn!("Skipped existing {} {}", kind, path.display());
            return EmitOutcome::Skipped(path);
        }

        if let Some(parent) = path.parent()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            let error = ScaffoldError::file_write(parent, e);
            tracing::warn!("{}", error);
            return EmitOutcome::Failed(error);
        }

        if let Err(e) = tokio::fs::write(&path, source).await {
            let error = ScaffoldError::file_write(&path, e);
            tracing::warn!("{}", error);
            return EmitOutcome::Failed(error);
        }

        tracing::info!("Wrote {} {}", kind, path.display());

        if let Some(formatter) = &self.formatter {
            formatter.format(&path).await;
        }

        EmitOutcome::Written(path)
    }

    async fn may_overwrite(&self, path: &Path) -> bool {
        match self.overwrite {
            OverwritePolicy::Always => true,
            OverwritePolicy::Never => false,
            OverwritePolicy::Prompt => match &self.prompt {
                Some(prompt) => prompt.confirm_overwrite(path).await,
                None => {
                    tracing::warn!(
                        "No overwrite prompt available, keeping {}",
                        path.display()
                    );
                    false
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConstraintRow, TableConstraints};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn keyed(name: &str) -> Table {
        Table::new(
            name,
            TableConstraints::from_rows(vec![ConstraintRow::primary_key("id", 1)]),
        )
    }

    struct ScriptedPrompt {
        answer: bool,
        asked: Arc<AtomicUsize>,
        paths: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl OverwritePrompt for ScriptedPrompt {
        async fn confirm_overwrite(&self, path: &Path) -> bool {
            self.asked.fetch_add(1, Ordering::SeqCst);
            self.paths.lock().unwrap().push(path.to_path_buf());
            self.answer
        }
    }

    fn scripted(answer: bool) -> (Box<ScriptedPrompt>, Arc<AtomicUsize>) {
        let asked = Arc::new(AtomicUsize::new(0));
        let prompt = Box::new(ScriptedPrompt {
            answer,
            asked: Arc::clone(&asked),
            paths: Mutex::new(Vec::new()),
        });
        (prompt, asked)
    }

    #[test]
    fn test_overwrite_policy_parse() {
        assert_eq!(OverwritePolicy::parse("Always").unwrap(), OverwritePolicy::Always);
        assert_eq!(OverwritePolicy::parse("never").unwrap(), OverwritePolicy::Never);
        assert_eq!(OverwritePolicy::parse("prompt").unwrap(), OverwritePolicy::Prompt);
        assert!(OverwritePolicy::parse("sometimes").is_err());
    }

    #[test]
    fn test_artifact_paths() {
        let emitter = Emitter::new("/srv/app", "app");
        let table = keyed("ab_test");
        assert_eq!(
            emitter.artifact_path(ArtifactKind::Model, &table),
            PathBuf::from("/srv/app/models/abtest.go")
        );
        assert_eq!(
            emitter.artifact_path(ArtifactKind::Controller, &table),
            PathBuf::from("/srv/app/controllers/abtest.go")
        );
        assert_eq!(
            emitter.artifact_path(ArtifactKind::Router, &table),
            PathBuf::from("/srv/app/routers/router.go")
        );
    }

    #[tokio::test]
    async fn test_emit_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut emitter = Emitter::new(dir.path(), "app").with_overwrite(OverwritePolicy::Always);

        let users = keyed("users");
        assert!(emitter.emit_model(&users).await.is_written());
        assert!(emitter.emit_controller(&users).await.unwrap().is_written());
        assert!(emitter.emit_router(std::slice::from_ref(&users)).await.is_written());

        assert!(dir.path().join("models/users.go").is_file());
        assert!(dir.path().join("controllers/users.go").is_file());
        assert!(dir.path().join("routers/router.go").is_file());
        assert_eq!(
            emitter.report(),
            EmitReport {
                written: 3,
                skipped: 0,
                failed: 0
            }
        );
    }

    #[tokio::test]
    async fn test_no_controller_without_primary_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut emitter = Emitter::new(dir.path(), "app");
        let table = Table::new("audit_log", TableConstraints::default());

        assert!(emitter.emit_controller(&table).await.is_none());
        assert!(!dir.path().join("controllers").exists());
        assert_eq!(emitter.report(), EmitReport::default());
    }

    #[tokio::test]
    async fn test_never_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("models")).unwrap();
        std::fs::write(dir.path().join("models/users.go"), "// hand edited\n").unwrap();

        let mut emitter = Emitter::new(dir.path(), "app").with_overwrite(OverwritePolicy::Never);
        let outcome = emitter.emit_model(&keyed("users")).await;

        assert!(matches!(outcome, EmitOutcome::Skipped(_)));
        let content = std::fs::read_to_string(dir.path().join("models/users.go")).unwrap();
        assert_eq!(content, "// hand edited\n");
        assert_eq!(emitter.report().skipped, 1);
    }

    #[tokio::test]
    async fn test_prompt_decides_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("models")).unwrap();
        std::fs::write(dir.path().join("models/users.go"), "old").unwrap();
        std::fs::write(dir.path().join("models/posts.go"), "old").unwrap();

        let (decline, declined) = scripted(false);
        let mut emitter = Emitter::new(dir.path(), "app").with_prompt(decline);
        assert!(matches!(
            emitter.emit_model(&keyed("users")).await,
            EmitOutcome::Skipped(_)
        ));
        assert_eq!(declined.load(Ordering::SeqCst), 1);

        let (accept, accepted) = scripted(true);
        let mut emitter = Emitter::new(dir.path(), "app").with_prompt(accept);
        assert!(emitter.emit_model(&keyed("posts")).await.is_written());
        assert_eq!(accepted.load(Ordering::SeqCst), 1);

        // New files are written without asking
        assert!(emitter.emit_model(&keyed("tags")).await.is_written());
        assert_eq!(accepted.load(Ordering::SeqCst), 1);

        assert_eq!(std::fs::read_to_string(dir.path().join("models/users.go")).unwrap(), "old");
        assert_ne!(std::fs::read_to_string(dir.path().join("models/posts.go")).unwrap(), "old");
    }

    #[tokio::test]
    async fn test_prompt_policy_without_prompt_skips() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("models")).unwrap();
        std::fs::write(dir.path().join("models/users.go"), "old").unwrap();

        let mut emitter = Emitter::new(dir.path(), "app");
        assert!(matches!(
            emitter.emit_model(&keyed("users")).await,
            EmitOutcome::Skipped(_)
        ));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported_and_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the models directory should be
        std::fs::write(dir.path().join("models"), "").unwrap();

        let mut emitter = Emitter::new(dir.path(), "app").with_overwrite(OverwritePolicy::Always);
        let users = keyed("users");

        let outcome = emitter.emit_model(&users).await;
        assert!(matches!(
            outcome,
            EmitOutcome::Failed(ScaffoldError::FileWrite { .. })
        ));
        assert!(emitter.emit_controller(&users).await.unwrap().is_written());
        assert_eq!(
            emitter.report(),
            EmitReport {
                written: 1,
                skipped: 0,
                failed: 1
            }
        );
    }

    #[tokio::test]
    async fn test_formatter_failure_still_counts_as_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut emitter = Emitter::new(dir.path(), "app")
            .with_formatter(Some(SourceFormatter::new("dbscaffold-no-such-formatter", Vec::new())));

        assert!(emitter.emit_model(&keyed("users")).await.is_written());
        assert_eq!(emitter.report().written, 1);
    }
}
