//! Post-write source formatting.

use std::path::Path;
use tokio::process::Command;

/// External command run on every written file, e.g. `gofmt -w <file>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFormatter {
    program: String,
    args: Vec<String>,
}

impl SourceFormatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Builds a formatter from a command line split into words.
    ///
    /// Returns `None` for an empty command.
    pub fn from_command<S: AsRef<str>>(command: &[S]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        let program = program.as_ref().trim();
        if program.is_empty() {
            return None;
        }
        Some(Self::new(
            program,
            args.iter().map(|a| a.as_ref().to_string()).collect(),
        ))
    }

    /// `gofmt -w`
    pub fn gofmt() -> Self {
        Self::new("gofmt", vec!["-w".to_string()])
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Formats `path` in place.
    ///
    /// Returns whether the command ran and exited successfully. Failures
    /// are logged as warnings and never propagate.
    pub async fn format(&self, path: &Path) -> bool {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .await;

        match status {
            Ok(status) if status.success() => {
                tracing::debug!("Formatted {}", path.display());
                true
            }
            Ok(status) => {
                tracing::warn!(
                    "{} exited with {} while formatting {}",
                    self.program,
                    status,
                    path.display()
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    "Could not run {} on {}: {}",
                    self.program,
                    path.display(),
                    e
                );
                false
            }
        }
    }
}
