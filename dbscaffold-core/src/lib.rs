//! Core library for dbscaffold.
//!
//! Reads the schema of an existing MySQL or PostgreSQL database and
//! generates the models, controllers and router of a Go/beego application
//! from it.
//!
//! # Pipeline
//! 1. A [`SchemaSource`] lists tables and collects key constraints.
//! 2. The constraint phase builds every [`Table`] and the blacklist of
//!    tables that cannot be relation targets.
//! 3. The column classifier turns raw columns into typed fields with tags.
//! 4. The emitter renders templates and writes files.
//!
//! All database access is read-only. Connection strings are redacted in
//! every error and log message.

pub mod adapters;
pub mod classify;
pub mod constraints;
pub mod emit;
pub mod error;
pub mod generate;
pub mod logging;
pub mod models;
pub mod naming;

// Re-export commonly used types
pub use adapters::{ClassificationRules, ConnectionConfig, SchemaSource, TypeMapper, open_source};
pub use emit::{ArtifactKind, EmitOutcome, EmitReport, Emitter, OverwritePolicy, OverwritePrompt};
pub use error::{Result, ScaffoldError};
pub use generate::{
    GenerateOptions, GenerateRequest, GenerationSummary, Mode, Orchestrator, TableFilter,
    generate_appcode,
};
pub use models::{Backend, Column, FieldType, RawColumn, Table, TableConstraints, Tag};
