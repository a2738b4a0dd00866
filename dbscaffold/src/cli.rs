//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dbscaffold")]
#[command(about = "Generate models, controllers and routers from a database schema")]
#[command(version)]
#[command(long_about = "
dbscaffold - application code from an existing database schema

Reads tables, columns and key constraints of a MySQL or PostgreSQL
database and writes a Go/beego application skeleton:
- models/<table>.go with ORM-tagged structs and CRUD helpers
- controllers/<table>.go for every table with a primary key
- routers/router.go registering one namespace per controller

All database access is read-only. Credentials are redacted in logs.

EXAMPLES:
  dbscaffold generate --conn mysql://root@127.0.0.1:3306/shop
  dbscaffold generate --driver postgres --conn postgres://localhost/blog --mode mc
  dbscaffold generate --database shop --tables users,posts --overwrite always
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate application code from a database
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all output except errors")]
    pub quiet: bool,

    /// Configuration file
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Configuration file (default: dbscaffold.json in the working directory)"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct GenerateArgs {
    /// Database driver
    #[arg(long, value_name = "DRIVER", help = "Database driver: mysql, postgres or sqlite")]
    pub driver: Option<String>,

    /// Connection string
    #[arg(
        long,
        env = "DATABASE_URL",
        value_name = "URL",
        help = "Connection string (credentials will be sanitized in logs)"
    )]
    pub conn: Option<String>,

    /// Database on the default local MySQL server
    #[arg(
        long,
        value_name = "NAME",
        help = "Use this database on the default local MySQL server"
    )]
    pub database: Option<String>,

    /// Artifacts to generate
    #[arg(
        long,
        value_name = "MODE",
        help = "m = models; mc = models and controllers; r = router; all = everything"
    )]
    pub mode: Option<String>,

    /// Tables to generate
    #[arg(long, value_name = "LIST", help = "Comma-separated table names (default: all tables)")]
    pub tables: Option<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", help = "Application root directory (default: .)")]
    pub output: Option<PathBuf>,

    /// Import path of the output directory
    #[arg(
        long,
        value_name = "PATH",
        help = "Import path of the application (default: from go.mod or GOPATH)"
    )]
    pub package: Option<String>,

    /// Overwrite policy for existing files
    #[arg(long, value_name = "POLICY", help = "Existing files: prompt, always or never")]
    pub overwrite: Option<String>,

    /// Skip source formatting
    #[arg(long, help = "Do not run the source formatter on written files")]
    pub no_format: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "dbscaffold",
            "-vv",
            "generate",
            "--driver",
            "postgres",
            "--mode",
            "mc",
            "--tables",
            "users,posts",
            "--no-format",
        ])
        .unwrap();

        assert_eq!(cli.global.verbose, 2);
        let Command::Generate(args) = cli.command;
        assert_eq!(args.driver.as_deref(), Some("postgres"));
        assert_eq!(args.mode.as_deref(), Some("mc"));
        assert_eq!(args.tables.as_deref(), Some("users,posts"));
        assert!(args.no_format);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["dbscaffold"]).is_err());
    }
}
