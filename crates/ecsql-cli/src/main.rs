//! ecsql-parse CLI
//!
//! Parses one ECSQL statement and prints its parse tree.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use ecsql_parser::{parse, LexicalMode, ParseContext};

/// Parse an ECSQL statement and print the resulting tree.
#[derive(Parser)]
#[command(name = "ecsql-parse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Statement text (read from --file if omitted).
    statement: Option<String>,

    /// Read the statement from a file.
    #[arg(short, long, conflicts_with = "statement")]
    file: Option<PathBuf>,

    /// Accept shorthand predicates against this implicit field.
    #[arg(short, long, env = "ECSQL_IMPLICIT_FIELD")]
    shorthand: Option<String>,

    /// Lexical mode for unquoted words.
    #[arg(short, long, value_enum, default_value_t = Mode::Sql)]
    mode: Mode,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// Maximum nesting depth.
    #[arg(long, default_value_t = ecsql_parser::parser::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Regular SQL lexing.
    Sql,
    /// Unquoted non-keyword words are string literals.
    String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Indented tree dump.
    Tree,
    /// Unparsed ECSQL text.
    Sql,
    /// JSON document.
    Json,
}

impl From<Mode> for LexicalMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Sql => Self::Sql,
            Mode::String => Self::String,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let source = match (&cli.statement, &cli.file) {
        (Some(statement), _) => statement.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => bail!("no statement given; pass it as an argument or use --file"),
    };

    let mut ctx = ParseContext::new()
        .with_lexical_mode(cli.mode.into())
        .with_max_depth(cli.max_depth);
    if let Some(field) = cli.shorthand {
        ctx = ctx.with_shorthand_predicates(field);
    }
    debug!(?ctx, "parse context");

    let tree = match parse(&source, &mut ctx) {
        Ok(tree) => tree,
        Err(error) => {
            eprintln!("{}", error.render(&source));
            return Ok(ExitCode::FAILURE);
        }
    };

    match cli.format {
        Format::Tree => print!("{tree}"),
        Format::Sql => println!("{}", tree.to_sql()),
        Format::Json => {
            let json = serde_json::to_string_pretty(&tree).context("failed to encode tree")?;
            println!("{json}");
        }
    }
    Ok(ExitCode::SUCCESS)
}
