//! Lectern CLI - Command-line interface for scripture corpora

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate the limit argument (must be at least 1)
fn parse_limit(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("limit must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "lectern")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about a corpus file
    Info {
        /// Corpus file path
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a corpus file
    Validate {
        /// Corpus file path
        input: String,

        /// Fail when any line could not be parsed
        #[arg(long)]
        strict: bool,
    },

    /// Search a corpus for matching verses
    Search {
        /// Corpus file path
        input: String,

        /// Query text
        query: String,

        /// Maximum number of results (must be at least 1)
        #[arg(short, long, default_value = "100", value_parser = parse_limit)]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a chapter from a corpus
    Read {
        /// Corpus file path
        input: String,

        /// Book name (defaults to the first book)
        book: Option<String>,

        /// Chapter number
        #[arg(short, long, default_value = "1")]
        chapter: u32,

        /// Verse to mark in the output
        #[arg(long)]
        verse: Option<u32>,
    },

    /// Print the verse of the day
    Daily {
        /// Corpus file path
        input: String,

        /// Date to select for (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Restrict the pool to a single book
        #[arg(short, long)]
        book: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "lectern_cli=debug,lectern_core=debug"
    } else {
        "lectern_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Info { input, json } => commands::info(&input, json),

        Commands::Validate { input, strict } => commands::validate(&input, strict),

        Commands::Search {
            input,
            query,
            limit,
            json,
        } => commands::search(&input, &query, limit, json),

        Commands::Read {
            input,
            book,
            chapter,
            verse,
        } => commands::read(&input, book.as_deref(), chapter, verse),

        Commands::Daily { input, date, book } => commands::daily(&input, date.as_deref(), book.as_deref()),
    }
}
