use booklens_core::{Corpus, DifficultyFilter, InterpreterOptions, DEFAULT_SEARCH_LIMIT};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "booklens", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Folder that contains the book text files.
    #[arg(long, env = "BOOKLENS_BOOKS_DIR", default_value = "scanned_books")]
    books_dir: PathBuf,

    /// Characters of context returned around a search hit.
    #[arg(long, env = "BOOKLENS_SNIPPET_LENGTH", default_value = "200")]
    snippet_length: usize,

    /// Reading speed used for reading-time estimates.
    #[arg(long, env = "BOOKLENS_WORDS_PER_MINUTE", default_value = "200")]
    words_per_minute: usize,
}

#[derive(Subcommand)]
enum Command {
    /// List loaded books with their derived metadata.
    List,
    /// Print the metadata of one book as JSON.
    Show {
        #[arg(long)]
        book: String,
    },
    /// Print the section outline of one book.
    Sections {
        #[arg(long)]
        book: String,
    },
    /// Ranked keyword search across all sections.
    Search {
        #[arg(long)]
        query: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Books tagged with a topic, sorted by title.
    Topic {
        #[arg(long)]
        topic: String,
    },
    /// Recommend books for a set of topics.
    Recommend {
        /// Comma-separated topics.
        #[arg(long, value_delimiter = ',')]
        topics: Vec<String>,
        /// beginner, intermediate, advanced or any.
        #[arg(long, default_value = "any")]
        difficulty: DifficultyFilter,
    },
    /// Aggregate corpus statistics as JSON.
    Stats,
    /// Export a book summary as JSON.
    Export {
        #[arg(long)]
        book: String,
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        books_dir = %cli.books_dir.display(),
        "booklens boot"
    );

    let options = InterpreterOptions {
        snippet_length: cli.snippet_length,
        words_per_minute: cli.words_per_minute,
        ..InterpreterOptions::default()
    };
    let corpus = Corpus::load(&cli.books_dir, options)?;

    if !corpus.skipped_files().is_empty() {
        warn!(
            "skipped_files={} for folder={}",
            corpus.skipped_files().len(),
            cli.books_dir.display()
        );
    }

    match cli.command {
        Command::List => {
            for document in corpus.documents() {
                println!(
                    "{} | {} | {} words | {} sections | {} min | {} | {}",
                    document.document_id,
                    document.title,
                    document.total_words,
                    document.sections_count,
                    document.reading_time_minutes,
                    document.difficulty_level,
                    document.topics.join(", ")
                );
            }
        }
        Command::Show { book } => {
            let document = corpus
                .get_document(&book)
                .ok_or_else(|| anyhow::anyhow!("book not found: {book}"))?;
            println!("{}", serde_json::to_string_pretty(document)?);
        }
        Command::Sections { book } => {
            let sections = corpus
                .get_sections(&book)
                .ok_or_else(|| anyhow::anyhow!("book not found: {book}"))?;
            for section in sections {
                let indent = "  ".repeat(section.level.saturating_sub(1));
                println!(
                    "{indent}{} {} ({} words, lines {}-{})",
                    section.section_id,
                    section.title,
                    section.word_count,
                    section.start_line,
                    section.end_line
                );
            }
        }
        Command::Search { query, limit } => {
            let results = corpus.search(&query, limit);
            println!("query: {query}");
            if results.is_empty() {
                println!("no matches");
            }
            for result in results {
                println!(
                    "[{}] score={:.2} section={}",
                    result.section_title, result.relevance_score, result.section_id
                );
                println!("  {}", result.content_snippet);
            }
        }
        Command::Topic { topic } => {
            for document in corpus.get_documents_by_topic(&topic) {
                println!("{} ({})", document.title, document.difficulty_level);
            }
        }
        Command::Recommend { topics, difficulty } => {
            for document in corpus.recommend(&topics, difficulty) {
                println!(
                    "{} ({}) topics={}",
                    document.title,
                    document.difficulty_level,
                    document.topics.join(", ")
                );
            }
        }
        Command::Stats => {
            println!("{}", serde_json::to_string_pretty(&corpus.stats())?);
        }
        Command::Export { book, output } => {
            let summary = corpus.export_summary(&book)?;
            match output {
                Some(path) => {
                    summary.write_json(&path)?;
                    info!(book = %book, path = %path.display(), "exported book summary");
                }
                None => println!("{}", summary.to_json_pretty()?),
            }
        }
    }

    Ok(())
}
