pub mod error;
pub mod export;
pub mod extractor;
pub mod index;
pub mod ingest;
pub mod metadata;
pub mod models;
pub mod query;
pub mod shared;
pub mod store;
pub mod traits;

pub use error::{ExportError, IngestError};
pub use export::{
    BookSummary, ChapterOutline, ContentSummary, SummaryMetadata, SummaryStructure, WordCount,
};
pub use extractor::SectionExtractor;
pub use index::{InvertedIndex, Location, Tokenizer};
pub use ingest::{
    discover_text_files, ingest_folder_best_effort, process_file, process_text, IngestionReport,
    ProcessedDocument, SkippedFile,
};
pub use metadata::{reading_time_minutes, MetadataSummarizer, TextSummary};
pub use models::{
    CorpusStats, Difficulty, DifficultyFilter, Document, InterpreterOptions, SearchResult, Section,
    TopicCount,
};
pub use query::{build_snippet, QueryEngine, DEFAULT_SEARCH_LIMIT};
pub use shared::SharedCorpus;
pub use store::Corpus;
pub use traits::SectionLookup;
